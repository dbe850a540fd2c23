//! Hook facade: from a post-execution event to attributed notifications.

use std::sync::Arc;

use catsync_core::observability::hook_span;
use catsync_core::{KnownObjects, Notification, UpdateIntent};
use chrono::{DateTime, Utc};

use crate::config::HookConfig;
use crate::error::{HookError, Result};
use crate::event::{HiveOperation, HookEvent};
use crate::materialize::HiveTableMaterializer;
use crate::naming::ColumnNaming;
use crate::planner::RenamePlanner;

/// Turns hook events into notifications for the metadata store.
#[derive(Debug, Clone)]
pub struct RenameHook {
    config: HookConfig,
    planner: RenamePlanner,
}

impl RenameHook {
    /// Creates a hook using the default Hive materializer.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Config`] if the configuration is invalid.
    pub fn new(config: HookConfig, known_objects: Arc<dyn KnownObjects>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| HookError::config(e.to_string()))?;

        let naming: Arc<dyn ColumnNaming> = Arc::new(config.column_naming);
        let materializer = Arc::new(HiveTableMaterializer::new(
            config.cluster_name.clone(),
            Arc::clone(&naming),
        ));
        let planner = RenamePlanner::new(materializer, naming, known_objects);

        Ok(Self { config, planner })
    }

    /// Creates a hook around an existing planner.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Config`] if the configuration is invalid.
    pub fn with_planner(config: HookConfig, planner: RenamePlanner) -> Result<Self> {
        config
            .validate()
            .map_err(|e| HookError::config(e.to_string()))?;
        Ok(Self { config, planner })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Returns the planner.
    #[must_use]
    pub fn planner(&self) -> &RenamePlanner {
        &self.planner
    }

    /// Handles an event, stamping notifications with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if a notification envelope cannot be built.
    pub fn handle(&self, event: &HookEvent) -> Result<Vec<Notification<UpdateIntent>>> {
        self.handle_at(event, Utc::now())
    }

    /// Handles an event, stamping notifications with `occurred_at`.
    ///
    /// Operations other than a table rename produce no notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if a notification envelope cannot be built.
    pub fn handle_at(
        &self,
        event: &HookEvent,
        occurred_at: DateTime<Utc>,
    ) -> Result<Vec<Notification<UpdateIntent>>> {
        let user = self.user_for(event);
        let span = hook_span(event.operation.as_str(), user);
        let _guard = span.enter();

        let intents = match event.operation {
            HiveOperation::AlterTableRename => self.planner.plan_rename(event),
            other => {
                tracing::debug!(operation = %other, "Operation not handled by rename hook");
                return Ok(Vec::new());
            }
        };

        let notifications = intents
            .into_iter()
            .map(|intent| Notification::new(user, self.config.source.as_str(), occurred_at, intent))
            .collect::<catsync_core::Result<Vec<_>>>()?;

        tracing::debug!(notifications = notifications.len(), "Built notifications");
        Ok(notifications)
    }

    fn user_for<'a>(&'a self, event: &'a HookEvent) -> &'a str {
        event
            .user
            .as_deref()
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .unwrap_or(&self.config.default_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catsync_core::KnownObjectsCache;

    use crate::event::{HiveColumn, HiveTable, HookEntity};

    fn rename_event(user: Option<&str>) -> HookEvent {
        let mut old = HiveTable::new("sales", "orders");
        old.columns = vec![HiveColumn::new("id", "bigint")];
        let mut new = old.clone();
        new.table_name = "orders_v2".to_string();

        HookEvent {
            operation: HiveOperation::AlterTableRename,
            user: user.map(str::to_string),
            inputs: vec![HookEntity::table(old.clone())],
            outputs: vec![HookEntity::table(old), HookEntity::table(new)],
        }
    }

    fn hook() -> (RenameHook, Arc<KnownObjectsCache>) {
        let config = HookConfig::default();
        let cache = Arc::new(config.known_objects_cache());
        let hook = RenameHook::new(config, cache.clone()).unwrap();
        (hook, cache)
    }

    #[test]
    fn rename_produces_attributed_notifications() {
        let (hook, _) = hook();
        let notifications = hook.handle(&rename_event(Some("alice"))).unwrap();

        // upsert + one column + table update; no storage descriptor
        assert_eq!(notifications.len(), 3);
        for notification in &notifications {
            assert_eq!(notification.user, "alice");
            assert_eq!(notification.source, "catsync-hive");
            notification.validate().unwrap();
        }
    }

    #[test]
    fn missing_or_blank_user_falls_back_to_default() {
        let (hook, _) = hook();
        for user in [None, Some("  ")] {
            let notifications = hook.handle(&rename_event(user)).unwrap();
            assert!(notifications.iter().all(|n| n.user == "hive"));
        }
    }

    #[test]
    fn rename_invalidates_old_table_in_cache() {
        let (hook, cache) = hook();
        cache.remember("sales.orders@primary");
        cache.remember("sales.customers@primary");

        hook.handle(&rename_event(None)).unwrap();

        assert!(!cache.contains("sales.orders@primary"));
        assert!(cache.contains("sales.customers@primary"));
    }

    #[test]
    fn other_operations_are_ignored() {
        let (hook, cache) = hook();
        cache.remember("sales.orders@primary");

        let mut event = rename_event(None);
        event.operation = HiveOperation::DropTable;

        assert!(hook.handle(&event).unwrap().is_empty());
        assert!(cache.contains("sales.orders@primary"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = HookConfig {
            cluster_name: String::new(),
            ..HookConfig::default()
        };
        let result = RenameHook::new(config, Arc::new(catsync_core::NoopKnownObjects));
        assert!(matches!(result, Err(HookError::Config { .. })));
    }
}
