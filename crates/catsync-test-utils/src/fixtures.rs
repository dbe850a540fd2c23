//! Pre-built test fixtures for common test scenarios.
//!
//! Provides builders for Hive tables and hook events with sensible defaults.

use std::sync::Arc;

use catsync_hive::{
    ColumnNaming, ColumnNamingRule, HiveColumn, HiveOperation, HiveStorage, HiveTable,
    HiveTableMaterializer, HookConfig, HookEntity, HookEvent, RenameHook, RenamePlanner,
};

use crate::known_objects::RecordingKnownObjects;

/// Test context with a recording cache and a fixed cluster name.
pub struct TestContext {
    /// Shared known-objects cache.
    pub known_objects: Arc<RecordingKnownObjects>,
    /// Cluster name used in qualified names.
    pub cluster_name: String,
    /// Column naming rule shared by the materializer and the planner.
    pub column_naming: ColumnNamingRule,
}

impl TestContext {
    /// Creates a context on cluster `primary` with the append naming rule.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cluster("primary")
    }

    /// Creates a context on the given cluster.
    #[must_use]
    pub fn with_cluster(cluster_name: impl Into<String>) -> Self {
        Self {
            known_objects: Arc::new(RecordingKnownObjects::new()),
            cluster_name: cluster_name.into(),
            column_naming: ColumnNamingRule::default(),
        }
    }

    /// Switches the column naming rule.
    #[must_use]
    pub fn with_column_naming(mut self, rule: ColumnNamingRule) -> Self {
        self.column_naming = rule;
        self
    }

    /// Builds a materializer for this context.
    #[must_use]
    pub fn materializer(&self) -> HiveTableMaterializer {
        HiveTableMaterializer::new(self.cluster_name.clone(), self.naming())
    }

    /// Builds a planner wired to this context's cache.
    #[must_use]
    pub fn planner(&self) -> RenamePlanner {
        RenamePlanner::new(
            Arc::new(self.materializer()),
            self.naming(),
            self.known_objects.clone(),
        )
    }

    /// Builds a hook wired to this context's cache.
    #[must_use]
    pub fn hook(&self) -> RenameHook {
        let config = HookConfig {
            cluster_name: self.cluster_name.clone(),
            column_naming: self.column_naming,
            ..HookConfig::default()
        };
        RenameHook::new(config, self.known_objects.clone()).expect("valid test config")
    }

    /// Returns the qualified name of `db.table` on this context's cluster.
    #[must_use]
    pub fn table_qualified_name(&self, db_name: &str, table_name: &str) -> String {
        catsync_hive::table_qualified_name(db_name, table_name, &self.cluster_name)
    }

    fn naming(&self) -> Arc<dyn ColumnNaming> {
        Arc::new(self.column_naming)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`HiveTable`] test data.
#[derive(Debug, Clone)]
pub struct TableFixture {
    table: HiveTable,
}

impl TableFixture {
    /// Starts a table with no columns, partition keys or storage.
    #[must_use]
    pub fn new(db_name: &str, table_name: &str) -> Self {
        Self {
            table: HiveTable::new(db_name, table_name),
        }
    }

    /// Starts a table in a database with a unique name.
    #[must_use]
    pub fn unique(table_name: &str) -> Self {
        let db_name = format!("db_{}", uuid::Uuid::new_v4().as_simple());
        Self::new(&db_name, table_name)
    }

    /// Adds `string` columns with the given names.
    #[must_use]
    pub fn columns<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.table
            .columns
            .extend(names.into_iter().map(|name| HiveColumn::new(name, "string")));
        self
    }

    /// Adds a column with an explicit type.
    #[must_use]
    pub fn column(mut self, name: &str, type_name: &str) -> Self {
        self.table.columns.push(HiveColumn::new(name, type_name));
        self
    }

    /// Adds `string` partition keys with the given names.
    #[must_use]
    pub fn partition_keys<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.table
            .partition_keys
            .extend(names.into_iter().map(|name| HiveColumn::new(name, "string")));
        self
    }

    /// Attaches a storage descriptor at `location`.
    #[must_use]
    pub fn storage(mut self, location: &str) -> Self {
        self.table.storage = Some(HiveStorage {
            location: Some(location.to_string()),
            input_format: Some("org.apache.hadoop.mapred.TextInputFormat".to_string()),
            output_format: Some(
                "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat".to_string(),
            ),
            ..HiveStorage::default()
        });
        self
    }

    /// Sets the owner.
    #[must_use]
    pub fn owner(mut self, owner: &str) -> Self {
        self.table.owner = Some(owner.to_string());
        self
    }

    /// Sets a table parameter.
    #[must_use]
    pub fn parameter(mut self, key: &str, value: &str) -> Self {
        self.table
            .parameters
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Finishes the table.
    #[must_use]
    pub fn build(self) -> HiveTable {
        self.table
    }
}

/// Builder for [`HookEvent`] test data.
#[derive(Debug, Clone)]
pub struct EventFixture {
    event: HookEvent,
}

impl EventFixture {
    /// Starts a rename event of `old` to `new_table_name` in the same database.
    ///
    /// The renamed table keeps the old table's columns, partition keys and
    /// storage, as Hive reports them.
    #[must_use]
    pub fn rename(old: HiveTable, new_table_name: &str) -> Self {
        let mut new = old.clone();
        new.table_name = new_table_name.to_string();
        Self::rename_to(old, new)
    }

    /// Starts a rename event from `old` to `new`.
    #[must_use]
    pub fn rename_to(old: HiveTable, new: HiveTable) -> Self {
        Self {
            event: HookEvent {
                operation: HiveOperation::AlterTableRename,
                user: None,
                inputs: vec![HookEntity::table(old)],
                outputs: vec![HookEntity::table(new)],
            },
        }
    }

    /// Starts an event with no inputs or outputs.
    #[must_use]
    pub fn empty(operation: HiveOperation) -> Self {
        Self {
            event: HookEvent::new(operation),
        }
    }

    /// Puts a copy of the old table at the front of the outputs.
    #[must_use]
    pub fn with_decoy(mut self) -> Self {
        let decoy = self
            .event
            .inputs
            .iter()
            .find_map(HookEntity::as_table)
            .cloned();
        if let Some(decoy) = decoy {
            self.event.outputs.insert(0, HookEntity::table(decoy));
        }
        self
    }

    /// Sets the acting user.
    #[must_use]
    pub fn user(mut self, user: &str) -> Self {
        self.event.user = Some(user.to_string());
        self
    }

    /// Appends an input entity.
    #[must_use]
    pub fn input(mut self, entity: HookEntity) -> Self {
        self.event.inputs.push(entity);
        self
    }

    /// Appends an output entity.
    #[must_use]
    pub fn output(mut self, entity: HookEntity) -> Self {
        self.event.outputs.push(entity);
        self
    }

    /// Finishes the event.
    #[must_use]
    pub fn build(self) -> HookEvent {
        self.event
    }
}
