//! Rename cascade planning.
//!
//! A table rename changes the qualified name of the table and of every child
//! whose name derives from it. The target store addresses all of them by
//! qualified name, so the planner emits, in order:
//!
//! 1. a full upsert of the old table, so it exists under its old name even if
//!    the store never saw it;
//! 2. one partial update per column and partition key, renaming it;
//! 3. a partial update renaming the storage descriptor;
//! 4. a partial update of the table, addressed by its old name, carrying the
//!    new name, the old name as alias, and every other changed attribute.
//!
//! Children are already renamed by step 4, so the table update leaves them out.

use std::sync::Arc;

use catsync_core::{
    AttributeValue, Entity, EntityWithExtInfo, KnownObjects, ObjectId, UpdateIntent,
    observability::rename_span, prune_attributes,
};

use crate::attributes::{
    ATTRIBUTE_ALIASES, ATTRIBUTE_COLUMNS, ATTRIBUTE_NAME, ATTRIBUTE_PARTITION_KEYS,
    ATTRIBUTE_STORAGEDESC, CHILD_ATTRIBUTES,
};
use crate::detector::RenameDetector;
use crate::error::RenameError;
use crate::event::{HiveTable, HookEvent};
use crate::materialize::TableMaterializer;
use crate::naming::{self, ColumnNaming};

/// Plans the update intents for table renames.
#[derive(Clone)]
pub struct RenamePlanner {
    detector: RenameDetector,
    materializer: Arc<dyn TableMaterializer>,
    column_naming: Arc<dyn ColumnNaming>,
    known_objects: Arc<dyn KnownObjects>,
}

impl std::fmt::Debug for RenamePlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenamePlanner")
            .field("detector", &self.detector)
            .field("materializer", &"TableMaterializer")
            .field("column_naming", &"ColumnNaming")
            .field("known_objects", &"KnownObjects")
            .finish()
    }
}

impl RenamePlanner {
    /// Creates a planner.
    ///
    /// `column_naming` must be the rule the materializer names columns with,
    /// so renamed children match what a fresh materialization would produce.
    #[must_use]
    pub fn new(
        materializer: Arc<dyn TableMaterializer>,
        column_naming: Arc<dyn ColumnNaming>,
        known_objects: Arc<dyn KnownObjects>,
    ) -> Self {
        Self {
            detector: RenameDetector::default(),
            materializer,
            column_naming,
            known_objects,
        }
    }

    /// Replaces the rename detector.
    #[must_use]
    pub fn with_detector(mut self, detector: RenameDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Plans the intents for a rename event.
    ///
    /// Returns an empty list when the event holds no actionable rename. The
    /// condition is logged; it is not an error for the caller.
    pub fn plan_rename(&self, event: &HookEvent) -> Vec<UpdateIntent> {
        match self.try_plan_rename(event) {
            Ok(intents) => intents,
            Err(e) => {
                tracing::error!(
                    operation = %event.operation,
                    inputs = event.inputs.len(),
                    outputs = event.outputs.len(),
                    error = %e,
                    "Skipping rename event"
                );
                Vec::new()
            }
        }
    }

    /// Plans the intents for a rename event, reporting why nothing was planned.
    ///
    /// # Errors
    ///
    /// Returns the detector's [`RenameError`] if the event holds no rename
    /// pair. The known-objects cache is not touched in that case.
    pub fn try_plan_rename(&self, event: &HookEvent) -> Result<Vec<UpdateIntent>, RenameError> {
        let pair = self.detector.detect(event)?;
        Ok(self.plan(pair.old, pair.new))
    }

    /// Plans the intents renaming `old_table` to `new_table`, then invalidates
    /// the old qualified name in the known-objects cache.
    pub fn plan(&self, old_table: &HiveTable, new_table: &HiveTable) -> Vec<UpdateIntent> {
        let old_snapshot = self.materializer.materialize(old_table);
        let old_qualified_name = old_snapshot.entity.qualified_name().map_or_else(
            || self.materializer.table_qualified_name(old_table),
            str::to_string,
        );
        let new_qualified_name = self.materializer.table_qualified_name(new_table);

        let span = rename_span(&old_qualified_name, &new_qualified_name);
        let _guard = span.enter();

        let mut intents = vec![UpdateIntent::full_upsert(old_snapshot.clone())];

        self.rename_columns(&old_snapshot, ATTRIBUTE_COLUMNS, &new_qualified_name, &mut intents);
        self.rename_columns(
            &old_snapshot,
            ATTRIBUTE_PARTITION_KEYS,
            &new_qualified_name,
            &mut intents,
        );
        rename_storage(&old_snapshot, &new_qualified_name, &mut intents);

        let mut new_snapshot = self.materializer.materialize(new_table);
        new_snapshot.entity.set_attribute(
            ATTRIBUTE_ALIASES,
            AttributeValue::list([old_table.table_name.as_str()]),
        );
        prune_attributes(&mut new_snapshot, &CHILD_ATTRIBUTES);

        let old_table_id = ObjectId::by_qualified_name(
            old_snapshot.entity.type_name.clone(),
            old_qualified_name.as_str(),
        );
        intents.push(UpdateIntent::partial_update(old_table_id, new_snapshot));

        self.known_objects.invalidate(&old_qualified_name);

        tracing::info!(intents = intents.len(), "Planned table rename");

        intents
    }

    fn rename_columns(
        &self,
        old_snapshot: &EntityWithExtInfo,
        attribute: &str,
        new_table_qualified_name: &str,
        intents: &mut Vec<UpdateIntent>,
    ) {
        let Some(columns) = old_snapshot.entity.attribute(attribute) else {
            return;
        };

        for column_id in columns.object_ids() {
            let Some(old_column) = old_snapshot.resolve(column_id) else {
                tracing::warn!(attribute, ?column_id, "Unresolvable child reference; not renamed");
                continue;
            };
            let Some(column_name) = old_column.string_attribute(ATTRIBUTE_NAME) else {
                tracing::warn!(attribute, ?column_id, "Child has no name; not renamed");
                continue;
            };
            let new_name = self
                .column_naming
                .column_qualified_name(new_table_qualified_name, column_name);

            if let Some(intent) = rename_child(old_column, new_name) {
                intents.push(intent);
            } else {
                tracing::warn!(attribute, ?column_id, "Child has no qualified name; not renamed");
            }
        }
    }
}

fn rename_storage(
    old_snapshot: &EntityWithExtInfo,
    new_table_qualified_name: &str,
    intents: &mut Vec<UpdateIntent>,
) {
    let Some(sd_id) = old_snapshot
        .entity
        .attribute(ATTRIBUTE_STORAGEDESC)
        .and_then(AttributeValue::as_object_id)
    else {
        return;
    };

    let renamed = old_snapshot.resolve(sd_id).and_then(|old_sd| {
        rename_child(old_sd, naming::storage_qualified_name(new_table_qualified_name))
    });
    match renamed {
        Some(intent) => intents.push(intent),
        None => tracing::warn!(?sd_id, "Unresolvable storage descriptor; not renamed"),
    }
}

/// Partial update giving `old_child` a new qualified name.
///
/// The target is the child's current qualified name, never its guid: the store
/// may not have assigned one yet.
fn rename_child(old_child: &Entity, new_qualified_name: String) -> Option<UpdateIntent> {
    let target = old_child.id_by_qualified_name()?;
    let renamed = Entity::with_qualified_name(old_child.type_name.clone(), new_qualified_name);
    Some(UpdateIntent::partial_update(target, renamed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use catsync_core::{ATTRIBUTE_QUALIFIED_NAME, Guid};

    use crate::attributes::{HIVE_TYPE_COLUMN, HIVE_TYPE_TABLE};
    use crate::event::{HiveColumn, HiveOperation, HiveStorage, HookEntity};
    use crate::materialize::HiveTableMaterializer;
    use crate::naming::AppendColumnNaming;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl KnownObjects for Recorder {
        fn invalidate(&self, qualified_name: &str) {
            self.0.lock().unwrap().push(qualified_name.to_string());
        }
    }

    fn planner(recorder: Arc<Recorder>) -> RenamePlanner {
        let naming: Arc<dyn ColumnNaming> = Arc::new(AppendColumnNaming);
        RenamePlanner::new(
            Arc::new(HiveTableMaterializer::new("cluster", naming.clone())),
            naming,
            recorder,
        )
    }

    fn orders(name: &str) -> HiveTable {
        let mut table = HiveTable::new("db1", name);
        table.columns = vec![HiveColumn::new("id", "bigint")];
        table.storage = Some(HiveStorage::default());
        table
    }

    fn qualified_name_of(intent: &UpdateIntent) -> Option<&str> {
        intent.entity().entity.qualified_name()
    }

    #[test]
    fn plans_documented_example() {
        let recorder = Arc::new(Recorder::default());
        let intents = planner(recorder.clone()).plan(&orders("orders"), &orders("orders_v2"));

        assert_eq!(intents.len(), 4);

        assert!(matches!(intents[0], UpdateIntent::FullUpsert { .. }));
        assert_eq!(qualified_name_of(&intents[0]), Some("db1.orders@cluster"));

        assert_eq!(
            intents[1].target().and_then(ObjectId::qualified_name),
            Some("db1.orders@cluster.id")
        );
        assert_eq!(qualified_name_of(&intents[1]), Some("db1.orders_v2@cluster.id"));

        assert_eq!(
            intents[2].target().and_then(ObjectId::qualified_name),
            Some("db1.orders@cluster_storage")
        );
        assert_eq!(qualified_name_of(&intents[2]), Some("db1.orders_v2@cluster_storage"));

        let last = &intents[3];
        assert_eq!(
            last.target().and_then(ObjectId::qualified_name),
            Some("db1.orders@cluster")
        );
        assert_eq!(qualified_name_of(last), Some("db1.orders_v2@cluster"));
        assert_eq!(
            last.entity().entity.attribute(ATTRIBUTE_ALIASES),
            Some(&AttributeValue::list(["orders"]))
        );

        assert_eq!(*recorder.0.lock().unwrap(), vec!["db1.orders@cluster".to_string()]);
    }

    #[test]
    fn child_updates_carry_only_the_qualified_name() {
        let intents = planner(Arc::default()).plan(&orders("orders"), &orders("orders_v2"));

        for intent in &intents[1..3] {
            let entity = intent.entity();
            assert_eq!(entity.entity.attributes.len(), 1);
            assert!(entity.entity.attributes.contains_key(ATTRIBUTE_QUALIFIED_NAME));
            assert!(entity.entity.guid.is_none());
            assert!(entity.referred_entities.is_empty());
            assert!(intent.target().unwrap().guid.is_none());
        }
    }

    #[test]
    fn table_update_omits_children() {
        let intents = planner(Arc::default()).plan(&orders("orders"), &orders("orders_v2"));
        let last = intents.last().unwrap().entity();

        for attribute in CHILD_ATTRIBUTES {
            assert!(last.entity.attribute(attribute).is_none(), "{attribute} present");
        }
        assert!(last.referred_entities.is_empty());
        assert_eq!(last.entity.type_name, HIVE_TYPE_TABLE);
    }

    #[test]
    fn aliases_are_overwritten_not_appended() {
        struct AliasedMaterializer(HiveTableMaterializer);

        impl TableMaterializer for AliasedMaterializer {
            fn table_qualified_name(&self, table: &HiveTable) -> String {
                self.0.table_qualified_name(table)
            }

            fn materialize(&self, table: &HiveTable) -> EntityWithExtInfo {
                let mut snapshot = self.0.materialize(table);
                snapshot
                    .entity
                    .set_attribute(ATTRIBUTE_ALIASES, AttributeValue::list(["orders_v0"]));
                snapshot
            }
        }

        let naming: Arc<dyn ColumnNaming> = Arc::new(AppendColumnNaming);
        let planner = RenamePlanner::new(
            Arc::new(AliasedMaterializer(HiveTableMaterializer::new("cluster", naming.clone()))),
            naming,
            Arc::new(Recorder::default()),
        );

        let intents = planner.plan(&orders("orders"), &orders("orders_v2"));
        assert_eq!(
            intents.last().unwrap().entity().entity.attribute(ATTRIBUTE_ALIASES),
            Some(&AttributeValue::list(["orders"]))
        );
    }

    #[test]
    fn unresolvable_children_are_skipped() {
        struct DanglingMaterializer(HiveTableMaterializer);

        impl TableMaterializer for DanglingMaterializer {
            fn table_qualified_name(&self, table: &HiveTable) -> String {
                self.0.table_qualified_name(table)
            }

            fn materialize(&self, table: &HiveTable) -> EntityWithExtInfo {
                let mut snapshot = self.0.materialize(table);
                let mut columns = vec![AttributeValue::from(ObjectId::by_guid(
                    HIVE_TYPE_COLUMN,
                    Guid::placeholder(999),
                ))];
                if let Some(AttributeValue::List(existing)) =
                    snapshot.entity.attribute(ATTRIBUTE_COLUMNS)
                {
                    columns.extend(existing.iter().cloned());
                }
                snapshot.entity.set_attribute(ATTRIBUTE_COLUMNS, columns);
                snapshot
            }
        }

        let naming: Arc<dyn ColumnNaming> = Arc::new(AppendColumnNaming);
        let planner = RenamePlanner::new(
            Arc::new(DanglingMaterializer(HiveTableMaterializer::new("cluster", naming.clone()))),
            naming,
            Arc::new(Recorder::default()),
        );

        let intents = planner.plan(&orders("orders"), &orders("orders_v2"));
        assert_eq!(intents.len(), 4);
    }

    #[test]
    fn table_without_storage_has_no_storage_rename() {
        let mut old = orders("orders");
        old.storage = None;
        let mut new = orders("orders_v2");
        new.storage = None;

        let intents = planner(Arc::default()).plan(&old, &new);
        assert_eq!(intents.len(), 3);
    }

    #[test]
    fn failed_detection_returns_empty_and_skips_invalidation() {
        let recorder = Arc::new(Recorder::default());
        let planner = planner(recorder.clone());

        let mut event = HookEvent::new(HiveOperation::AlterTableRename);
        event.outputs.push(HookEntity::table(orders("orders_v2")));

        assert!(planner.plan_rename(&event).is_empty());
        assert_eq!(planner.try_plan_rename(&event), Err(RenameError::NoOldObject));
        assert!(recorder.0.lock().unwrap().is_empty());
    }
}
