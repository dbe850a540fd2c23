//! Table materialization: native table → extended snapshot.
//!
//! The snapshot of a table holds the table entity plus one referred entity per
//! column, partition key, and storage descriptor. Every entity gets a
//! placeholder guid from a sequence local to the snapshot: the table is always
//! `-1`, children follow in declaration order. Children are linked from the
//! table by guid references; each child links back to the table by guid.

use std::collections::BTreeMap;
use std::sync::Arc;

use catsync_core::{AttributeValue, Entity, EntityWithExtInfo, GuidSequence, ObjectId};

use crate::attributes::{
    ATTRIBUTE_COLUMNS, ATTRIBUTE_COMMENT, ATTRIBUTE_COMPRESSED, ATTRIBUTE_CREATE_TIME,
    ATTRIBUTE_DB, ATTRIBUTE_INPUT_FORMAT, ATTRIBUTE_LAST_ACCESS_TIME, ATTRIBUTE_LOCATION,
    ATTRIBUTE_NAME, ATTRIBUTE_NUM_BUCKETS, ATTRIBUTE_OUTPUT_FORMAT, ATTRIBUTE_OWNER,
    ATTRIBUTE_PARAMETERS, ATTRIBUTE_PARTITION_KEYS, ATTRIBUTE_POSITION, ATTRIBUTE_QUALIFIED_NAME,
    ATTRIBUTE_STORAGEDESC, ATTRIBUTE_TABLE, ATTRIBUTE_TABLE_TYPE, ATTRIBUTE_TEMPORARY,
    ATTRIBUTE_TYPE, HIVE_TYPE_COLUMN, HIVE_TYPE_DB, HIVE_TYPE_STORAGEDESC, HIVE_TYPE_TABLE,
};
use crate::event::{HiveColumn, HiveStorage, HiveTable};
use crate::naming::{self, ColumnNaming};

const MILLIS_PER_SECOND: i64 = 1000;

/// Turns native tables into extended snapshots.
pub trait TableMaterializer: Send + Sync {
    /// Returns the qualified name of `table`.
    fn table_qualified_name(&self, table: &HiveTable) -> String;

    /// Builds the full snapshot of `table`.
    ///
    /// Columns, partition keys, and the storage descriptor must be present in
    /// the side-table of the result.
    fn materialize(&self, table: &HiveTable) -> EntityWithExtInfo;
}

/// Default materializer for the Hive metadata model.
#[derive(Clone)]
pub struct HiveTableMaterializer {
    cluster_name: String,
    column_naming: Arc<dyn ColumnNaming>,
}

impl std::fmt::Debug for HiveTableMaterializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HiveTableMaterializer")
            .field("cluster_name", &self.cluster_name)
            .field("column_naming", &"ColumnNaming")
            .finish()
    }
}

impl HiveTableMaterializer {
    /// Creates a materializer for tables in `cluster_name`.
    #[must_use]
    pub fn new(cluster_name: impl Into<String>, column_naming: Arc<dyn ColumnNaming>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            column_naming,
        }
    }

    /// Returns the cluster tables are qualified with.
    #[must_use]
    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    fn column_entity(
        &self,
        column: &HiveColumn,
        position: usize,
        table_qualified_name: &str,
        table_id: &ObjectId,
    ) -> Entity {
        let name = column.name.to_lowercase();
        Entity::new(HIVE_TYPE_COLUMN)
            .with_attribute(
                ATTRIBUTE_QUALIFIED_NAME,
                self.column_naming
                    .column_qualified_name(table_qualified_name, &name),
            )
            .with_attribute(ATTRIBUTE_NAME, name)
            .with_attribute(ATTRIBUTE_TYPE, column.type_name.as_str())
            .with_attribute(ATTRIBUTE_COMMENT, column.comment.clone())
            .with_attribute(
                ATTRIBUTE_POSITION,
                i64::try_from(position).unwrap_or(i64::MAX),
            )
            .with_attribute(ATTRIBUTE_TABLE, table_id.clone())
    }

    fn storage_entity(
        storage: &HiveStorage,
        table_qualified_name: &str,
        table_id: &ObjectId,
    ) -> Entity {
        Entity::new(HIVE_TYPE_STORAGEDESC)
            .with_attribute(
                ATTRIBUTE_QUALIFIED_NAME,
                naming::storage_qualified_name(table_qualified_name),
            )
            .with_attribute(ATTRIBUTE_LOCATION, storage.location.clone())
            .with_attribute(ATTRIBUTE_INPUT_FORMAT, storage.input_format.clone())
            .with_attribute(ATTRIBUTE_OUTPUT_FORMAT, storage.output_format.clone())
            .with_attribute(ATTRIBUTE_COMPRESSED, storage.compressed)
            .with_attribute(ATTRIBUTE_NUM_BUCKETS, storage.num_buckets)
            .with_attribute(ATTRIBUTE_PARAMETERS, string_map(&storage.parameters))
            .with_attribute(ATTRIBUTE_TABLE, table_id.clone())
    }

    fn add_columns(
        &self,
        snapshot: &mut EntityWithExtInfo,
        guids: &mut GuidSequence,
        columns: &[HiveColumn],
        table_qualified_name: &str,
        table_id: &ObjectId,
    ) -> AttributeValue {
        let mut refs = Vec::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            let guid = guids.next_guid();
            let entity = self
                .column_entity(column, position, table_qualified_name, table_id)
                .with_guid(guid.clone());
            refs.push(AttributeValue::from(ObjectId::by_guid(HIVE_TYPE_COLUMN, guid.clone())));
            snapshot.add_referred_entity(guid, entity);
        }
        AttributeValue::List(refs)
    }
}

impl TableMaterializer for HiveTableMaterializer {
    fn table_qualified_name(&self, table: &HiveTable) -> String {
        naming::table_qualified_name(&table.db_name, &table.table_name, &self.cluster_name)
    }

    fn materialize(&self, table: &HiveTable) -> EntityWithExtInfo {
        let qualified_name = self.table_qualified_name(table);
        let mut guids = GuidSequence::new();
        let table_guid = guids.next_guid();
        let table_id = ObjectId::by_guid(HIVE_TYPE_TABLE, table_guid.clone());

        let entity = Entity::new(HIVE_TYPE_TABLE)
            .with_guid(table_guid)
            .with_attribute(ATTRIBUTE_QUALIFIED_NAME, qualified_name.as_str())
            .with_attribute(ATTRIBUTE_NAME, table.table_name.to_lowercase())
            .with_attribute(ATTRIBUTE_OWNER, table.owner.clone())
            .with_attribute(
                ATTRIBUTE_CREATE_TIME,
                table.create_time.saturating_mul(MILLIS_PER_SECOND),
            )
            .with_attribute(
                ATTRIBUTE_LAST_ACCESS_TIME,
                table.last_access_time.saturating_mul(MILLIS_PER_SECOND),
            )
            .with_attribute(ATTRIBUTE_COMMENT, table.comment())
            .with_attribute(ATTRIBUTE_TABLE_TYPE, table.table_type.clone())
            .with_attribute(ATTRIBUTE_TEMPORARY, table.temporary)
            .with_attribute(ATTRIBUTE_PARAMETERS, string_map(&table.parameters))
            .with_attribute(
                ATTRIBUTE_DB,
                ObjectId::by_qualified_name(
                    HIVE_TYPE_DB,
                    naming::database_qualified_name(&table.db_name, &self.cluster_name),
                ),
            );

        let mut snapshot = EntityWithExtInfo::new(entity);

        let columns = self.add_columns(
            &mut snapshot,
            &mut guids,
            &table.columns,
            &qualified_name,
            &table_id,
        );
        snapshot.entity.set_attribute(ATTRIBUTE_COLUMNS, columns);

        let partition_keys = self.add_columns(
            &mut snapshot,
            &mut guids,
            &table.partition_keys,
            &qualified_name,
            &table_id,
        );
        snapshot
            .entity
            .set_attribute(ATTRIBUTE_PARTITION_KEYS, partition_keys);

        if let Some(storage) = &table.storage {
            let guid = guids.next_guid();
            let sd = Self::storage_entity(storage, &qualified_name, &table_id).with_guid(guid.clone());
            snapshot.entity.set_attribute(
                ATTRIBUTE_STORAGEDESC,
                ObjectId::by_guid(HIVE_TYPE_STORAGEDESC, guid.clone()),
            );
            snapshot.add_referred_entity(guid, sd);
        }

        tracing::trace!(
            table = %qualified_name,
            referred_entities = snapshot.referred_entities.len(),
            "Materialized table snapshot"
        );

        snapshot
    }
}

fn string_map(values: &BTreeMap<String, String>) -> AttributeValue {
    AttributeValue::Map(
        values
            .iter()
            .map(|(k, v)| (k.clone(), AttributeValue::from(v.as_str())))
            .collect(),
    )
}
