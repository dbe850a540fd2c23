//! Native DDL event model.
//!
//! These types mirror what the Hive execution engine hands a post-execution
//! hook: the operation, the acting user, and the read (`inputs`) and written
//! (`outputs`) entities. Only table entries carry a [`HiveTable`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A table as described by the source metastore.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiveTable {
    /// Owning database name.
    pub db_name: String,
    /// Table name.
    pub table_name: String,
    /// Owning user.
    #[serde(default)]
    pub owner: Option<String>,
    /// Creation time, epoch seconds.
    #[serde(default)]
    pub create_time: i64,
    /// Last access time, epoch seconds.
    #[serde(default)]
    pub last_access_time: i64,
    /// Table type (`MANAGED_TABLE`, `EXTERNAL_TABLE`, `VIRTUAL_VIEW`, ...).
    #[serde(default)]
    pub table_type: Option<String>,
    /// Whether the table is session-scoped.
    #[serde(default)]
    pub temporary: bool,
    /// Table parameters (`comment`, `transient_lastDdlTime`, ...).
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Data columns, in declaration order.
    #[serde(default)]
    pub columns: Vec<HiveColumn>,
    /// Partition key columns, in declaration order.
    #[serde(default)]
    pub partition_keys: Vec<HiveColumn>,
    /// Storage descriptor, absent for views.
    #[serde(default)]
    pub storage: Option<HiveStorage>,
}

impl HiveTable {
    /// Creates a table with no columns or storage.
    #[must_use]
    pub fn new(db_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    /// Returns true if `other` names the same table (case-insensitive).
    #[must_use]
    pub fn same_name(&self, other: &Self) -> bool {
        // Same folding as qualified names, so equal names here mean equal
        // qualified names.
        self.db_name.to_lowercase() == other.db_name.to_lowercase()
            && self.table_name.to_lowercase() == other.table_name.to_lowercase()
    }

    /// Returns the table comment, stored in the `comment` parameter.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.parameters.get("comment").map(String::as_str)
    }
}

impl fmt::Display for HiveTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.db_name, self.table_name)
    }
}

/// A column or partition key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiveColumn {
    /// Column name.
    pub name: String,
    /// Hive type string (`int`, `array<string>`, ...).
    pub type_name: String,
    /// Column comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl HiveColumn {
    /// Creates a column without a comment.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            comment: None,
        }
    }
}

/// Physical storage of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiveStorage {
    /// Data location URI.
    #[serde(default)]
    pub location: Option<String>,
    /// Input format class.
    #[serde(default)]
    pub input_format: Option<String>,
    /// Output format class.
    #[serde(default)]
    pub output_format: Option<String>,
    /// Whether data files are compressed.
    #[serde(default)]
    pub compressed: bool,
    /// Bucket count (`-1` when unbucketed).
    #[serde(default)]
    pub num_buckets: i64,
    /// Storage parameters.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

/// One entry of an event's inputs or outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HookEntity {
    /// A database, by name.
    Database {
        /// Database name.
        name: String,
    },
    /// A table.
    Table {
        /// The table.
        table: HiveTable,
    },
    /// A partition of a table.
    Partition {
        /// Owning table.
        table: HiveTable,
        /// Partition name (`dt=2024-01-01/hr=00`).
        name: String,
    },
    /// A filesystem path.
    Path {
        /// Path URI.
        location: String,
    },
}

impl HookEntity {
    /// Creates a table entry.
    #[must_use]
    pub fn table(table: HiveTable) -> Self {
        Self::Table { table }
    }

    /// Returns the table, if this is a table-typed entry.
    ///
    /// Partitions are not table-typed even though they carry their table.
    #[must_use]
    pub fn as_table(&self) -> Option<&HiveTable> {
        match self {
            Self::Table { table } => Some(table),
            _ => None,
        }
    }
}

/// DDL operation that triggered the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HiveOperation {
    /// `CREATE TABLE`.
    CreateTable,
    /// `ALTER TABLE ... RENAME TO ...`.
    #[serde(rename = "ALTERTABLE_RENAME")]
    AlterTableRename,
    /// `ALTER TABLE ... SET TBLPROPERTIES`.
    #[serde(rename = "ALTERTABLE_PROPERTIES")]
    AlterTableProperties,
    /// `DROP TABLE`.
    DropTable,
    /// `CREATE DATABASE`.
    CreateDatabase,
}

impl HiveOperation {
    /// Returns the operation name as reported by Hive.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateTable => "CREATE_TABLE",
            Self::AlterTableRename => "ALTERTABLE_RENAME",
            Self::AlterTableProperties => "ALTERTABLE_PROPERTIES",
            Self::DropTable => "DROP_TABLE",
            Self::CreateDatabase => "CREATE_DATABASE",
        }
    }
}

impl fmt::Display for HiveOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post-execution hook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookEvent {
    /// Operation that ran.
    pub operation: HiveOperation,
    /// User who ran it, if the engine reported one.
    #[serde(default)]
    pub user: Option<String>,
    /// Entities read or affected before the operation.
    #[serde(default)]
    pub inputs: Vec<HookEntity>,
    /// Entities written by the operation.
    #[serde(default)]
    pub outputs: Vec<HookEntity>,
}

impl HookEvent {
    /// Creates an event with no user and no entities.
    #[must_use]
    pub fn new(operation: HiveOperation) -> Self {
        Self {
            operation,
            user: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_ignores_case() {
        let a = HiveTable::new("Sales", "Orders");
        let b = HiveTable::new("sales", "ORDERS");
        let c = HiveTable::new("sales", "orders_v2");
        assert!(a.same_name(&b));
        assert!(!a.same_name(&c));
    }

    #[test]
    fn same_name_folds_non_ascii_case() {
        let upper = HiveTable::new("Verkäufe", "ÄNDERUNGEN");
        let lower = HiveTable::new("verkäufe", "änderungen");
        assert!(upper.same_name(&lower));
    }

    #[test]
    fn partitions_are_not_table_typed() {
        let table = HiveTable::new("sales", "orders");
        let partition = HookEntity::Partition {
            table: table.clone(),
            name: "dt=2024-01-01".to_string(),
        };
        assert!(partition.as_table().is_none());
        assert_eq!(HookEntity::table(table.clone()).as_table(), Some(&table));
    }

    #[test]
    fn operation_uses_hive_names_on_the_wire() {
        let json = serde_json::to_string(&HiveOperation::AlterTableRename).unwrap();
        assert_eq!(json, "\"ALTERTABLE_RENAME\"");
        assert_eq!(HiveOperation::CreateTable.to_string(), "CREATE_TABLE");

        let parsed: HiveOperation = serde_json::from_str("\"DROP_TABLE\"").unwrap();
        assert_eq!(parsed, HiveOperation::DropTable);
    }

    #[test]
    fn event_deserializes_with_defaults() {
        let event: HookEvent = serde_json::from_value(serde_json::json!({
            "operation": "ALTERTABLE_RENAME",
            "inputs": [{"kind": "table", "table": {"dbName": "sales", "tableName": "orders"}}]
        }))
        .unwrap();
        assert_eq!(event.inputs.len(), 1);
        assert!(event.outputs.is_empty());
        assert!(event.user.is_none());
    }
}
