//! Qualified-name derivation.
//!
//! Every entity's qualified name follows from its position in the catalog:
//!
//! ```text
//! database   sales@primary
//! table      sales.orders@primary
//! column     <rule-specific, see ColumnNaming>
//! storage    sales.orders@primary_storage
//! ```
//!
//! The column rule differs between catalogs, so it is a pluggable
//! [`ColumnNaming`]. The storage descriptor rule is fixed.

use std::fmt;

/// Suffix appended to a table qualified name to name its storage descriptor.
pub const STORAGE_SUFFIX: &str = "_storage";

const CLUSTER_SEPARATOR: char = '@';

/// Rule deriving a column (or partition key) qualified name from its table's.
///
/// Any `Fn(&str, &str) -> String` is a rule, taking the parent qualified name
/// and the child's local name.
pub trait ColumnNaming: Send + Sync {
    /// Returns the qualified name of `column_name` within `table_qualified_name`.
    fn column_qualified_name(&self, table_qualified_name: &str, column_name: &str) -> String;
}

impl<F> ColumnNaming for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn column_qualified_name(&self, table_qualified_name: &str, column_name: &str) -> String {
        self(table_qualified_name, column_name)
    }
}

/// Appends `.{column}` to the table qualified name.
///
/// `db1.orders@cluster` + `id` → `db1.orders@cluster.id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendColumnNaming;

impl ColumnNaming for AppendColumnNaming {
    fn column_qualified_name(&self, table_qualified_name: &str, column_name: &str) -> String {
        format!("{table_qualified_name}.{column_name}")
    }
}

/// Inserts the lower-cased column name before the cluster suffix.
///
/// `db1.orders@cluster` + `Id` → `db1.orders.id@cluster`. Parents without a
/// cluster suffix fall back to appending.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterColumnNaming;

impl ColumnNaming for ClusterColumnNaming {
    fn column_qualified_name(&self, table_qualified_name: &str, column_name: &str) -> String {
        let column_name = column_name.to_lowercase();
        match table_qualified_name.rsplit_once(CLUSTER_SEPARATOR) {
            Some((table, cluster)) => format!("{table}.{column_name}{CLUSTER_SEPARATOR}{cluster}"),
            None => format!("{table_qualified_name}.{column_name}"),
        }
    }
}

/// Column naming rule selectable by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnNamingRule {
    /// See [`AppendColumnNaming`].
    #[default]
    Append,
    /// See [`ClusterColumnNaming`].
    Cluster,
}

impl ColumnNamingRule {
    /// Parses a rule name (`append` or `cluster`, case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "append" => Some(Self::Append),
            "cluster" => Some(Self::Cluster),
            _ => None,
        }
    }

    /// Returns the stable rule name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Cluster => "cluster",
        }
    }
}

impl fmt::Display for ColumnNamingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ColumnNaming for ColumnNamingRule {
    fn column_qualified_name(&self, table_qualified_name: &str, column_name: &str) -> String {
        match self {
            Self::Append => AppendColumnNaming.column_qualified_name(table_qualified_name, column_name),
            Self::Cluster => {
                ClusterColumnNaming.column_qualified_name(table_qualified_name, column_name)
            }
        }
    }
}

/// Returns the storage descriptor qualified name of a table.
#[must_use]
pub fn storage_qualified_name(table_qualified_name: &str) -> String {
    format!("{table_qualified_name}{STORAGE_SUFFIX}")
}

/// Returns the qualified name of a table: `{db}.{table}@{cluster}`.
///
/// Database and table names are case-insensitive in Hive and are lower-cased.
#[must_use]
pub fn table_qualified_name(db_name: &str, table_name: &str, cluster_name: &str) -> String {
    format!(
        "{}.{}{CLUSTER_SEPARATOR}{cluster_name}",
        db_name.to_lowercase(),
        table_name.to_lowercase()
    )
}

/// Returns the qualified name of a database: `{db}@{cluster}`.
#[must_use]
pub fn database_qualified_name(db_name: &str, cluster_name: &str) -> String {
    format!("{}{CLUSTER_SEPARATOR}{cluster_name}", db_name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_rule_concatenates_with_dot() {
        assert_eq!(
            AppendColumnNaming.column_qualified_name("db1.orders_v2@cluster", "id"),
            "db1.orders_v2@cluster.id"
        );
    }

    #[test]
    fn cluster_rule_inserts_before_cluster() {
        assert_eq!(
            ClusterColumnNaming.column_qualified_name("db1.orders@primary", "Customer_ID"),
            "db1.orders.customer_id@primary"
        );
        assert_eq!(
            ClusterColumnNaming.column_qualified_name("db1.orders", "id"),
            "db1.orders.id"
        );
    }

    #[test]
    fn closures_are_naming_rules() {
        let rule = |parent: &str, local: &str| format!("{parent}/{local}");
        assert_eq!(rule.column_qualified_name("t", "c"), "t/c");
    }

    #[test]
    fn storage_name_appends_fixed_suffix() {
        assert_eq!(
            storage_qualified_name("db1.orders_v2@cluster"),
            "db1.orders_v2@cluster_storage"
        );
    }

    #[test]
    fn table_and_database_names_are_lower_cased() {
        assert_eq!(table_qualified_name("Sales", "Orders", "primary"), "sales.orders@primary");
        assert_eq!(database_qualified_name("Sales", "primary"), "sales@primary");
    }

    #[test]
    fn rule_parses_and_dispatches() {
        assert_eq!(ColumnNamingRule::parse("CLUSTER"), Some(ColumnNamingRule::Cluster));
        assert_eq!(ColumnNamingRule::parse("dotted"), None);
        assert_eq!(
            ColumnNamingRule::Cluster.column_qualified_name("d.t@c", "x"),
            "d.t.x@c"
        );
        assert_eq!(ColumnNamingRule::Append.to_string(), "append");
    }
}
