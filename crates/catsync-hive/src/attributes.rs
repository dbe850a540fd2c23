//! Type and attribute names of the Hive metadata model.

pub use catsync_core::ATTRIBUTE_QUALIFIED_NAME;

/// Database entity type.
pub const HIVE_TYPE_DB: &str = "hive_db";
/// Table entity type.
pub const HIVE_TYPE_TABLE: &str = "hive_table";
/// Column (and partition key) entity type.
pub const HIVE_TYPE_COLUMN: &str = "hive_column";
/// Storage descriptor entity type.
pub const HIVE_TYPE_STORAGEDESC: &str = "hive_storagedesc";

/// Local (unqualified) name.
pub const ATTRIBUTE_NAME: &str = "name";
/// Owning user.
pub const ATTRIBUTE_OWNER: &str = "owner";
/// Free-form comment.
pub const ATTRIBUTE_COMMENT: &str = "comment";
/// Creation time, epoch millis.
pub const ATTRIBUTE_CREATE_TIME: &str = "createTime";
/// Last access time, epoch millis.
pub const ATTRIBUTE_LAST_ACCESS_TIME: &str = "lastAccessTime";
/// Table type (`MANAGED_TABLE`, `EXTERNAL_TABLE`, ...).
pub const ATTRIBUTE_TABLE_TYPE: &str = "tableType";
/// Temporary-table flag.
pub const ATTRIBUTE_TEMPORARY: &str = "temporary";
/// Key/value parameters.
pub const ATTRIBUTE_PARAMETERS: &str = "parameters";
/// Prior names of a table.
pub const ATTRIBUTE_ALIASES: &str = "aliases";
/// Owning database reference.
pub const ATTRIBUTE_DB: &str = "db";
/// Owning table reference.
pub const ATTRIBUTE_TABLE: &str = "table";
/// Column references.
pub const ATTRIBUTE_COLUMNS: &str = "columns";
/// Partition key references.
pub const ATTRIBUTE_PARTITION_KEYS: &str = "partitionKeys";
/// Storage descriptor reference.
pub const ATTRIBUTE_STORAGEDESC: &str = "sd";
/// Column data type.
pub const ATTRIBUTE_TYPE: &str = "type";
/// Column position within its table.
pub const ATTRIBUTE_POSITION: &str = "position";
/// Storage location URI.
pub const ATTRIBUTE_LOCATION: &str = "location";
/// Input format class.
pub const ATTRIBUTE_INPUT_FORMAT: &str = "inputFormat";
/// Output format class.
pub const ATTRIBUTE_OUTPUT_FORMAT: &str = "outputFormat";
/// Compression flag.
pub const ATTRIBUTE_COMPRESSED: &str = "compressed";
/// Bucket count.
pub const ATTRIBUTE_NUM_BUCKETS: &str = "numBuckets";

/// Attributes renamed through their own intents before the table update.
pub const CHILD_ATTRIBUTES: [&str; 3] = [
    ATTRIBUTE_COLUMNS,
    ATTRIBUTE_PARTITION_KEYS,
    ATTRIBUTE_STORAGEDESC,
];
