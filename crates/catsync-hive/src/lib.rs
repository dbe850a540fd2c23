//! # catsync-hive
//!
//! Hive hook integration for catsync.
//!
//! When Hive renames a table, the metadata store still holds the table, its
//! columns, partition keys and storage descriptor under the old qualified
//! names. This crate turns the post-execution hook event into the ordered
//! update intents that bring the store in line:
//!
//! 1. A full upsert of the old table, so it exists before anything is renamed.
//! 2. One partial update per column, then per partition key.
//! 3. One partial update for the storage descriptor, if present.
//! 4. A partial update of the table itself, carrying the old name as an alias.
//!
//! After planning, the old table's qualified name is invalidated in the
//! known-objects cache.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use catsync_hive::{HookConfig, RenameHook};
//!
//! let config = HookConfig::from_env()?;
//! let cache = Arc::new(config.known_objects_cache());
//! let hook = RenameHook::new(config, cache)?;
//!
//! for notification in hook.handle(&event)? {
//!     publish(serde_json::to_vec(&notification)?);
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod attributes;
pub mod config;
pub mod detector;
pub mod error;
pub mod event;
pub mod hook;
pub mod materialize;
pub mod naming;
pub mod planner;

// Re-export main types at crate root
pub use config::HookConfig;
pub use detector::{RenameDetector, RenamePair, SameIdentity, same_table_identity};
pub use error::{HookError, RenameError, Result};
pub use event::{HiveColumn, HiveOperation, HiveStorage, HiveTable, HookEntity, HookEvent};
pub use hook::RenameHook;
pub use materialize::{HiveTableMaterializer, TableMaterializer};
pub use naming::{
    AppendColumnNaming, ClusterColumnNaming, ColumnNaming, ColumnNamingRule,
    storage_qualified_name, table_qualified_name,
};
pub use planner::RenamePlanner;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::HookConfig;
    pub use crate::detector::RenameDetector;
    pub use crate::error::{HookError, RenameError};
    pub use crate::event::{HiveColumn, HiveOperation, HiveStorage, HiveTable, HookEntity, HookEvent};
    pub use crate::hook::RenameHook;
    pub use crate::materialize::{HiveTableMaterializer, TableMaterializer};
    pub use crate::naming::{ColumnNaming, ColumnNamingRule};
    pub use crate::planner::RenamePlanner;
}
