//! # catsync-core
//!
//! Core abstractions for keeping a metadata graph in sync with a source catalog.
//!
//! This crate provides the foundational types used across all catsync components:
//!
//! - **Entity Model**: Snapshots, extended snapshots, and object references
//! - **Pruning**: Removing reference attributes together with their referred entities
//! - **Update Intents**: Full upserts and partial updates planned against a target store
//! - **Notifications**: Versioned, attributed envelopes for handing intents to a transport
//! - **Known Objects**: The cache capability invalidated when an identity goes stale
//! - **Error Types**: Shared error definitions and result types
//!
//! ## Example
//!
//! ```rust
//! use catsync_core::prelude::*;
//!
//! let table = Entity::with_qualified_name("hive_table", "sales.orders@primary");
//! let target = table.id_by_qualified_name().unwrap();
//!
//! let intent = UpdateIntent::partial_update(target, table);
//! assert_eq!(intent.kind(), "partial_update");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod id;
pub mod intent;
pub mod known_objects;
pub mod notification;
pub mod observability;
pub mod prune;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use catsync_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::entity::{
        ATTRIBUTE_QUALIFIED_NAME, AttributeValue, Entity, EntityWithExtInfo, ObjectId,
    };
    pub use crate::error::{Error, Result};
    pub use crate::id::{Guid, GuidSequence};
    pub use crate::intent::UpdateIntent;
    pub use crate::known_objects::{KnownObjects, KnownObjectsCache};
    pub use crate::notification::{Notification, NotificationPayload};
    pub use crate::prune::{prune_attribute, prune_attributes};
}

// Re-export key types at crate root for ergonomics
pub use entity::{ATTRIBUTE_QUALIFIED_NAME, AttributeValue, Entity, EntityWithExtInfo, ObjectId};
pub use error::{Error, Result};
pub use id::{Guid, GuidSequence};
pub use intent::UpdateIntent;
pub use known_objects::{KnownObjects, KnownObjectsCache, NoopKnownObjects};
pub use notification::{Notification, NotificationPayload};
pub use observability::{LogFormat, init_logging};
pub use prune::{prune_attribute, prune_attributes};
