//! Update intents: planned writes against the target metadata store.
//!
//! Intents are produced in a single synchronous pass and handed to a transport
//! as an ordered list. Their order is significant: later intents may address
//! entities by qualified names that earlier intents create.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityWithExtInfo, ObjectId};

/// A planned update operation not yet delivered to the target store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateIntent {
    /// Create the entity if absent, otherwise replace it.
    ///
    /// Addressed by the entity's own qualified name.
    FullUpsert {
        /// The complete snapshot to write.
        entity: EntityWithExtInfo,
    },
    /// Merge the given attributes into an existing entity.
    ///
    /// Attributes absent from `entity` are left untouched on the target.
    PartialUpdate {
        /// The entity to update.
        target: ObjectId,
        /// The attributes to merge.
        entity: EntityWithExtInfo,
    },
}

impl UpdateIntent {
    /// Creates a full upsert.
    #[must_use]
    pub fn full_upsert(entity: impl Into<EntityWithExtInfo>) -> Self {
        Self::FullUpsert {
            entity: entity.into(),
        }
    }

    /// Creates a partial update.
    #[must_use]
    pub fn partial_update(target: ObjectId, entity: impl Into<EntityWithExtInfo>) -> Self {
        Self::PartialUpdate {
            target,
            entity: entity.into(),
        }
    }

    /// Returns the snapshot carried by the intent.
    #[must_use]
    pub fn entity(&self) -> &EntityWithExtInfo {
        match self {
            Self::FullUpsert { entity } | Self::PartialUpdate { entity, .. } => entity,
        }
    }

    /// Returns the update target, for partial updates.
    #[must_use]
    pub fn target(&self) -> Option<&ObjectId> {
        match self {
            Self::FullUpsert { .. } => None,
            Self::PartialUpdate { target, .. } => Some(target),
        }
    }

    /// Returns the stable kind name (`full_upsert` / `partial_update`).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FullUpsert { .. } => "full_upsert",
            Self::PartialUpdate { .. } => "partial_update",
        }
    }
}
