//! Rename detection: finding the (old, new) table pair in a hook event.
//!
//! Hive reports a rename with the old table in `inputs` and the renamed table
//! in `outputs`. The outputs may also carry an entry with the *old* identity,
//! an artifact of how the rename is recorded; that decoy must be skipped.

use crate::error::RenameError;
use crate::event::{HiveTable, HookEntity, HookEvent};

/// Predicate deciding whether an output table is the old table again.
pub type SameIdentity = fn(old: &HiveTable, candidate: &HiveTable) -> bool;

/// Default decoy test: same database and table name, ignoring case.
#[must_use]
pub fn same_table_identity(old: &HiveTable, candidate: &HiveTable) -> bool {
    old.same_name(candidate)
}

/// The tables on either side of a rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenamePair<'a> {
    /// The table before the rename.
    pub old: &'a HiveTable,
    /// The table after the rename.
    pub new: &'a HiveTable,
}

/// Locates the rename pair in an event.
#[derive(Debug, Clone, Copy)]
pub struct RenameDetector {
    same_identity: SameIdentity,
}

impl Default for RenameDetector {
    fn default() -> Self {
        Self::new(same_table_identity)
    }
}

impl RenameDetector {
    /// Creates a detector using `same_identity` to recognize decoys.
    #[must_use]
    pub fn new(same_identity: SameIdentity) -> Self {
        Self { same_identity }
    }

    /// Finds the old and new tables of a rename.
    ///
    /// The old table is the first table-typed input. The new table is the
    /// first table-typed output that is not a decoy of the old one; scanning
    /// stops there.
    ///
    /// # Errors
    ///
    /// - [`RenameError::NoOldObject`] if the inputs hold no table.
    /// - [`RenameError::NoNewObject`] if every table-typed output is a decoy.
    pub fn detect<'a>(&self, event: &'a HookEvent) -> Result<RenamePair<'a>, RenameError> {
        let old = event
            .inputs
            .iter()
            .find_map(HookEntity::as_table)
            .ok_or(RenameError::NoOldObject)?;

        let mut decoys = 0_usize;
        let new = event
            .outputs
            .iter()
            .filter_map(HookEntity::as_table)
            .find(|candidate| {
                if (self.same_identity)(old, candidate) {
                    decoys += 1;
                    false
                } else {
                    true
                }
            })
            .ok_or(RenameError::NoNewObject)?;

        if decoys > 0 {
            tracing::debug!(old_table = %old, decoys, "Skipped outputs carrying the old identity");
        }

        Ok(RenamePair { old, new })
    }
}
