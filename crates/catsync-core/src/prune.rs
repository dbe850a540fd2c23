//! Attribute pruning for extended snapshots.
//!
//! Removing a reference attribute from a snapshot must also drop the referred
//! entities it pointed at. Otherwise the side-table keeps nodes nothing refers
//! to, and downstream consumers re-send them.

use crate::entity::{AttributeValue, EntityWithExtInfo};

/// Removes `attribute_name` from the snapshot's primary entity.
///
/// If the removed value was an object reference, or a list containing object
/// references, the matching referred entities are removed from the side-table by
/// guid. References without a guid leave the side-table untouched.
///
/// Returns the removed value, or `None` if the attribute was absent. Pruning an
/// absent attribute changes nothing.
pub fn prune_attribute(
    snapshot: &mut EntityWithExtInfo,
    attribute_name: &str,
) -> Option<AttributeValue> {
    let removed = snapshot.entity.remove_attribute(attribute_name)?;

    let mut dropped = 0_usize;
    for id in removed.object_ids() {
        if let Some(guid) = &id.guid {
            if snapshot.remove_referred_entity(guid).is_some() {
                dropped += 1;
            }
        }
    }

    tracing::trace!(
        attribute = attribute_name,
        referred_entities_dropped = dropped,
        "Pruned attribute"
    );

    Some(removed)
}

/// Prunes each attribute in turn; see [`prune_attribute`].
pub fn prune_attributes(snapshot: &mut EntityWithExtInfo, attribute_names: &[&str]) {
    for name in attribute_names {
        prune_attribute(snapshot, name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, ObjectId};
    use crate::id::{Guid, GuidSequence};

    fn table_with_children(column_count: usize) -> (EntityWithExtInfo, Vec<Guid>, Guid) {
        let mut snapshot = EntityWithExtInfo::new(Entity::with_qualified_name("hive_table", "db.t@c"));

        let mut guids = GuidSequence::new();
        let mut column_guids = Vec::new();
        let mut column_refs = Vec::new();
        for i in 0..column_count {
            let guid = guids.next_guid();
            snapshot.add_referred_entity(
                guid.clone(),
                Entity::with_qualified_name("hive_column", format!("db.t@c.col{i}"))
                    .with_guid(guid.clone()),
            );
            column_refs.push(AttributeValue::from(ObjectId::by_guid("hive_column", guid.clone())));
            column_guids.push(guid);
        }
        snapshot.entity.set_attribute("columns", column_refs);

        let sd_guid = guids.next_guid();
        snapshot.add_referred_entity(
            sd_guid.clone(),
            Entity::with_qualified_name("hive_storagedesc", "db.t@c_storage").with_guid(sd_guid.clone()),
        );
        snapshot
            .entity
            .set_attribute("sd", ObjectId::by_guid("hive_storagedesc", sd_guid.clone()));

        (snapshot, column_guids, sd_guid)
    }

    #[test]
    fn pruning_list_attribute_drops_every_referred_column() {
        let (mut snapshot, column_guids, sd_guid) = table_with_children(3);

        let removed = prune_attribute(&mut snapshot, "columns");

        assert!(matches!(removed, Some(AttributeValue::List(ref items)) if items.len() == 3));
        assert!(snapshot.entity.attribute("columns").is_none());
        for guid in &column_guids {
            assert!(snapshot.referred_entity(guid).is_none());
        }
        assert!(snapshot.referred_entity(&sd_guid).is_some());
    }

    #[test]
    fn pruning_single_reference_drops_referred_entity() {
        let (mut snapshot, column_guids, sd_guid) = table_with_children(2);

        prune_attribute(&mut snapshot, "sd");

        assert!(snapshot.entity.attribute("sd").is_none());
        assert!(snapshot.referred_entity(&sd_guid).is_none());
        assert_eq!(snapshot.referred_entities.len(), column_guids.len());
    }

    #[test]
    fn pruning_absent_attribute_is_noop() {
        let (mut snapshot, _, _) = table_with_children(1);
        let before = snapshot.clone();

        assert!(prune_attribute(&mut snapshot, "partitionKeys").is_none());
        assert_eq!(snapshot, before);
    }

    #[test]
    fn pruning_scalar_attribute_keeps_side_table() {
        let (mut snapshot, _, _) = table_with_children(2);
        snapshot.entity.set_attribute("owner", "alice");
        let referred_before = snapshot.referred_entities.clone();

        let removed = prune_attribute(&mut snapshot, "owner");

        assert_eq!(removed, Some(AttributeValue::from("alice")));
        assert_eq!(snapshot.referred_entities, referred_before);
    }

    #[test]
    fn references_by_qualified_name_do_not_touch_side_table() {
        let (mut snapshot, _, _) = table_with_children(1);
        snapshot
            .entity
            .set_attribute("db", ObjectId::by_qualified_name("hive_db", "db@c"));
        let referred_before = snapshot.referred_entities.clone();

        prune_attribute(&mut snapshot, "db");

        assert_eq!(snapshot.referred_entities, referred_before);
    }

    #[test]
    fn prune_attributes_removes_all_children() {
        let (mut snapshot, _, _) = table_with_children(4);

        prune_attributes(&mut snapshot, &["columns", "partitionKeys", "sd"]);

        assert!(snapshot.referred_entities.is_empty());
        assert_eq!(snapshot.entity.qualified_name(), Some("db.t@c"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pruning_is_idempotent(
                column_count in 0_usize..8,
                attribute in prop::sample::select(vec!["columns", "sd", "owner", "missing"]),
            ) {
                let (mut snapshot, _, _) = table_with_children(column_count);

                prune_attribute(&mut snapshot, attribute);
                let once = snapshot.clone();

                let second = prune_attribute(&mut snapshot, attribute);
                prop_assert!(second.is_none());
                prop_assert_eq!(snapshot, once);
            }
        }
    }
}
