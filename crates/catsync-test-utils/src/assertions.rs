//! Custom assertion helpers for integration tests.

use catsync_core::{ATTRIBUTE_QUALIFIED_NAME, AttributeValue, UpdateIntent};
use catsync_hive::attributes::{ATTRIBUTE_ALIASES, CHILD_ATTRIBUTES};

/// Asserts the overall shape of a rename plan.
///
/// Expects one full upsert, then `columns + partition_keys` child updates,
/// then the storage descriptor update if `has_storage`, then the table update.
///
/// # Panics
///
/// Panics if the count or the intent kinds do not match.
pub fn assert_rename_shape(
    intents: &[UpdateIntent],
    columns: usize,
    partition_keys: usize,
    has_storage: bool,
) {
    let expected = columns + partition_keys + usize::from(has_storage) + 2;
    assert_eq!(
        intents.len(),
        expected,
        "Expected {expected} intents, got {}: {:?}",
        intents.len(),
        kinds(intents)
    );
    assert!(
        matches!(intents[0], UpdateIntent::FullUpsert { .. }),
        "First intent must be a full upsert, got {}",
        intents[0].kind()
    );
    for (index, intent) in intents.iter().enumerate().skip(1) {
        assert!(
            matches!(intent, UpdateIntent::PartialUpdate { .. }),
            "Intent {index} must be a partial update, got {}",
            intent.kind()
        );
    }
}

/// Asserts that `intent` renames the child at `old_qualified_name` to
/// `new_qualified_name`, carrying nothing but the new name.
///
/// # Panics
///
/// Panics if the intent is not such a rename.
pub fn assert_child_rename(
    intent: &UpdateIntent,
    type_name: &str,
    old_qualified_name: &str,
    new_qualified_name: &str,
) {
    let UpdateIntent::PartialUpdate { target, entity } = intent else {
        panic!("Expected partial update, got {}", intent.kind());
    };

    assert_eq!(target.type_name, type_name, "target type");
    assert_eq!(target.qualified_name(), Some(old_qualified_name), "target name");
    assert_eq!(entity.entity.type_name, type_name, "entity type");
    assert_eq!(
        entity.entity.qualified_name(),
        Some(new_qualified_name),
        "new qualified name"
    );
    assert_eq!(
        entity.entity.attributes.len(),
        1,
        "Child rename must carry only {ATTRIBUTE_QUALIFIED_NAME}, got {:?}",
        entity.entity.attributes.keys().collect::<Vec<_>>()
    );
    assert!(entity.referred_entities.is_empty(), "Child rename has referred entities");
}

/// Asserts that `intent` is the final table update of a rename.
///
/// # Panics
///
/// Panics if the intent targets another name, carries child attributes, or
/// lacks the `[old_table_name]` alias list.
pub fn assert_table_rename(
    intent: &UpdateIntent,
    old_qualified_name: &str,
    new_qualified_name: &str,
    old_table_name: &str,
) {
    let UpdateIntent::PartialUpdate { target, entity } = intent else {
        panic!("Expected partial update, got {}", intent.kind());
    };

    assert_eq!(target.qualified_name(), Some(old_qualified_name), "target name");
    assert_eq!(
        entity.entity.qualified_name(),
        Some(new_qualified_name),
        "new qualified name"
    );
    for child in CHILD_ATTRIBUTES {
        assert!(
            entity.entity.attribute(child).is_none(),
            "Table update still carries {child}"
        );
    }
    assert!(
        entity.referred_entities.is_empty(),
        "Table update still carries {} referred entities",
        entity.referred_entities.len()
    );
    assert_eq!(
        entity.entity.attribute(ATTRIBUTE_ALIASES),
        Some(&AttributeValue::list([old_table_name])),
        "aliases"
    );
}

fn kinds(intents: &[UpdateIntent]) -> Vec<&'static str> {
    intents.iter().map(UpdateIntent::kind).collect()
}
