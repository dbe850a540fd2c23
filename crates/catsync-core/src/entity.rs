//! Entity snapshots exchanged with the target metadata store.
//!
//! An [`Entity`] is one cataloged object (table, column, storage descriptor, ...)
//! at a point in time. An [`EntityWithExtInfo`] bundles an entity with the
//! *referred entities* its attributes point at, keyed by guid, so a whole table
//! graph can travel as a single value.
//!
//! Entities are addressed in two ways:
//!
//! - by guid, once the target store has assigned one;
//! - by a unique attribute (normally `qualifiedName`) when no guid is known yet.
//!
//! [`ObjectId`] covers both forms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::Guid;

/// Attribute holding the addressing key of every entity.
pub const ATTRIBUTE_QUALIFIED_NAME: &str = "qualifiedName";

/// Value of a single entity attribute.
///
/// Serialized untagged, so the wire form is plain JSON. An object carrying a
/// `typeName` field and nothing outside the [`ObjectId`] fields reads back as a
/// reference rather than a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Explicit null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar (timestamps are epoch millis).
    Int(i64),
    /// String scalar.
    String(String),
    /// Reference to another entity.
    Object(ObjectId),
    /// Ordered list of values.
    List(Vec<AttributeValue>),
    /// String-keyed map of values.
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Builds a list value from anything convertible into attribute values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the reference, if this is a single object reference.
    #[must_use]
    pub fn as_object_id(&self) -> Option<&ObjectId> {
        match self {
            Self::Object(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns every object reference held directly by this value.
    ///
    /// A single reference yields itself; a list yields its reference elements
    /// in order. Nested lists and maps are not searched.
    #[must_use]
    pub fn object_ids(&self) -> Vec<&ObjectId> {
        match self {
            Self::Object(id) => vec![id],
            Self::List(items) => items.iter().filter_map(Self::as_object_id).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<ObjectId> for AttributeValue {
    fn from(value: ObjectId) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(value: Vec<AttributeValue>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, AttributeValue>> for AttributeValue {
    fn from(value: BTreeMap<String, AttributeValue>) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Lightweight pointer to an entity.
///
/// Either `guid` is set, or `unique_attributes` identifies the entity within
/// its type (e.g. `{qualifiedName: "db.tbl@primary"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectId {
    /// Type of the referenced entity.
    pub type_name: String,

    /// Guid of the referenced entity, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Guid>,

    /// Unique attributes identifying the entity when no guid is known.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unique_attributes: BTreeMap<String, AttributeValue>,
}

impl ObjectId {
    /// References an entity by guid.
    #[must_use]
    pub fn by_guid(type_name: impl Into<String>, guid: Guid) -> Self {
        Self {
            type_name: type_name.into(),
            guid: Some(guid),
            unique_attributes: BTreeMap::new(),
        }
    }

    /// References an entity by a single unique attribute.
    #[must_use]
    pub fn by_unique_attribute(
        type_name: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        let mut unique_attributes = BTreeMap::new();
        unique_attributes.insert(attribute.into(), value.into());
        Self {
            type_name: type_name.into(),
            guid: None,
            unique_attributes,
        }
    }

    /// References an entity by its qualified name.
    #[must_use]
    pub fn by_qualified_name(type_name: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        Self::by_unique_attribute(
            type_name,
            ATTRIBUTE_QUALIFIED_NAME,
            AttributeValue::String(qualified_name.into()),
        )
    }

    /// Returns the qualified name this reference addresses, if any.
    #[must_use]
    pub fn qualified_name(&self) -> Option<&str> {
        self.unique_attributes
            .get(ATTRIBUTE_QUALIFIED_NAME)
            .and_then(AttributeValue::as_str)
    }
}

/// One cataloged object at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Object category (e.g. `hive_table`).
    pub type_name: String,

    /// Guid, absent until the target store knows the entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Guid>,

    /// Attribute values keyed by attribute name.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Entity {
    /// Creates an entity with no guid and no attributes.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            guid: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Creates an entity carrying only a qualified name.
    ///
    /// This is the partial snapshot used to rename an entity in place.
    #[must_use]
    pub fn with_qualified_name(type_name: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        Self::new(type_name).with_attribute(ATTRIBUTE_QUALIFIED_NAME, qualified_name.into())
    }

    /// Sets the guid.
    #[must_use]
    pub fn with_guid(mut self, guid: Guid) -> Self {
        self.guid = Some(guid);
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Returns an attribute value if it is a string.
    #[must_use]
    pub fn string_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(AttributeValue::as_str)
    }

    /// Sets an attribute, returning the previous value.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Removes an attribute, returning its value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<AttributeValue> {
        self.attributes.remove(name)
    }

    /// Returns the `qualifiedName` attribute.
    #[must_use]
    pub fn qualified_name(&self) -> Option<&str> {
        self.string_attribute(ATTRIBUTE_QUALIFIED_NAME)
    }

    /// Builds a reference to this entity by qualified name.
    ///
    /// Returns `None` if the entity has no qualified name.
    #[must_use]
    pub fn id_by_qualified_name(&self) -> Option<ObjectId> {
        self.qualified_name()
            .map(|qn| ObjectId::by_qualified_name(self.type_name.clone(), qn))
    }

    /// Builds a reference to this entity by guid.
    ///
    /// Returns `None` if the entity has no guid.
    #[must_use]
    pub fn id_by_guid(&self) -> Option<ObjectId> {
        self.guid
            .clone()
            .map(|guid| ObjectId::by_guid(self.type_name.clone(), guid))
    }
}

/// An entity plus the entities its attributes refer to, keyed by guid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityWithExtInfo {
    /// The primary entity.
    pub entity: Entity,

    /// Entities reachable from the primary entity's references.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub referred_entities: BTreeMap<Guid, Entity>,
}

impl EntityWithExtInfo {
    /// Wraps an entity with an empty side-table.
    #[must_use]
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            referred_entities: BTreeMap::new(),
        }
    }

    /// Registers a referred entity under `guid`, replacing any previous entry.
    pub fn add_referred_entity(&mut self, guid: Guid, entity: Entity) {
        self.referred_entities.insert(guid, entity);
    }

    /// Returns the referred entity registered under `guid`.
    #[must_use]
    pub fn referred_entity(&self, guid: &Guid) -> Option<&Entity> {
        self.referred_entities.get(guid)
    }

    /// Removes the referred entity registered under `guid`.
    pub fn remove_referred_entity(&mut self, guid: &Guid) -> Option<Entity> {
        self.referred_entities.remove(guid)
    }

    /// Resolves a reference against the side-table.
    ///
    /// Guid references are looked up directly. References without a guid are
    /// matched by type and qualified name. Returns `None` if the reference is
    /// not resolvable.
    #[must_use]
    pub fn resolve(&self, id: &ObjectId) -> Option<&Entity> {
        if let Some(guid) = &id.guid {
            return self.referred_entity(guid);
        }
        let qualified_name = id.qualified_name()?;
        self.referred_entities.values().find(|entity| {
            entity.type_name == id.type_name && entity.qualified_name() == Some(qualified_name)
        })
    }
}

impl From<Entity> for EntityWithExtInfo {
    fn from(entity: Entity) -> Self {
        Self::new(entity)
    }
}
