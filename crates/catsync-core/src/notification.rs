//! Notification envelope for delivering intents to a transport.
//!
//! The envelope carries what the receiving metadata store needs besides the
//! intent itself:
//! - Version gating (`version`)
//! - Attribution (`user`)
//! - Deduplication (`idempotency_key`)
//! - Traceability (`source`, `occurred_at`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::error::{Error, Result};
use crate::intent::UpdateIntent;

/// Envelope around a single notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification<T> {
    /// Notification type discriminator (e.g., `"entity.update"`).
    pub notification_type: String,

    /// Schema version for this notification type.
    pub version: u32,

    /// User on whose behalf the change is made.
    pub user: String,

    /// Idempotency key for deduplication.
    pub idempotency_key: String,

    /// When the source change occurred.
    pub occurred_at: DateTime<Utc>,

    /// Component that produced the notification.
    pub source: String,

    /// The wrapped payload.
    pub payload: T,
}

/// Payload types that can be wrapped in a [`Notification`].
pub trait NotificationPayload {
    /// Notification type discriminator.
    const NOTIFICATION_TYPE: &'static str;

    /// Notification schema version (starts at `1`).
    const NOTIFICATION_VERSION: u32;
}

impl NotificationPayload for UpdateIntent {
    const NOTIFICATION_TYPE: &'static str = "entity.update";
    const NOTIFICATION_VERSION: u32 = 2;
}

impl<T: NotificationPayload + Serialize> Notification<T> {
    /// Wraps a payload, deriving the idempotency key from its content.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn new(
        user: impl Into<String>,
        source: impl Into<String>,
        occurred_at: DateTime<Utc>,
        payload: T,
    ) -> Result<Self> {
        let user = user.into();
        let idempotency_key = Self::generate_idempotency_key(&user, &payload)?;
        Ok(Self {
            notification_type: T::NOTIFICATION_TYPE.to_string(),
            version: T::NOTIFICATION_VERSION,
            user,
            idempotency_key,
            occurred_at,
            source: source.into(),
            payload,
        })
    }

    /// Generates a deterministic idempotency key.
    ///
    /// The key is derived from canonical JSON of
    /// `{ notification_type, version, user, payload }`.
    ///
    /// # Errors
    ///
    /// Returns an error if canonical JSON serialization fails.
    pub fn generate_idempotency_key(user: &str, payload: &T) -> Result<String> {
        #[derive(Serialize)]
        struct IdempotencyKeyInput<'a, P> {
            notification_type: &'a str,
            version: u32,
            user: &'a str,
            payload: &'a P,
        }

        let input = IdempotencyKeyInput {
            notification_type: T::NOTIFICATION_TYPE,
            version: T::NOTIFICATION_VERSION,
            user,
            payload,
        };

        let bytes = canonical_json_bytes(&input)?;
        let hash = sha2::Sha256::digest(&bytes);
        let hash_bytes = hash.as_slice();
        let prefix = hash_bytes.get(..16).unwrap_or(hash_bytes);
        Ok(format!("auto:{}", hex::encode(prefix)))
    }
}

impl<T> Notification<T> {
    /// Validates required envelope fields.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or invalid.
    pub fn validate(&self) -> Result<()> {
        if self.notification_type.trim().is_empty() {
            return Err(Error::InvalidInput(
                "notification_type must be non-empty".into(),
            ));
        }
        if self.version == 0 {
            return Err(Error::InvalidInput("version must be >= 1".into()));
        }
        if self.user.trim().is_empty() {
            return Err(Error::InvalidInput("user must be non-empty".into()));
        }
        if self.idempotency_key.trim().is_empty() {
            return Err(Error::InvalidInput(
                "idempotency_key must be non-empty".into(),
            ));
        }
        if self.source.trim().is_empty() {
            return Err(Error::InvalidInput("source must be non-empty".into()));
        }
        Ok(())
    }
}

fn canonical_json_bytes(value: &impl Serialize) -> Result<Vec<u8>> {
    let mut json = serde_json::to_value(value).map_err(|e| Error::Serialization {
        message: format!("failed to convert value to JSON: {e}"),
    })?;
    canonicalize_json_value(&mut json);
    serde_json::to_vec(&json).map_err(|e| Error::Serialization {
        message: format!("failed to serialize canonical JSON: {e}"),
    })
}

fn canonicalize_json_value(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            // Key order must not depend on serde_json's preserve_order feature.
            let mut keys: Vec<String> = map.keys().cloned().collect();
            keys.sort();

            let mut new_map = serde_json::Map::new();
            for key in keys {
                if let Some(mut child) = map.remove(&key) {
                    canonicalize_json_value(&mut child);
                    new_map.insert(key, child);
                }
            }
            *map = new_map;
        }
        serde_json::Value::Array(values) => {
            for child in values {
                canonicalize_json_value(child);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, ObjectId};

    fn intent(new_name: &str) -> UpdateIntent {
        UpdateIntent::partial_update(
            ObjectId::by_qualified_name("hive_table", "db.t@c"),
            Entity::with_qualified_name("hive_table", new_name),
        )
    }

    #[test]
    fn idempotency_key_is_deterministic() {
        let key1 = Notification::generate_idempotency_key("hive", &intent("db.t2@c")).unwrap();
        let key2 = Notification::generate_idempotency_key("hive", &intent("db.t2@c")).unwrap();
        assert_eq!(key1, key2);
        assert!(key1.starts_with("auto:"));
        assert_eq!(key1.len(), "auto:".len() + 32);
    }

    #[test]
    fn idempotency_key_depends_on_user_and_payload() {
        let base = Notification::generate_idempotency_key("hive", &intent("db.t2@c")).unwrap();
        let other_user = Notification::generate_idempotency_key("etl", &intent("db.t2@c")).unwrap();
        let other_payload =
            Notification::generate_idempotency_key("hive", &intent("db.t3@c")).unwrap();
        assert_ne!(base, other_user);
        assert_ne!(base, other_payload);
    }

    #[test]
    fn new_notification_is_valid() {
        let notification = Notification::new("hive", "catsync-hive", Utc::now(), intent("db.t2@c"))
            .unwrap();
        assert_eq!(notification.notification_type, "entity.update");
        assert_eq!(notification.version, 2);
        notification.validate().unwrap();
    }

    #[test]
    fn validate_rejects_blank_user() {
        let mut notification =
            Notification::new("hive", "catsync-hive", Utc::now(), intent("db.t2@c")).unwrap();
        notification.user = "  ".to_string();
        assert!(matches!(
            notification.validate(),
            Err(Error::InvalidInput(msg)) if msg.contains("user")
        ));
    }
}
