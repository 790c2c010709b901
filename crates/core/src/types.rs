/// Identifiers are opaque strings generated server-side (UUID v4 text).
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh entity identifier.
pub fn new_entity_id() -> EntityId {
    uuid::Uuid::new_v4().to_string()
}
