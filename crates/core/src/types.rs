/// Import sessions and catalog products are identified by UUIDs.
pub type SessionId = uuid::Uuid;

/// Catalog product identifier.
pub type ProductId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
