use uuid::Uuid;

// Durable entities
pub mod api_keys;

// In-memory chat data types
pub mod chat;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
