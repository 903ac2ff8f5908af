//! Business logic for the MCP Chat API backend.
//!
//! This crate re-exports data types from the `entity_api` crate so consumers
//! (the `web` crate) do not need to depend on the entity layers directly.

pub use entity_api::{api_keys, Id};

pub mod api_key;
pub mod chat;
pub mod encryption;
pub mod error;
pub mod masking;
