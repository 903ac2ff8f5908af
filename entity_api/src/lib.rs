pub use entity::{api_keys, chat, Id};

pub mod api_key;
pub mod error;
