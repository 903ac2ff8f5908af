//! This module holds typed parameters for various endpoint inputs and the
//! response shapes built from domain models.
//!
//! By using typed parameters, we can ensure that the inputs are validated
//! (by type) and correctly formatted before they are processed by the
//! application logic. Response types own the presentation rule that only
//! masked key material ever leaves the server.

pub(crate) mod api_key;
pub(crate) mod chat;
