//! SeaORM Entity for the api_keys table.
//! Stores third-party API credentials encrypted at rest, keyed by a unique name.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::api_keys::Model)]
#[sea_orm(schema_name = "mcp_chat", table_name = "api_keys")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    /// Unique lookup key, e.g. "openai" or "anthropic". Case-sensitive.
    pub name: String,

    /// AES-256-GCM ciphertext of the credential. Never serialized outward.
    #[serde(skip_serializing)]
    pub encrypted_key: String,

    /// Inactive keys stay visible for management but are unavailable for
    /// consumption via decryption.
    pub is_active: bool,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
