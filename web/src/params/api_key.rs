//! Parameters and response shapes for API key endpoints.

use chrono::{DateTime, FixedOffset};
use domain::api_keys::Model;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body for creating or updating an API key by name (upsert).
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateParams {
    /// Name of the API key, e.g. "openai" or "anthropic"
    pub name: String,
    /// The actual API key value (encrypted at rest, never echoed back)
    pub key: String,
}

/// Body for partially updating an API key: new key value and/or active
/// status, each independently optional.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<UpdateParams> for domain::api_key::UpdateParams {
    fn from(params: UpdateParams) -> Self {
        Self {
            key: params.key,
            is_active: params.is_active,
        }
    }
}

/// An API key record as exposed to clients: the secret appears only in
/// masked form.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyResponse {
    #[schema(value_type = Uuid)]
    pub id: domain::Id,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    /// Partially masked API key for verification
    pub masked_key: String,
}

impl ApiKeyResponse {
    pub fn from_model(model: Model, masked_key: String) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_active: model.is_active,
            created_at: rfc3339(model.created_at),
            updated_at: rfc3339(model.updated_at),
            masked_key,
        }
    }
}

/// Response for listing API keys.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyListResponse {
    pub keys: Vec<ApiKeyResponse>,
    pub total: usize,
}

/// Generic `{message}` response used by delete endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn rfc3339(dt: DateTime<FixedOffset>) -> String {
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Id;

    #[test]
    fn response_never_contains_the_ciphertext() {
        let now = chrono::Utc::now();
        let model = Model {
            id: Id::new_v4(),
            name: "openai".to_string(),
            encrypted_key: "c2VjcmV0X2NpcGhlcnRleHQ=".to_string(),
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let response = ApiKeyResponse::from_model(model, "sk-proj-...IJKL".to_string());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["masked_key"], "sk-proj-...IJKL");
        assert_eq!(value["name"], "openai");
        assert!(value.get("encrypted_key").is_none());
        assert!(value.get("key").is_none());
    }

    #[test]
    fn update_params_deserialize_with_missing_fields() {
        let params: UpdateParams = serde_json::from_str(r#"{"is_active": false}"#).unwrap();
        assert!(params.key.is_none());
        assert_eq!(params.is_active, Some(false));
    }
}
