//! The API-Key Service: CRUD over named credential records.
//!
//! Plaintext credentials cross this boundary exactly twice: on the way in
//! (encrypted before the entity layer sees them) and on the way out
//! (decrypted for consumption or masking). Everything below this layer deals
//! in ciphertext only.

use crate::api_keys::Model;
use crate::encryption;
use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::masking;
use entity_api::api_key;
use log::*;
use sea_orm::DatabaseConnection;

/// Explicit partial-update parameters for PATCH-style updates. Each field's
/// presence is modeled with an `Option` and merged field-by-field.
#[derive(Debug, Default)]
pub struct UpdateParams {
    /// New plaintext credential value, re-encrypted before storage.
    pub key: Option<String>,
    pub is_active: Option<bool>,
}

/// Creates a record named `name` or replaces the secret of an existing one
/// (idempotent upsert by name). An updated record is forced back to active.
pub async fn create_or_update(
    db: &DatabaseConnection,
    key_hex: &str,
    name: &str,
    plaintext_key: &str,
) -> Result<Model, Error> {
    validate_non_empty("name", name)?;
    validate_non_empty("key", plaintext_key)?;

    let encrypted_key = encryption::encrypt(plaintext_key, key_hex)?;

    debug!("Upserting API key record: {name}");

    Ok(api_key::upsert(db, name, encrypted_key).await?)
}

/// Exact-name lookup. Inactive records are still returned here; only
/// decryption for consumption is gated on `is_active`.
pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Model, Error> {
    api_key::find_by_name(db, name).await?.ok_or_else(|| Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)),
    })
}

/// All records, in no contracted order.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(api_key::find_all(db).await?)
}

/// Partially updates the record named `name`: secret value and/or active
/// flag, independent of each other.
pub async fn update(
    db: &DatabaseConnection,
    key_hex: &str,
    name: &str,
    params: UpdateParams,
) -> Result<Model, Error> {
    let encrypted_key = match params.key.as_deref() {
        Some(plaintext_key) => {
            validate_non_empty("key", plaintext_key)?;
            Some(encryption::encrypt(plaintext_key, key_hex)?)
        }
        None => None,
    };

    Ok(api_key::update(db, name, encrypted_key, params.is_active).await?)
}

/// Deletes the record named `name`. Returns false when no record existed so
/// double-deletes stay error-free for callers.
pub async fn delete(db: &DatabaseConnection, name: &str) -> Result<bool, Error> {
    Ok(api_key::delete_by_name(db, name).await?)
}

/// Returns the decrypted credential, but only when the record exists AND is
/// active. Inactive keys are unavailable for consumption while remaining
/// visible through `find_by_name`/`find_all` for management.
pub async fn decrypted_value(
    db: &DatabaseConnection,
    key_hex: &str,
    name: &str,
) -> Result<Option<String>, Error> {
    let record = api_key::find_by_name(db, name).await?;

    match record {
        Some(record) if record.is_active => {
            Ok(Some(encryption::decrypt(&record.encrypted_key, key_hex)?))
        }
        _ => Ok(None),
    }
}

/// Derives the display-safe masked form of a record's secret. This is the
/// only representation of the credential that may be serialized to clients.
pub fn masked_value(record: &Model, key_hex: &str) -> Result<String, Error> {
    let plaintext = encryption::decrypt(&record.encrypted_key, key_hex)?;
    Ok(masking::mask(&plaintext))
}

fn validate_non_empty(field: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        debug!("Rejecting empty required field: {field}");
        return Err(Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Invalid,
            )),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn record_with_secret(secret: &str, is_active: bool) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: crate::Id::new_v4(),
            name: "openai".to_string(),
            encrypted_key: encryption::encrypt(secret, TEST_KEY).unwrap(),
            is_active,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn masked_value_masks_the_decrypted_secret() {
        let record = record_with_secret("sk-proj-ABCDEFGHIJKL", true);
        let masked = masked_value(&record, TEST_KEY).unwrap();
        assert_eq!(masked, "sk-proj-...IJKL");
    }

    #[test]
    fn masked_value_fails_under_a_different_key() {
        let record = record_with_secret("sk-proj-ABCDEFGHIJKL", true);
        let wrong_key = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
        let result = masked_value(&record, wrong_key);
        assert!(matches!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Encryption)
        ));
    }

    #[cfg(feature = "mock")]
    mod with_mock_db {
        use super::*;
        use sea_orm::{DatabaseBackend, MockDatabase};

        #[tokio::test]
        async fn decrypted_value_returns_none_when_inactive() -> Result<(), Error> {
            let record = record_with_secret("sk-proj-ABCDEFGHIJKL", false);
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![record]])
                .into_connection();

            let value = decrypted_value(&db, TEST_KEY, "openai").await?;
            assert!(value.is_none());
            Ok(())
        }

        #[tokio::test]
        async fn decrypted_value_returns_the_plaintext_when_active() -> Result<(), Error> {
            let record = record_with_secret("sk-proj-ABCDEFGHIJKL", true);
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![record]])
                .into_connection();

            let value = decrypted_value(&db, TEST_KEY, "openai").await?;
            assert_eq!(value.as_deref(), Some("sk-proj-ABCDEFGHIJKL"));
            Ok(())
        }

        #[tokio::test]
        async fn find_by_name_maps_missing_record_to_not_found() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
                .into_connection();

            let result = find_by_name(&db, "missing").await;
            assert!(matches!(
                result.unwrap_err().error_kind,
                DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
            ));
        }

        #[tokio::test]
        async fn create_or_update_rejects_an_empty_key() {
            let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

            let result = create_or_update(&db, TEST_KEY, "openai", "").await;
            assert!(matches!(
                result.unwrap_err().error_kind,
                DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid))
            ));
        }
    }
}
