//! CRUD operations for the api_keys table.
//!
//! Every write runs inside a single transaction so a partially-applied key
//! update is never observable. Callers hand in ciphertext only; encryption
//! and decryption live in the domain layer.

use super::error::{EntityApiErrorKind, Error};
use entity::api_keys::{ActiveModel, Column, Entity, Model};
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, TransactionTrait, TryIntoModel,
};

/// Finds an API key record by its unique name. Exact, case-sensitive match.
pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Name.eq(name))
        .one(db)
        .await?)
}

/// Returns all API key records. No ordering is contracted.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().all(db).await?)
}

/// Creates a record named `name`, or replaces the ciphertext of an existing
/// one. An updated record is forced back to active and gets a fresh
/// `updated_at`. At most one record per name can exist at any time.
pub async fn upsert(
    db: &DatabaseConnection,
    name: &str,
    encrypted_key: String,
) -> Result<Model, Error> {
    let txn = db.begin().await?;

    let existing = Entity::find()
        .filter(Column::Name.eq(name))
        .one(&txn)
        .await?;

    let now = chrono::Utc::now();

    let model = match existing {
        Some(existing) => {
            debug!("Replacing ciphertext for existing API key: {name}");

            let active_model = ActiveModel {
                id: Unchanged(existing.id),
                name: Unchanged(existing.name),
                encrypted_key: Set(encrypted_key),
                is_active: Set(true),
                created_at: Unchanged(existing.created_at),
                updated_at: Set(now.into()),
            };

            active_model.update(&txn).await?.try_into_model()?
        }
        None => {
            debug!("Inserting new API key: {name}");

            let active_model = ActiveModel {
                name: Set(name.to_string()),
                encrypted_key: Set(encrypted_key),
                is_active: Set(true),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            };

            active_model.save(&txn).await?.try_into_model()?
        }
    };

    txn.commit().await?;

    Ok(model)
}

/// Partially updates a record by name. Only the provided fields change;
/// `updated_at` is always refreshed.
pub async fn update(
    db: &DatabaseConnection,
    name: &str,
    encrypted_key: Option<String>,
    is_active: Option<bool>,
) -> Result<Model, Error> {
    let txn = db.begin().await?;

    let result = Entity::find()
        .filter(Column::Name.eq(name))
        .one(&txn)
        .await?;

    match result {
        Some(existing) => {
            let mut active_model = ActiveModel {
                id: Unchanged(existing.id),
                name: Unchanged(existing.name),
                encrypted_key: Unchanged(existing.encrypted_key),
                is_active: Unchanged(existing.is_active),
                created_at: Unchanged(existing.created_at),
                updated_at: Set(chrono::Utc::now().into()),
            };

            if let Some(encrypted_key) = encrypted_key {
                active_model.encrypted_key = Set(encrypted_key);
            }
            if let Some(is_active) = is_active {
                active_model.is_active = Set(is_active);
            }

            let model = active_model.update(&txn).await?.try_into_model()?;
            txn.commit().await?;

            Ok(model)
        }
        None => {
            debug!("API key with name {name} not found");

            Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
        }
    }
}

/// Deletes a record by name. Returns false (not an error) when no record
/// existed, so callers can treat double-deletes as a no-op.
pub async fn delete_by_name(db: &DatabaseConnection, name: &str) -> Result<bool, Error> {
    let txn = db.begin().await?;

    let result = Entity::find()
        .filter(Column::Name.eq(name))
        .one(&txn)
        .await?;

    match result {
        Some(existing) => {
            existing.delete(&txn).await?;
            txn.commit().await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::Id;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn api_key_model(name: &str) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            name: name.to_string(),
            encrypted_key: "bm9uY2VfYW5kX2NpcGhlcnRleHQ=".to_string(),
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_by_name_returns_none_when_missing() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        let result = find_by_name(&db, "openai").await?;
        assert!(result.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn upsert_inserts_when_name_is_new() -> Result<(), Error> {
        let model = api_key_model("openai");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        let inserted = upsert(&db, "openai", model.encrypted_key.clone()).await?;
        assert_eq!(inserted.name, model.name);
        assert!(inserted.is_active);
        Ok(())
    }

    #[tokio::test]
    async fn upsert_replaces_ciphertext_when_name_exists() -> Result<(), Error> {
        let existing = api_key_model("openai");
        let mut updated = existing.clone();
        updated.encrypted_key = "bmV3X2NpcGhlcnRleHQ=".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing]])
            .append_query_results(vec![vec![updated.clone()]])
            .into_connection();

        let result = upsert(&db, "openai", updated.encrypted_key.clone()).await?;
        assert_eq!(result.encrypted_key, updated.encrypted_key);
        Ok(())
    }

    #[tokio::test]
    async fn upsert_replace_branch_reactivates_and_refreshes_updated_at() {
        let mut existing = api_key_model("openai");
        existing.is_active = false;

        let mut updated = existing.clone();
        updated.encrypted_key = "bmV3X2NpcGhlcnRleHQ=".to_string();
        updated.is_active = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing]])
            .append_query_results(vec![vec![updated.clone()]])
            .into_connection();

        upsert(&db, "openai", updated.encrypted_key.clone())
            .await
            .unwrap();

        // Unchanged columns are excluded from the UPDATE statement, so the
        // reactivation and timestamp refresh must appear in its SET clause.
        let log = format!("{:?}", db.into_transaction_log());
        let update_stmt = log
            .split("UPDATE")
            .nth(1)
            .expect("no UPDATE statement was issued for an existing name");
        let set_clause = update_stmt.split("WHERE").next().unwrap();
        assert!(set_clause.contains(r#""encrypted_key""#));
        assert!(set_clause.contains(r#""is_active""#));
        assert!(set_clause.contains(r#""updated_at""#));
        assert!(!set_clause.contains(r#""created_at""#));
        assert!(update_stmt.contains("Bool(Some(true))"));
    }

    #[tokio::test]
    async fn update_returns_not_found_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        let result = update(&db, "openai", None, Some(false)).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn delete_by_name_returns_false_when_missing() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        let deleted = delete_by_name(&db, "openai").await?;
        assert!(!deleted);
        Ok(())
    }
}
