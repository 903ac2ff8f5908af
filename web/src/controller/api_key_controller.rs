//! Controller for API key management.
//!
//! Keys are encrypted at rest and only ever serialized to clients in masked
//! form; neither the ciphertext nor the plaintext appears in any response.

use crate::params::api_key::{
    ApiKeyListResponse, ApiKeyResponse, CreateParams, MessageResponse, UpdateParams,
};
use crate::{AppState, Error};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::api_key as ApiKeyApi;

use log::*;

/// POST create or update an API key
///
/// If a key with the same name exists, its secret is replaced and the key is
/// reactivated. The key is encrypted before storage.
#[utoipa::path(
    post,
    path = "/api-keys",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully created or updated an API key", body = ApiKeyResponse),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn create_or_update(
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create or Update API key: {}", params.name);

    let key_hex = app_state.encryption_key();
    let model = ApiKeyApi::create_or_update(
        app_state.db_conn_ref(),
        key_hex,
        &params.name,
        &params.key,
    )
    .await?;

    let masked_key = ApiKeyApi::masked_value(&model, key_hex)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiKeyResponse::from_model(model, masked_key)),
    ))
}

/// GET all API keys (with masked values)
#[utoipa::path(
    get,
    path = "/api-keys",
    responses(
        (status = 200, description = "Successfully retrieved all API keys", body = ApiKeyListResponse),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn index(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET all API keys");

    let key_hex = app_state.encryption_key();
    let models = ApiKeyApi::find_all(app_state.db_conn_ref()).await?;

    let mut keys = Vec::with_capacity(models.len());
    for model in models {
        let masked_key = ApiKeyApi::masked_value(&model, key_hex)?;
        keys.push(ApiKeyResponse::from_model(model, masked_key));
    }

    let total = keys.len();
    Ok(Json(ApiKeyListResponse { keys, total }))
}

/// GET a specific API key by name (with masked value)
#[utoipa::path(
    get,
    path = "/api-keys/{name}",
    params(
        ("name" = String, Path, description = "API key name to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved an API key by its name", body = ApiKeyResponse),
        (status = 404, description = "API key not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET API key by name: {name}");

    let key_hex = app_state.encryption_key();
    let model = ApiKeyApi::find_by_name(app_state.db_conn_ref(), &name).await?;
    let masked_key = ApiKeyApi::masked_value(&model, key_hex)?;

    Ok(Json(ApiKeyResponse::from_model(model, masked_key)))
}

/// PATCH update an API key (change the key value and/or active status)
#[utoipa::path(
    patch,
    path = "/api-keys/{name}",
    params(
        ("name" = String, Path, description = "API key name to update")
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated an API key", body = ApiKeyResponse),
        (status = 404, description = "API key not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PATCH Update API key: {name}");

    let key_hex = app_state.encryption_key();
    let model =
        ApiKeyApi::update(app_state.db_conn_ref(), key_hex, &name, params.into()).await?;
    let masked_key = ApiKeyApi::masked_value(&model, key_hex)?;

    Ok(Json(ApiKeyResponse::from_model(model, masked_key)))
}

/// DELETE an API key by name
#[utoipa::path(
    delete,
    path = "/api-keys/{name}",
    params(
        ("name" = String, Path, description = "API key name to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted an API key", body = MessageResponse),
        (status = 404, description = "API key not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE API key by name: {name}");

    let deleted = ApiKeyApi::delete(app_state.db_conn_ref(), &name).await?;

    if deleted {
        Ok(Json(MessageResponse {
            message: format!("API key '{name}' deleted successfully"),
        })
        .into_response())
    } else {
        Ok((StatusCode::NOT_FOUND, "NOT FOUND").into_response())
    }
}
