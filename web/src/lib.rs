use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use domain::chat::ChatService;
use log::{info, warn};
use sea_orm::DatabaseConnection;
use service::config::Config;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use error::{Error, Result};

pub(crate) mod controller;
pub(crate) mod error;
pub(crate) mod params;
pub mod router;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let config = app_state.config();

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Skipping invalid allowed origin: {origin}");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(allowed_origins);

    let interface = config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", interface, config.port);

    let router = router::define_routes(app_state.clone()).layer(cors);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {addr}");

    axum::serve(listener, router).await
}

/// Request-handling state handed to the router at startup: infrastructure
/// state from the `service` crate plus the explicitly constructed chat
/// service and the resolved encryption key. No implicit globals.
#[derive(Clone)]
pub struct AppState {
    service_state: service::AppState,
    chat_service: Arc<ChatService>,
    encryption_key: String,
}

impl AppState {
    pub fn new(
        service_state: service::AppState,
        chat_service: Arc<ChatService>,
        encryption_key: String,
    ) -> Self {
        Self {
            service_state,
            chat_service,
            encryption_key,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.service_state.db_conn_ref()
    }

    pub fn config(&self) -> &Config {
        &self.service_state.config
    }

    pub fn chat_service(&self) -> &ChatService {
        &self.chat_service
    }

    /// Hex-encoded key used by the domain layer to encrypt/decrypt stored
    /// API keys. Never serialized or logged.
    pub fn encryption_key(&self) -> &str {
        &self.encryption_key
    }
}
