use app_schema::AppSchemaOps;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::logging::LoggingMiddleware;

/// Shared by every handler. Validation only reads the catalog, so no lock.
#[derive(Clone)]
pub struct AppState {
    pub ops: Arc<AppSchemaOps>,
}

pub struct AppSchemaServer {
    ops: AppSchemaOps,
    host: String,
    port: u16,
    verbose: u8,
}

impl AppSchemaServer {
    #[must_use]
    pub fn new(ops: AppSchemaOps, host: String, port: u16, verbose: u8) -> Self {
        Self {
            ops,
            host,
            port,
            verbose,
        }
    }

    /// Binds `host:port` and serves until the process stops.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound or serving fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let state = AppState {
            ops: Arc::new(self.ops),
        };
        let app = Self::create_router(state, self.verbose);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {addr}");
        axum::serve(listener, app).await?;

        Ok(())
    }

    #[must_use]
    pub fn create_router(state: AppState, verbose: u8) -> Router {
        let mut router = Router::new()
            .route("/health", get(health))
            .route("/schemas", get(list_schemas))
            .route("/schemas/{id}", get(get_schema))
            .route("/validate", post(validate))
            .route("/validate/{id}", post(validate_against))
            .with_state(state);

        if verbose >= 1 {
            let logging = LoggingMiddleware::new(verbose);
            router = router.layer(middleware::from_fn(move |req, next| {
                let logging = logging.clone();
                async move { logging.handle(req, next).await }
            }));
        }

        router
    }
}

// Schema ids start with '/', which cannot be carried in a single path segment
fn schema_id(raw: &str) -> String {
    if raw.starts_with('/') {
        raw.to_owned()
    } else {
        format!("/{raw}")
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": state.ops.cfg.version,
        "schemas": state.ops.validator().registry().len(),
    }))
}

async fn list_schemas(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.ops.list_schemas())
}

async fn get_schema(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.ops.get_schema(&schema_id(&id));
    if result.schema.is_none() {
        return (StatusCode::NOT_FOUND, Json(result)).into_response();
    }
    Json(result).into_response()
}

async fn validate(State(state): State<AppState>, Json(body): Json<Value>) -> impl IntoResponse {
    Json(state.ops.validate_definition(&body))
}

async fn validate_against(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let id = schema_id(&id);
    let result = state.ops.validate_against(&id, &body);
    if state.ops.validator().registry().get(&id).is_none() {
        return (StatusCode::NOT_FOUND, Json(result)).into_response();
    }
    Json(result).into_response()
}
