//! HTTP boundary for the archive.
//!
//! A thin JSON adapter over the core query/command entry points. The UI
//! protocol is message-based: `POST /ui?msg=<name>` with form-encoded
//! parameters. Raw key-value parameters never reach the core — a dedicated
//! parser turns them into a typed [`UiCommand`] first, and unparseable
//! input is rejected as `bad_request`.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/ui?msg=<name>` | Dispatch a UI command (form-encoded params) |
//! | `GET`  | `/images` | All archived images with content |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "image not found: 999" } }
//! ```
//!
//! Codes: `bad_request` (400), `not_found` (404), `conflict` (409),
//! `internal` (500).

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::models::{Image, ImageListing};
use crate::search;
use crate::show;
use crate::store::ContentStore;
use crate::tag;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    index: Index,
    store: ContentStore,
}

/// Starts the HTTP server on the configured bind address. Runs until the
/// process is terminated.
pub async fn run_server(config: &Config, pool: SqlitePool) -> anyhow::Result<()> {
    let state = AppState {
        index: Index::new(pool),
        store: ContentStore::new(&config.ingest.archive_dir),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/ui", post(handle_ui))
        .route("/images", get(handle_images))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!("server listening on http://{}", config.server.bind);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ UI command parsing ============

/// Typed form of the message-based UI protocol. The boundary parser is the
/// only place that touches raw parameter maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Show,
    ShowImage(i64),
    Search(String),
    AddTag { id: i64, tag: String },
    CloseModal,
}

impl UiCommand {
    /// Parse a `msg` name plus form parameters into a command. Unknown or
    /// missing messages and bad parameters are [`Error::MalformedInput`].
    pub fn parse(msg: Option<&str>, params: &HashMap<String, String>) -> Result<UiCommand> {
        match msg {
            Some("show") => Ok(UiCommand::Show),
            Some("show_img") => Ok(UiCommand::ShowImage(parse_id(params)?)),
            Some("search") => {
                let query = params
                    .get("q")
                    .ok_or_else(|| Error::malformed("missing 'q' parameter"))?;
                Ok(UiCommand::Search(query.clone()))
            }
            Some("add_tag") => {
                let tag = params
                    .get("tag")
                    .ok_or_else(|| Error::malformed("missing 'tag' parameter"))?;
                Ok(UiCommand::AddTag {
                    id: parse_id(params)?,
                    tag: tag.clone(),
                })
            }
            Some("close_modal") => Ok(UiCommand::CloseModal),
            Some(other) => Err(Error::malformed(format!("unknown message: {}", other))),
            None => Err(Error::malformed("missing 'msg' parameter")),
        }
    }
}

fn parse_id(params: &HashMap<String, String>) -> Result<i64> {
    let raw = params
        .get("id")
        .ok_or_else(|| Error::malformed("missing 'id' parameter"))?;
    raw.parse::<i64>()
        .map_err(|_| Error::malformed(format!("'id' must be an integer, got '{}'", raw)))
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::MalformedInput { .. } => (StatusCode::BAD_REQUEST, "bad_request"),
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Error::ConstraintViolation { .. } => (StatusCode::CONFLICT, "conflict"),
            Error::Io { .. } | Error::Db { .. } | Error::Cancelled => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        AppError {
            status,
            code,
            message: err.to_string(),
        }
    }
}

// ============ POST /ui ============

#[derive(Deserialize)]
struct UiQuery {
    msg: Option<String>,
}

/// Handler for `POST /ui` — parses the message into a [`UiCommand`] and
/// dispatches it to the core entry points.
async fn handle_ui(
    State(state): State<AppState>,
    Query(query): Query<UiQuery>,
    Form(params): Form<HashMap<String, String>>,
) -> std::result::Result<Json<serde_json::Value>, AppError> {
    let command = UiCommand::parse(query.msg.as_deref(), &params)?;

    match command {
        UiCommand::Show => Ok(Json(serde_json::json!({ "status": "ok" }))),
        UiCommand::CloseModal => Ok(Json(serde_json::json!({}))),
        UiCommand::ShowImage(id) => {
            let detail = show::show_image(&state.index, &state.store, id).await?;
            Ok(Json(serde_json::json!({ "image": detail })))
        }
        UiCommand::Search(q) => {
            let images = search::search_images(&state.index, &q).await?;
            let listings = listings_for(&state.store, &images)?;
            Ok(Json(serde_json::json!({ "images": listings })))
        }
        UiCommand::AddTag { id, tag: tag_name } => {
            tag::add_tag(&state.index, id, &tag_name).await?;
            let detail = show::show_image(&state.index, &state.store, id).await?;
            Ok(Json(serde_json::json!({ "image": detail })))
        }
    }
}

// ============ GET /images ============

/// Handler for `GET /images` — the index listing with archived content.
async fn handle_images(
    State(state): State<AppState>,
) -> std::result::Result<Json<serde_json::Value>, AppError> {
    let images = state.index.find_all_images().await?;
    let listings = listings_for(&state.store, &images)?;
    Ok(Json(serde_json::json!({ "images": listings })))
}

fn listings_for(store: &ContentStore, images: &[Image]) -> Result<Vec<ImageListing>> {
    images
        .iter()
        .map(|image| {
            let bytes = store.read_for(&image.digest, &image.name)?;
            Ok(ImageListing {
                id: image.id,
                name: image.name.clone(),
                content: STANDARD.encode(bytes),
            })
        })
        .collect()
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
