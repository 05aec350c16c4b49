//! HTTP Server for the boxoffice API.
//!
//! Provides REST endpoints for CSV upload and import reporting. Record
//! administration (forms, list views) lives in the separate admin UI;
//! this server only exposes the import pipeline and its read models.
//!
//! # API Endpoints
//!
//! | Method | Path                              | Description                       |
//! |--------|-----------------------------------|-----------------------------------|
//! | GET    | `/health`                         | Health check                      |
//! | POST   | `/api/import`                     | Upload CSV for import             |
//! | GET    | `/api/logs`                       | SSE stream for real-time logs     |
//! | GET    | `/api/productions/{id}/summary`   | Aggregate totals for a production |

use axum::{
    extract::{Multipart, Path, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use super::logs::LOG_BROADCASTER;
use super::types::{error_response, ImportResponse, ProductionSummary};
use crate::error::{ImportError, ServerError, ServerResult};
use crate::importer::{self, ImportRequest};
use crate::models::ImportKind;
use crate::storage::Storage;

/// Shared server state: the record-storage collaborator.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) | ServerError::Import(ImportError::Parse(_)) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}

/// Start the HTTP server
pub async fn start_server(
    port: u16,
    storage: Arc<dyn Storage>,
) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let state = AppState { storage };

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/import", post(import_csv))
        .route("/api/logs", get(sse_logs))
        .route("/api/productions/{id}/summary", get(production_summary))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("Boxoffice server running on http://localhost:{}", port);
    println!("   POST /api/import                    - Upload CSV file");
    println!("   GET  /api/logs                      - SSE log stream");
    println!("   GET  /api/productions/{{id}}/summary  - Production totals");
    println!("   GET  /health                        - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "boxoffice",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// CSV upload endpoint.
///
/// Multipart fields: `file` (the upload), `type` (import-type token),
/// `organization` (uuid), `production` (uuid), `user` (acting user).
async fn import_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServerResult<Json<ImportResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut kind_token: Option<String> = None;
    let mut organization: Option<String> = None;
    let mut production: Option<String> = None;
    let mut user: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?
                        .to_vec(),
                );
            }
            "type" => kind_token = Some(read_text(field).await?),
            "organization" => organization = Some(read_text(field).await?),
            "production" => production = Some(read_text(field).await?),
            "user" => user = Some(read_text(field).await?),
            _ => {}
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))?;
    let kind_token =
        kind_token.ok_or_else(|| ServerError::BadRequest("No import type provided".to_string()))?;
    let kind = ImportKind::from_token(&kind_token).ok_or_else(|| {
        ServerError::BadRequest(format!(
            "Unknown import type '{}', expected one of events|cast|crew|tickets|feedback",
            kind_token
        ))
    })?;
    let organization_id = parse_uuid("organization", organization)?;
    let production_id = parse_uuid("production", production)?;

    println!(
        "NEW UPLOAD: {} ({} bytes, type {})",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len(),
        kind.token()
    );

    let mut request = ImportRequest::new(
        organization_id,
        production_id,
        kind,
        user.unwrap_or_else(|| "anonymous".to_string()),
    );
    if let Some(name) = file_name {
        request = request.with_file(name);
    }

    let outcome = importer::import(state.storage.as_ref(), &request, &bytes).await?;

    Ok(Json(ImportResponse::from(outcome)))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> ServerResult<String> {
    field
        .text()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))
}

fn parse_uuid(name: &str, value: Option<String>) -> ServerResult<Uuid> {
    let value = value.ok_or_else(|| ServerError::BadRequest(format!("No {} provided", name)))?;
    Uuid::parse_str(value.trim())
        .map_err(|_| ServerError::BadRequest(format!("Invalid {} id '{}'", name, value)))
}

/// Aggregate totals for one production, recomputed from stored records.
async fn production_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ServerResult<Json<ProductionSummary>> {
    let title = state.storage.get_production(id).await?.map(|p| p.title);
    let performances = state.storage.get_performances(id).await?;
    let feedback = state.storage.get_feedback_for_production(id).await?;

    Ok(Json(ProductionSummary::from_records(
        id,
        title,
        &performances,
        &feedback,
    )))
}
