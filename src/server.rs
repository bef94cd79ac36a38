//! HTTP surface: one conversion endpoint plus a liveness probe.
//!
//! The backend is located and initialized once at startup; the outcome —
//! ready handle or retained failure — is shared read-only state. Keeping a
//! failed initialization around (rather than refusing to start) means a
//! mis-deployed library shows up as a 400 with the searched-path listing in
//! the very first response, which is what an operator actually needs.
//!
//! Success and failure are binary per request: 200 with the conversion
//! summary, or 400 with the failure class and its original message. No
//! partial-success shape exists.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::backend::BackendHandle;
use crate::config::ServiceConfig;
use crate::convert::{convert_bytes, RenderRequest};
use crate::error::RasterError;

/// Outcome of the startup backend bootstrap, shared across requests.
#[derive(Clone)]
pub enum BackendState {
    /// Library located and probe-bound; conversions can run.
    Ready(BackendHandle),
    /// Location or initialization failed; every conversion reports this.
    Unavailable(Arc<RasterError>),
}

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendState,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(backend: BackendState, config: ServiceConfig) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }
}

/// Locate and initialize the rendering backend for `config.install_root`.
///
/// Never panics and never aborts startup: a failure is logged and retained
/// so requests can report it.
pub fn init_backend(config: &ServiceConfig) -> BackendState {
    let descriptor = match pdfium_locate::locate_host(&config.install_root) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            error!("backend location failed: {e}");
            return BackendState::Unavailable(Arc::new(e.into()));
        }
    };

    match BackendHandle::initialize(descriptor) {
        Ok(handle) => {
            info!("backend ready: {}", handle.descriptor().library_path.display());
            BackendState::Ready(handle)
        }
        Err(e) => {
            error!("backend initialization failed: {e}");
            BackendState::Unavailable(Arc::new(e))
        }
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/convert", get(convert_handler).post(convert_handler))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    backend_ready: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        backend_ready: matches!(state.backend, BackendState::Ready(_)),
    })
}

async fn convert_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    // The upload check runs before the backend check: a caller who sent no
    // file gets "File is empty." even on a mis-deployed instance.
    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => return failure_response(&e).into_response(),
    };

    let handle = match &state.backend {
        BackendState::Ready(handle) => handle.clone(),
        BackendState::Unavailable(e) => return failure_response(e).into_response(),
    };

    let request = RenderRequest::full_document(state.config.dpi);
    match convert_bytes(handle, upload.bytes, upload.name, request).await {
        Ok(result) => (StatusCode::OK, Json(result.summary())).into_response(),
        Err(e) => {
            warn!("conversion failed: {e}");
            failure_response(&e).into_response()
        }
    }
}

// ── Upload extraction ────────────────────────────────────────────────────────

struct Upload {
    name: String,
    bytes: Vec<u8>,
}

/// Pull the `file` field out of the multipart body.
///
/// A body without that field is [`RasterError::EmptyUpload`]; a present but
/// zero-byte file is passed through so the backend rejects it as an
/// unopenable document.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, RasterError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RasterError::UploadRead {
            detail: e.to_string(),
        })?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field
            .file_name()
            .unwrap_or("upload.pdf")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| RasterError::UploadRead {
            detail: e.to_string(),
        })?;
        return Ok(Upload {
            name,
            bytes: bytes.to_vec(),
        });
    }
    Err(RasterError::EmptyUpload)
}

// ── Failure mapping ──────────────────────────────────────────────────────────

/// Serialisable failure payload: failure class plus the original message.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Every pipeline failure maps to 400 with the diagnostic preserved;
/// rendering is deterministic for fixed bytes, so retrying server-side
/// would change nothing.
fn failure_response(e: &RasterError) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: e.kind().to_string(),
            message: e.to_string(),
        }),
    )
}
