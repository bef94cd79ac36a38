//! Error types for the pdf2raster library.
//!
//! One conversion request either fully succeeds or fails with exactly one
//! [`RasterError`]; there is no partial-success shape. Every variant keeps
//! the underlying native or I/O message so it can surface verbatim at the
//! HTTP boundary — rendering is deterministic for fixed input bytes, so a
//! failed request is never retried by the service itself and the message is
//! all an operator gets.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the conversion pipeline.
#[derive(Debug, Error)]
pub enum RasterError {
    // ── Backend errors ────────────────────────────────────────────────────
    /// The native library was not found at its deployment path.
    #[error(
        "Rendering backend library is not installed ({searched})\n\
         Deploy the PDFium library under <install_root>/bin/dll/ or set \
         PDF2RASTER_INSTALL_ROOT to the correct root."
    )]
    BackendUnavailable {
        /// Listing of the expected path and what was actually on disk.
        searched: String,
    },

    /// The library exists but could not be loaded and initialized.
    #[error("Rendering backend at '{path}' failed to initialize: {detail}")]
    BackendInit { path: PathBuf, detail: String },

    // ── Document errors ───────────────────────────────────────────────────
    /// The uploaded bytes were rejected by the backend (not a PDF, corrupt).
    #[error("Could not open uploaded document: {detail}")]
    DocumentOpen { detail: String },

    /// A render call was made on a session after `close()`.
    #[error("Document session is already closed")]
    SessionClosed,

    /// A page failed to rasterise; the whole batch is aborted.
    #[error("Rendering failed for page {page}: {detail}")]
    PageRender { page: usize, detail: String },

    // ── Request errors ────────────────────────────────────────────────────
    /// The multipart body carried no file field.
    #[error("File is empty.")]
    EmptyUpload,

    /// The multipart body could not be read.
    #[error("Failed to read upload: {detail}")]
    UploadRead { detail: String },

    /// Render parameters outside their domain (zero DPI, page zero).
    #[error("Invalid render request: {0}")]
    InvalidRequest(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Service configuration failed validation at startup.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (worker panic, join failure).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RasterError {
    /// Stable name of the failure class, used in HTTP failure payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            RasterError::BackendUnavailable { .. } => "BackendUnavailable",
            RasterError::BackendInit { .. } => "BackendInitializationError",
            RasterError::DocumentOpen { .. } => "DocumentOpenError",
            RasterError::SessionClosed => "SessionClosedError",
            RasterError::PageRender { .. } => "PageRenderError",
            RasterError::EmptyUpload => "EmptyUploadError",
            RasterError::UploadRead { .. } => "UploadReadError",
            RasterError::InvalidRequest(_) => "InvalidRequestError",
            RasterError::InvalidConfig(_) => "InvalidConfigError",
            RasterError::Internal(_) => "InternalError",
        }
    }
}

impl From<pdfium_locate::LocateError> for RasterError {
    fn from(e: pdfium_locate::LocateError) -> Self {
        match e {
            pdfium_locate::LocateError::Bind { path, reason } => {
                RasterError::BackendInit { path, detail: reason }
            }
            other @ pdfium_locate::LocateError::RootInaccessible { .. } => {
                RasterError::Internal(other.to_string())
            }
        }
    }
}
