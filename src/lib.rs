//! # pdf2raster
//!
//! Convert an uploaded PDF into per-page raster images over HTTP.
//!
//! A single stateless endpoint accepts a multipart PDF upload, rasterises a
//! contiguous page range through a deployment-local PDFium library, and
//! answers with the page count, each rendered page's dimensions, and an
//! ordered diagnostic trail. Images live in memory for the duration of one
//! request; nothing is persisted.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload (multipart)
//!  │
//!  ├─ 1. Locate   resolve <install_root>/bin/dll/<lib by pointer width>
//!  ├─ 2. Bind     probe-load pdfium once at startup, re-bind per request
//!  ├─ 3. Open     document session over the buffered upload bytes
//!  ├─ 4. Render   bounded ascending page loop (CPU-bound, spawn_blocking)
//!  └─ 5. Report   page count + per-page dimensions + diagnostics
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2raster::{convert_bytes, BackendHandle, RenderRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let descriptor = pdfium_locate::locate_host(std::path::Path::new("/srv/app"))?;
//!     let handle = BackendHandle::initialize(descriptor)?;
//!
//!     let bytes = std::fs::read("document.pdf")?;
//!     let result = convert_bytes(
//!         handle,
//!         bytes,
//!         "document.pdf".into(),
//!         RenderRequest::full_document(200),
//!     )
//!     .await?;
//!     println!("{} pages", result.page_count);
//!     Ok(())
//! }
//! ```
//!
//! Failure semantics are all-or-nothing per request: a zero-page document
//! or a range starting past the last page is an empty success, while any
//! single failing page aborts the whole batch with no partial output.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod render;
pub mod server;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use backend::{BackendDocument, BackendHandle, PdfiumBackend, RenderBackend};
pub use config::ServiceConfig;
pub use convert::{convert_bytes, convert_with_backend, RenderRequest};
pub use error::RasterError;
pub use output::{ConversionResult, ConversionSummary, PageDimensions, RasterImage};
pub use render::{render_range, PageRange};
pub use session::DocumentSession;
