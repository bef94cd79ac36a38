//! The native rendering backend behind a narrow capability seam.
//!
//! Everything downstream of this module (sessions, the page renderer, the
//! HTTP pipeline) talks to two small traits — open a document, ask its page
//! count, render one page — so the pdfium lifecycle quirks stay contained
//! here and tests can substitute an in-memory implementation.
//!
//! ## Why re-bind per conversion?
//!
//! `pdfium-render` documents borrow the `Pdfium` instance that opened them
//! and are not `Send`, so a conversion builds its `Pdfium` on the blocking
//! thread that will do all the work and drops it there. [`BackendHandle`]
//! is the piece that *is* shared across requests: the immutable, validated
//! [`BackendDescriptor`] plus a successful probe bind performed once at
//! startup. Re-binding an already-loaded library afterwards is a cheap
//! dlopen of a cached object.

use crate::error::RasterError;
use image::DynamicImage;
use pdfium_locate::BackendDescriptor;
use pdfium_render::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// PDF user-space units per inch; page sizes are expressed in points.
const POINTS_PER_INCH: f32 = 72.0;

// ── Capability seam ──────────────────────────────────────────────────────────

/// A rendering backend able to open documents from an in-memory buffer.
pub trait RenderBackend {
    /// Open `bytes` as a document. The buffer must stay alive for the life
    /// of the returned document; the backend re-reads it on every render.
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn BackendDocument + 'a>, RasterError>;
}

/// An opened document: page count plus single-page rasterisation.
pub trait BackendDocument {
    /// Number of pages in the document. Zero is valid.
    fn page_count(&self) -> usize;

    /// Rasterise one page (1-indexed) at the given DPI.
    fn render(&self, page_number: usize, dpi: u32) -> Result<DynamicImage, RasterError>;
}

// ── Backend handle ───────────────────────────────────────────────────────────

/// Process-lifetime handle to a located, probe-verified backend.
///
/// Cheap to clone and safe to share read-only across concurrent requests;
/// holds nothing but the immutable descriptor.
#[derive(Debug, Clone)]
pub struct BackendHandle {
    descriptor: Arc<BackendDescriptor>,
}

impl BackendHandle {
    /// Validate the descriptor and load the library once.
    ///
    /// An invalid descriptor fails with [`RasterError::BackendUnavailable`]
    /// carrying the searched-path listing; a library that is present but
    /// refuses to load fails with [`RasterError::BackendInit`]. Neither is
    /// retryable without fixing the deployment.
    pub fn initialize(descriptor: BackendDescriptor) -> Result<Self, RasterError> {
        if !descriptor.is_valid() {
            return Err(RasterError::BackendUnavailable {
                searched: descriptor.search_report(),
            });
        }

        // Probe bind: surface a broken library at startup rather than on
        // the first conversion. The instance is dropped immediately; each
        // conversion binds its own on the blocking thread.
        pdfium_locate::bind_descriptor(&descriptor)?;
        info!(
            "rendering backend initialised from {} ({})",
            descriptor.library_path.display(),
            descriptor.bits
        );

        Ok(Self {
            descriptor: Arc::new(descriptor),
        })
    }

    /// The descriptor this handle was built from.
    pub fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    /// Bind a backend instance for use on the current (blocking) thread.
    pub fn bind(&self) -> Result<PdfiumBackend, RasterError> {
        let pdfium = pdfium_locate::bind_descriptor(&self.descriptor)?;
        Ok(PdfiumBackend { pdfium })
    }
}

// ── pdfium implementation ────────────────────────────────────────────────────

/// The production backend: pdfium bound from the deployment library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl RenderBackend for PdfiumBackend {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn BackendDocument + 'a>, RasterError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| RasterError::DocumentOpen {
                detail: format!("{e:?}"),
            })?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl BackendDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render(&self, page_number: usize, dpi: u32) -> Result<DynamicImage, RasterError> {
        let pages = self.document.pages();
        let page = pages
            .get((page_number - 1) as u16)
            .map_err(|e| RasterError::PageRender {
                page: page_number,
                detail: format!("{e:?}"),
            })?;

        // Pixel size follows the physical page size, scaled by DPI.
        let width_px = (page.width().value * dpi as f32 / POINTS_PER_INCH).round() as i32;
        let height_px = (page.height().value * dpi as f32 / POINTS_PER_INCH).round() as i32;
        let render_config = PdfRenderConfig::new()
            .set_target_width(width_px.max(1))
            .set_target_height(height_px.max(1));

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| RasterError::PageRender {
                page: page_number,
                detail: format!("{e:?}"),
            })?;

        let image = bitmap.as_image();
        debug!(
            "rendered page {} at {} dpi → {}x{} px",
            page_number,
            dpi,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

// ── Test double ──────────────────────────────────────────────────────────────
