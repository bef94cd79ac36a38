//! Scoped document session over an opened backend document.
//!
//! A session owns the native document handle for exactly one conversion.
//! The page count is captured at open and never renegotiated. `close()`
//! releases the native resources; `Drop` backstops release on early-return
//! and error paths, so the native handle cannot leak even when a render
//! fails mid-batch.

use crate::backend::{BackendDocument, RenderBackend};
use crate::error::RasterError;
use image::DynamicImage;
use tracing::debug;

/// A live document opened against a rendering backend.
///
/// Not thread-safe: one session belongs to one blocking thread, and pages
/// must be rendered sequentially through it.
pub struct DocumentSession<'a> {
    document: Option<Box<dyn BackendDocument + 'a>>,
    page_count: usize,
}

impl<'a> DocumentSession<'a> {
    /// Open `bytes` against `backend`.
    ///
    /// The buffer must be fully in memory; the backend re-reads document
    /// structure on every render. A document with zero extractable pages is
    /// a valid session, not an error.
    pub fn open(
        backend: &'a dyn RenderBackend,
        bytes: &'a [u8],
    ) -> Result<DocumentSession<'a>, RasterError> {
        let document = backend.open(bytes)?;
        let page_count = document.page_count();
        debug!("document opened: {} pages", page_count);
        Ok(Self {
            document: Some(document),
            page_count,
        })
    }

    /// Page count captured when the document was opened.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Whether the session still holds its native document.
    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    /// Rasterise one page (1-indexed) at `dpi`.
    ///
    /// Fails with [`RasterError::SessionClosed`] once the session has been
    /// closed.
    pub fn render_page(&self, page_number: usize, dpi: u32) -> Result<DynamicImage, RasterError> {
        let document = self.document.as_ref().ok_or(RasterError::SessionClosed)?;
        document.render(page_number, dpi)
    }

    /// Release the native document.
    ///
    /// Safe to call on every exit path; after the first call any further
    /// render is rejected.
    pub fn close(&mut self) {
        if self.document.take().is_some() {
            debug!("document session closed");
        }
    }
}

impl std::fmt::Debug for DocumentSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSession")
            .field("page_count", &self.page_count)
            .field("is_open", &self.is_open())
            .finish()
    }
}

impl Drop for DocumentSession<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
