//! Conversion entry point: uploaded bytes in, rendered pages plus a
//! diagnostic trail out.
//!
//! ## Why spawn_blocking?
//!
//! pdfium work is CPU-bound native code and its documents are not `Send`,
//! so the whole bind → open → render → close sequence runs on one blocking
//! thread; only the finished [`ConversionResult`] crosses back into async
//! land. Requests stay independent — the only shared state is the
//! read-only [`BackendHandle`].

use crate::backend::{BackendHandle, RenderBackend};
use crate::error::RasterError;
use crate::output::ConversionResult;
use crate::render::{render_range, PageRange};
use crate::session::DocumentSession;
use std::time::Instant;
use tracing::info;

/// Parameters for one conversion.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// First page to render, 1-indexed.
    pub start_page: usize,
    /// How many pages to render; `None` renders through the last page.
    pub pages_to_take: Option<usize>,
    /// Rasterisation resolution.
    pub dpi: u32,
}

impl RenderRequest {
    /// Render every page of the document at `dpi`.
    pub fn full_document(dpi: u32) -> Self {
        Self {
            start_page: 1,
            pages_to_take: None,
            dpi,
        }
    }
}

/// Convert an uploaded document using the process-wide backend handle.
///
/// Binds the backend on a blocking thread, runs the pipeline there, and
/// releases the document session on every exit path.
pub async fn convert_bytes(
    handle: BackendHandle,
    bytes: Vec<u8>,
    file_name: String,
    request: RenderRequest,
) -> Result<ConversionResult, RasterError> {
    tokio::task::spawn_blocking(move || {
        let descriptor = handle.descriptor();
        let diagnostics = vec![
            format!("install root: {}", descriptor.install_root.display()),
            format!("backend library: {}", descriptor.library_path.display()),
            "rendering backend ready".to_string(),
        ];
        let backend = handle.bind()?;
        convert_with_backend(&backend, &bytes, &file_name, &request, diagnostics)
    })
    .await
    .map_err(|e| RasterError::Internal(format!("conversion task failed: {e}")))?
}

/// The synchronous pipeline core, generic over the backend seam.
///
/// `diagnostics` arrives pre-seeded with the backend provenance lines and
/// grows into the ordered trail returned to the caller.
pub fn convert_with_backend(
    backend: &dyn RenderBackend,
    bytes: &[u8],
    file_name: &str,
    request: &RenderRequest,
    mut diagnostics: Vec<String>,
) -> Result<ConversionResult, RasterError> {
    let started = Instant::now();
    diagnostics.push(format!("file: {} ({} bytes)", file_name, bytes.len()));

    let mut session = DocumentSession::open(backend, bytes)?;
    let page_count = session.page_count();
    diagnostics.push(format!("page count: {}", page_count));

    let range = PageRange::new(
        request.start_page,
        request.pages_to_take.unwrap_or(page_count),
    );
    let images = render_range(&session, range, request.dpi)?;
    session.close();

    for image in &images {
        diagnostics.push(format!(
            "page {}: {}x{} px",
            image.page_number,
            image.width(),
            image.height()
        ));
    }

    info!(
        "converted '{}': {}/{} pages at {} dpi in {}ms",
        file_name,
        images.len(),
        page_count,
        request.dpi,
        started.elapsed().as_millis()
    );

    Ok(ConversionResult {
        page_count,
        images,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;

    #[test]
    fn diagnostics_trail_is_ordered() {
        let backend = FakeBackend::with_pages(2);
        let result = convert_with_backend(
            &backend,
            b"pdf bytes",
            "report.pdf",
            &RenderRequest::full_document(200),
            vec!["rendering backend ready".into()],
        )
        .unwrap();

        assert_eq!(result.page_count, 2);
        assert_eq!(result.images.len(), 2);

        let trail = &result.diagnostics;
        assert_eq!(trail[0], "rendering backend ready");
        assert!(trail[1].contains("report.pdf"));
        assert!(trail[1].contains("9 bytes"));
        assert_eq!(trail[2], "page count: 2");
        assert!(trail[3].starts_with("page 1:"));
        assert!(trail[4].starts_with("page 2:"));
    }

    #[test]
    fn zero_page_document_succeeds_with_no_images() {
        let backend = FakeBackend::with_pages(0);
        let result = convert_with_backend(
            &backend,
            b"pdf bytes",
            "empty.pdf",
            &RenderRequest::full_document(200),
            Vec::new(),
        )
        .unwrap();

        assert_eq!(result.page_count, 0);
        assert!(result.images.is_empty());
        assert!(result.diagnostics.contains(&"page count: 0".to_string()));
    }

    #[test]
    fn open_failure_propagates() {
        let backend = FakeBackend {
            pages: 0,
            fail_open: Some("bad xref table".into()),
            fail_page: None,
        };
        let err = convert_with_backend(
            &backend,
            b"junk",
            "junk.bin",
            &RenderRequest::full_document(200),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RasterError::DocumentOpen { .. }));
    }

    #[test]
    fn page_failure_aborts_the_request() {
        let backend = FakeBackend {
            pages: 3,
            fail_open: None,
            fail_page: Some(2),
        };
        let err = convert_with_backend(
            &backend,
            b"pdf bytes",
            "doc.pdf",
            &RenderRequest::full_document(200),
            Vec::new(),
        )
        .unwrap_err();
        match err {
            RasterError::PageRender { page, .. } => assert_eq!(page, 2),
            other => panic!("expected PageRender, got {other:?}"),
        }
    }

    #[test]
    fn partial_range_is_honoured() {
        let backend = FakeBackend::with_pages(5);
        let request = RenderRequest {
            start_page: 2,
            pages_to_take: Some(2),
            dpi: 150,
        };
        let result =
            convert_with_backend(&backend, b"pdf bytes", "doc.pdf", &request, Vec::new()).unwrap();
        assert_eq!(
            result.images.iter().map(|i| i.page_number).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }
}
