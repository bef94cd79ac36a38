//! Page renderer: rasterise a bounded, contiguous page range.
//!
//! The loop is deliberately sequential — the backend document is safe for
//! one call at a time — and fail-fast: the first page that the backend
//! refuses to rasterise aborts the whole batch with no partial output.
//! Contrast that with a zero-page document or a start page past the end of
//! the document, both of which are *success with an empty result*.

use crate::error::RasterError;
use crate::output::RasterImage;
use crate::session::DocumentSession;
use tracing::{debug, info};

/// A contiguous 1-indexed page range request.
///
/// The effective end is bounded by the document's true page count, so a
/// range may legally extend past the end of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// First page to render, 1-indexed.
    pub start: usize,
    /// Maximum number of pages to render.
    pub count: usize,
}

impl PageRange {
    pub fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    /// How many pages the range actually covers in a document of
    /// `page_count` pages.
    pub fn effective_len(&self, page_count: usize) -> usize {
        if self.start > page_count {
            return 0;
        }
        self.count.min(page_count - self.start + 1)
    }
}

/// Render every page of `range` that exists in the document, in strictly
/// ascending page order.
///
/// Returns an empty vector (success) when the document has no pages or the
/// range starts past the last page. Any single page failure aborts the
/// batch and propagates [`RasterError::PageRender`] — all-or-nothing.
pub fn render_range(
    session: &DocumentSession<'_>,
    range: PageRange,
    dpi: u32,
) -> Result<Vec<RasterImage>, RasterError> {
    if dpi == 0 {
        return Err(RasterError::InvalidRequest("dpi must be positive".into()));
    }
    if range.start == 0 {
        return Err(RasterError::InvalidRequest(
            "start page must be ≥ 1".into(),
        ));
    }
    if !session.is_open() {
        return Err(RasterError::SessionClosed);
    }

    let page_count = session.page_count();
    if page_count == 0 {
        info!("document has no pages; nothing to render");
        return Ok(Vec::new());
    }

    let mut images = Vec::with_capacity(range.effective_len(page_count));
    let mut page_number = range.start;
    while page_number <= page_count && page_number < range.start.saturating_add(range.count) {
        let image = session.render_page(page_number, dpi)?;
        debug!(
            "page {} rendered → {}x{} px",
            page_number,
            image.width(),
            image.height()
        );
        images.push(RasterImage { page_number, image });
        page_number += 1;
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;

    fn open(backend: &FakeBackend) -> DocumentSession<'_> {
        DocumentSession::open(backend, b"pdf bytes").unwrap()
    }

    #[test]
    fn effective_len_bounds() {
        assert_eq!(PageRange::new(1, 3).effective_len(5), 3);
        assert_eq!(PageRange::new(4, 10).effective_len(5), 2);
        assert_eq!(PageRange::new(6, 1).effective_len(5), 0);
        assert_eq!(PageRange::new(1, 0).effective_len(5), 0);
        assert_eq!(PageRange::new(1, 10).effective_len(0), 0);
    }

    #[test]
    fn zero_page_document_renders_empty() {
        let backend = FakeBackend::with_pages(0);
        let session = open(&backend);
        let images = render_range(&session, PageRange::new(1, 10), 200).unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn start_past_end_is_empty_success() {
        let backend = FakeBackend::with_pages(3);
        let session = open(&backend);
        let images = render_range(&session, PageRange::new(4, 2), 200).unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn range_is_clamped_and_ascending() {
        let backend = FakeBackend::with_pages(5);
        let session = open(&backend);

        let images = render_range(&session, PageRange::new(2, 2), 200).unwrap();
        assert_eq!(
            images.iter().map(|i| i.page_number).collect::<Vec<_>>(),
            vec![2, 3]
        );

        let clamped = render_range(&session, PageRange::new(4, 10), 200).unwrap();
        assert_eq!(
            clamped.iter().map(|i| i.page_number).collect::<Vec<_>>(),
            vec![4, 5]
        );
    }

    #[test]
    fn full_range_length_matches_page_count() {
        let backend = FakeBackend::with_pages(3);
        let session = open(&backend);
        let images = render_range(&session, PageRange::new(1, 3), 200).unwrap();
        assert_eq!(images.len(), 3);
        let pages: Vec<_> = images.iter().map(|i| i.page_number).collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[test]
    fn mid_batch_failure_aborts_without_partials() {
        let backend = FakeBackend {
            pages: 3,
            fail_open: None,
            fail_page: Some(2),
        };
        let session = open(&backend);
        let err = render_range(&session, PageRange::new(1, 3), 200).unwrap_err();
        match err {
            RasterError::PageRender { page, .. } => assert_eq!(page, 2),
            other => panic!("expected PageRender, got {other:?}"),
        }
    }

    #[test]
    fn rendering_twice_yields_identical_dimensions() {
        let backend = FakeBackend::with_pages(2);
        let session = open(&backend);
        let first = render_range(&session, PageRange::new(1, 2), 150).unwrap();
        let second = render_range(&session, PageRange::new(1, 2), 150).unwrap();
        let dims = |images: &[RasterImage]| {
            images
                .iter()
                .map(|i| (i.width(), i.height()))
                .collect::<Vec<_>>()
        };
        assert_eq!(dims(&first), dims(&second));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let backend = FakeBackend::with_pages(2);
        let session = open(&backend);
        assert!(matches!(
            render_range(&session, PageRange::new(1, 1), 0),
            Err(RasterError::InvalidRequest(_))
        ));
        assert!(matches!(
            render_range(&session, PageRange::new(0, 1), 200),
            Err(RasterError::InvalidRequest(_))
        ));
    }

    #[test]
    fn closed_session_is_rejected() {
        let backend = FakeBackend::with_pages(2);
        let mut session = open(&backend);
        session.close();
        assert!(matches!(
            render_range(&session, PageRange::new(1, 1), 200),
            Err(RasterError::SessionClosed)
        ));
    }
}
