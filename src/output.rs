//! Result types produced by the conversion pipeline.
//!
//! [`ConversionResult`] carries the full raster buffers and lives only for
//! the duration of one request; [`ConversionSummary`] is the serialisable
//! projection (per-page dimensions plus the diagnostic trail) that actually
//! goes back to the caller. The service never persists either.

use image::DynamicImage;
use serde::Serialize;

/// One successfully rendered page.
///
/// Owns its pixel buffer; two images never share backing storage.
#[derive(Debug)]
pub struct RasterImage {
    /// 1-indexed page number this image was rendered from.
    pub page_number: usize,
    /// Decoded bitmap with its true post-scaling dimensions.
    pub image: DynamicImage,
}

impl RasterImage {
    /// Rendered width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Rendered height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Dimension record for the response payload.
    pub fn dimensions(&self) -> PageDimensions {
        PageDimensions {
            page: self.page_number,
            width: self.width(),
            height: self.height(),
        }
    }
}

/// Width and height of one rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDimensions {
    pub page: usize,
    pub width: u32,
    pub height: u32,
}

/// Everything one conversion produced, buffers included.
#[derive(Debug)]
pub struct ConversionResult {
    /// Total pages in the document (not the number rendered).
    pub page_count: usize,
    /// Rendered pages in ascending page-number order.
    pub images: Vec<RasterImage>,
    /// Ordered diagnostic trail for the response body.
    pub diagnostics: Vec<String>,
}

impl ConversionResult {
    /// Project the result down to what the HTTP layer returns.
    pub fn summary(&self) -> ConversionSummary {
        ConversionSummary {
            page_count: self.page_count,
            pages: self.images.iter().map(RasterImage::dimensions).collect(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// Serialisable success payload: page count, per-page dimensions,
/// diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSummary {
    pub page_count: usize,
    pub pages: Vec<PageDimensions>,
    pub diagnostics: Vec<String>,
}
