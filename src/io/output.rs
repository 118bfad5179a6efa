//! Final buffer assembly, resampling and metadata

use image::RgbaImage;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::io::error::{GenerationError, Result};
use crate::io::request::GenerationRequest;
use crate::spatial::Canvas;

const CHANNELS: usize = 4;

/// Color space tag carried in output metadata
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Standard RGB
    #[default]
    #[serde(rename = "sRGB")]
    Srgb,
    /// Wide gamut Display P3
    #[serde(rename = "Display P3")]
    DisplayP3,
}

/// Resampling filter used when the output size differs from the canvas
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    /// Nearest neighbor, keeps hard pixel edges
    #[default]
    Nearest,
    /// Bilinear interpolation
    Bilinear,
}

impl ResampleFilter {
    const fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
        }
    }
}

/// Metadata delivered with the final buffer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMetadata {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Color space tag
    pub color_space: ColorSpace,
    /// Effective pattern complexity used by the run
    pub pattern_complexity: u32,
    /// Whether unfilled pixels are transparent
    pub transparent: bool,
    /// DPI hint
    pub dpi: u32,
}

/// RGBA8 row-major buffer plus metadata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    /// RGBA8 bytes, row-major, `width * height * 4` long
    pub buffer: Vec<u8>,
    /// Dimensions and tags of the buffer
    pub metadata: OutputMetadata,
}

impl GeneratedImage {
    /// Number of pixels in the buffer
    pub fn pixel_count(&self) -> usize {
        self.buffer.len() / CHANNELS
    }

    /// RGBA value at a pixel, `None` when out of range
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.metadata.width || y >= self.metadata.height {
            return None;
        }
        let start = (y as usize * self.metadata.width as usize + x as usize) * CHANNELS;
        let bytes = self.buffer.get(start..start + CHANNELS)?;
        let mut rgba = [0; CHANNELS];
        rgba.copy_from_slice(bytes);
        Some(rgba)
    }
}

/// Wrap a finished canvas for delivery
///
/// When the requested output size differs from the canvas the buffer is
/// resampled with the request's filter before delivery.
///
/// # Errors
///
/// Returns an error if:
/// - The canvas buffer does not match its dimensions
/// - The resampled buffer cannot be allocated
pub fn assemble(
    canvas: Canvas,
    request: &GenerationRequest,
    pattern_complexity: u32,
) -> Result<GeneratedImage> {
    let (canvas_width, canvas_height) = (canvas.width(), canvas.height());
    let (width, height) = request.output_dimensions();
    let raw = canvas.into_rgba();

    let buffer = if (width, height) == (canvas_width, canvas_height) {
        raw
    } else {
        log::info!(
            "resampling output from {canvas_width}x{canvas_height} to {width}x{height} ({:?})",
            request.resample_filter
        );
        resample(raw, (canvas_width, canvas_height), (width, height), request.resample_filter)?
    };

    Ok(GeneratedImage {
        buffer,
        metadata: OutputMetadata {
            width,
            height,
            color_space: request.color_space,
            pattern_complexity,
            transparent: request.transparent,
            dpi: request.dpi,
        },
    })
}

/// Resample an RGBA8 buffer to new dimensions
///
/// # Errors
///
/// Returns an error if:
/// - `raw` does not hold `source.0 * source.1` pixels
/// - The target buffer cannot be allocated
pub fn resample(
    raw: Vec<u8>,
    source: (u32, u32),
    target: (u32, u32),
    filter: ResampleFilter,
) -> Result<Vec<u8>> {
    let expected = source.0 as usize * source.1 as usize * CHANNELS;
    let actual = raw.len();
    let image = RgbaImage::from_raw(source.0, source.1, raw).ok_or_else(|| {
        GenerationError::Computation {
            operation: "resample",
            reason: format!("buffer holds {actual} bytes, expected {expected}"),
        }
    })?;

    let mut probe: Vec<u8> = Vec::new();
    probe.try_reserve_exact(target.0 as usize * target.1 as usize * CHANNELS)?;
    drop(probe);

    let resized = imageops::resize(&image, target.0, target.1, filter.filter_type());
    Ok(resized.into_raw())
}
