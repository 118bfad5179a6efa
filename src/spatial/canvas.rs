//! Pixel canvas with a parallel fill mask
//!
//! The canvas owns an RGBA8 raster stored as an `(height, width, 4)` array
//! in standard layout, so its raw data is already the row-major buffer
//! delivered to callers. A pixel carries a committed color exactly when its
//! mask bit is set.

use ndarray::{Array3, ArrayView3};
use std::array;
use std::iter::Flatten;

use crate::io::configuration::MAX_PIXELS;
use crate::io::error::{GenerationError, Result};
use crate::math::Rgb;
use crate::spatial::mask::FilledMask;

const CHANNELS: usize = 4;
const OPAQUE: u8 = 255;

/// Pixel coordinate on the canvas
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

impl Coord {
    /// Create a coordinate
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Four-connected neighbor offsets in visiting order
pub const NEIGHBOR_OFFSETS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// RGBA raster plus fill mask owned by a single run
#[derive(Clone, Debug)]
pub struct Canvas {
    pixels: Array3<u8>,
    mask: FilledMask,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Allocate a canvas with every pixel unfilled
    ///
    /// Unfilled pixels are black, opaque unless `transparent` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either dimension is zero
    /// - `width * height` exceeds [`MAX_PIXELS`]
    /// - The pixel buffer cannot be allocated
    pub fn new(width: u32, height: u32, transparent: bool) -> Result<Self> {
        let cells = checked_cell_count(width, height)?;
        let byte_len = cells * CHANNELS;

        let mut raw = Vec::new();
        raw.try_reserve_exact(byte_len)
            .map_err(|e| GenerationError::ResourceExhausted {
                resource: "canvas",
                reason: e.to_string(),
            })?;
        let background = if transparent { 0 } else { OPAQUE };
        for _ in 0..cells {
            raw.extend_from_slice(&[0, 0, 0, background]);
        }

        let pixels = Array3::from_shape_vec((height as usize, width as usize, CHANNELS), raw)
            .map_err(|e| GenerationError::Computation {
                operation: "canvas allocation",
                reason: e.to_string(),
            })?;

        Ok(Self {
            pixels,
            mask: FilledMask::new(cells),
            width,
            height,
        })
    }

    /// Canvas width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.mask.len()
    }

    /// Number of filled pixels
    pub const fn filled_count(&self) -> usize {
        self.mask.filled()
    }

    /// Read-only view of the fill mask
    pub const fn mask(&self) -> &FilledMask {
        &self.mask
    }

    /// Read-only view of the raster as `(height, width, 4)`
    pub fn pixels(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    /// Test whether a coordinate lies on the canvas
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Row-major cell index of an on-canvas coordinate
    pub const fn index_of(&self, coord: Coord) -> usize {
        coord.y as usize * self.width as usize + coord.x as usize
    }

    /// Test whether a coordinate holds a committed color
    pub fn is_filled(&self, coord: Coord) -> bool {
        self.contains(coord) && self.mask.is_filled(self.index_of(coord))
    }

    /// Committed color at a coordinate, `None` when unfilled
    pub fn color_at(&self, coord: Coord) -> Option<Rgb> {
        if !self.is_filled(coord) {
            return None;
        }
        let (row, col) = (coord.y as usize, coord.x as usize);
        let channel = |c: usize| self.pixels.get([row, col, c]).copied().unwrap_or(0);
        Some([channel(0), channel(1), channel(2)])
    }

    /// Commit a color to an unfilled pixel
    ///
    /// Returns `false` without touching the raster when the pixel is off the
    /// canvas or already filled.
    pub fn commit(&mut self, coord: Coord, color: Rgb) -> bool {
        if !self.contains(coord) || !self.mask.fill(self.index_of(coord)) {
            return false;
        }
        let (row, col) = (coord.y as usize, coord.x as usize);
        for (channel, value) in [color[0], color[1], color[2], OPAQUE].into_iter().enumerate() {
            if let Some(slot) = self.pixels.get_mut([row, col, channel]) {
                *slot = value;
            }
        }
        true
    }

    /// On-canvas four-connected neighbors of a coordinate
    ///
    /// The iterator does not borrow the canvas.
    pub fn neighbors(&self, coord: Coord) -> Flatten<array::IntoIter<Option<Coord>, 4>> {
        NEIGHBOR_OFFSETS
            .map(|(dx, dy)| {
                let x = i64::from(coord.x) + dx;
                let y = i64::from(coord.y) + dy;
                let inside =
                    x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height);
                inside.then_some(Coord::new(x as u32, y as u32))
            })
            .into_iter()
            .flatten()
    }

    /// Consume the canvas, returning the row-major RGBA8 bytes
    pub fn into_rgba(self) -> Vec<u8> {
        if self.pixels.is_standard_layout() {
            let (raw, _offset) = self.pixels.into_raw_vec_and_offset();
            raw
        } else {
            self.pixels.iter().copied().collect()
        }
    }
}

/// Validate canvas dimensions and return the pixel count
///
/// # Errors
///
/// Returns an error if a dimension is zero or the product exceeds [`MAX_PIXELS`]
pub fn checked_cell_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(crate::io::error::invalid_parameter(
            "dimensions",
            &format!("{width}x{height}"),
            &"width and height must be positive",
        ));
    }
    let cells = u64::from(width) * u64::from(height);
    if cells > MAX_PIXELS {
        return Err(GenerationError::DimensionsTooLarge {
            width,
            height,
            limit: MAX_PIXELS,
        });
    }
    usize::try_from(cells).map_err(|e| GenerationError::ResourceExhausted {
        resource: "canvas",
        reason: e.to_string(),
    })
}
