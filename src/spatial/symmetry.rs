//! Symmetric replication of canvas coordinates
//!
//! Every colored cell is replicated to its images under the active symmetry
//! mode. Mirror modes always produce all images; radial images are rotated
//! around the canvas center in 45 degree steps and only those that land on
//! the canvas after rounding are kept.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::spatial::canvas::Coord;

/// Number of rotations used by radial symmetry
pub const RADIAL_FOLD: usize = 8;

/// Geometric replication rule applied to each colored cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymmetryMode {
    /// Single image
    None,
    /// Mirror across the vertical center axis
    Bilateral,
    /// Mirror across both center axes
    #[default]
    Quadrantal,
    /// Eight rotations around the center
    Radial,
}

impl SymmetryMode {
    /// Variant used by exports, where radial replication is too costly
    #[must_use]
    pub const fn for_export(self) -> Self {
        match self {
            Self::Radial => Self::None,
            other => other,
        }
    }
}

/// Images of one coordinate, yielded in a fixed order
#[derive(Clone, Debug)]
pub struct SymmetryImages {
    coords: [Coord; RADIAL_FOLD],
    len: usize,
    next: usize,
}

impl SymmetryImages {
    fn from_slice(images: &[Coord]) -> Self {
        let mut coords = [Coord::new(0, 0); RADIAL_FOLD];
        let len = images.len().min(RADIAL_FOLD);
        for (slot, &image) in coords.iter_mut().zip(images) {
            *slot = image;
        }
        Self {
            coords,
            len,
            next: 0,
        }
    }
}

impl Iterator for SymmetryImages {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.next >= self.len {
            return None;
        }
        let coord = self.coords.get(self.next).copied();
        self.next += 1;
        coord
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SymmetryImages {}

/// Expand an on-canvas coordinate into its symmetric images
///
/// The first image is always `coord` itself for the mirror modes. Radial
/// images may repeat after rounding; callers skip already-filled cells.
pub fn symmetric_images(coord: Coord, width: u32, height: u32, mode: SymmetryMode) -> SymmetryImages {
    let Coord { x, y } = coord;
    let mirrored_x = width.saturating_sub(1).saturating_sub(x);
    let mirrored_y = height.saturating_sub(1).saturating_sub(y);

    match mode {
        SymmetryMode::None => SymmetryImages::from_slice(&[coord]),
        SymmetryMode::Bilateral => {
            SymmetryImages::from_slice(&[coord, Coord::new(mirrored_x, y)])
        }
        SymmetryMode::Quadrantal => SymmetryImages::from_slice(&[
            coord,
            Coord::new(mirrored_x, y),
            Coord::new(x, mirrored_y),
            Coord::new(mirrored_x, mirrored_y),
        ]),
        SymmetryMode::Radial => radial_images(coord, width, height),
    }
}

fn radial_images(coord: Coord, width: u32, height: u32) -> SymmetryImages {
    let cx = f64::from(width / 2);
    let cy = f64::from(height / 2);
    let dx = f64::from(coord.x) - cx;
    let dy = f64::from(coord.y) - cy;
    let radius = dx.hypot(dy);
    let theta = dy.atan2(dx);

    let mut images = [Coord::new(0, 0); RADIAL_FOLD];
    let mut len = 0;
    for step in 0..RADIAL_FOLD {
        let angle = theta + TAU * step as f64 / RADIAL_FOLD as f64;
        // Half-up rounding keeps -0.5 on the canvas edge
        let rx = (radius.mul_add(angle.cos(), cx) + 0.5).floor();
        let ry = (radius.mul_add(angle.sin(), cy) + 0.5).floor();
        if rx >= 0.0 && ry >= 0.0 && rx < f64::from(width) && ry < f64::from(height) {
            if let Some(slot) = images.get_mut(len) {
                *slot = Coord::new(rx as u32, ry as u32);
                len += 1;
            }
        }
    }
    SymmetryImages::from_slice(images.get(..len).unwrap_or(&[]))
}
