//! Seeded color palette construction and consumption
//!
//! The palette is the Cartesian product of evenly spaced channel values,
//! built in nested R, G, B order and truncated at a cap, then shuffled by a
//! stream seeded with the run seed. Colors are removed as they are used, so
//! no color is assigned twice within a run.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::io::error::{Result, invalid_parameter};
use crate::math::color::{distance_sq, hsv_to_rgb, rgb_to_hsv};
use crate::math::{Mulberry32, Rgb};

/// Order in which palette colors are offered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorProgression {
    /// Cube order, no shuffle
    Sequential,
    /// Seeded Fisher-Yates shuffle
    #[default]
    Shuffled,
}

/// Permutation of the hue, saturation and value axes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorOrdering {
    /// Identity
    #[default]
    Hsv,
    /// Swap saturation and value
    Hvs,
    /// Swap hue and saturation
    Shv,
    /// Rotate left
    Svh,
    /// Rotate right
    Vhs,
    /// Swap hue and value
    Vsh,
}

impl ColorOrdering {
    /// Source axis for each output axis
    pub const fn axes(self) -> [usize; 3] {
        match self {
            Self::Hsv => [0, 1, 2],
            Self::Hvs => [0, 2, 1],
            Self::Shv => [1, 0, 2],
            Self::Svh => [1, 2, 0],
            Self::Vhs => [2, 0, 1],
            Self::Vsh => [2, 1, 0],
        }
    }
}

/// Hue rotation family applied before the axis permutation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// Rotate hue by 240 degrees
    #[default]
    Hilbert,
    /// Rotate hue by 120 degrees
    Morton,
}

impl CurveType {
    /// Hue rotation as a fraction of a full turn
    pub const fn hue_shift(self) -> f64 {
        match self {
            Self::Hilbert => 240.0 / 360.0,
            Self::Morton => 120.0 / 360.0,
        }
    }
}

/// Optional HSV remapping of palette colors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HsvRemap {
    /// Axis permutation
    pub ordering: ColorOrdering,
    /// Hue rotation
    pub curve: CurveType,
}

impl HsvRemap {
    /// Remap one color
    pub fn apply(&self, color: Rgb) -> Rgb {
        let mut hsv = rgb_to_hsv(color);
        hsv[0] = (hsv[0] + self.curve.hue_shift()).rem_euclid(1.0);
        let axes = self.ordering.axes();
        hsv_to_rgb(axes.map(|axis| hsv.get(axis).copied().unwrap_or(0.0)))
    }
}

/// Palette construction parameters
#[derive(Clone, Copy, Debug)]
pub struct PaletteBuilder {
    /// Evenly spaced values per channel
    pub steps: usize,
    /// Maximum number of colors generated
    pub max_colors: usize,
    /// Shuffle or keep cube order
    pub progression: ColorProgression,
    /// Optional HSV remapping hook
    pub remap: Option<HsvRemap>,
}

impl PaletteBuilder {
    /// Builder with shuffled progression and no remapping
    pub const fn new(steps: usize, max_colors: usize) -> Self {
        Self {
            steps,
            max_colors,
            progression: ColorProgression::Shuffled,
            remap: None,
        }
    }

    /// Build the palette, shuffling with `rng`
    ///
    /// The stream should be freshly seeded with the run seed; the growth
    /// engine keeps drawing from it afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two steps are requested or the cap is zero
    pub fn build(&self, rng: &mut Mulberry32) -> Result<Palette> {
        if self.steps < 2 {
            return Err(invalid_parameter(
                "steps",
                &self.steps,
                &"at least two values per channel are required",
            ));
        }
        if self.max_colors == 0 {
            return Err(invalid_parameter(
                "max_colors",
                &self.max_colors,
                &"palette cap must be positive",
            ));
        }

        let levels: Vec<u8> = (0..self.steps)
            .map(|i| (i as f64 / (self.steps - 1) as f64 * 255.0).round() as u8)
            .collect();

        let capacity = self.max_colors.min(self.steps.pow(3));
        let mut colors = Vec::with_capacity(capacity);
        'cube: for &r in &levels {
            for &g in &levels {
                for &b in &levels {
                    if colors.len() >= self.max_colors {
                        break 'cube;
                    }
                    colors.push([r, g, b]);
                }
            }
        }

        if let Some(remap) = self.remap {
            let mut seen = HashSet::with_capacity(colors.len());
            colors = colors
                .into_iter()
                .map(|color| remap.apply(color))
                .filter(|color| seen.insert(*color))
                .collect();
        }

        if self.progression == ColorProgression::Shuffled {
            rng.shuffle(&mut colors);
        }

        log::debug!(
            "palette built: {} colors from {} steps per channel",
            colors.len(),
            self.steps
        );
        Ok(Palette { colors })
    }
}

/// Remaining unused colors of a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Wrap an explicit color list
    pub const fn from_colors(colors: Vec<Rgb>) -> Self {
        Self { colors }
    }

    /// Number of unused colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Test if every color has been used
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Unused colors in current order
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Take the last color
    pub fn pop(&mut self) -> Option<Rgb> {
        self.colors.pop()
    }

    /// Take the color at `index`; the last color moves into its slot
    pub fn take(&mut self, index: usize) -> Option<Rgb> {
        (index < self.colors.len()).then(|| self.colors.swap_remove(index))
    }

    /// Index of the color closest to `target` among a random sample
    ///
    /// Draws `min(sample_size, len)` indices with replacement and keeps the
    /// first one at minimum squared distance. This is an approximate search:
    /// larger samples trade speed for closer matches.
    pub fn nearest_sampled(
        &self,
        target: [f64; 3],
        sample_size: usize,
        rng: &mut Mulberry32,
    ) -> Option<usize> {
        if self.colors.is_empty() {
            return None;
        }
        let draws = sample_size.min(self.colors.len()).max(1);
        let mut best_index = 0;
        let mut best_distance = f64::INFINITY;
        for _ in 0..draws {
            let index = rng.next_index(self.colors.len());
            let Some(&color) = self.colors.get(index) else {
                continue;
            };
            let distance = distance_sq(color, target);
            if distance < best_distance {
                best_distance = distance;
                best_index = index;
            }
        }
        Some(best_index)
    }
}
