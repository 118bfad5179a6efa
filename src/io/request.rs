//! Generation request message and validation

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::algorithm::growth::GrowthMode;
use crate::algorithm::palette::{ColorOrdering, ColorProgression, CurveType, HsvRemap};
use crate::io::configuration::{
    DEFAULT_BRANCHING_FACTOR, DEFAULT_COLOR_SAMPLE_SIZE, DEFAULT_DISTANCE_RANDOMNESS, DEFAULT_DPI,
    DEFAULT_GROWTH_RATE, DEFAULT_PATTERN_COMPLEXITY, DEFAULT_RANDOMNESS, DEFAULT_SEED,
    DEFAULT_SIZE,
};
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::io::output::{ColorSpace, ResampleFilter};
use crate::spatial::canvas::checked_cell_count;
use crate::spatial::{SeedShape, SymmetryMode};

/// Immutable parameters of one generation run
///
/// Field names serialize in camelCase to match the request message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
// Mode flags mirror the request message one to one
#[allow(clippy::struct_excessive_bools)]
pub struct GenerationRequest {
    /// Processing canvas width
    pub width: u32,
    /// Processing canvas height
    pub height: u32,
    /// Seed for the palette shuffle and every random draw
    pub seed: i32,
    /// Priority heuristic family
    pub growth_mode: GrowthMode,
    /// Initial frontier topology
    pub seed_shape: SeedShape,
    /// Replication rule for colored cells
    pub symmetry_mode: SymmetryMode,
    /// HSV axis permutation used when `remap_palette` is set
    pub color_ordering: ColorOrdering,
    /// Hue rotation used when `remap_palette` is set
    pub curve_type: CurveType,
    /// Enable the HSV palette remapping hook
    pub remap_palette: bool,
    /// Shuffle the palette or keep cube order
    pub color_progression: ColorProgression,
    /// Span of the distance-weighted priority jitter
    pub distance_randomness: f64,
    /// Span of the priority jitter
    pub randomness: f64,
    /// Palette entries sampled per nearest-color search
    pub color_sample_size: usize,
    /// Accepted for message compatibility; growth does not read it
    pub branching_factor: f64,
    /// Divisor applied to every priority
    pub growth_rate: f64,
    /// Drives palette density
    pub pattern_complexity: u32,
    /// Process as an export
    pub export_mode: bool,
    /// Process as an interactive preview
    pub preview_mode: bool,
    /// Tighter export caps for very large outputs
    pub optimize_for_large_export: bool,
    /// Leave unfilled pixels fully transparent
    pub transparent: bool,
    /// Square output edge length, resampled from the processing canvas
    pub exact_output_size: Option<u32>,
    /// Color space tag attached to the output
    pub color_space: ColorSpace,
    /// DPI hint attached to the output
    pub dpi: u32,
    /// Filter used when the output size differs from the canvas
    pub resample_filter: ResampleFilter,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            seed: DEFAULT_SEED,
            growth_mode: GrowthMode::default(),
            seed_shape: SeedShape::default(),
            symmetry_mode: SymmetryMode::default(),
            color_ordering: ColorOrdering::default(),
            curve_type: CurveType::default(),
            remap_palette: false,
            color_progression: ColorProgression::default(),
            distance_randomness: DEFAULT_DISTANCE_RANDOMNESS,
            randomness: DEFAULT_RANDOMNESS,
            color_sample_size: DEFAULT_COLOR_SAMPLE_SIZE,
            branching_factor: DEFAULT_BRANCHING_FACTOR,
            growth_rate: DEFAULT_GROWTH_RATE,
            pattern_complexity: DEFAULT_PATTERN_COMPLEXITY,
            export_mode: false,
            preview_mode: true,
            optimize_for_large_export: false,
            transparent: false,
            exact_output_size: None,
            color_space: ColorSpace::default(),
            dpi: DEFAULT_DPI,
            resample_filter: ResampleFilter::default(),
        }
    }
}

impl GenerationRequest {
    /// Parse a request from JSON text
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid request
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| GenerationError::RequestParse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Load a request from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid request
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| GenerationError::FileSystem {
            path: path.to_path_buf(),
            operation: "read request",
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| GenerationError::RequestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Output dimensions after any exact-size override
    pub fn output_dimensions(&self) -> (u32, u32) {
        self.exact_output_size
            .map_or((self.width, self.height), |size| (size, size))
    }

    /// HSV remapping hook, present only when enabled
    pub const fn hsv_remap(&self) -> Option<HsvRemap> {
        if self.remap_palette {
            Some(HsvRemap {
                ordering: self.color_ordering,
                curve: self.curve_type,
            })
        } else {
            None
        }
    }

    /// Check every field against its allowed range
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A dimension is zero or the canvas or output exceeds the pixel cap
    /// - A randomness span is negative or not finite
    /// - The sample size, complexity or DPI is zero
    /// - The branching factor or growth rate is not a positive finite number
    pub fn validate(&self) -> Result<()> {
        checked_cell_count(self.width, self.height)?;
        let (output_width, output_height) = self.output_dimensions();
        checked_cell_count(output_width, output_height)?;

        for (parameter, value) in [
            ("randomness", self.randomness),
            ("distanceRandomness", self.distance_randomness),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &"must be a finite number of at least zero",
                ));
            }
        }

        for (parameter, value) in [
            ("branchingFactor", self.branching_factor),
            ("growthRate", self.growth_rate),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &"must be a positive finite number",
                ));
            }
        }

        for (parameter, value) in [
            ("colorSampleSize", self.color_sample_size as u64),
            ("patternComplexity", u64::from(self.pattern_complexity)),
            ("dpi", u64::from(self.dpi)),
        ] {
            if value == 0 {
                return Err(invalid_parameter(parameter, &value, &"must be positive"));
            }
        }

        Ok(())
    }
}
