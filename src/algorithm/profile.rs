//! Effective run parameters derived from a request
//!
//! Exports and large exports trade quality for bounded time and memory.
//! Every such adjustment is computed here once, so the growth loop only
//! reads plain values.

use std::time::Duration;

use crate::algorithm::palette::PaletteBuilder;
use crate::io::configuration::{
    BASE_COMPLEXITY, EXPORT_BATCH_ITERATIONS, EXPORT_COMPLEXITY_REFERENCE_WIDTH,
    EXPORT_DISTANCE_JITTER, EXPORT_EARLY_FINISH_FRACTION, EXPORT_MAX_COLORS,
    EXPORT_PROGRESS_INTERVAL_MS, EXPORT_QUEUE_CAP_DIVISOR, EXPORT_RANDOMNESS_FACTOR,
    EXPORT_SAMPLE_SIZE_CAP, EXPORT_SLICE_MS, EXPORT_WIDTH_THRESHOLD, EXTREME_COMPLEXITY,
    LARGE_EXPORT_MAX_COLORS, LARGE_EXPORT_RANDOMNESS_FACTOR, LARGE_EXPORT_SAMPLE_SIZE_CAP,
    MAX_COLOR_STEPS, MAX_EXPORT_COLOR_STEPS, MAX_PATTERN_SCALE, MIN_COLOR_STEPS,
    PREVIEW_BATCH_ITERATIONS, PREVIEW_MAX_COLORS, PREVIEW_PROGRESS_INTERVAL_MS, PREVIEW_SLICE_MS,
    TIME_CHECK_STRIDE,
};
use crate::io::request::GenerationRequest;
use crate::spatial::SymmetryMode;

/// Slice limits and progress cadence of the batch scheduler
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Maximum cells popped per slice
    pub max_iterations: usize,
    /// Wall-clock budget of one slice
    pub time_limit: Duration,
    /// Minimum interval between progress reports
    pub progress_interval: Duration,
    /// The clock is read once per this many iterations
    pub time_check_stride: usize,
}

impl BatchPolicy {
    /// Limits for interactive previews
    pub const fn preview() -> Self {
        Self {
            max_iterations: PREVIEW_BATCH_ITERATIONS,
            time_limit: Duration::from_millis(PREVIEW_SLICE_MS),
            progress_interval: Duration::from_millis(PREVIEW_PROGRESS_INTERVAL_MS),
            time_check_stride: TIME_CHECK_STRIDE,
        }
    }

    /// Limits for exports
    pub const fn export() -> Self {
        Self {
            max_iterations: EXPORT_BATCH_ITERATIONS,
            time_limit: Duration::from_millis(EXPORT_SLICE_MS),
            progress_interval: Duration::from_millis(EXPORT_PROGRESS_INTERVAL_MS),
            time_check_stride: TIME_CHECK_STRIDE,
        }
    }
}

/// Fully resolved parameters of one run
#[derive(Clone, Debug, PartialEq)]
pub struct RunProfile {
    /// Processed as an export
    pub is_export: bool,
    /// Large-export caps in effect
    pub large_export: bool,
    /// Pattern complexity after export scaling
    pub pattern_complexity: u32,
    /// Values per palette channel
    pub color_steps: usize,
    /// Palette cap
    pub max_colors: usize,
    /// Palette entries sampled per nearest-color search
    pub sample_size: usize,
    /// Span of the priority jitter after damping
    pub randomness: f64,
    /// Fixed distance jitter span replacing the distance-weighted one
    pub fixed_distance_jitter: Option<f64>,
    /// Symmetry actually applied
    pub symmetry: SymmetryMode,
    /// Stop enqueueing neighbors once the frontier exceeds this length
    pub queue_cap: Option<usize>,
    /// Finish once this fraction of pixels is filled
    pub early_finish_fraction: Option<f64>,
    /// Scheduler limits
    pub batch: BatchPolicy,
}

impl RunProfile {
    /// Resolve the effective parameters of a request
    pub fn from_request(request: &GenerationRequest) -> Self {
        let is_export = request.export_mode || request.width > EXPORT_WIDTH_THRESHOLD;
        let large_export = request.optimize_for_large_export;
        let complexity = request.pattern_complexity;
        let extreme = complexity >= EXTREME_COMPLEXITY;

        let pattern_complexity = if is_export && !extreme {
            let export_scale = (EXPORT_COMPLEXITY_REFERENCE_WIDTH / f64::from(request.width)).min(1.0);
            let scaled = (f64::from(complexity) * export_scale).ceil() as u32;
            complexity.min(scaled).max(1)
        } else {
            complexity
        };

        let pattern_scale = if extreme {
            f64::from(complexity) / BASE_COMPLEXITY
        } else {
            (f64::from(pattern_complexity) / BASE_COMPLEXITY).clamp(1.0, MAX_PATTERN_SCALE)
        };

        let steps = if large_export {
            MIN_COLOR_STEPS
        } else {
            ((MIN_COLOR_STEPS as f64 * pattern_scale.sqrt()).floor() as usize)
                .clamp(MIN_COLOR_STEPS, MAX_COLOR_STEPS)
        };
        let color_steps = if is_export {
            steps.min(MAX_EXPORT_COLOR_STEPS)
        } else {
            steps
        };

        let (max_colors, sample_size, randomness) = match (is_export, large_export) {
            (_, true) => (
                LARGE_EXPORT_MAX_COLORS,
                request.color_sample_size.min(LARGE_EXPORT_SAMPLE_SIZE_CAP),
                request.randomness * LARGE_EXPORT_RANDOMNESS_FACTOR,
            ),
            (true, false) => (
                EXPORT_MAX_COLORS,
                request.color_sample_size.min(EXPORT_SAMPLE_SIZE_CAP),
                request.randomness * EXPORT_RANDOMNESS_FACTOR,
            ),
            (false, false) => (
                PREVIEW_MAX_COLORS,
                request.color_sample_size,
                request.randomness,
            ),
        };

        let pixels = request.width as usize * request.height as usize;

        Self {
            is_export,
            large_export,
            pattern_complexity,
            color_steps,
            max_colors,
            sample_size,
            randomness,
            fixed_distance_jitter: is_export.then_some(EXPORT_DISTANCE_JITTER),
            symmetry: if is_export {
                request.symmetry_mode.for_export()
            } else {
                request.symmetry_mode
            },
            queue_cap: is_export.then_some(pixels / EXPORT_QUEUE_CAP_DIVISOR),
            early_finish_fraction: is_export.then_some(EXPORT_EARLY_FINISH_FRACTION),
            batch: if is_export {
                BatchPolicy::export()
            } else {
                BatchPolicy::preview()
            },
        }
    }

    /// Palette builder configured for this profile and request
    pub const fn palette_builder(&self, request: &GenerationRequest) -> PaletteBuilder {
        PaletteBuilder {
            steps: self.color_steps,
            max_colors: self.max_colors,
            progression: request.color_progression,
            remap: request.hsv_remap(),
        }
    }
}
