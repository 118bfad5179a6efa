//! Priority-driven flood fill that grows and colors the pattern
//!
//! Each step pops the lowest-priority frontier cell and colors every
//! unfilled symmetric image of it. A cell with colored four-connected
//! neighbors takes the sampled palette color nearest to their mean; an
//! isolated cell takes the last palette color. Newly discovered neighbors
//! are queued with a priority from the active growth mode.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::algorithm::frontier::Frontier;
use crate::algorithm::palette::Palette;
use crate::algorithm::profile::RunProfile;
use crate::io::configuration::{
    MEMORY_PROBE_BYTES, NEBULA_DISTANCE_WEIGHT, RING_AMPLITUDE, RING_COUNT,
};
use crate::io::error::{GenerationError, Result};
use crate::io::request::GenerationRequest;
use crate::math::Mulberry32;
use crate::math::Rgb;
use crate::math::color::ColorAccumulator;
use crate::spatial::seeding::seed_points;
use crate::spatial::symmetry::symmetric_images;
use crate::spatial::{Canvas, Coord};

/// Heuristic family used to prioritise frontier cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthMode {
    /// Distance from center dominates, giving compact faceted growth
    #[default]
    Crystal,
    /// Jitter dominates with a weak distance pull
    Nebula,
    /// Concentric banding from a sine of the distance
    Rings,
}

/// Result of a single growth step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A frontier cell was popped; `filled` pixels were newly colored
    Progressed {
        /// Pixels colored by this step
        filled: usize,
    },
    /// No frontier cells remain
    FrontierExhausted,
    /// Every palette color has been used
    PaletteExhausted,
    /// The export fill threshold was reached
    EarlyFinish,
}

impl StepOutcome {
    /// Whether growth has stopped for good
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Progressed { .. })
    }
}

/// Attempt a throwaway allocation before committing to a run
///
/// # Errors
///
/// Returns an error if `bytes` cannot be allocated
pub fn probe_memory(bytes: usize) -> Result<()> {
    let mut probe: Vec<u8> = Vec::new();
    probe
        .try_reserve_exact(bytes)
        .map_err(|e| GenerationError::ResourceExhausted {
            resource: "memory probe",
            reason: e.to_string(),
        })?;
    probe.resize(bytes, 1);
    Ok(())
}

/// Complete state of one growth run
#[derive(Clone, Debug)]
pub struct GrowthEngine {
    request: GenerationRequest,
    profile: RunProfile,
    canvas: Canvas,
    palette: Palette,
    frontier: Frontier,
    rng: Mulberry32,
    half_width: f64,
    half_height: f64,
    ring_spacing: f64,
}

impl GrowthEngine {
    /// Validate a request, allocate the run state and seed the frontier
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request fails validation or exceeds the pixel cap
    /// - The memory probe or canvas allocation fails
    /// - The palette cannot be built
    pub fn new(request: &GenerationRequest) -> Result<Self> {
        request.validate()?;
        probe_memory(MEMORY_PROBE_BYTES)?;

        let profile = RunProfile::from_request(request);
        let estimated_bytes = u64::from(request.width) * u64::from(request.height) * 8;
        log::info!(
            "starting run: {}x{} seed={} mode={:?} shape={:?} symmetry={:?} export={} (~{} MiB)",
            request.width,
            request.height,
            request.seed,
            request.growth_mode,
            request.seed_shape,
            profile.symmetry,
            profile.is_export,
            estimated_bytes / (1024 * 1024)
        );
        if profile.pattern_complexity != request.pattern_complexity {
            log::info!(
                "export pattern complexity adjusted from {} to {}",
                request.pattern_complexity,
                profile.pattern_complexity
            );
        }

        let canvas = Canvas::new(request.width, request.height, request.transparent)?;

        let mut rng = Mulberry32::new(request.seed);
        let palette = profile.palette_builder(request).build(&mut rng)?;
        log::debug!(
            "palette ready: {} colors, {} steps, sample size {}",
            palette.len(),
            profile.color_steps,
            profile.sample_size
        );

        let seeds = seed_points(request.seed_shape, request.width, request.height);
        let mut frontier = Frontier::with_capacity(seeds.len());
        for seed in seeds {
            frontier.push(seed, 0.0)?;
        }

        Ok(Self {
            request: request.clone(),
            profile,
            canvas,
            palette,
            frontier,
            rng,
            half_width: f64::from(request.width) / 2.0,
            half_height: f64::from(request.height) / 2.0,
            ring_spacing: f64::from(request.width) / RING_COUNT,
        })
    }

    /// Request the run was started with
    pub const fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// Effective parameters of the run
    pub const fn profile(&self) -> &RunProfile {
        &self.profile
    }

    /// Canvas in its current state
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Unused palette colors
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Pending frontier cells
    pub const fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Consume the engine, keeping only the canvas
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    /// Pop one frontier cell and color its symmetric images
    ///
    /// # Errors
    ///
    /// Returns an error if a computed priority is NaN
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.palette.is_empty() {
            return Ok(StepOutcome::PaletteExhausted);
        }
        if self.reached_early_finish() {
            return Ok(StepOutcome::EarlyFinish);
        }
        let Some(coord) = self.frontier.pop() else {
            return Ok(StepOutcome::FrontierExhausted);
        };

        let (width, height) = (self.canvas.width(), self.canvas.height());
        let mut filled = 0;
        for target in symmetric_images(coord, width, height, self.profile.symmetry) {
            if self.palette.is_empty() {
                break;
            }
            if !self.canvas.contains(target) || self.canvas.is_filled(target) {
                continue;
            }
            let Some(color) = self.choose_color(target) else {
                break;
            };
            if !self.canvas.commit(target, color) {
                continue;
            }
            filled += 1;

            if self
                .profile
                .queue_cap
                .is_some_and(|cap| self.frontier.len() > cap)
            {
                continue;
            }
            self.enqueue_neighbors(target)?;
        }

        Ok(StepOutcome::Progressed { filled })
    }

    /// Step until a terminal outcome is reached
    ///
    /// # Errors
    ///
    /// Propagates any step error
    pub fn run_to_end(&mut self) -> Result<StepOutcome> {
        loop {
            let outcome = self.step()?;
            if outcome.is_terminal() {
                return Ok(outcome);
            }
        }
    }

    fn reached_early_finish(&self) -> bool {
        self.profile.early_finish_fraction.is_some_and(|fraction| {
            let total = self.canvas.pixel_count();
            total > 0 && self.canvas.filled_count() as f64 / total as f64 >= fraction
        })
    }

    fn choose_color(&mut self, target: Coord) -> Option<Rgb> {
        let mut neighbors = ColorAccumulator::default();
        for neighbor in self.canvas.neighbors(target) {
            if let Some(color) = self.canvas.color_at(neighbor) {
                neighbors.add(color);
            }
        }

        match neighbors.mean() {
            None => self.palette.pop(),
            Some(mean) => {
                let index =
                    self.palette
                        .nearest_sampled(mean, self.profile.sample_size, &mut self.rng)?;
                self.palette.take(index)
            }
        }
    }

    fn enqueue_neighbors(&mut self, target: Coord) -> Result<()> {
        for neighbor in self.canvas.neighbors(target) {
            if self.canvas.is_filled(neighbor) {
                continue;
            }
            let priority = self.priority(neighbor);
            self.frontier.push(neighbor, priority)?;
        }
        Ok(())
    }

    /// Priority of a newly discovered cell; lower pops sooner
    fn priority(&mut self, coord: Coord) -> f64 {
        let dx = f64::from(coord.x) - self.half_width;
        let dy = f64::from(coord.y) - self.half_height;
        let distance = dx.hypot(dy);

        let distance_jitter = match self.profile.fixed_distance_jitter {
            Some(span) => self.rng.jitter(span),
            None => {
                self.rng.jitter(self.request.distance_randomness) * (distance / self.half_width)
            }
        };
        let jitter = self.rng.jitter(self.profile.randomness);

        let base = match self.request.growth_mode {
            GrowthMode::Crystal => distance + jitter + distance_jitter,
            GrowthMode::Nebula => distance.mul_add(NEBULA_DISTANCE_WEIGHT, jitter) + distance_jitter,
            GrowthMode::Rings => {
                (distance / self.ring_spacing * PI).sin().abs() * RING_AMPLITUDE
                    + jitter
                    + distance_jitter
            }
        };

        base / self.request.growth_rate
    }
}
