//! Command-line interface for generating a single pattern image

use clap::Parser;
use rand::Rng;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::algorithm::growth::GrowthMode;
use crate::algorithm::palette::{ColorOrdering, ColorProgression, CurveType};
use crate::algorithm::worker::Worker;
use crate::io::configuration::{DEFAULT_OUTPUT, DEFAULT_TIMEOUT_SECS};
use crate::io::error::Result;
use crate::io::image::export_png;
use crate::io::output::{ColorSpace, ResampleFilter};
use crate::io::progress::ProgressReporter;
use crate::io::request::GenerationRequest;
use crate::spatial::{SeedShape, SymmetryMode};

/// Upper bound (exclusive) of seeds drawn when none is given
const RANDOM_SEED_RANGE: i32 = 100_000;

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Parse a lowercase choice the same way request files spell it
fn parse_choice<T: DeserializeOwned>(value: &str) -> std::result::Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_owned()))
        .map_err(|e| format!("unknown value '{value}': {e}"))
}

#[derive(Parser, Debug)]
#[command(name = "pixelbloom")]
#[command(
    author,
    version,
    about = "Grow symmetric pixel-art patterns from a seeded palette"
)]
/// Command-line arguments for the pattern generator
///
/// Flags override values loaded from `--config`; anything left unset keeps
/// its default.
// Mode switches map one to one onto request flags
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// JSON request file to start from
    #[arg(short, long, value_name = "REQUEST")]
    pub config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Give up after this many seconds, 0 waits forever
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Random seed; a random one is chosen when omitted
    #[arg(short, long, allow_negative_numbers = true)]
    pub seed: Option<i32>,

    /// Square canvas edge length, sets width and height
    #[arg(long, conflicts_with_all = ["width", "height"])]
    pub size: Option<u32>,

    /// Canvas width in pixels
    #[arg(short = 'w', long)]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Growth heuristic: crystal, nebula or rings
    #[arg(short = 'g', long, value_parser = parse_choice::<GrowthMode>)]
    pub growth_mode: Option<GrowthMode>,

    /// Initial seed shape: point, circle or line
    #[arg(long, value_parser = parse_choice::<SeedShape>)]
    pub seed_shape: Option<SeedShape>,

    /// Symmetry: none, bilateral, quadrantal or radial
    #[arg(short = 'y', long, value_parser = parse_choice::<SymmetryMode>)]
    pub symmetry: Option<SymmetryMode>,

    /// Palette order: sequential or shuffled
    #[arg(long, value_parser = parse_choice::<ColorProgression>)]
    pub color_progression: Option<ColorProgression>,

    /// Remap the palette through HSV before use
    #[arg(long)]
    pub remap_palette: bool,

    /// HSV axis permutation used by the remap
    #[arg(long, value_parser = parse_choice::<ColorOrdering>)]
    pub color_ordering: Option<ColorOrdering>,

    /// Hue rotation used by the remap: hilbert or morton
    #[arg(long, value_parser = parse_choice::<CurveType>)]
    pub curve_type: Option<CurveType>,

    /// Priority jitter span
    #[arg(short, long)]
    pub randomness: Option<f64>,

    /// Distance-weighted jitter span
    #[arg(long)]
    pub distance_randomness: Option<f64>,

    /// Palette entries sampled per color choice
    #[arg(long)]
    pub color_sample_size: Option<usize>,

    /// Branching factor
    #[arg(long)]
    pub branching_factor: Option<f64>,

    /// Divisor applied to every priority
    #[arg(long)]
    pub growth_rate: Option<f64>,

    /// Palette density driver
    #[arg(short = 'p', long)]
    pub pattern_complexity: Option<u32>,

    /// Process as an export
    #[arg(short, long)]
    pub export: bool,

    /// Tighter caps for very large exports
    #[arg(long)]
    pub large_export: bool,

    /// Leave unfilled pixels transparent
    #[arg(short, long)]
    pub transparent: bool,

    /// Resample the result to a square of this edge length
    #[arg(long)]
    pub exact_output_size: Option<u32>,

    /// Resampling filter: nearest or bilinear
    #[arg(long, value_parser = parse_choice::<ResampleFilter>)]
    pub resample_filter: Option<ResampleFilter>,

    /// Color space tag: "sRGB" or "Display P3"
    #[arg(long, value_parser = parse_choice::<ColorSpace>)]
    pub color_space: Option<ColorSpace>,

    /// DPI hint
    #[arg(long)]
    pub dpi: Option<u32>,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Run-level timeout, `None` when disabled
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }

    /// Build the generation request from the config file and flags
    ///
    /// Without `--seed` the config file's seed is used; without either a
    /// random seed is drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn to_request(&self) -> Result<GenerationRequest> {
        let mut request = match &self.config {
            Some(path) => GenerationRequest::from_json_file(path)?,
            None => GenerationRequest::default(),
        };

        request.seed = match (self.seed, &self.config) {
            (Some(seed), _) => seed,
            (None, Some(_)) => request.seed,
            (None, None) => rand::rng().random_range(0..RANDOM_SEED_RANGE),
        };

        if let Some(size) = self.size {
            request.width = size;
            request.height = size;
        }
        override_with(&mut request.width, self.width);
        override_with(&mut request.height, self.height);

        override_with(&mut request.growth_mode, self.growth_mode);
        override_with(&mut request.seed_shape, self.seed_shape);
        override_with(&mut request.symmetry_mode, self.symmetry);
        override_with(&mut request.color_progression, self.color_progression);
        override_with(&mut request.color_ordering, self.color_ordering);
        override_with(&mut request.curve_type, self.curve_type);
        override_with(&mut request.randomness, self.randomness);
        override_with(&mut request.distance_randomness, self.distance_randomness);
        override_with(&mut request.color_sample_size, self.color_sample_size);
        override_with(&mut request.branching_factor, self.branching_factor);
        override_with(&mut request.growth_rate, self.growth_rate);
        override_with(&mut request.pattern_complexity, self.pattern_complexity);
        override_with(&mut request.resample_filter, self.resample_filter);
        override_with(&mut request.color_space, self.color_space);
        override_with(&mut request.dpi, self.dpi);

        if self.exact_output_size.is_some() {
            request.exact_output_size = self.exact_output_size;
        }
        if self.remap_palette {
            request.remap_palette = true;
        }
        if self.export {
            request.export_mode = true;
            request.preview_mode = false;
        }
        if self.large_export {
            request.optimize_for_large_export = true;
        }
        if self.transparent {
            request.transparent = true;
        }

        Ok(request)
    }
}

/// Drives one run on the background worker and writes the result
pub struct GenerationRunner {
    cli: Cli,
    progress: Option<ProgressReporter>,
}

impl GenerationRunner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress = cli
            .should_show_progress()
            .then(|| ProgressReporter::new("growing"));
        Self { cli, progress }
    }

    /// Generate the image and save it as PNG
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request cannot be built or is rejected
    /// - The run fails or times out
    /// - The PNG cannot be written
    // Allow print for user feedback of the chosen seed and output path
    #[allow(clippy::print_stderr)]
    pub fn run(&mut self) -> Result<()> {
        let started = Instant::now();
        let request = self.cli.to_request()?;
        if !self.cli.quiet {
            eprintln!(
                "Generating {}x{} (seed {})",
                request.width, request.height, request.seed
            );
        }

        let worker = Worker::spawn()?;
        worker.generate(request)?;

        let progress = self.progress.as_ref();
        let result = worker.wait_for_result(self.cli.timeout(), |percent| {
            if let Some(bar) = progress {
                bar.update(percent);
            }
        });
        drop(worker);

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                if let Some(bar) = &self.progress {
                    bar.abandon("failed");
                }
                return Err(e);
            }
        };

        export_png(&image, &self.cli.output)?;
        if let Some(bar) = &self.progress {
            bar.finish("done");
        }
        if !self.cli.quiet {
            eprintln!(
                "Saved {} in {:.1}s",
                self.cli.output.display(),
                started.elapsed().as_secs_f64()
            );
        }
        Ok(())
    }
}
