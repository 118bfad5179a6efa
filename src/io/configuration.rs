//! Generation constants and runtime configuration defaults

// Safety limits checked before any growth work starts
/// Maximum allowed `width * height` of the processing canvas or the output
pub const MAX_PIXELS: u64 = 16_777_216;
/// Size of the throwaway allocation used to probe available memory
pub const MEMORY_PROBE_BYTES: usize = 10 * 1024 * 1024;

// Export detection
/// Widths above this are always processed as exports
pub const EXPORT_WIDTH_THRESHOLD: u32 = 256;
/// Pattern complexity at which no export scaling is applied
pub const EXTREME_COMPLEXITY: u32 = 4096;
/// Reference width for scaling export pattern complexity down
pub const EXPORT_COMPLEXITY_REFERENCE_WIDTH: f64 = 512.0;
/// Complexity corresponding to a pattern scale of 1.0
pub const BASE_COMPLEXITY: f64 = 128.0;
/// Upper bound of the pattern scale below extreme complexity
pub const MAX_PATTERN_SCALE: f64 = 4.0;

// Palette construction
/// Smallest number of values per channel
pub const MIN_COLOR_STEPS: usize = 16;
/// Largest number of values per channel
pub const MAX_COLOR_STEPS: usize = 32;
/// Largest number of values per channel for exports
pub const MAX_EXPORT_COLOR_STEPS: usize = 24;
/// Palette cap for previews
pub const PREVIEW_MAX_COLORS: usize = 100_000;
/// Palette cap for exports
pub const EXPORT_MAX_COLORS: usize = 20_000;
/// Palette cap for large exports
pub const LARGE_EXPORT_MAX_COLORS: usize = 10_000;

// Nearest-color sampling and jitter
/// Default number of palette entries sampled per nearest-color search
pub const DEFAULT_COLOR_SAMPLE_SIZE: usize = 100;
/// Sample size cap for exports
pub const EXPORT_SAMPLE_SIZE_CAP: usize = 50;
/// Sample size cap for large exports
pub const LARGE_EXPORT_SAMPLE_SIZE_CAP: usize = 30;
/// Randomness multiplier for exports
pub const EXPORT_RANDOMNESS_FACTOR: f64 = 0.7;
/// Randomness multiplier for large exports
pub const LARGE_EXPORT_RANDOMNESS_FACTOR: f64 = 0.5;
/// Fixed distance jitter span used by exports
pub const EXPORT_DISTANCE_JITTER: f64 = 5.0;
/// Weight of the center distance in nebula priorities
pub const NEBULA_DISTANCE_WEIGHT: f64 = 0.2;
/// Amplitude of the ring banding term
pub const RING_AMPLITUDE: f64 = 5.0;
/// Canvas width divided by this gives the ring spacing
pub const RING_COUNT: f64 = 10.0;

// Seeding
/// Number of concentric rings seeded by the circle shape
pub const CIRCLE_SEED_RINGS: usize = 10;
/// Minimum number of seeds on each circle ring
pub const MIN_POINTS_PER_RING: usize = 16;
/// Canvas width divided by this gives the line seed stride
pub const LINE_SEED_DIVISOR: u32 = 100;

// Batch scheduling
/// Maximum cells popped per preview slice
pub const PREVIEW_BATCH_ITERATIONS: usize = 10_000;
/// Maximum cells popped per export slice
pub const EXPORT_BATCH_ITERATIONS: usize = 2_000;
/// Time box of a preview slice in milliseconds
pub const PREVIEW_SLICE_MS: u64 = 1_000;
/// Time box of an export slice in milliseconds
pub const EXPORT_SLICE_MS: u64 = 500;
/// Minimum interval between preview progress reports in milliseconds
pub const PREVIEW_PROGRESS_INTERVAL_MS: u64 = 1_000;
/// Minimum interval between export progress reports in milliseconds
pub const EXPORT_PROGRESS_INTERVAL_MS: u64 = 500;
/// The slice clock is read once per this many iterations
pub const TIME_CHECK_STRIDE: usize = 500;
/// Fill fraction at which exports finish early
pub const EXPORT_EARLY_FINISH_FRACTION: f64 = 0.8;
/// Exports stop enqueueing neighbors once the frontier exceeds `pixels / this`
pub const EXPORT_QUEUE_CAP_DIVISOR: usize = 4;

// Default values for configurable parameters
/// Default seed for reproducible generation
pub const DEFAULT_SEED: i32 = 1;
/// Default canvas edge length
pub const DEFAULT_SIZE: u32 = 128;
/// Default pattern complexity
pub const DEFAULT_PATTERN_COMPLEXITY: u32 = 128;
/// Default jitter span of the priority randomness
pub const DEFAULT_RANDOMNESS: f64 = 10.0;
/// Default jitter span of the distance-weighted randomness
pub const DEFAULT_DISTANCE_RANDOMNESS: f64 = 10.0;
/// Default branching factor
pub const DEFAULT_BRANCHING_FACTOR: f64 = 0.5;
/// Default growth rate
pub const DEFAULT_GROWTH_RATE: f64 = 1.0;
/// Default DPI hint attached to output metadata
pub const DEFAULT_DPI: u32 = 300;

// Command-line caller
/// Run-level timeout applied by the CLI
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;
/// Width of the progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
/// Default output file name
pub const DEFAULT_OUTPUT: &str = "pixelbloom.png";
