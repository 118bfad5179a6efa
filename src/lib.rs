//! Symmetric pixel-growth pattern generation driven by a seeded palette
//!
//! A run starts from a few seed pixels and grows outward through a priority
//! frontier. Each newly reached pixel takes an unused palette color close to
//! the mean of its colored neighbors and is mirrored according to the chosen
//! symmetry. Runs are deterministic for a given request and seed.

#![forbid(unsafe_code)]

/// Growth engine, palette, frontier, scheduling and the background worker
pub mod algorithm;
/// Requests, output assembly, configuration, errors and the CLI
pub mod io;
/// Deterministic random stream and color math
pub mod math;
/// Canvas, fill mask, symmetry mapping and seed shapes
pub mod spatial;

pub use algorithm::growth::{GrowthEngine, GrowthMode};
pub use algorithm::scheduler::{Response, generate};
pub use algorithm::worker::{Command, Worker};
pub use io::error::{GenerationError, Result};
pub use io::output::GeneratedImage;
pub use io::request::GenerationRequest;
