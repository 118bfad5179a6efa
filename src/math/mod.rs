//! Mathematical utilities for the growth engine

/// RGB distance, averaging and HSV conversion
pub mod color;
/// Seeded deterministic random stream
pub mod random;

pub use color::Rgb;
pub use random::Mulberry32;
