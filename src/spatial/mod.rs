//! Spatial data structures and coordinate mapping
//!
//! This module contains spatial-related functionality including:
//! - The RGBA canvas and its monotonic fill mask
//! - Symmetric replication of coordinates
//! - Initial seed topologies

/// Pixel canvas and coordinates
pub mod canvas;
/// Monotonic fill mask backed by a bit vector
pub mod mask;
/// Initial seed point generation
pub mod seeding;
/// Symmetry mapping of coordinates
pub mod symmetry;

pub use canvas::{Canvas, Coord};
pub use seeding::SeedShape;
pub use symmetry::SymmetryMode;
