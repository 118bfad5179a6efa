//! Initial frontier topologies

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::io::configuration::{CIRCLE_SEED_RINGS, LINE_SEED_DIVISOR, MIN_POINTS_PER_RING};
use crate::spatial::canvas::Coord;

/// Shape of the initial seed points
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedShape {
    /// Canvas center only
    #[default]
    Point,
    /// Center plus concentric rings inside a quarter of the shorter edge
    Circle,
    /// Points along the horizontal center line
    Line,
}

/// Seed coordinates for a canvas, in push order
///
/// All seeds enter the frontier at priority 0. Duplicate coordinates are
/// possible for small circles and are harmless.
pub fn seed_points(shape: SeedShape, width: u32, height: u32) -> Vec<Coord> {
    let center = Coord::new(width / 2, height / 2);
    match shape {
        SeedShape::Point => vec![center],
        SeedShape::Circle => circle_seeds(center, width, height),
        SeedShape::Line => line_seeds(center.y, width),
    }
}

fn circle_seeds(center: Coord, width: u32, height: u32) -> Vec<Coord> {
    let radius = f64::from(width.min(height)) / 4.0;
    let cx = f64::from(center.x);
    let cy = f64::from(center.y);

    let mut seeds = vec![center];
    for ring in 1..=CIRCLE_SEED_RINGS {
        let ring_radius = radius * ring as f64 / CIRCLE_SEED_RINGS as f64;
        let circumference = TAU * ring_radius;
        let points = MIN_POINTS_PER_RING.max((circumference / 2.0).floor() as usize);

        for i in 0..points {
            let angle = TAU * i as f64 / points as f64;
            let x = (ring_radius.mul_add(angle.cos(), cx) + 0.5).floor();
            let y = (ring_radius.mul_add(angle.sin(), cy) + 0.5).floor();
            if x >= 0.0 && y >= 0.0 && x < f64::from(width) && y < f64::from(height) {
                seeds.push(Coord::new(x as u32, y as u32));
            }
        }
    }
    seeds
}

fn line_seeds(row: u32, width: u32) -> Vec<Coord> {
    let stride = (width / LINE_SEED_DIVISOR).max(1);
    (0..width)
        .step_by(stride as usize)
        .map(|x| Coord::new(x, row))
        .collect()
}
