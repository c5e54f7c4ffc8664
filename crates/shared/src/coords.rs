/// Naval Action map coordinate systems.
///
/// The map is drawn on an 8192x8192 pixel plane (X = east, Y = south).
/// The game's own "F11" coordinates are related to it by a fixed affine
/// transform whose linear part is `[[A, B], [B, -A]]`.
use serde::{Deserialize, Serialize};

use crate::models::Position;

// F11 -> pixel plane
const TRANSFORM_A: f64 = -0.004_998_66;
const TRANSFORM_B: f64 = 0.000_000_06;
const TRANSFORM_C: f64 = 4096.88;
const TRANSFORM_D: f64 = 4096.19;

/// Map image size in pixels.
pub const MAP_SIZE_PX: f64 = 8192.0;

/// Pixel distance to "k" distance. Reverse-engineered game calibration value.
pub const DISTANCE_FACTOR: f64 = 2.63;

/// A position in the game's native F11 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct F11Coord {
    pub x: f64,
    pub z: f64,
}

/// Wrap an angle into [0, 360).
pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if d >= 360.0 { 0.0 } else { d }
}

/// Convert F11 coordinates to a map pixel position.
pub fn from_f11(coord: F11Coord) -> Position {
    Position {
        x: TRANSFORM_A * coord.x + TRANSFORM_B * coord.z + TRANSFORM_C,
        y: TRANSFORM_B * coord.x - TRANSFORM_A * coord.z + TRANSFORM_D,
    }
}

/// Convert a map pixel position to F11 coordinates.
pub fn to_f11(pos: Position) -> F11Coord {
    // The linear part squares to (A² + B²)·I, so its inverse is itself scaled.
    let det = TRANSFORM_A * TRANSFORM_A + TRANSFORM_B * TRANSFORM_B;
    let dx = pos.x - TRANSFORM_C;
    let dy = pos.y - TRANSFORM_D;
    F11Coord {
        x: (TRANSFORM_A * dx + TRANSFORM_B * dy) / det,
        z: (TRANSFORM_B * dx - TRANSFORM_A * dy) / det,
    }
}

/// Format an F11 coordinate value the way the in-game F11 panel shows it.
pub fn format_f11(value: f64) -> String {
    format!("{:.0}", value)
}

/// Euclidean distance between two positions.
pub fn distance(a: Position, b: Position) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Compass course from `from` to `to` in degrees [0, 360).
/// Clockwise from north, screen Y pointing south.
pub fn bearing(from: Position, to: Position) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    normalize_degrees(dx.atan2(-dy).to_degrees())
}

/// Distance between two map positions in k.
pub fn distance_k(a: Position, b: Position) -> f64 {
    distance(a, b) * DISTANCE_FACTOR
}

/// Convert a distance in k to map pixels.
pub fn k_to_pixels(k: f64) -> f64 {
    k / DISTANCE_FACTOR
}
