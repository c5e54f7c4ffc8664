use thiserror::Error;

use crate::coords::normalize_degrees;

/// Real-world seconds the open-world wind needs for a full turn (48 min 55 s).
pub const SECONDS_FOR_FULL_CIRCLE: f64 = 2935.0;

/// Wind rotation rate. The direction decreases over time.
pub const DEGREES_PER_SECOND: f64 = 360.0 / SECONDS_FOR_FULL_CIRCLE;

/// The game's 24-point compass, one label per 15°, starting at north.
pub const COMPASS_DIRECTIONS: [&str; 24] = [
    "N", "N⅓NE", "N⅔NE", "NE", "NE⅓E", "NE⅔E", //
    "E", "E⅓SE", "E⅔SE", "SE", "SE⅓S", "SE⅔S", //
    "S", "S⅓SW", "S⅔SW", "SW", "SW⅓W", "SW⅔W", //
    "W", "W⅓NW", "W⅔NW", "NW", "NW⅓N", "NW⅔N",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindError {
    #[error("unknown wind direction: {0}")]
    UnknownDirection(String),
}

/// Wind direction after `minutes` have passed.
pub fn rotate_wind(wind_deg: f64, minutes: f64) -> f64 {
    normalize_degrees(wind_deg - DEGREES_PER_SECOND * 60.0 * minutes)
}

/// Predict the wind `minutes_ahead` from now. Negative values look into the past.
pub fn predict_wind(current_deg: f64, minutes_ahead: f64) -> f64 {
    rotate_wind(current_deg, minutes_ahead)
}

/// Nearest compass label for a direction in degrees.
pub fn degrees_to_compass(deg: f64) -> &'static str {
    let step = 360.0 / COMPASS_DIRECTIONS.len() as f64;
    let index = (normalize_degrees(deg) / step).round() as usize % COMPASS_DIRECTIONS.len();
    COMPASS_DIRECTIONS[index]
}

/// Parse a compass label (case-insensitive) or a plain number of degrees.
pub fn compass_to_degrees(input: &str) -> Result<f64, WindError> {
    let trimmed = input.trim();
    if let Ok(deg) = trimmed.parse::<f64>() {
        if deg.is_finite() {
            return Ok(normalize_degrees(deg));
        }
    }
    let step = 360.0 / COMPASS_DIRECTIONS.len() as f64;
    COMPASS_DIRECTIONS
        .iter()
        .position(|c| c.eq_ignore_ascii_case(trimmed))
        .map(|i| i as f64 * step)
        .ok_or_else(|| WindError::UnknownDirection(input.to_string()))
}
