use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::{bearing, distance_k, normalize_degrees, MAP_SIZE_PX};
use crate::models::{PolarSpeedCurve, Position};
use crate::wind::{degrees_to_compass, rotate_wind};

/// Ships never sail slower than this in the open world (knots).
pub const MIN_OPEN_WORLD_SPEED: f64 = 2.0;

/// Polar chart knots to open-world speed.
pub const OPEN_WORLD_SPEED_FACTOR: f64 = 2.0;

/// Open-world speed to distance covered per minute.
pub const SPEED_FACTOR: f64 = 390.0;

/// Simulator distance units per k.
pub const UNITS_PER_K: f64 = 1000.0;

/// Flat curve speed used when no ship is selected (knots).
pub const DEFAULT_SHIP_SPEED: f64 = 9.5;

/// Minutes simulated one by one. Crossing the whole map diagonal at the floor
/// speed takes under 20 000; anything left after this is finished at the
/// current speed in one step.
pub const MAX_SIMULATED_MINUTES: u32 = 100_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JourneyError {
    #[error("waypoint {index} ({x}, {y}) is outside the map")]
    WaypointOffMap { index: usize, x: f64, y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentTime {
    pub minutes: f64,
    pub ending_wind_degrees: f64,
}

/// Distance a ship covers in one minute on `course_deg` with the wind from `wind_deg`.
pub fn distance_per_minute(curve: &PolarSpeedCurve, course_deg: f64, wind_deg: f64) -> f64 {
    let angle = normalize_degrees(360.0 - course_deg + wind_deg);
    let section_speed = curve.speed_at(angle).max(MIN_OPEN_WORLD_SPEED) * OPEN_WORLD_SPEED_FACTOR;
    section_speed * SPEED_FACTOR
}

/// Minutes needed to sail a straight segment while the wind keeps turning.
///
/// Speed is re-evaluated once per minute from the current wind. The final
/// minute is usually partial and only counts the fraction actually needed.
pub fn segment_minutes(
    curve: &PolarSpeedCurve,
    course_deg: f64,
    start_wind_deg: f64,
    segment_distance: f64,
) -> SegmentTime {
    let mut wind = normalize_degrees(start_wind_deg);
    let mut minutes = 0.0;

    if !segment_distance.is_finite() || segment_distance <= 0.0 {
        return SegmentTime {
            minutes,
            ending_wind_degrees: wind,
        };
    }

    let mut remaining = segment_distance;
    let mut simulated = 0;
    while remaining > 0.0 {
        let section_distance = distance_per_minute(curve, course_deg, wind);
        let step = if simulated >= MAX_SIMULATED_MINUTES {
            let rest = remaining / section_distance;
            remaining = 0.0;
            rest
        } else if remaining > section_distance {
            remaining -= section_distance;
            1.0
        } else {
            let fraction = remaining / section_distance;
            remaining = 0.0;
            fraction
        };
        minutes += step;
        simulated += 1;
        wind = rotate_wind(wind, step);
    }

    SegmentTime {
        minutes,
        ending_wind_degrees: wind,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub from: Position,
    pub to: Position,
    pub course: f64,
    pub course_compass: String,
    pub distance_k: f64,
    pub minutes: f64,
    pub start_wind: f64,
    pub end_wind: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub legs: Vec<Leg>,
    pub total_minutes: f64,
    pub total_distance_k: f64,
    pub ending_wind: f64,
}

fn on_map(p: &Position) -> bool {
    (0.0..=MAP_SIZE_PX).contains(&p.x) && (0.0..=MAP_SIZE_PX).contains(&p.y)
}

/// Sail through `waypoints` in order, carrying the wind from one leg into the next.
pub fn plan_journey(
    curve: &PolarSpeedCurve,
    waypoints: &[Position],
    start_wind_deg: f64,
) -> Result<Journey, JourneyError> {
    if let Some((index, p)) = waypoints.iter().enumerate().find(|(_, p)| !on_map(p)) {
        return Err(JourneyError::WaypointOffMap {
            index,
            x: p.x,
            y: p.y,
        });
    }

    let mut journey = Journey {
        ending_wind: normalize_degrees(start_wind_deg),
        ..Journey::default()
    };

    for pair in waypoints.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let course = bearing(from, to);
        let dist_k = distance_k(from, to);
        let start_wind = journey.ending_wind;
        let segment = segment_minutes(curve, course, start_wind, dist_k * UNITS_PER_K);

        journey.total_minutes += segment.minutes;
        journey.total_distance_k += dist_k;
        journey.ending_wind = segment.ending_wind_degrees;
        journey.legs.push(Leg {
            from,
            to,
            course,
            course_compass: degrees_to_compass(course).to_string(),
            distance_k: dist_k,
            minutes: segment.minutes,
            start_wind,
            end_wind: segment.ending_wind_degrees,
        });
    }

    Ok(journey)
}

/// Human-readable sailing time, e.g. "1 h 05 min".
pub fn format_duration(minutes: f64) -> String {
    if !(minutes >= 1.0) {
        return "< 1 min".to_string();
    }
    let total = minutes.round() as u64;
    let (h, m) = (total / 60, total % 60);
    if h > 0 {
        format!("{} h {:02} min", h, m)
    } else {
        format!("{} min", m)
    }
}
