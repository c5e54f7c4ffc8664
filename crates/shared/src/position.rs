use serde::{Deserialize, Serialize};

use crate::coords::k_to_pixels;
use crate::models::{Circle, Point3D, Position};
use crate::trilateration::{trilaterate, GeometryError, Trilateration};

/// A known map position and the measured distance from it in k.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub position: Position,
    pub distance_k: f64,
}

impl Fix {
    fn circle(&self) -> Circle {
        Circle::new(Point3D::from(self.position), k_to_pixels(self.distance_k))
    }
}

/// Locate the ship from three fixes.
///
/// Returns `Ok(None)` when the distances do not intersect.
pub fn find_position(fixes: &[Fix; 3]) -> Result<Option<Position>, GeometryError> {
    let [a, b, c] = fixes;
    match trilaterate(a.circle(), b.circle(), c.circle(), true)? {
        Trilateration::NoSolution => Ok(None),
        other => Ok(other.point().map(Position::from)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::distance_k;

    fn fix_to(position: Position, target: Position) -> Fix {
        Fix {
            position,
            distance_k: distance_k(position, target),
        }
    }

    #[test]
    fn test_finds_ship_between_ports() {
        let ports = [
            Position { x: 20.0, y: 30.0 },
            Position { x: 75.0, y: 25.0 },
            Position { x: 50.0, y: 90.0 },
        ];
        let ship = Position { x: 48.0, y: 51.0 };
        let fixes = ports.map(|p| fix_to(p, ship));
        let found = find_position(&fixes).unwrap().unwrap();
        assert!((found.x - ship.x).abs() < 1e-6);
        assert!((found.y - ship.y).abs() < 1e-6);
    }

    #[test]
    fn test_overestimated_distances_collapse_to_midpoint() {
        let ports = [
            Position { x: 20.0, y: 30.0 },
            Position { x: 75.0, y: 25.0 },
            Position { x: 50.0, y: 90.0 },
        ];
        let ship = Position { x: 48.0, y: 51.0 };
        // Every distance a little long: the spheres meet above and below the map plane
        let fixes = ports.map(|p| Fix {
            position: p,
            distance_k: (distance_k(p, ship).powi(2) + 10.0_f64.powi(2)).sqrt(),
        });
        let found = find_position(&fixes).unwrap().unwrap();
        assert!((found.x - ship.x).abs() < 1e-6);
        assert!((found.y - ship.y).abs() < 1e-6);
    }

    #[test]
    fn test_inconsistent_distances_are_not_found() {
        let fixes = [
            Fix { position: Position { x: 0.0, y: 0.0 }, distance_k: 1.0 },
            Fix { position: Position { x: 100.0, y: 0.0 }, distance_k: 1.0 },
            Fix { position: Position { x: 0.0, y: 100.0 }, distance_k: 1.0 },
        ];
        assert_eq!(find_position(&fixes).unwrap(), None);
    }

    #[test]
    fn test_same_port_twice_is_an_error() {
        let p = Position { x: 10.0, y: 10.0 };
        let fixes = [
            Fix { position: p, distance_k: 20.0 },
            Fix { position: p, distance_k: 20.0 },
            Fix { position: Position { x: 0.0, y: 50.0 }, distance_k: 20.0 },
        ];
        assert!(matches!(
            find_position(&fixes),
            Err(GeometryError::CoincidentReferences { .. })
        ));
    }
}
