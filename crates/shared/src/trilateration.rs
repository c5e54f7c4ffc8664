//! Three-circle trilateration.
//!
//! The reference circles live in the map plane (z = 0) but the solve is done
//! in 3D: the two candidates are mirror images across that plane, and a
//! consistent planar solution shows up as a zero z offset.

use thiserror::Error;

use crate::models::{Circle, Point3D};

/// Discriminant values closer to zero than this are treated as tangent.
pub const TANGENT_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trilateration {
    /// The distances are inconsistent or the references are degenerate.
    NoSolution,
    Single(Point3D),
    Pair(Point3D, Point3D),
}

impl Trilateration {
    /// The single point, or the midpoint of a pair.
    pub fn point(&self) -> Option<Point3D> {
        match self {
            Trilateration::NoSolution => None,
            Trilateration::Single(p) => Some(*p),
            Trilateration::Pair(a, b) => Some(a.midpoint(b)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("distance for reference {index} must be a non-negative number, got {distance}")]
    NegativeDistance { index: usize, distance: f64 },
    #[error("references {first} and {second} are at the same position")]
    CoincidentReferences { first: usize, second: usize },
}

fn validate(circles: &[Circle; 3]) -> Result<(), GeometryError> {
    for (index, c) in circles.iter().enumerate() {
        if !c.r.is_finite() || c.r < 0.0 {
            return Err(GeometryError::NegativeDistance {
                index,
                distance: c.r,
            });
        }
    }
    for (first, second) in [(0, 1), (0, 2), (1, 2)] {
        if circles[first].center == circles[second].center {
            return Err(GeometryError::CoincidentReferences { first, second });
        }
    }
    Ok(())
}

/// Locate the point whose distances to three reference centres are the circle radii.
///
/// With `collapse_to_midpoint` set, two candidates are reduced to their midpoint,
/// which is the base point in the references' plane.
pub fn trilaterate(
    p1: Circle,
    p2: Circle,
    p3: Circle,
    collapse_to_midpoint: bool,
) -> Result<Trilateration, GeometryError> {
    validate(&[p1, p2, p3])?;

    let (c1, c2, c3) = (p1.center, p2.center, p3.center);

    let ex = c2.sub(&c1).unit();
    let i = ex.dot(&c3.sub(&c1));
    let ey = c3.sub(&c1).sub(&ex.scale(i)).unit();
    let ez = ex.cross(&ey);
    let d = c2.sub(&c1).norm();
    let j = ey.dot(&c3.sub(&c1));

    let x = (p1.r * p1.r - p2.r * p2.r + d * d) / (2.0 * d);
    let y = (p1.r * p1.r - p3.r * p3.r + i * i + j * j) / (2.0 * j) - (i / j) * x;

    let mut b = p1.r * p1.r - x * x - y * y;
    if b.abs() < TANGENT_TOLERANCE {
        b = 0.0;
    }
    // NaN for a negative discriminant
    let z = b.sqrt();
    if !z.is_finite() {
        return Ok(Trilateration::NoSolution);
    }

    let a = c1.add(&ex.scale(x)).add(&ey.scale(y));
    if !a.is_finite() {
        return Ok(Trilateration::NoSolution);
    }

    if z == 0.0 || collapse_to_midpoint {
        return Ok(Trilateration::Single(a));
    }

    let p4a = a.add(&ez.scale(z));
    let p4b = a.sub(&ez.scale(z));
    if !p4a.is_finite() || !p4b.is_finite() {
        return Ok(Trilateration::NoSolution);
    }
    Ok(Trilateration::Pair(p4a, p4b))
}
