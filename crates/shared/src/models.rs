use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of samples in a polar speed curve, one per 15° of wind angle.
pub const SPEED_SAMPLES: usize = 24;

/// Degrees covered by one polar curve sample.
pub const DEGREES_PER_SAMPLE: f64 = 360.0 / SPEED_SAMPLES as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nation {
    #[serde(rename = "NT")]
    Neutral,
    #[serde(rename = "PR")]
    Pirates,
    #[serde(rename = "ES")]
    Spain,
    #[serde(rename = "FR")]
    France,
    #[serde(rename = "GB")]
    GreatBritain,
    #[serde(rename = "VP")]
    VerenigdeProvincien,
    #[serde(rename = "DE")]
    Denmark,
    #[serde(rename = "SE")]
    Sweden,
    #[serde(rename = "US")]
    UnitedStates,
    #[serde(rename = "FT")]
    FreeTown,
    #[serde(rename = "RU")]
    Russia,
    #[serde(rename = "PL")]
    Prussia,
}

impl Nation {
    pub fn short_name(&self) -> &'static str {
        match self {
            Nation::Neutral => "NT",
            Nation::Pirates => "PR",
            Nation::Spain => "ES",
            Nation::France => "FR",
            Nation::GreatBritain => "GB",
            Nation::VerenigdeProvincien => "VP",
            Nation::Denmark => "DE",
            Nation::Sweden => "SE",
            Nation::UnitedStates => "US",
            Nation::FreeTown => "FT",
            Nation::Russia => "RU",
            Nation::Prussia => "PL",
        }
    }
}

impl std::fmt::Display for Nation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Nation::Neutral => write!(f, "Neutral"),
            Nation::Pirates => write!(f, "Pirates"),
            Nation::Spain => write!(f, "España"),
            Nation::France => write!(f, "France"),
            Nation::GreatBritain => write!(f, "Great Britain"),
            Nation::VerenigdeProvincien => write!(f, "Verenigde Provinciën"),
            Nation::Denmark => write!(f, "Danmark-Norge"),
            Nation::Sweden => write!(f, "Sverige"),
            Nation::UnitedStates => write!(f, "United States"),
            Nation::FreeTown => write!(f, "Free Town"),
            Nation::Russia => write!(f, "Russian Empire"),
            Nation::Prussia => write!(f, "Kingdom of Prussia"),
        }
    }
}

/// A point on the screen-pixel map plane. X = east, Y = south.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A point in 3D space. Map points live at z = 0, solver math is 3D.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn add(&self, other: &Point3D) -> Point3D {
        Point3D::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(&self, other: &Point3D) -> Point3D {
        Point3D::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(&self, s: f64) -> Point3D {
        Point3D::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn dot(&self, other: &Point3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Point3D) -> Point3D {
        Point3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction. A zero vector yields non-finite components.
    pub fn unit(&self) -> Point3D {
        self.scale(1.0 / self.norm())
    }

    pub fn distance(&self, other: &Point3D) -> f64 {
        self.sub(other).norm()
    }

    pub fn midpoint(&self, other: &Point3D) -> Point3D {
        self.add(other).scale(0.5)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<Position> for Point3D {
    fn from(p: Position) -> Self {
        Point3D::new(p.x, p.y, 0.0)
    }
}

impl From<Point3D> for Position {
    fn from(p: Point3D) -> Self {
        Position { x: p.x, y: p.y }
    }
}

/// A reference point and its measured distance to the unknown point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point3D,
    pub r: f64,
}

impl Circle {
    pub fn new(center: Point3D, r: f64) -> Self {
        Self { center, r }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("speed curve needs {SPEED_SAMPLES} samples, got {0}")]
    WrongLength(usize),
    #[error("speed sample {index} is invalid: {value}")]
    InvalidSample { index: usize, value: f64 },
}

/// Ship speed in knots by relative wind angle, sample `i` covering `i * 15°`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PolarSpeedCurve([f64; SPEED_SAMPLES]);

impl PolarSpeedCurve {
    pub fn new(samples: &[f64]) -> Result<Self, CurveError> {
        let samples: [f64; SPEED_SAMPLES] = samples
            .try_into()
            .map_err(|_| CurveError::WrongLength(samples.len()))?;
        if let Some((index, &value)) = samples
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(CurveError::InvalidSample { index, value });
        }
        Ok(Self(samples))
    }

    /// Constant speed at every angle.
    pub fn flat(speed: f64) -> Self {
        Self([speed.max(0.0); SPEED_SAMPLES])
    }

    pub fn samples(&self) -> &[f64; SPEED_SAMPLES] {
        &self.0
    }

    /// Speed for a relative wind angle, using the 15° bucket the angle falls into.
    pub fn speed_at(&self, angle_deg: f64) -> f64 {
        let angle = crate::coords::normalize_degrees(angle_deg);
        let index = ((angle / DEGREES_PER_SAMPLE).floor() as usize).min(SPEED_SAMPLES - 1);
        self.0[index]
    }

    pub fn max_speed(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }
}

impl TryFrom<Vec<f64>> for PolarSpeedCurve {
    type Error = CurveError;

    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        PolarSpeedCurve::new(&v)
    }
}

impl From<PolarSpeedCurve> for Vec<f64> {
    fn from(c: PolarSpeedCurve) -> Self {
        c.0.to_vec()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: u32,
    pub name: String,
    pub nation: Nation,
    pub x: f64,
    pub y: f64,
}

impl Port {
    pub fn position(&self) -> Position {
        Position { x: self.x, y: self.y }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    pub id: u32,
    pub name: String,
    pub class: u8,
    pub speed_degrees: PolarSpeedCurve,
}

/// Lowercase, with every run of non-alphanumerics collapsed to one `-`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

impl Ship {
    pub fn speed_curve(&self) -> &PolarSpeedCurve {
        &self.speed_degrees
    }

    /// Generate a URL-safe slug from the ship name.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}
