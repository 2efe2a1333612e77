use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// A position normalized to the native image size, both axes in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Native pixel dimensions of a map image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        ImageSize { width, height }
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        if self.width == 0 || self.height == 0 {
            return Err(GeoError::InvalidConfiguration(format!(
                "image size {}x{} has a zero dimension",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn longest_side(&self) -> f64 {
        self.width.max(self.height) as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapProfile {
    pub id: String,
    pub name: String,
    pub size_in_meters: f64,
    pub image: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl MapProfile {
    pub fn validate(&self) -> Result<(), GeoError> {
        if !self.size_in_meters.is_finite() || self.size_in_meters <= 0.0 {
            return Err(GeoError::InvalidConfiguration(format!(
                "map {} has non-positive size {}",
                self.id, self.size_in_meters
            )));
        }
        Ok(())
    }
}

/// Descent posture chosen by the player before leaving the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallStrategy {
    Dive,
    Neutral,
    Glide,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyParams {
    /// m/s
    pub vertical_speed: f64,
    /// m/s
    pub horizontal_speed: f64,
    /// Furthest horizontal reach in meters.
    pub max_parachute_distance: f64,
}

impl FallStrategy {
    pub const ALL: [FallStrategy; 3] = [FallStrategy::Dive, FallStrategy::Neutral, FallStrategy::Glide];

    pub const fn params(self) -> StrategyParams {
        match self {
            FallStrategy::Dive => StrategyParams {
                vertical_speed: 70.0,
                horizontal_speed: 35.0,
                max_parachute_distance: 600.0,
            },
            FallStrategy::Neutral => StrategyParams {
                vertical_speed: 55.0,
                horizontal_speed: 40.0,
                max_parachute_distance: 800.0,
            },
            FallStrategy::Glide => StrategyParams {
                vertical_speed: 40.0,
                horizontal_speed: 45.0,
                max_parachute_distance: 1000.0,
            },
        }
    }
}

impl std::fmt::Display for FallStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallStrategy::Dive => write!(f, "dive"),
            FallStrategy::Neutral => write!(f, "neutral"),
            FallStrategy::Glide => write!(f, "glide"),
        }
    }
}

/// Directed segment the plane flies along.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightPath {
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployAnnotation {
    Auto,
    Early,
    Late,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeployHeight {
    pub meters: f64,
    pub annotation: DeployAnnotation,
}

impl std::fmt::Display for DeployHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} m", self.meters.round())?;
        match self.annotation {
            DeployAnnotation::Auto => write!(f, " (auto)"),
            DeployAnnotation::Early => write!(f, " (early)"),
            DeployAnnotation::Late => write!(f, " (late)"),
            DeployAnnotation::None => Ok(()),
        }
    }
}

/// Where the exit point ended up relative to the flight path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExitPlacement {
    AtStart,
    AtEnd,
    Along { percent: u32, strategy: FallStrategy },
}

impl std::fmt::Display for ExitPlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitPlacement::AtStart => write!(f, "at start of path"),
            ExitPlacement::AtEnd => write!(f, "at end of path"),
            ExitPlacement::Along { percent, strategy } => {
                write!(f, "{}% along path ({})", percent, strategy)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JumpResult {
    /// Perpendicular distance from the landing point to the flight line, whole meters.
    pub distance_meters: f64,
    pub feasible: bool,
    pub deploy: Option<DeployHeight>,
    pub exit_point: Option<Point>,
    pub exit_fraction: Option<f64>,
    pub exit_placement: Option<ExitPlacement>,
    pub strategy: FallStrategy,
}
