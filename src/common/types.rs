//! Common types used throughout footstep_planner

use std::f64::consts::PI;
use std::fmt;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::Deserialize;

use crate::common::error::{PlannerError, PlannerResult};

/// Wire identifier of the left leg
pub const LEFT: u8 = 1;
/// Wire identifier of the right leg
pub const RIGHT: u8 = 2;

/// Which foot a stance belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    Left,
    Right,
}

impl Leg {
    /// The leg that moves next when this one is the stance
    pub fn opposite(self) -> Self {
        match self {
            Leg::Left => Leg::Right,
            Leg::Right => Leg::Left,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Leg::Left => LEFT,
            Leg::Right => RIGHT,
        }
    }
}

impl TryFrom<u8> for Leg {
    type Error = PlannerError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            LEFT => Ok(Leg::Left),
            RIGHT => Ok(Leg::Right),
            other => Err(PlannerError::InvalidLeg(other)),
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Left => write!(f, "LEFT"),
            Leg::Right => write!(f, "RIGHT"),
        }
    }
}

/// Discretization grid for footstep states: x [m], y [m], yaw [rad]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl Resolution {
    /// Create a resolution, rejecting non-positive or non-finite cells
    pub fn new(x: f64, y: f64, yaw: f64) -> PlannerResult<Self> {
        for (name, value) in [("x", x), ("y", y), ("yaw", yaw)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlannerError::InvalidParameter(format!(
                    "resolution.{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(Self { x, y, yaw })
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.yaw)
    }

    /// Number of yaw cells in a full turn
    pub fn yaw_cells(&self) -> i64 {
        ((2.0 * PI / self.yaw).round() as i64).max(1)
    }

    /// Snap a planar pose onto the grid
    ///
    /// Yaw cells wrap around, folded into `(-n/2, n/2]` for `n` cells per turn,
    /// so headings on either side of ±pi share a key.
    pub fn discretize(&self, x: f64, y: f64, yaw: f64) -> DiscreteKey {
        let n = self.yaw_cells();
        let iyaw = ((normalize_angle(yaw) / self.yaw).round() as i64).rem_euclid(n);
        DiscreteKey {
            ix: (x / self.x).round() as i64,
            iy: (y / self.y).round() as i64,
            iyaw: if iyaw > n / 2 { iyaw - n } else { iyaw },
        }
    }
}

impl TryFrom<[f64; 3]> for Resolution {
    type Error = PlannerError;

    fn try_from(v: [f64; 3]) -> Result<Self, Self::Error> {
        Resolution::new(v[0], v[1], v[2])
    }
}

/// Integer cell of a footstep pose on the resolution grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscreteKey {
    pub ix: i64,
    pub iy: i64,
    pub iyaw: i64,
}

/// Normalize an angle to (-pi, pi]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Yaw (rotation about Z) of a pose
pub fn yaw_of(pose: &Isometry3<f64>) -> f64 {
    pose.rotation.euler_angles().2
}

/// Build a planar pose from x, y, yaw
pub fn planar_pose(x: f64, y: f64, yaw: f64) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::new(x, y, 0.0),
        UnitQuaternion::from_euler_angles(0.0, 0.0, yaw),
    )
}
