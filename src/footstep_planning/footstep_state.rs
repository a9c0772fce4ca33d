//! Footstep state
//!
//! A footstep is the 6-DOF pose of one foot plus the leg it belongs to. For
//! search purposes a state is identified by its leg and by its pose snapped to
//! the planner's `(x, y, yaw)` grid, which keeps the state space finite even
//! though the poses themselves are continuous.

use std::hash::{Hash, Hasher};

use nalgebra::{Isometry3, Point3, Vector3};

use crate::common::{planar_pose, yaw_of, DiscreteKey, Leg, PlannerResult, Resolution};

/// Default foot size: length, width, sole height [m]
pub const DEFAULT_FOOT_DIMENSIONS: [f64; 3] = [0.24, 0.14, 0.01];

/// Pose of one foot on the ground
#[derive(Debug, Clone)]
pub struct FootstepState {
    leg: Leg,
    pose: Isometry3<f64>,
    dimensions: Vector3<f64>,
    resolution: Resolution,
    key: DiscreteKey,
}

impl FootstepState {
    pub fn new(leg: Leg, pose: Isometry3<f64>, resolution: Resolution) -> Self {
        let t = pose.translation.vector;
        let key = resolution.discretize(t.x, t.y, yaw_of(&pose));
        Self {
            leg,
            pose,
            dimensions: Vector3::from(DEFAULT_FOOT_DIMENSIONS),
            resolution,
            key,
        }
    }

    /// Planar footstep at `(x, y)` facing `yaw`
    pub fn from_xy_yaw(leg: Leg, x: f64, y: f64, yaw: f64, resolution: Resolution) -> Self {
        Self::new(leg, planar_pose(x, y, yaw), resolution)
    }

    /// Build from a wire leg identifier (`LEFT = 1`, `RIGHT = 2`)
    pub fn from_raw_leg(
        leg_id: u8,
        pose: Isometry3<f64>,
        resolution: Resolution,
    ) -> PlannerResult<Self> {
        Ok(Self::new(Leg::try_from(leg_id)?, pose, resolution))
    }

    pub fn with_dimensions(mut self, dimensions: Vector3<f64>) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn leg(&self) -> Leg {
        self.leg
    }

    pub fn pose(&self) -> &Isometry3<f64> {
        &self.pose
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::from(self.pose.translation.vector)
    }

    pub fn yaw(&self) -> f64 {
        yaw_of(&self.pose)
    }

    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn key(&self) -> DiscreteKey {
        self.key
    }

    /// Pose of `self` expressed in the frame of `other`
    pub fn relative_to(&self, other: &FootstepState) -> Isometry3<f64> {
        other.pose.inverse() * self.pose
    }

    /// Euclidean distance between the two foot positions
    pub fn distance_to(&self, other: &FootstepState) -> f64 {
        (self.pose.translation.vector - other.pose.translation.vector).norm()
    }

    /// Rotation angle between the two foot orientations, in [0, pi]
    pub fn angle_to(&self, other: &FootstepState) -> f64 {
        self.pose.rotation.angle_to(&other.pose.rotation)
    }

    /// New state for the opposite leg placed at `stance * transform`
    pub(crate) fn successor(&self, transform: &Isometry3<f64>) -> Self {
        Self::new(self.leg.opposite(), self.pose * transform, self.resolution)
            .with_dimensions(self.dimensions)
    }

    /// Four sole corners projected on the ground plane, for plotting
    pub fn footprint(&self) -> [Point3<f64>; 4] {
        let hl = self.dimensions.x / 2.0;
        let hw = self.dimensions.y / 2.0;
        [
            self.pose * Point3::new(hl, hw, 0.0),
            self.pose * Point3::new(-hl, hw, 0.0),
            self.pose * Point3::new(-hl, -hw, 0.0),
            self.pose * Point3::new(hl, -hw, 0.0),
        ]
    }
}

impl PartialEq for FootstepState {
    fn eq(&self, other: &Self) -> bool {
        self.leg == other.leg && self.key == other.key
    }
}

impl Eq for FootstepState {}

impl Hash for FootstepState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.leg.hash(state);
        self.key.hash(state);
    }
}
