//! Successor transform library
//!
//! The planner only ever stores the transforms that place a right foot
//! relative to a left stance. The right-to-left set is derived by mirroring
//! each transform through the sagittal plane of the stance foot.

use itertools::iproduct;
use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion};

use crate::common::{planar_pose, Leg};

/// Ordered set of relative foot placements, for both stance legs
#[derive(Debug, Clone, Default)]
pub struct TransformLibrary {
    left_to_right: Vec<Isometry3<f64>>,
    right_to_left: Vec<Isometry3<f64>>,
}

impl TransformLibrary {
    pub fn new(left_to_right: Vec<Isometry3<f64>>) -> Self {
        let right_to_left = left_to_right.iter().map(mirror).collect();
        Self {
            left_to_right,
            right_to_left,
        }
    }

    /// Library from planar `(x, y, theta)` offsets of the right foot
    pub fn from_xy_theta(offsets: &[(f64, f64, f64)]) -> Self {
        Self::new(
            offsets
                .iter()
                .map(|&(x, y, theta)| planar_pose(x, y, theta))
                .collect(),
        )
    }

    /// Cartesian lattice of offsets, ordered x-major then y then theta
    pub fn grid(xs: &[f64], ys: &[f64], thetas: &[f64]) -> Self {
        let offsets: Vec<(f64, f64, f64)> = iproduct!(xs.iter(), ys.iter(), thetas.iter())
            .map(|(&x, &y, &theta)| (x, y, theta))
            .collect();
        Self::from_xy_theta(&offsets)
    }

    /// Transforms applicable when `stance` is the supporting leg
    pub fn for_stance(&self, stance: Leg) -> &[Isometry3<f64>] {
        match stance {
            Leg::Left => &self.left_to_right,
            Leg::Right => &self.right_to_left,
        }
    }

    pub fn len(&self) -> usize {
        self.left_to_right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left_to_right.is_empty()
    }

    /// Largest translation of any transform in the library
    pub fn max_distance(&self) -> f64 {
        self.left_to_right
            .iter()
            .map(|t| t.translation.vector.norm())
            .fold(0.0, f64::max)
    }

    /// Largest rotation angle of any transform in the library
    pub fn max_rotation(&self) -> f64 {
        self.left_to_right
            .iter()
            .map(|t| t.rotation.angle())
            .fold(0.0, f64::max)
    }

    /// Mean translation per step, `None` for an empty library
    pub fn average_distance(&self) -> Option<f64> {
        self.mean(|t| t.translation.vector.norm())
    }

    /// Mean rotation per step, `None` for an empty library
    pub fn average_rotation(&self) -> Option<f64> {
        self.mean(|t| t.rotation.angle())
    }

    fn mean<F: Fn(&Isometry3<f64>) -> f64>(&self, f: F) -> Option<f64> {
        if self.left_to_right.is_empty() {
            return None;
        }
        let sum: f64 = self.left_to_right.iter().map(f).sum();
        Some(sum / self.left_to_right.len() as f64)
    }
}

/// Mirror a left-to-right transform into its right-to-left counterpart
///
/// Reflects through the x-z plane of the stance foot: the lateral offset,
/// roll and yaw change sign, pitch is kept.
pub fn mirror(transform: &Isometry3<f64>) -> Isometry3<f64> {
    let t = transform.translation.vector;
    let q = transform.rotation;
    Isometry3::from_parts(
        Translation3::new(t.x, -t.y, t.z),
        UnitQuaternion::new_unchecked(Quaternion::new(q.w, -q.i, q.j, -q.k)),
    )
}
