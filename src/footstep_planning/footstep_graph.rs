//! Footstep graph
//!
//! Successor generation alternates legs: a left stance proposes right-foot
//! placements from the left-to-right library and vice versa. Candidates are
//! pruned by the kinematic limits and by an optional external feasibility
//! oracle (terrain support, collision) before they reach the solver.

use std::fmt;

use log::trace;

use crate::common::{FootstepFeasibility, Graph, Leg, PlannerError, PlannerResult, Resolution};
use crate::footstep_planning::footstep_state::FootstepState;
use crate::footstep_planning::transform_library::TransformLibrary;

/// Default goal position tolerance [m]
pub const DEFAULT_POS_GOAL_THR: f64 = 0.1;
/// Default goal rotation tolerance [rad]
pub const DEFAULT_ROT_GOAL_THR: f64 = 0.17;

/// Target stance for each leg
#[derive(Debug, Clone)]
pub struct GoalStances {
    pub left: FootstepState,
    pub right: FootstepState,
}

impl GoalStances {
    pub fn for_leg(&self, leg: Leg) -> &FootstepState {
        match leg {
            Leg::Left => &self.left,
            Leg::Right => &self.right,
        }
    }
}

/// Bounds on the displacement between a stance and its successor
///
/// `None` means unlimited. `Some(0.0)` is a real bound that only admits
/// zero displacement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KinematicLimits {
    /// Maximum translation [m]
    pub max_distance: Option<f64>,
    /// Maximum rotation [rad]
    pub max_rotation: Option<f64>,
}

impl KinematicLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> PlannerResult<()> {
        check_optional_bound("max_successor_distance", self.max_distance)?;
        check_optional_bound("max_successor_rotation", self.max_rotation)
    }

    /// Whether a step of `distance` [m] and `rotation` [rad] is reachable
    pub fn admits(&self, distance: f64, rotation: f64) -> bool {
        self.max_distance.map_or(true, |max| distance <= max)
            && self.max_rotation.map_or(true, |max| rotation <= max)
    }
}

/// Weights of the per-step cost
///
/// `cost = translation * |dp| + rotation * |dtheta| + step`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepCostWeights {
    pub translation: f64,
    pub rotation: f64,
    pub step: f64,
}

impl Default for StepCostWeights {
    fn default() -> Self {
        Self {
            translation: 1.0,
            rotation: 0.1,
            step: 0.0,
        }
    }
}

impl StepCostWeights {
    pub fn validate(&self) -> PlannerResult<()> {
        check_non_negative("cost.translation_weight", self.translation)?;
        check_non_negative("cost.rotation_weight", self.rotation)?;
        check_non_negative("cost.step_weight", self.step)
    }

    pub fn cost(&self, distance: f64, rotation: f64) -> f64 {
        self.translation * distance + self.rotation * rotation + self.step
    }
}

/// Search graph over footstep placements
pub struct FootstepGraph {
    resolution: Resolution,
    library: TransformLibrary,
    goals: Option<GoalStances>,
    pos_goal_thr: f64,
    rot_goal_thr: f64,
    limits: KinematicLimits,
    step_cost: StepCostWeights,
    feasibility: Option<Box<dyn FootstepFeasibility>>,
}

impl FootstepGraph {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            library: TransformLibrary::default(),
            goals: None,
            pos_goal_thr: DEFAULT_POS_GOAL_THR,
            rot_goal_thr: DEFAULT_ROT_GOAL_THR,
            limits: KinematicLimits::unlimited(),
            step_cost: StepCostWeights::default(),
            feasibility: None,
        }
    }

    /// Install the left-to-right successor library; the mirror set is derived
    pub fn set_basic_successors(&mut self, library: TransformLibrary) {
        self.library = library;
    }

    pub fn set_goal_state(&mut self, left: FootstepState, right: FootstepState) -> PlannerResult<()> {
        if left.leg() != Leg::Left || right.leg() != Leg::Right {
            return Err(PlannerError::InvalidParameter(format!(
                "goal stances must be (LEFT, RIGHT), got ({}, {})",
                left.leg(),
                right.leg()
            )));
        }
        self.goals = Some(GoalStances { left, right });
        Ok(())
    }

    pub fn set_goal_thresholds(&mut self, pos_goal_thr: f64, rot_goal_thr: f64) -> PlannerResult<()> {
        check_non_negative("pos_goal_thr", pos_goal_thr)?;
        check_non_negative("rot_goal_thr", rot_goal_thr)?;
        self.pos_goal_thr = pos_goal_thr;
        self.rot_goal_thr = rot_goal_thr;
        Ok(())
    }

    pub fn set_kinematic_limits(&mut self, limits: KinematicLimits) -> PlannerResult<()> {
        limits.validate()?;
        self.limits = limits;
        Ok(())
    }

    pub fn set_step_cost(&mut self, weights: StepCostWeights) -> PlannerResult<()> {
        weights.validate()?;
        self.step_cost = weights;
        Ok(())
    }

    /// Install the external veto applied to every candidate footstep
    pub fn set_feasibility<F: FootstepFeasibility + 'static>(&mut self, oracle: F) {
        self.feasibility = Some(Box::new(oracle));
    }

    pub fn clear_feasibility(&mut self) {
        self.feasibility = None;
    }

    /// Goal stance matching `leg`
    pub fn goal(&self, leg: Leg) -> PlannerResult<&FootstepState> {
        self.goals
            .as_ref()
            .map(|g| g.for_leg(leg))
            .ok_or(PlannerError::GoalNotSet)
    }

    pub fn goals(&self) -> Option<&GoalStances> {
        self.goals.as_ref()
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn library(&self) -> &TransformLibrary {
        &self.library
    }

    pub fn limits(&self) -> &KinematicLimits {
        &self.limits
    }

    pub fn step_cost(&self) -> &StepCostWeights {
        &self.step_cost
    }

    pub fn pos_goal_thr(&self) -> f64 {
        self.pos_goal_thr
    }

    pub fn rot_goal_thr(&self) -> f64 {
        self.rot_goal_thr
    }

    /// Longest step in the installed library [m]
    pub fn max_successor_distance(&self) -> f64 {
        self.library.max_distance()
    }

    /// Largest turn in the installed library [rad]
    pub fn max_successor_rotation(&self) -> f64 {
        self.library.max_rotation()
    }

    fn is_feasible(&self, stance: &FootstepState, candidate: &FootstepState) -> bool {
        self.feasibility
            .as_ref()
            .map_or(true, |oracle| oracle.is_feasible(stance, candidate))
    }
}

impl Graph for FootstepGraph {
    type State = FootstepState;

    fn successors(&self, stance: &FootstepState) -> Vec<FootstepState> {
        let candidates: Vec<FootstepState> = self
            .library
            .for_stance(stance.leg())
            .iter()
            .filter(|t| self.limits.admits(t.translation.vector.norm(), t.rotation.angle()))
            .map(|t| stance.successor(t))
            .filter(|candidate| self.is_feasible(stance, candidate))
            .collect();
        trace!(
            "[FootstepGraph] {} stance at {:?}: {} successors",
            stance.leg(),
            stance.key(),
            candidates.len()
        );
        candidates
    }

    fn is_goal(&self, state: &FootstepState) -> bool {
        match self.goals.as_ref() {
            Some(goals) => {
                let goal = goals.for_leg(state.leg());
                state.distance_to(goal) <= self.pos_goal_thr
                    && state.angle_to(goal) <= self.rot_goal_thr
            }
            None => false,
        }
    }

    fn path_cost(&self, from: &FootstepState, to: &FootstepState) -> f64 {
        self.step_cost.cost(to.distance_to(from), to.angle_to(from))
    }

    fn check_ready(&self) -> PlannerResult<()> {
        if self.goals.is_none() {
            return Err(PlannerError::GoalNotSet);
        }
        Ok(())
    }
}

impl fmt::Debug for FootstepGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FootstepGraph")
            .field("resolution", &self.resolution)
            .field("successors", &self.library.len())
            .field("goals", &self.goals)
            .field("pos_goal_thr", &self.pos_goal_thr)
            .field("rot_goal_thr", &self.rot_goal_thr)
            .field("limits", &self.limits)
            .field("step_cost", &self.step_cost)
            .field("feasibility", &self.feasibility.is_some())
            .finish()
    }
}

fn check_non_negative(name: &str, value: f64) -> PlannerResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PlannerError::InvalidParameter(format!(
            "{} must be finite and non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_optional_bound(name: &str, value: Option<f64>) -> PlannerResult<()> {
    match value {
        // An infinite bound is the same as no bound
        Some(v) if v == f64::INFINITY => Ok(()),
        Some(v) => check_non_negative(name, v),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::planar_pose;
    use proptest::prelude::*;

    fn res() -> Resolution {
        Resolution::new(0.05, 0.05, 0.087).unwrap()
    }

    fn walking_library() -> TransformLibrary {
        TransformLibrary::grid(&[-0.1, 0.0, 0.1, 0.2, 0.3], &[-0.2, -0.3], &[-0.3, 0.0, 0.3])
    }

    fn graph_with_goal(gx: f64) -> FootstepGraph {
        let mut graph = FootstepGraph::new(res());
        graph.set_basic_successors(walking_library());
        graph
            .set_goal_state(
                FootstepState::from_xy_yaw(Leg::Left, gx, 0.1, 0.0, res()),
                FootstepState::from_xy_yaw(Leg::Right, gx, -0.1, 0.0, res()),
            )
            .unwrap();
        graph
    }

    #[test]
    fn test_successors_follow_library_order() {
        let graph = graph_with_goal(1.0);
        let stance = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.1, 0.0, res());
        let succ = graph.successors(&stance);
        assert_eq!(succ.len(), 30);
        // first grid entry: (-0.1, -0.2, -0.3)
        assert!((succ[0].position().x + 0.1).abs() < 1e-9);
        assert!((succ[0].position().y + 0.1).abs() < 1e-9);
        assert!(succ.iter().all(|s| s.leg() == Leg::Right));
    }

    #[test]
    fn test_right_stance_uses_mirrored_library() {
        let graph = graph_with_goal(1.0);
        let stance = FootstepState::from_xy_yaw(Leg::Right, 0.0, -0.1, 0.0, res());
        let succ = graph.successors(&stance);
        assert!(succ.iter().all(|s| s.leg() == Leg::Left));
        // every left placement lands on the left side of the right stance
        assert!(succ.iter().all(|s| s.position().y > stance.position().y));
    }

    #[test]
    fn test_kinematic_limits_prune_successors() {
        let mut graph = graph_with_goal(1.0);
        graph
            .set_kinematic_limits(KinematicLimits {
                max_distance: Some(0.25),
                max_rotation: Some(0.1),
            })
            .unwrap();
        let stance = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.1, 0.0, res());
        let succ = graph.successors(&stance);
        // only zero-rotation entries with |(x, y)| <= 0.25 survive
        assert_eq!(succ.len(), 3);
        for s in &succ {
            assert!(s.distance_to(&stance) <= 0.25 + 1e-9);
            assert!(s.angle_to(&stance) <= 0.1 + 1e-9);
        }
    }

    #[test]
    fn test_zero_limit_is_a_hard_bound() {
        let mut graph = graph_with_goal(1.0);
        graph
            .set_kinematic_limits(KinematicLimits {
                max_distance: Some(0.0),
                max_rotation: None,
            })
            .unwrap();
        let stance = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.1, 0.0, res());
        assert!(graph.successors(&stance).is_empty());
    }

    #[test]
    fn test_invalid_limits_are_rejected() {
        let mut graph = graph_with_goal(1.0);
        let bad = KinematicLimits {
            max_distance: Some(-0.1),
            max_rotation: None,
        };
        assert!(graph.set_kinematic_limits(bad).is_err());
        let nan = KinematicLimits {
            max_distance: None,
            max_rotation: Some(f64::NAN),
        };
        assert!(graph.set_kinematic_limits(nan).is_err());
        assert_eq!(*graph.limits(), KinematicLimits::unlimited());
    }

    #[test]
    fn test_feasibility_oracle_vetoes_candidates() {
        let mut graph = graph_with_goal(1.0);
        // a ditch between x = 0.15 and x = 0.25
        graph.set_feasibility(|_: &FootstepState, c: &FootstepState| {
            let x = c.position().x;
            !(0.15..=0.25).contains(&x)
        });
        let stance = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.1, 0.0, res());
        let succ = graph.successors(&stance);
        assert_eq!(succ.len(), 24);
        assert!(succ.iter().all(|s| !(0.15..=0.25).contains(&s.position().x)));

        graph.clear_feasibility();
        assert_eq!(graph.successors(&stance).len(), 30);
    }

    #[test]
    fn test_empty_library_has_no_successors() {
        let mut graph = graph_with_goal(1.0);
        graph.set_basic_successors(TransformLibrary::default());
        let stance = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.1, 0.0, res());
        assert!(graph.successors(&stance).is_empty());
    }

    #[test]
    fn test_is_goal_selects_goal_by_leg() {
        let graph = graph_with_goal(1.0);
        let left = FootstepState::from_xy_yaw(Leg::Left, 1.0, 0.1, 0.0, res());
        let right_at_left_goal = FootstepState::from_xy_yaw(Leg::Right, 1.0, 0.1, 0.0, res());
        assert!(graph.is_goal(&left));
        assert!(!graph.is_goal(&right_at_left_goal));
    }

    #[test]
    fn test_is_goal_boundary_is_inclusive() {
        let goal_left = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.0, 0.0, res());
        let goal_right = FootstepState::from_xy_yaw(Leg::Right, 0.0, 0.0, 0.0, res());
        let mut graph = FootstepGraph::new(res());
        graph.set_goal_state(goal_left.clone(), goal_right).unwrap();

        let shifted = FootstepState::from_xy_yaw(Leg::Left, 0.5, 0.0, 0.0, res());
        let turned = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.0, 0.25, res());
        let pos_thr = shifted.distance_to(&goal_left);
        let rot_thr = turned.angle_to(&goal_left);
        graph.set_goal_thresholds(pos_thr, rot_thr).unwrap();

        assert!(graph.is_goal(&shifted));
        assert!(graph.is_goal(&turned));
        let past_pos = FootstepState::from_xy_yaw(Leg::Left, 0.5001, 0.0, 0.0, res());
        let past_rot = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.0, 0.2501, res());
        assert!(!graph.is_goal(&past_pos));
        assert!(!graph.is_goal(&past_rot));
    }

    #[test]
    fn test_goal_requires_both_thresholds() {
        let graph = graph_with_goal(1.0);
        let close_but_turned = FootstepState::from_xy_yaw(Leg::Left, 1.0, 0.1, 0.5, res());
        let aligned_but_far = FootstepState::from_xy_yaw(Leg::Left, 1.2, 0.1, 0.0, res());
        assert!(!graph.is_goal(&close_but_turned));
        assert!(!graph.is_goal(&aligned_but_far));
    }

    #[test]
    fn test_degenerate_thresholds_rejected() {
        let mut graph = FootstepGraph::new(res());
        assert!(graph.set_goal_thresholds(-0.1, 0.17).is_err());
        assert!(graph.set_goal_thresholds(0.1, f64::NAN).is_err());
        assert!(graph.set_goal_thresholds(f64::INFINITY, 0.17).is_err());
        assert_eq!(graph.pos_goal_thr(), DEFAULT_POS_GOAL_THR);
        assert_eq!(graph.rot_goal_thr(), DEFAULT_ROT_GOAL_THR);
    }

    #[test]
    fn test_goal_not_set() {
        let graph = FootstepGraph::new(res());
        assert!(matches!(graph.check_ready(), Err(PlannerError::GoalNotSet)));
        assert!(matches!(graph.goal(Leg::Left), Err(PlannerError::GoalNotSet)));
        let s = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.0, 0.0, res());
        assert!(!graph.is_goal(&s));
    }

    #[test]
    fn test_goal_legs_must_match() {
        let mut graph = FootstepGraph::new(res());
        let l = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.1, 0.0, res());
        let r = FootstepState::from_xy_yaw(Leg::Right, 0.0, -0.1, 0.0, res());
        assert!(graph.set_goal_state(r.clone(), l.clone()).is_err());
        assert!(graph.goals().is_none());
        assert!(graph.set_goal_state(l, r).is_ok());
        assert_eq!(graph.goal(Leg::Right).unwrap().leg(), Leg::Right);
    }

    #[test]
    fn test_path_cost_weights() {
        let mut graph = graph_with_goal(1.0);
        graph
            .set_step_cost(StepCostWeights {
                translation: 2.0,
                rotation: 1.0,
                step: 0.5,
            })
            .unwrap();
        let a = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.0, 0.0, res());
        let b = FootstepState::from_xy_yaw(Leg::Right, 0.3, -0.4, 0.2, res());
        assert!((graph.path_cost(&a, &b) - (2.0 * 0.5 + 0.2 + 0.5)).abs() < 1e-9);
        assert!(graph
            .set_step_cost(StepCostWeights {
                translation: -1.0,
                rotation: 0.0,
                step: 0.0,
            })
            .is_err());
    }

    #[test]
    fn test_library_extents() {
        let graph = graph_with_goal(1.0);
        assert!((graph.max_successor_distance() - (0.3f64.powi(2) + 0.3f64.powi(2)).sqrt()).abs() < 1e-9);
        assert!((graph.max_successor_rotation() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_successors_keep_foot_dimensions() {
        let graph = graph_with_goal(1.0);
        let stance = FootstepState::new(Leg::Left, planar_pose(0.0, 0.1, 0.0), res())
            .with_dimensions(nalgebra::Vector3::new(0.3, 0.16, 0.02));
        for s in graph.successors(&stance) {
            assert_eq!(s.dimensions(), stance.dimensions());
        }
    }

    proptest! {
        #[test]
        fn successors_alternate_legs_and_respect_limits(
            x in -2.0f64..2.0,
            y in -2.0f64..2.0,
            yaw in -3.1f64..3.1,
            left in any::<bool>(),
            max_d in 0.0f64..0.5,
            max_r in 0.0f64..0.5,
        ) {
            let mut graph = graph_with_goal(1.0);
            graph.set_kinematic_limits(KinematicLimits {
                max_distance: Some(max_d),
                max_rotation: Some(max_r),
            }).unwrap();
            let leg = if left { Leg::Left } else { Leg::Right };
            let stance = FootstepState::from_xy_yaw(leg, x, y, yaw, res());
            for s in graph.successors(&stance) {
                prop_assert_ne!(s.leg(), stance.leg());
                prop_assert!(s.distance_to(&stance) <= max_d + 1e-9);
                prop_assert!(s.angle_to(&stance) <= max_r + 1e-9);
            }
        }
    }
}
