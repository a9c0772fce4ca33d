//! Heuristic functions for footstep search
//!
//! | variant            | admissible | notes                                      |
//! |--------------------|------------|--------------------------------------------|
//! | `Zero`             | yes        | uniform-cost search, optimal but slow      |
//! | `Straight`         | yes        | weighted distance to the goal region       |
//! | `StraightRotation` | yes        | adds the weighted rotation outside the goal |
//! | `StepCost`         | no         | estimated steps times average step cost    |
//!
//! The straight variants measure distance to the edge of the goal region,
//! not to the goal pose, since `is_goal` accepts any stance within the
//! position and rotation thresholds. Either foot may end the plan, so the
//! estimate is taken against whichever goal region is nearer; for the usual
//! stance width that is the goal of the matching leg. With the graph's own
//! step-cost weights the result is a lower bound on the remaining cost.

use serde::Deserialize;

use crate::common::{normalize_angle, Heuristic};
use crate::footstep_planning::footstep_graph::FootstepGraph;
use crate::footstep_planning::footstep_state::FootstepState;
use crate::footstep_planning::solver_node::SolverNode;

/// Built-in heuristics for [`FootstepGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FootstepHeuristic {
    /// Always 0
    Zero,
    /// Translation weight times distance to the goal region
    Straight,
    /// `Straight` plus rotation weight times rotation beyond the goal threshold
    StraightRotation,
    /// Number of average steps to the goal times the average step cost,
    /// plus the turn toward the goal and the turn into the goal heading
    StepCost {
        #[serde(default = "default_rotation_weight")]
        first_rotation_weight: f64,
        #[serde(default = "default_rotation_weight")]
        second_rotation_weight: f64,
    },
}

fn default_rotation_weight() -> f64 {
    1.0
}

impl FootstepHeuristic {
    /// `StepCost` with both turning terms weighted 1.0
    pub fn step_cost() -> Self {
        FootstepHeuristic::StepCost {
            first_rotation_weight: 1.0,
            second_rotation_weight: 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FootstepHeuristic::Zero => "zero",
            FootstepHeuristic::Straight => "straight",
            FootstepHeuristic::StraightRotation => "straight_rotation",
            FootstepHeuristic::StepCost { .. } => "step_cost",
        }
    }

    /// Whether the estimate never exceeds the true remaining cost
    pub fn is_admissible(&self) -> bool {
        !matches!(self, FootstepHeuristic::StepCost { .. })
    }

    fn estimate_state(&self, state: &FootstepState, graph: &FootstepGraph) -> f64 {
        let goal = match graph.goal(state.leg()) {
            Ok(goal) => goal,
            Err(_) => return 0.0,
        };
        let weights = graph.step_cost();

        match *self {
            FootstepHeuristic::Zero => 0.0,
            FootstepHeuristic::Straight => straight_estimate(state, graph, false),
            FootstepHeuristic::StraightRotation => straight_estimate(state, graph, true),
            FootstepHeuristic::StepCost {
                first_rotation_weight,
                second_rotation_weight,
            } => {
                let library = graph.library();
                let (avg_distance, avg_rotation) =
                    match (library.average_distance(), library.average_rotation()) {
                        (Some(d), Some(r)) if d > f64::EPSILON => (d, r),
                        _ => return 0.0,
                    };
                let avg_step_cost = weights.cost(avg_distance, avg_rotation);

                let diff = goal.position() - state.position();
                let planar_distance = diff.x.hypot(diff.y);
                let (first_theta, second_theta) = if planar_distance > f64::EPSILON {
                    let heading = diff.y.atan2(diff.x);
                    (
                        normalize_angle(heading - state.yaw()).abs(),
                        normalize_angle(goal.yaw() - heading).abs(),
                    )
                } else {
                    (0.0, normalize_angle(goal.yaw() - state.yaw()).abs())
                };

                planar_distance / avg_distance * avg_step_cost
                    + weights.rotation
                        * (first_rotation_weight * first_theta
                            + second_rotation_weight * second_theta)
            }
        }
    }
}

/// Weighted distance from `state` to the nearer of the two goal regions
fn straight_estimate(state: &FootstepState, graph: &FootstepGraph, with_rotation: bool) -> f64 {
    let goals = match graph.goals() {
        Some(goals) => goals,
        None => return 0.0,
    };
    let weights = graph.step_cost();
    [&goals.left, &goals.right]
        .iter()
        .map(|goal| {
            let outside = (state.distance_to(goal) - graph.pos_goal_thr()).max(0.0);
            let mut h = weights.translation * outside;
            if with_rotation {
                let turn = (state.angle_to(goal) - graph.rot_goal_thr()).max(0.0);
                h += weights.rotation * turn;
            }
            h
        })
        .fold(f64::INFINITY, f64::min)
}

impl Default for FootstepHeuristic {
    fn default() -> Self {
        FootstepHeuristic::StraightRotation
    }
}

impl Heuristic<FootstepGraph> for FootstepHeuristic {
    fn estimate(&self, node: &SolverNode<FootstepState>, graph: &FootstepGraph) -> f64 {
        self.estimate_state(node.state(), graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Leg, Resolution};
    use crate::footstep_planning::footstep_graph::StepCostWeights;
    use crate::footstep_planning::transform_library::TransformLibrary;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn res() -> Resolution {
        Resolution::new(0.05, 0.05, 0.087).unwrap()
    }

    fn graph() -> FootstepGraph {
        let mut graph = FootstepGraph::new(res());
        graph.set_basic_successors(TransformLibrary::from_xy_theta(&[
            (0.2, -0.2, 0.0),
            (0.0, -0.2, 0.2),
        ]));
        graph
            .set_step_cost(StepCostWeights {
                translation: 1.0,
                rotation: 0.5,
                step: 0.1,
            })
            .unwrap();
        graph
            .set_goal_state(
                FootstepState::from_xy_yaw(Leg::Left, 3.0, 4.0, FRAC_PI_2, res()),
                FootstepState::from_xy_yaw(Leg::Right, 3.0, 3.8, FRAC_PI_2, res()),
            )
            .unwrap();
        graph
    }

    fn node(leg: Leg, x: f64, y: f64, yaw: f64) -> SolverNode<FootstepState> {
        SolverNode::root(FootstepState::from_xy_yaw(leg, x, y, yaw, res()))
    }

    #[test]
    fn test_zero() {
        let g = graph();
        assert_eq!(FootstepHeuristic::Zero.estimate(&node(Leg::Left, 0.0, 0.0, 0.0), &g), 0.0);
    }

    #[test]
    fn test_straight_measures_to_goal_region() {
        let g = graph();
        let h = FootstepHeuristic::Straight;
        // right goal 3.8 away, minus the 0.1 position threshold
        assert_relative_eq!(h.estimate(&node(Leg::Right, 3.0, 0.0, 0.0), &g), 3.7, epsilon = 1e-9);
        assert_relative_eq!(h.estimate(&node(Leg::Left, 3.0, 5.0, 0.0), &g), 0.9, epsilon = 1e-9);
        assert_eq!(h.estimate(&node(Leg::Left, 3.05, 4.0, FRAC_PI_2), &g), 0.0);
    }

    #[test]
    fn test_straight_takes_nearer_goal_region() {
        let g = graph();
        // a left foot standing on the right goal is one short step from finishing
        let h = FootstepHeuristic::Straight.estimate(&node(Leg::Left, 3.0, 3.8, FRAC_PI_2), &g);
        assert_eq!(h, 0.0);
    }

    #[test]
    fn test_straight_rotation_adds_rotation_beyond_threshold() {
        let g = graph();
        let n = node(Leg::Left, 3.0, 5.0, 0.0);
        let straight = FootstepHeuristic::Straight.estimate(&n, &g);
        let rotation = FootstepHeuristic::StraightRotation.estimate(&n, &g);
        assert_relative_eq!(rotation - straight, 0.5 * (FRAC_PI_2 - 0.17), epsilon = 1e-9);

        let within = node(Leg::Left, 3.0, 4.0, FRAC_PI_2 - 0.1);
        assert_eq!(FootstepHeuristic::StraightRotation.estimate(&within, &g), 0.0);
    }

    #[test]
    fn test_step_cost_estimate() {
        let g = graph();
        // average step: distance (sqrt(0.08) + 0.2) / 2, rotation 0.1
        let avg_d = (0.08f64.sqrt() + 0.2) / 2.0;
        let avg_cost = avg_d + 0.5 * 0.1 + 0.1;
        // facing +x, goal straight ahead along +x with heading +y
        let n = node(Leg::Left, -1.0, 4.0, 0.0);
        let expected = 4.0 / avg_d * avg_cost + 0.5 * FRAC_PI_2;
        assert_relative_eq!(
            FootstepHeuristic::step_cost().estimate(&n, &g),
            expected,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_step_cost_on_goal_position_counts_final_turn() {
        let g = graph();
        let n = node(Leg::Left, 3.0, 4.0, 0.0);
        let h = FootstepHeuristic::StepCost {
            first_rotation_weight: 1.0,
            second_rotation_weight: 2.0,
        };
        assert_relative_eq!(h.estimate(&n, &g), 0.5 * 2.0 * FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_unset_goal_or_empty_library_gives_zero() {
        let mut g = FootstepGraph::new(res());
        let n = node(Leg::Left, 0.0, 0.0, 0.0);
        assert_eq!(FootstepHeuristic::Straight.estimate(&n, &g), 0.0);

        g.set_goal_state(
            FootstepState::from_xy_yaw(Leg::Left, 1.0, 0.0, 0.0, res()),
            FootstepState::from_xy_yaw(Leg::Right, 1.0, -0.2, 0.0, res()),
        )
        .unwrap();
        assert_eq!(FootstepHeuristic::step_cost().estimate(&n, &g), 0.0);
        assert!(FootstepHeuristic::Straight.estimate(&n, &g) > 0.0);
    }

    #[test]
    fn test_estimates_are_non_negative() {
        let g = graph();
        let variants = [
            FootstepHeuristic::Zero,
            FootstepHeuristic::Straight,
            FootstepHeuristic::StraightRotation,
            FootstepHeuristic::step_cost(),
        ];
        for h in variants.iter() {
            for &(x, y, yaw) in &[(0.0, 0.0, 0.0), (3.0, 4.0, FRAC_PI_2), (5.0, -2.0, -2.5)] {
                assert!(h.estimate(&node(Leg::Left, x, y, yaw), &g) >= 0.0, "{}", h.name());
            }
        }
    }

    #[test]
    fn test_admissibility_flags() {
        assert!(FootstepHeuristic::Zero.is_admissible());
        assert!(FootstepHeuristic::StraightRotation.is_admissible());
        assert!(!FootstepHeuristic::step_cost().is_admissible());
        assert_eq!(FootstepHeuristic::default().name(), "straight_rotation");
    }
}
