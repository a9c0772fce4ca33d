//! Configuration loading for footstep_planner
//!
//! A planner configuration is a TOML document. Every section is optional
//! except the successor list, which has no sensible default.

use std::fs;
use std::path::Path;
use std::time::Duration;

use nalgebra::Vector3;
use serde::Deserialize;

use crate::common::{Leg, PlannerError, PlannerResult, Resolution};
use crate::footstep_planning::{
    FootstepGraph, FootstepHeuristic, FootstepState, KinematicLimits, SolverConfig,
    StepCostWeights, TransformLibrary, DEFAULT_FOOT_DIMENSIONS, DEFAULT_POS_GOAL_THR,
    DEFAULT_ROT_GOAL_THR,
};

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerConfig {
    /// Discretization grid `[x, y, yaw]` (default: [0.05, 0.05, 0.087])
    #[serde(default = "default_resolution")]
    pub resolution: [f64; 3],

    #[serde(default)]
    pub goal: GoalConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub cost: CostConfig,

    #[serde(default)]
    pub heuristic: FootstepHeuristic,

    #[serde(default)]
    pub solver: SolverSection,

    #[serde(default)]
    pub foot: FootConfig,

    /// Right-foot placements relative to a left stance
    pub successors: Vec<SuccessorConfig>,

    /// Start and goal stances, for the command-line planner
    pub problem: Option<ProblemConfig>,
}

/// Goal tolerances
#[derive(Clone, Debug, Deserialize)]
pub struct GoalConfig {
    /// Position tolerance in meters (default: 0.1)
    #[serde(default = "default_pos_threshold")]
    pub pos_threshold: f64,

    /// Rotation tolerance in radians (default: 0.17)
    #[serde(default = "default_rot_threshold")]
    pub rot_threshold: f64,
}

/// Kinematic limits; an absent key means unlimited
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LimitsConfig {
    pub max_successor_distance: Option<f64>,
    pub max_successor_rotation: Option<f64>,
}

/// Step cost weights
#[derive(Clone, Debug, Deserialize)]
pub struct CostConfig {
    #[serde(default = "default_translation_weight")]
    pub translation_weight: f64,

    #[serde(default = "default_rotation_weight")]
    pub rotation_weight: f64,

    #[serde(default)]
    pub step_weight: f64,
}

/// Search settings
#[derive(Clone, Debug, Deserialize)]
pub struct SolverSection {
    /// Heuristic weight (default: 1.0)
    #[serde(default = "default_heuristic_weight")]
    pub heuristic_weight: f64,

    pub max_expansions: Option<usize>,

    /// Wall-clock budget in milliseconds
    pub timeout_ms: Option<u64>,
}

/// Foot geometry
#[derive(Clone, Debug, Deserialize)]
pub struct FootConfig {
    /// Length, width, sole height in meters
    #[serde(default = "default_foot_dimensions")]
    pub dimensions: [f64; 3],
}

/// One successor transform
#[derive(Clone, Debug, Deserialize)]
pub struct SuccessorConfig {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub theta: f64,
}

/// Planar pose of one foot
#[derive(Clone, Debug, Deserialize)]
pub struct PoseConfig {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub yaw: f64,
}

/// Planning problem
#[derive(Clone, Debug, Deserialize)]
pub struct ProblemConfig {
    pub start_leg: Leg,
    pub start: PoseConfig,
    pub goal_left: PoseConfig,
    pub goal_right: PoseConfig,
}

fn default_resolution() -> [f64; 3] {
    [0.05, 0.05, 0.087]
}

fn default_pos_threshold() -> f64 {
    DEFAULT_POS_GOAL_THR
}

fn default_rot_threshold() -> f64 {
    DEFAULT_ROT_GOAL_THR
}

fn default_translation_weight() -> f64 {
    StepCostWeights::default().translation
}

fn default_rotation_weight() -> f64 {
    StepCostWeights::default().rotation
}

fn default_heuristic_weight() -> f64 {
    SolverConfig::default().heuristic_weight
}

fn default_foot_dimensions() -> [f64; 3] {
    DEFAULT_FOOT_DIMENSIONS
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            pos_threshold: default_pos_threshold(),
            rot_threshold: default_rot_threshold(),
        }
    }
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            translation_weight: default_translation_weight(),
            rotation_weight: default_rotation_weight(),
            step_weight: 0.0,
        }
    }
}

impl Default for SolverSection {
    fn default() -> Self {
        Self {
            heuristic_weight: default_heuristic_weight(),
            max_expansions: None,
            timeout_ms: None,
        }
    }
}

impl Default for FootConfig {
    fn default() -> Self {
        Self {
            dimensions: default_foot_dimensions(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> PlannerResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn resolution(&self) -> PlannerResult<Resolution> {
        Resolution::try_from(self.resolution)
    }

    pub fn transform_library(&self) -> TransformLibrary {
        let offsets: Vec<(f64, f64, f64)> = self
            .successors
            .iter()
            .map(|s| (s.x, s.y, s.theta))
            .collect();
        TransformLibrary::from_xy_theta(&offsets)
    }

    pub fn foot_dimensions(&self) -> PlannerResult<Vector3<f64>> {
        let dims = Vector3::from(self.foot.dimensions);
        if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(PlannerError::InvalidParameter(format!(
                "foot.dimensions must be positive, got {:?}",
                self.foot.dimensions
            )));
        }
        Ok(dims)
    }

    /// Graph with every configured parameter applied, and goals if a problem is given
    pub fn build_graph(&self) -> PlannerResult<FootstepGraph> {
        let mut graph = FootstepGraph::new(self.resolution()?);
        graph.set_basic_successors(self.transform_library());
        graph.set_goal_thresholds(self.goal.pos_threshold, self.goal.rot_threshold)?;
        graph.set_kinematic_limits(KinematicLimits {
            max_distance: self.limits.max_successor_distance,
            max_rotation: self.limits.max_successor_rotation,
        })?;
        graph.set_step_cost(StepCostWeights {
            translation: self.cost.translation_weight,
            rotation: self.cost.rotation_weight,
            step: self.cost.step_weight,
        })?;
        if self.problem.is_some() {
            let (left, right) = self.goal_states()?;
            graph.set_goal_state(left, right)?;
        }
        Ok(graph)
    }

    pub fn solver_config(&self) -> PlannerResult<SolverConfig> {
        let config = SolverConfig {
            heuristic_weight: self.solver.heuristic_weight,
            max_expansions: self.solver.max_expansions,
            timeout: self.solver.timeout_ms.map(Duration::from_millis),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn heuristic(&self) -> FootstepHeuristic {
        self.heuristic
    }

    pub fn start_state(&self) -> PlannerResult<FootstepState> {
        let problem = self.problem()?;
        self.state(problem.start_leg, &problem.start)
    }

    /// Left and right goal stances
    pub fn goal_states(&self) -> PlannerResult<(FootstepState, FootstepState)> {
        let problem = self.problem()?;
        Ok((
            self.state(Leg::Left, &problem.goal_left)?,
            self.state(Leg::Right, &problem.goal_right)?,
        ))
    }

    fn problem(&self) -> PlannerResult<&ProblemConfig> {
        self.problem.as_ref().ok_or(PlannerError::GoalNotSet)
    }

    fn state(&self, leg: Leg, pose: &PoseConfig) -> PlannerResult<FootstepState> {
        Ok(
            FootstepState::from_xy_yaw(leg, pose.x, pose.y, pose.yaw, self.resolution()?)
                .with_dimensions(self.foot_dimensions()?),
        )
    }
}
