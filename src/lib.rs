//! footstep_planner - footstep planning for legged robots
//!
//! This crate searches for a sequence of alternating left/right foot
//! placements from a start stance to a goal stance, using A* over a
//! discretized foot-pose lattice built from a library of step transforms.

// Core modules
pub mod common;
pub mod config;
pub mod utils;

// Algorithm modules
pub mod footstep_planning;

// Re-export common types for convenience
pub use common::{Leg, Resolution, DiscreteKey};
pub use common::{Graph, Heuristic, ProgressObserver, FootstepFeasibility};
pub use common::{PlannerError, PlannerResult};
pub use config::PlannerConfig;
pub use footstep_planning::{AStarSolver, FootstepGraph, FootstepHeuristic, FootstepState};
pub use footstep_planning::{SearchOutcome, Solution, SolverConfig, TransformLibrary};
