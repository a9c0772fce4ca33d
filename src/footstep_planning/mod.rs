// Footstep planning: state space, graph, heuristics and the A* solver

pub mod footstep_state;
pub mod transform_library;
pub mod footstep_graph;
pub mod heuristics;
pub mod solver_node;
pub mod astar_solver;
pub mod progress;

pub use footstep_state::*;
pub use transform_library::*;
pub use footstep_graph::*;
pub use heuristics::*;
pub use solver_node::*;
pub use astar_solver::*;
pub use progress::*;
