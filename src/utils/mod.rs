//! Utility modules for footstep_planner

pub mod visualization;

pub use visualization::{colors, quick_plot_plan, PathStyle, PointStyle, Visualizer};
