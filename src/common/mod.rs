//! Common types, traits, and error definitions for footstep_planner
//!
//! This module provides the foundational building blocks shared by the
//! search engine and the footstep graph.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
