//! ILK descriptor emission.
//!
//! ILK files are Lua tables describing a solver: the relations it evaluates,
//! the ordered list of primitive operations and the outputs. The numeric
//! runtime that executes them lives elsewhere.

pub mod ilk;

pub use ilk::{forward_solver, inverse_solver, jacobian_id, pose_id, velocity_id};

/// Extension of generated solver files.
pub const DEFAULT_EXTENSION: &str = "ilk";
