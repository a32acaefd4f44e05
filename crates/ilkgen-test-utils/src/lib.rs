//! Shared test fixtures for ilkgen crates.
//!
//! Provides robot descriptions as URDF strings and helpers that load them
//! into frame graphs.

pub mod robots;
pub mod urdf;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use robots::{branched_robot, planar_robot, serial_arm};
