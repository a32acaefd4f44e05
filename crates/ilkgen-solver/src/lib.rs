//! Solver-model compiler for the ILK kinematics solver generator.
//!
//! Turns a query about a robot ("compute these poses, velocities and
//! Jacobians") into an ordered list of primitive compositions. Redundant
//! work across all requested quantities is shared by a greedy optimizer
//! over paths of composable relations.
//!
//! # Architecture
//!
//! ```text
//! Query ──► ValidatedQuery ──► SolverPlan ──► FkSolverModel / IkSolverModel
//!                                                 │
//!                          Path<Pose>, Path<Velocity> ──► all_composes
//! ```
//!
//! Everything here is symbolic: relations are identities between frames,
//! no numeric value is ever computed.

pub mod compose;
pub mod error;
pub mod ik;
pub mod jacobian;
pub mod joint;
pub mod model;
pub mod optimizer;
pub mod plan;
pub mod query;
pub mod subpath;

pub use compose::{BinaryComposition, Composable, Interval, Path};
pub use error::SolverError;
pub use ik::{CfgSpace, IkLevel, IkSolverModel, IkSolverSpecs};
pub use jacobian::GeometricJacobian;
pub use joint::{JointKind, Polarity, SolverJoint};
pub use model::{FkSolverModel, FkSolverSpecs, JacobianSpecs, JointPoseDirection};
pub use optimizer::{Composition, all_composes, find_composes, longest_match};
pub use plan::SolverPlan;
pub use query::{Query, ValidatedQuery};
pub use subpath::{PathArena, PathId};
