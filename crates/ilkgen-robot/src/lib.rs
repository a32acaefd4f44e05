//! Robot kinematics model for the ILK solver generator.
//!
//! Loads a robot description (URDF), validates it as a kinematic tree with a
//! regular numbering of links and joints, and exposes the frames attached to
//! the robot together with the symbolic relations (poses and velocities)
//! between them.

pub mod error;
pub mod frames;
pub mod parser;
pub mod relations;
pub mod tree;
pub mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::RobotError;
pub use frames::{Frame, FrameGraph, FrameRelationKind, FrameRole};
pub use parser::{parse_file, parse_string};
pub use relations::{Pose, Relation, Velocity};
pub use tree::KinematicTree;
pub use types::{JointData, JointType, LinkData, RobotModel};

/// Parse a URDF string and build its frame graph in one go.
pub fn load_string(xml: &str) -> Result<FrameGraph, RobotError> {
    FrameGraph::new(KinematicTree::new(parse_string(xml)?)?)
}

/// Parse a URDF file and build its frame graph in one go.
pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<FrameGraph, RobotError> {
    FrameGraph::new(KinematicTree::new(parse_file(path)?)?)
}
