//! Error types for robot loading and frame-graph queries.

use std::path::PathBuf;

/// Errors that can occur while loading a robot or querying its frames.
#[derive(Debug, thiserror::Error)]
pub enum RobotError {
    /// Failed to read the robot description file.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse URDF XML content.
    #[error("URDF parse error: {0}")]
    Parse(String),

    /// A referenced link was not found in the model.
    #[error("missing link: {0}")]
    MissingLink(String),

    /// A referenced joint was not found in the model.
    #[error("missing joint: {0}")]
    MissingJoint(String),

    /// A referenced frame was not found in the frame graph.
    #[error("missing frame: {0}")]
    MissingFrame(String),

    /// Invalid or unsupported joint type.
    #[error("unsupported joint type: {0}")]
    UnsupportedJointType(String),

    /// The model has no root link (no link that is never a child).
    #[error("no root link found")]
    NoRootLink,

    /// A link is the child of more than one joint.
    #[error("link '{0}' has more than one parent joint")]
    NotATree(String),

    /// A link cannot be reached from the root link.
    #[error("link '{0}' is not connected to the root link")]
    DisconnectedLink(String),

    /// Two frames would share the same name.
    #[error("duplicate frame name: {0}")]
    DuplicateFrame(String),

    /// No path exists between two frames.
    #[error("no path between frames '{from}' and '{to}'")]
    NoPath { from: String, to: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
