//! Errors raised while validating queries and building solver models.
//!
//! Each error aborts only the solver model being generated.

use std::path::PathBuf;

use ilkgen_robot::RobotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("robot '{robot}': joint '{joint}' of kind '{kind}' is not supported")]
    UnsupportedJointKind {
        robot: String,
        joint: String,
        kind: String,
    },

    #[error("robot '{robot}': target of joint pose '{pose}' is neither a link nor a joint frame")]
    AmbiguousFrameRole { robot: String, pose: String },

    #[error("robot '{robot}': no frame named '{frame}'")]
    UnresolvedFrame { robot: String, frame: String },

    #[error("robot '{robot}': frame '{frame}' is not a link frame")]
    NotALink { robot: String, frame: String },

    #[error("query is for robot '{query}', but the loaded robot is '{model}'")]
    RobotMismatch { query: String, model: String },

    #[error("unsupported velocity kind '{0}' (only '6D' is supported)")]
    UnsupportedVelocityKind(String),

    #[error("query parse error: {0}")]
    QueryParse(String),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Robot(#[from] RobotError),
}

impl From<serde_yaml::Error> for SolverError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::QueryParse(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_robot_and_relation() {
        let e = SolverError::UnsupportedJointKind {
            robot: "ur5".into(),
            joint: "slider".into(),
            kind: "planar".into(),
        };
        assert_eq!(
            e.to_string(),
            "robot 'ur5': joint 'slider' of kind 'planar' is not supported"
        );

        let e = SolverError::UnresolvedFrame {
            robot: "ur5".into(),
            frame: "tool".into(),
        };
        assert_eq!(e.to_string(), "robot 'ur5': no frame named 'tool'");
    }

    #[test]
    fn robot_errors_pass_through() {
        let e: SolverError = RobotError::MissingLink("hand".into()).into();
        assert_eq!(e.to_string(), "missing link: hand");
    }

    #[test]
    fn yaml_errors_become_parse_errors() {
        let err = serde_yaml::from_str::<Vec<u32>>("{ not: a list").unwrap_err();
        assert!(matches!(SolverError::from(err), SolverError::QueryParse(_)));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_is_send_sync() {
        assert_send_sync::<SolverError>();
    }
}
