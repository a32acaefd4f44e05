//! Joints as seen by the solvers.

use std::fmt;

use ilkgen_robot::{JointData, JointType, KinematicTree};

use crate::error::SolverError;

/// The joint kinds a generated solver can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JointKind {
    Revolute,
    Prismatic,
    Fixed,
}

impl JointKind {
    /// Map a described joint type; continuous joints are revolute joints
    /// without limits. `None` for types no solver supports.
    pub const fn from_type(joint_type: JointType) -> Option<Self> {
        match joint_type {
            JointType::Revolute | JointType::Continuous => Some(Self::Revolute),
            JointType::Prismatic => Some(Self::Prismatic),
            JointType::Fixed => Some(Self::Fixed),
            JointType::Floating | JointType::Planar => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revolute => "revolute",
            Self::Prismatic => "prismatic",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for JointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign of a joint's contribution along a traversal of the robot.
///
/// Positive when the joint is crossed from its predecessor to its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub const fn sign(self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

/// A joint of the robot with its solver kind and regular number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolverJoint {
    pub name: String,
    pub kind: JointKind,
    /// Regular number, starting at 1.
    pub index: usize,
}

impl SolverJoint {
    /// # Errors
    ///
    /// [`SolverError::UnsupportedJointKind`] for floating and planar joints.
    pub fn resolve(tree: &KinematicTree, joint: &JointData) -> Result<Self, SolverError> {
        let unsupported = || SolverError::UnsupportedJointKind {
            robot: tree.name().into(),
            joint: joint.name.clone(),
            kind: joint.joint_type.to_string(),
        };
        let kind = JointKind::from_type(joint.joint_type).ok_or_else(unsupported)?;
        let index = tree.joint_num(&joint.name).ok_or_else(unsupported)?;
        Ok(Self {
            name: joint.name.clone(),
            kind,
            index,
        })
    }

    pub fn is_fixed(&self) -> bool {
        self.kind == JointKind::Fixed
    }
}
