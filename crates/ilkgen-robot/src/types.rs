//! Connectivity model of a robot: links, joints and the root link.
//!
//! Only the topology matters to the generator, so geometry, inertia and
//! limits are not carried. Numeric values live with the downstream solver.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::RobotError;

// ---------------------------------------------------------------------------
// JointType
// ---------------------------------------------------------------------------

/// Joint type, as declared in the robot description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointType {
    /// Rotation about a single axis, with position limits.
    Revolute,
    /// Unlimited rotation about a single axis.
    Continuous,
    /// Translation along an axis.
    Prismatic,
    /// No relative motion between parent and child.
    Fixed,
    /// Unconstrained 6-DOF joint.
    Floating,
    /// Planar motion.
    Planar,
}

impl JointType {
    /// Lower-case name, as used in robot descriptions.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revolute => "revolute",
            Self::Continuous => "continuous",
            Self::Prismatic => "prismatic",
            Self::Fixed => "fixed",
            Self::Floating => "floating",
            Self::Planar => "planar",
        }
    }
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LinkData / JointData
// ---------------------------------------------------------------------------

/// A rigid body of the robot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkData {
    /// Link name.
    pub name: String,
}

impl LinkData {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A joint connecting a parent (predecessor) link to a child (successor) link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointData {
    /// Joint name.
    pub name: String,
    /// Joint type.
    pub joint_type: JointType,
    /// Parent link name.
    pub parent: String,
    /// Child link name.
    pub child: String,
}

impl JointData {
    pub fn new(
        name: impl Into<String>,
        joint_type: JointType,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            joint_type,
            parent: parent.into(),
            child: child.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RobotModel
// ---------------------------------------------------------------------------

/// Complete connectivity model of a robot.
///
/// Constructed by the parser (or by hand in tests) and consumed by
/// [`KinematicTree`](crate::tree::KinematicTree).
#[derive(Debug, Clone)]
pub struct RobotModel {
    /// Robot name.
    pub name: String,
    /// All links, keyed by name.
    pub links: HashMap<String, LinkData>,
    /// All joints, keyed by name.
    pub joints: HashMap<String, JointData>,
    /// Name of the root link (the one never referenced as a child).
    pub root_link: String,
}

impl RobotModel {
    /// Assemble a model from its links and joints, detecting the root link.
    ///
    /// When several links are never a child, the alphabetically first one is
    /// taken as root; the others are reported later as disconnected.
    pub fn from_parts(
        name: impl Into<String>,
        links: impl IntoIterator<Item = LinkData>,
        joints: impl IntoIterator<Item = JointData>,
    ) -> Result<Self, RobotError> {
        let links: HashMap<String, LinkData> =
            links.into_iter().map(|l| (l.name.clone(), l)).collect();
        let joints: HashMap<String, JointData> =
            joints.into_iter().map(|j| (j.name.clone(), j)).collect();

        for joint in joints.values() {
            for link in [&joint.parent, &joint.child] {
                if !links.contains_key(link) {
                    return Err(RobotError::MissingLink(link.clone()));
                }
            }
        }

        let child_links: HashSet<&str> = joints.values().map(|j| j.child.as_str()).collect();
        let root_link = links
            .keys()
            .filter(|name| !child_links.contains(name.as_str()))
            .min()
            .ok_or(RobotError::NoRootLink)?
            .clone();

        Ok(Self {
            name: name.into(),
            links,
            joints,
            root_link,
        })
    }

    /// Get a joint by name.
    pub fn joint(&self, name: &str) -> Result<&JointData, RobotError> {
        self.joints
            .get(name)
            .ok_or_else(|| RobotError::MissingJoint(name.into()))
    }

    /// Number of non-fixed joints.
    pub fn dof(&self) -> usize {
        self.joints
            .values()
            .filter(|j| j.joint_type != JointType::Fixed)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> RobotModel {
        RobotModel::from_parts(
            "test_robot",
            [
                LinkData::new("base"),
                LinkData::new("link1"),
                LinkData::new("link2"),
            ],
            [
                JointData::new("joint1", JointType::Revolute, "base", "link1"),
                JointData::new("joint2", JointType::Fixed, "link1", "link2"),
            ],
        )
        .unwrap()
    }

    // -- JointType --

    #[test]
    fn joint_type_display() {
        assert_eq!(JointType::Prismatic.to_string(), "prismatic");
        assert_eq!(JointType::Planar.to_string(), "planar");
    }

    // -- RobotModel --

    #[test]
    fn root_link_detected() {
        let model = sample_model();
        assert_eq!(model.root_link, "base");
    }

    #[test]
    fn from_parts_rejects_unknown_link() {
        let err = RobotModel::from_parts(
            "bad",
            [LinkData::new("base")],
            [JointData::new("j", JointType::Revolute, "base", "ghost")],
        )
        .unwrap_err();
        assert!(matches!(err, RobotError::MissingLink(name) if name == "ghost"));
    }

    #[test]
    fn from_parts_without_links_has_no_root() {
        let err = RobotModel::from_parts("empty", [], []).unwrap_err();
        assert!(matches!(err, RobotError::NoRootLink));
    }

    #[test]
    fn model_lookups() {
        let model = sample_model();
        assert!(model.joint("joint1").is_ok());
        assert!(model.joint("missing").is_err());
    }

    #[test]
    fn model_dof_ignores_fixed() {
        let model = sample_model();
        assert_eq!(model.dof(), 1);
    }
}
