//! URDF XML parsing using `urdf-rs`.
//!
//! Converts `urdf_rs` types into the crate's connectivity-only
//! [`RobotModel`] representation.

use std::path::Path;

use crate::error::RobotError;
use crate::types::{JointData, JointType, LinkData, RobotModel};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a URDF file from disk into a [`RobotModel`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<RobotModel, RobotError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| RobotError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_string(&content)
}

/// Parse a URDF XML string into a [`RobotModel`].
pub fn parse_string(xml: &str) -> Result<RobotModel, RobotError> {
    let robot = urdf_rs::read_from_string(xml).map_err(|e| RobotError::Parse(e.to_string()))?;
    convert_robot(&robot)
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn convert_robot(robot: &urdf_rs::Robot) -> Result<RobotModel, RobotError> {
    let links = robot.links.iter().map(|l| LinkData::new(l.name.clone()));
    let joints = robot
        .joints
        .iter()
        .map(convert_joint)
        .collect::<Result<Vec<_>, _>>()?;

    RobotModel::from_parts(robot.name.clone(), links, joints)
}

fn convert_joint(joint: &urdf_rs::Joint) -> Result<JointData, RobotError> {
    Ok(JointData::new(
        joint.name.clone(),
        convert_joint_type(&joint.joint_type)?,
        joint.parent.link.clone(),
        joint.child.link.clone(),
    ))
}

fn convert_joint_type(jt: &urdf_rs::JointType) -> Result<JointType, RobotError> {
    match jt {
        urdf_rs::JointType::Revolute => Ok(JointType::Revolute),
        urdf_rs::JointType::Continuous => Ok(JointType::Continuous),
        urdf_rs::JointType::Prismatic => Ok(JointType::Prismatic),
        urdf_rs::JointType::Fixed => Ok(JointType::Fixed),
        urdf_rs::JointType::Floating => Ok(JointType::Floating),
        urdf_rs::JointType::Planar => Ok(JointType::Planar),
        urdf_rs::JointType::Spherical => {
            Err(RobotError::UnsupportedJointType("spherical".into()))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_URDF: &str = r#"
        <robot name="test_robot">
            <link name="base_link"/>
        </robot>
    "#;

    const MULTI_JOINT_URDF: &str = r#"
        <robot name="arm">
            <link name="base"/>
            <link name="link1"/>
            <link name="link2"/>
            <link name="link3"/>
            <joint name="joint1" type="revolute">
                <parent link="base"/>
                <child link="link1"/>
                <axis xyz="0 0 1"/>
                <limit lower="-3.14" upper="3.14" effort="50" velocity="2"/>
            </joint>
            <joint name="joint2" type="continuous">
                <parent link="link1"/>
                <child link="link2"/>
                <axis xyz="0 1 0"/>
            </joint>
            <joint name="fixed_end" type="fixed">
                <parent link="link2"/>
                <child link="link3"/>
            </joint>
        </robot>
    "#;

    const SPHERICAL_URDF: &str = r#"
        <robot name="ball">
            <link name="base"/>
            <link name="head"/>
            <joint name="neck" type="spherical">
                <parent link="base"/>
                <child link="head"/>
            </joint>
        </robot>
    "#;

    // -- parse_string --

    #[test]
    fn parse_minimal_urdf() {
        let model = parse_string(MINIMAL_URDF).unwrap();
        assert_eq!(model.name, "test_robot");
        assert_eq!(model.links.len(), 1);
        assert!(model.joints.is_empty());
        assert_eq!(model.root_link, "base_link");
    }

    #[test]
    fn parse_multi_joint_robot() {
        let model = parse_string(MULTI_JOINT_URDF).unwrap();
        assert_eq!(model.name, "arm");
        assert_eq!(model.links.len(), 4);
        assert_eq!(model.joints.len(), 3);
        assert_eq!(model.dof(), 2);
        assert_eq!(model.root_link, "base");
    }

    #[test]
    fn joint_type_parsed_correctly() {
        let model = parse_string(MULTI_JOINT_URDF).unwrap();
        assert_eq!(
            model.joint("joint1").unwrap().joint_type,
            JointType::Revolute
        );
        assert_eq!(
            model.joint("joint2").unwrap().joint_type,
            JointType::Continuous
        );
        assert_eq!(
            model.joint("fixed_end").unwrap().joint_type,
            JointType::Fixed
        );
    }

    #[test]
    fn joint_parent_child() {
        let model = parse_string(MULTI_JOINT_URDF).unwrap();
        let joint = model.joint("joint2").unwrap();
        assert_eq!(joint.parent, "link1");
        assert_eq!(joint.child, "link2");
    }

    // -- Error cases --

    #[test]
    fn parse_invalid_xml() {
        assert!(parse_string("<not valid urdf>").is_err());
    }

    #[test]
    fn parse_spherical_joint_rejected() {
        let err = parse_string(SPHERICAL_URDF).unwrap_err();
        assert!(matches!(err, RobotError::UnsupportedJointType(_)));
    }

    #[test]
    fn parse_file_not_found() {
        let err = parse_file("/nonexistent/robot.urdf").unwrap_err();
        assert!(matches!(err, RobotError::Io { .. }));
    }
}
