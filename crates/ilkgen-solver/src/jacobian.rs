//! Geometric Jacobians of relative velocities.
//!
//! The Jacobian of the velocity of `target` relative to `reference` has one
//! column per non-fixed joint crossed by the frame path from `reference` to
//! `target`. Each column needs the pose of its joint frame relative to
//! `reference`; when the path crosses the joint from successor to
//! predecessor the column has negative polarity.

use ilkgen_robot::{Frame, FrameGraph, Pose, Velocity};

use crate::error::SolverError;
use crate::joint::{Polarity, SolverJoint};

/// The columns of one geometric Jacobian, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometricJacobian {
    velocity: Velocity,
    joints: Vec<SolverJoint>,
    joint_poses: Vec<Pose>,
    polarities: Vec<Polarity>,
    target_pose: Pose,
}

impl GeometricJacobian {
    /// Walk the frames from the velocity's reference to its target.
    ///
    /// # Errors
    ///
    /// Fails if a crossed joint has an unsupported kind, or if the frames
    /// are not connected.
    pub fn build(frames: &FrameGraph, velocity: &Velocity) -> Result<Self, SolverError> {
        let tree = frames.robot();
        let reference = velocity.reference();
        let target = velocity.target();
        let path = frames.path(reference, target)?;

        let mut joints = Vec::new();
        let mut joint_poses = Vec::new();
        let mut polarities = Vec::new();
        let mut previous: Option<&Frame> = None;
        for frame in &path {
            if let Some(data) = frames.joint_of_frame(frame) {
                let joint = SolverJoint::resolve(tree, data)?;
                if !joint.is_fixed() {
                    let predecessor = Frame::link(tree.predecessor(data));
                    let polarity = if previous == Some(&predecessor) {
                        Polarity::Positive
                    } else {
                        Polarity::Negative
                    };
                    joints.push(joint);
                    joint_poses.push(Pose::new(frame.clone(), reference.clone()));
                    polarities.push(polarity);
                }
            }
            previous = Some(frame);
        }

        Ok(Self {
            velocity: velocity.clone(),
            joints,
            joint_poses,
            polarities,
            target_pose: Pose::new(target.clone(), reference.clone()),
        })
    }

    pub const fn velocity(&self) -> &Velocity {
        &self.velocity
    }

    pub fn joints(&self) -> &[SolverJoint] {
        &self.joints
    }

    /// Pose of each column's joint frame relative to the reference.
    pub fn joint_poses(&self) -> &[Pose] {
        &self.joint_poses
    }

    pub fn polarities(&self) -> &[Polarity] {
        &self.polarities
    }

    /// Pose of the target relative to the reference.
    pub const fn target_pose(&self) -> &Pose {
        &self.target_pose
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.joints.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ilkgen_test_utils::{branched_robot, planar_robot, serial_arm};

    fn velocity(target: &str, reference: &str) -> Velocity {
        Velocity::new(Frame::link(target), Frame::link(reference))
    }

    fn joint_names(jac: &GeometricJacobian) -> Vec<&str> {
        jac.joints().iter().map(|j| j.name.as_str()).collect()
    }

    // -- columns --

    #[test]
    fn serial_arm_skips_fixed_joint() {
        let frames = serial_arm();
        let jac = GeometricJacobian::build(&frames, &velocity("tool", "base")).unwrap();
        assert_eq!(joint_names(&jac), vec!["shoulder", "elbow", "slide"]);
        assert_eq!(jac.columns(), 3);
        assert!(jac.polarities().iter().all(|p| *p == Polarity::Positive));
        assert_eq!(jac.joints()[2].index, 3);
    }

    #[test]
    fn joint_poses_relative_to_reference() {
        let frames = serial_arm();
        let jac = GeometricJacobian::build(&frames, &velocity("wrist", "base")).unwrap();
        let poses: Vec<String> = jac.joint_poses().iter().map(ToString::to_string).collect();
        assert_eq!(poses, vec!["shoulder__base", "elbow__base", "slide__base"]);
        assert_eq!(jac.target_pose().to_string(), "wrist__base");
    }

    #[test]
    fn reversed_traversal_is_negative() {
        let frames = serial_arm();
        let jac = GeometricJacobian::build(&frames, &velocity("base", "forearm")).unwrap();
        assert_eq!(joint_names(&jac), vec!["elbow", "shoulder"]);
        assert_eq!(
            jac.polarities(),
            &[Polarity::Negative, Polarity::Negative]
        );
    }

    #[test]
    fn across_branches_mixes_polarities() {
        let frames = branched_robot();
        let jac = GeometricJacobian::build(&frames, &velocity("r_arm", "l_hand")).unwrap();
        assert_eq!(joint_names(&jac), vec!["l_shoulder", "r_shoulder"]);
        assert_eq!(
            jac.polarities(),
            &[Polarity::Negative, Polarity::Positive]
        );
    }

    #[test]
    fn same_link_has_no_columns() {
        let frames = serial_arm();
        let jac = GeometricJacobian::build(&frames, &velocity("forearm", "forearm")).unwrap();
        assert_eq!(jac.columns(), 0);
    }

    // -- errors --

    #[test]
    fn frame_role_must_match() {
        let frames = serial_arm();
        let err = GeometricJacobian::build(&frames, &velocity("elbow", "base")).unwrap_err();
        assert!(matches!(err, SolverError::Robot(_)));
    }

    #[test]
    fn unsupported_joint_kind() {
        let frames = planar_robot();
        let err = GeometricJacobian::build(&frames, &velocity("plate", "base")).unwrap_err();
        assert!(matches!(
            err,
            SolverError::UnsupportedJointKind { ref joint, .. } if joint == "table"
        ));
    }
}
