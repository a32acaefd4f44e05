//! Inverse-kinematics solver models.
//!
//! An IK solver does not compose anything itself; it relies on a forward
//! solver computing the pose of its target and the Jacobian of the target
//! link's velocity. The model works out that forward request and binds to an
//! equivalent one when the query already asks for it.

use std::fmt;

use serde::Deserialize;
use tracing::info;

use ilkgen_robot::{Frame, FrameGraph, Pose, Velocity};

use crate::error::SolverError;
use crate::model::{FkSolverSpecs, JacobianSpecs};

/// Whether the solver works on positions or velocities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IkLevel {
    Position,
    Velocity,
}

impl IkLevel {
    /// Short tag used in solver descriptors.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Position => "pos",
            Self::Velocity => "vel",
        }
    }
}

/// Which part of the Cartesian configuration the solver targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CfgSpace {
    Linear,
    Angular,
    Pose,
}

impl CfgSpace {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Angular => "angular",
            Self::Pose => "pose",
        }
    }
}

impl fmt::Display for CfgSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated IK request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IkSolverSpecs {
    pub name: String,
    pub robot: String,
    pub level: IkLevel,
    pub cfg_space: CfgSpace,
    pub target: Frame,
    pub reference: Frame,
}

/// An IK solver and the forward solver it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IkSolverModel {
    pub name: String,
    pub robot: String,
    pub level: IkLevel,
    pub cfg_space: CfgSpace,
    pub target: Frame,
    pub reference: Frame,
    required_fk: FkSolverSpecs,
}

impl IkSolverModel {
    /// Derive the forward request `fk__<name>` the solver needs.
    ///
    /// # Errors
    ///
    /// Fails if the target or reference frame is unknown to `frames`.
    pub fn new(frames: &FrameGraph, specs: &IkSolverSpecs) -> Result<Self, SolverError> {
        let target_link = frames.link_frame_of(&specs.target)?;
        let reference_link = frames.link_frame_of(&specs.reference)?;
        let required_fk = FkSolverSpecs {
            name: format!("fk__{}", specs.name),
            robot: specs.robot.clone(),
            poses: vec![Pose::new(specs.target.clone(), specs.reference.clone())],
            velocities: Vec::new(),
            jacobians: vec![JacobianSpecs {
                velocity: Velocity::new(target_link, reference_link),
            }],
        };
        Ok(Self {
            name: specs.name.clone(),
            robot: specs.robot.clone(),
            level: specs.level,
            cfg_space: specs.cfg_space,
            target: specs.target.clone(),
            reference: specs.reference.clone(),
            required_fk,
        })
    }

    /// The forward request this solver relies on.
    pub const fn required_fk(&self) -> &FkSolverSpecs {
        &self.required_fk
    }

    /// Point at an equivalent forward request among `forward`, or append the
    /// required one to it.
    pub fn bind_required_fk(&mut self, forward: &mut Vec<FkSolverSpecs>) {
        if let Some(existing) = forward.iter().find(|fk| fk.is_equivalent(&self.required_fk)) {
            info!(
                ik = %self.name,
                fk = %existing.name,
                "required forward solver already requested"
            );
            self.required_fk.name.clone_from(&existing.name);
        } else {
            info!(
                ik = %self.name,
                fk = %self.required_fk.name,
                "generating forward solver required by IK solver"
            );
            forward.push(self.required_fk.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ilkgen_test_utils::serial_arm;

    fn ik_specs(target: Frame, reference: Frame) -> IkSolverSpecs {
        IkSolverSpecs {
            name: "ik1".into(),
            robot: "arm".into(),
            level: IkLevel::Position,
            cfg_space: CfgSpace::Pose,
            target,
            reference,
        }
    }

    #[test]
    fn required_fk_requests_pose_and_jacobian() {
        let frames = serial_arm();
        let model =
            IkSolverModel::new(&frames, &ik_specs(Frame::link("tool"), Frame::link("base"))).unwrap();
        let fk = model.required_fk();
        assert_eq!(fk.name, "fk__ik1");
        assert_eq!(fk.poses, vec![Pose::new(Frame::link("tool"), Frame::link("base"))]);
        assert_eq!(
            fk.jacobians[0].velocity,
            Velocity::new(Frame::link("tool"), Frame::link("base"))
        );
        assert!(fk.velocities.is_empty());
    }

    #[test]
    fn jacobian_uses_links_of_joint_frames() {
        let frames = serial_arm();
        let model =
            IkSolverModel::new(&frames, &ik_specs(Frame::joint("slide"), Frame::link("base"))).unwrap();
        assert_eq!(
            model.required_fk().jacobians[0].velocity,
            Velocity::new(Frame::link("forearm"), Frame::link("base"))
        );
    }

    #[test]
    fn binds_to_equivalent_request() {
        let frames = serial_arm();
        let mut model =
            IkSolverModel::new(&frames, &ik_specs(Frame::link("tool"), Frame::link("base"))).unwrap();
        let mut existing = model.required_fk().clone();
        existing.name = "mine".into();
        let mut forward = vec![existing];

        model.bind_required_fk(&mut forward);
        assert_eq!(forward.len(), 1);
        assert_eq!(model.required_fk().name, "mine");
    }

    #[test]
    fn appends_missing_request() {
        let frames = serial_arm();
        let mut model =
            IkSolverModel::new(&frames, &ik_specs(Frame::link("tool"), Frame::link("base"))).unwrap();
        let mut forward = Vec::new();
        model.bind_required_fk(&mut forward);
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].name, "fk__ik1");
    }

    #[test]
    fn level_tags() {
        assert_eq!(IkLevel::Position.tag(), "pos");
        assert_eq!(IkLevel::Velocity.tag(), "vel");
        assert_eq!(CfgSpace::Angular.to_string(), "angular");
    }
}
