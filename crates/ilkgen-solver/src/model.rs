//! Forward-kinematics solver models.
//!
//! A [`FkSolverModel`] works out every relation a forward solver has to
//! evaluate for a request, and the order in which to compose them:
//!
//! ```text
//! jacobians ──► joint poses ─────────────────────────┐
//! velocities ──► velocity paths ──► optimizer ──► poses needed by the
//!                                                 velocity compositions
//!                                                    │
//! requested poses ◄──────────────────────────────────┘
//!      └──► pose paths ──► optimizer ──► pose compositions
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use ilkgen_robot::{Frame, FrameGraph, FrameRelationKind, FrameRole, Pose, Velocity};

use crate::compose::{BinaryComposition, Path};
use crate::error::SolverError;
use crate::jacobian::GeometricJacobian;
use crate::joint::{Polarity, SolverJoint};
use crate::optimizer::{Composition, all_composes};

// ---------------------------------------------------------------------------
// Specs
// ---------------------------------------------------------------------------

/// A requested Jacobian, identified by its velocity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JacobianSpecs {
    pub velocity: Velocity,
}

/// What a forward solver has to compute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FkSolverSpecs {
    pub name: String,
    pub robot: String,
    pub poses: Vec<Pose>,
    pub velocities: Vec<Velocity>,
    pub jacobians: Vec<JacobianSpecs>,
}

impl FkSolverSpecs {
    /// Whether both requests compute the same outputs, whatever their names.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.robot == other.robot
            && self.poses == other.poses
            && self.velocities == other.velocities
            && self.jacobians == other.jacobians
    }
}

// ---------------------------------------------------------------------------
// Model entries
// ---------------------------------------------------------------------------

/// Which way a joint-parametrized pose is read off its joint transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointPoseDirection {
    /// Successor link frame relative to the joint frame.
    AxB,
    /// Joint frame relative to the successor link frame.
    BxA,
}

impl JointPoseDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AxB => "a_x_b",
            Self::BxA => "b_x_a",
        }
    }
}

impl fmt::Display for JointPoseDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A distance-one pose that depends on a joint coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointPose {
    pub joint: SolverJoint,
    pub direction: JointPoseDirection,
}

/// The velocity across a single joint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointVel {
    pub joint: SolverJoint,
    pub velocity: Velocity,
    pub polarity: Polarity,
    /// Pose of the joint frame relative to the predecessor link, needed to
    /// express the velocity when the joint is crossed backwards.
    pub ctransform: Option<Pose>,
}

/// A binary velocity composition and the pose that carries `arg2` into the
/// coordinates of `arg1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VelocityCompose {
    pub step: BinaryComposition<Velocity>,
    pub pose: Pose,
}

/// An output quantity and its 1-based position among all outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output<T> {
    pub value: T,
    pub index: usize,
}

/// Requested outputs, numbered across poses, then velocities, then
/// Jacobians.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outputs {
    pub poses: Vec<Output<Pose>>,
    pub velocities: Vec<Output<Velocity>>,
    pub jacobians: Vec<Output<Velocity>>,
}

impl Outputs {
    fn number(specs: &FkSolverSpecs) -> Self {
        let mut index = 0;
        let mut next = || {
            index += 1;
            index
        };
        let poses = specs
            .poses
            .iter()
            .map(|p| Output {
                value: p.clone(),
                index: next(),
            })
            .collect();
        let velocities = specs
            .velocities
            .iter()
            .map(|v| Output {
                value: v.clone(),
                index: next(),
            })
            .collect();
        let jacobians = specs
            .jacobians
            .iter()
            .map(|j| Output {
                value: j.velocity.clone(),
                index: next(),
            })
            .collect();
        Self {
            poses,
            velocities,
            jacobians,
        }
    }

    pub fn len(&self) -> usize {
        self.poses.len() + self.velocities.len() + self.jacobians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// FkSolverModel
// ---------------------------------------------------------------------------

/// Everything a forward solver evaluates, and in which order.
#[derive(Debug, Clone)]
pub struct FkSolverModel {
    pub name: String,
    pub robot: String,
    /// Number of non-fixed joints of the robot.
    pub joint_space_size: usize,
    pub constant_poses: BTreeSet<Pose>,
    pub joint_poses: BTreeMap<Pose, JointPose>,
    pub joint_velocities: BTreeMap<Velocity, JointVel>,
    pub pose_compositions: Vec<Composition<Pose>>,
    pub velocity_compositions: Vec<Composition<Velocity>>,
    /// Pose compositions broken into binary steps.
    pub pose_composes: Vec<BinaryComposition<Pose>>,
    /// Joint velocities that must be evaluated on their own.
    pub explicit_joint_velocities: BTreeSet<Velocity>,
    pub velocity_composes: Vec<VelocityCompose>,
    pub jacobians: Vec<GeometricJacobian>,
    pub outputs: Outputs,
}

impl FkSolverModel {
    /// Work out the solver model for `specs`.
    ///
    /// # Errors
    ///
    /// - [`SolverError::UnsupportedJointKind`] if a requested relation
    ///   crosses a joint no solver can handle.
    /// - [`SolverError::NotALink`] if a velocity endpoint is not a link frame.
    /// - [`SolverError::AmbiguousFrameRole`] if a joint-parametrized pose
    ///   targets an attached frame.
    pub fn build(frames: &FrameGraph, specs: &FkSolverSpecs) -> Result<Self, SolverError> {
        let tree = frames.robot();
        let mut model = Self {
            name: specs.name.clone(),
            robot: tree.name().to_string(),
            joint_space_size: tree.model().dof(),
            constant_poses: BTreeSet::new(),
            joint_poses: BTreeMap::new(),
            joint_velocities: BTreeMap::new(),
            pose_compositions: Vec::new(),
            velocity_compositions: Vec::new(),
            pose_composes: Vec::new(),
            explicit_joint_velocities: BTreeSet::new(),
            velocity_composes: Vec::new(),
            jacobians: Vec::new(),
            outputs: Outputs::number(specs),
        };

        let mut required: BTreeSet<Pose> = specs.poses.iter().cloned().collect();

        // Jacobian columns need the pose of every joint frame.
        for jac in &specs.jacobians {
            let jacobian = GeometricJacobian::build(frames, &jac.velocity)?;
            required.extend(jacobian.joint_poses().iter().cloned());
            required.insert(jacobian.target_pose().clone());
            model.jacobians.push(jacobian);
        }

        let mut velocity_paths = specs
            .velocities
            .iter()
            .map(|v| model.velocity_path(frames, v))
            .collect::<Result<Vec<_>, _>>()?;
        model.velocity_compositions = all_composes(&mut velocity_paths);

        for composition in &model.velocity_compositions {
            for step in composition.binary_compositions() {
                let pose = Pose::new(step.arg2.target().clone(), step.arg1.target().clone());
                required.insert(pose.clone());
                if model.joint_velocities.contains_key(&step.arg2) {
                    model.explicit_joint_velocities.insert(step.arg2.clone());
                }
                model.velocity_composes.push(VelocityCompose { step, pose });
            }
        }
        for velocity in &specs.velocities {
            if model.joint_velocities.contains_key(velocity) {
                model.explicit_joint_velocities.insert(velocity.clone());
            }
        }
        required.extend(
            model
                .joint_velocities
                .values()
                .filter_map(|jv| jv.ctransform.clone()),
        );

        let mut pose_paths = required
            .iter()
            .map(|pose| model.pose_path(frames, pose))
            .collect::<Result<Vec<_>, _>>()?;
        model.pose_compositions = all_composes(&mut pose_paths);
        model.pose_composes = model
            .pose_compositions
            .iter()
            .flat_map(Composition::binary_compositions)
            .collect();

        debug!(
            solver = %model.name,
            poses = required.len(),
            pose_ops = model.pose_composes.len(),
            velocity_ops = model.velocity_composes.len(),
            "forward solver model built"
        );
        Ok(model)
    }

    /// Distance-one poses from the pose's target to its reference.
    ///
    /// Records every step as either a constant or a joint pose.
    fn pose_path(&mut self, frames: &FrameGraph, pose: &Pose) -> Result<Path<Pose>, SolverError> {
        let tree = frames.robot();
        let route = frames.path(pose.target(), pose.reference())?;
        let mut steps = Vec::with_capacity(route.len().saturating_sub(1));
        for pair in route.windows(2) {
            let (target, reference) = (&pair[0], &pair[1]);
            let step = Pose::new(target.clone(), reference.clone());
            let across = frames.kind(target, reference) == Some(FrameRelationKind::AcrossJoint);
            let joint = match frames.joint(target, reference) {
                Some(data) if across => Some(SolverJoint::resolve(tree, data)?),
                _ => None,
            };
            match joint {
                Some(joint) if !joint.is_fixed() => {
                    let direction = match target.role() {
                        FrameRole::Link => JointPoseDirection::AxB,
                        FrameRole::Joint => JointPoseDirection::BxA,
                        FrameRole::Attached => {
                            return Err(SolverError::AmbiguousFrameRole {
                                robot: tree.name().into(),
                                pose: step.to_string(),
                            });
                        }
                    };
                    self.joint_poses.insert(step.clone(), JointPose { joint, direction });
                }
                _ => {
                    self.constant_poses.insert(step.clone());
                }
            }
            steps.push(step);
        }
        Ok(Path::from_relations(steps))
    }

    /// Joint velocities from the velocity's reference link out to its target
    /// link.
    fn velocity_path(
        &mut self,
        frames: &FrameGraph,
        velocity: &Velocity,
    ) -> Result<Path<Velocity>, SolverError> {
        let tree = frames.robot();
        let not_a_link = |frame: &Frame| SolverError::NotALink {
            robot: tree.name().into(),
            frame: frame.name().into(),
        };
        for frame in [velocity.reference(), velocity.target()] {
            if !frame.is_link_frame() || !tree.has_link(frame.name()) {
                return Err(not_a_link(frame));
            }
        }

        let links = tree.link_path(velocity.reference().name(), velocity.target().name())?;
        let mut steps = Vec::with_capacity(links.len().saturating_sub(1));
        for pair in links.windows(2) {
            let (reference, target) = (pair[0], pair[1]);
            let data = tree
                .link_pair_to_joint(reference, target)
                .ok_or_else(|| not_a_link(&Frame::link(target)))?;
            let joint = SolverJoint::resolve(tree, data)?;
            let predecessor = tree.predecessor(data);
            let step = Velocity::new(Frame::link(target), Frame::link(reference));
            let (polarity, ctransform) = if target == predecessor {
                (
                    Polarity::Negative,
                    Some(Pose::new(
                        Frame::joint(joint.name.clone()),
                        Frame::link(predecessor),
                    )),
                )
            } else {
                (Polarity::Positive, None)
            };
            self.joint_velocities.insert(
                step.clone(),
                JointVel {
                    joint,
                    velocity: step.clone(),
                    polarity,
                    ctransform,
                },
            );
            steps.push(step);
        }
        Ok(Path::from_relations(steps))
    }

    /// Total number of primitive operations.
    pub fn op_count(&self) -> usize {
        self.pose_composes.len()
            + self.explicit_joint_velocities.len()
            + self.velocity_composes.len()
            + self
                .jacobians
                .iter()
                .map(|j| 1 + j.columns())
                .sum::<usize>()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ilkgen_test_utils::{branched_robot, planar_robot, serial_arm};

    fn pose(target: Frame, reference: Frame) -> Pose {
        Pose::new(target, reference)
    }

    fn links_pose(target: &str, reference: &str) -> Pose {
        pose(Frame::link(target), Frame::link(reference))
    }

    fn links_velocity(target: &str, reference: &str) -> Velocity {
        Velocity::new(Frame::link(target), Frame::link(reference))
    }

    fn specs(frames: &FrameGraph) -> FkSolverSpecs {
        FkSolverSpecs {
            name: "fk".into(),
            robot: frames.robot().name().into(),
            poses: Vec::new(),
            velocities: Vec::new(),
            jacobians: Vec::new(),
        }
    }

    fn names<T: ToString>(items: impl IntoIterator<Item = T>) -> Vec<String> {
        items.into_iter().map(|i| i.to_string()).collect()
    }

    // -- poses --

    #[test]
    fn adjacent_pose_is_single_entry() {
        let frames = serial_arm();
        let mut fk = specs(&frames);
        fk.poses.push(pose(Frame::link("upper_arm"), Frame::joint("shoulder")));
        let model = FkSolverModel::build(&frames, &fk).unwrap();
        assert!(model.pose_compositions.is_empty());
        assert!(model.constant_poses.is_empty());
        assert_eq!(model.joint_poses.len(), 1);

        let mut fk = specs(&frames);
        fk.poses.push(pose(Frame::joint("shoulder"), Frame::link("base")));
        let model = FkSolverModel::build(&frames, &fk).unwrap();
        assert!(model.pose_compositions.is_empty());
        assert_eq!(names(&model.constant_poses), vec!["shoulder__base"]);
        assert!(model.joint_poses.is_empty());
    }

    #[test]
    fn joint_pose_direction_follows_target_role() {
        let frames = serial_arm();
        let mut fk = specs(&frames);
        fk.poses.push(links_pose("forearm", "upper_arm"));
        fk.poses.push(links_pose("upper_arm", "forearm"));
        let model = FkSolverModel::build(&frames, &fk).unwrap();

        let forward = &model.joint_poses[&pose(Frame::link("forearm"), Frame::joint("elbow"))];
        assert_eq!(forward.direction, JointPoseDirection::AxB);
        assert_eq!(forward.joint.name, "elbow");
        let backward = &model.joint_poses[&pose(Frame::joint("elbow"), Frame::link("forearm"))];
        assert_eq!(backward.direction, JointPoseDirection::BxA);
    }

    #[test]
    fn fixed_joint_pose_is_constant() {
        let frames = serial_arm();
        let mut fk = specs(&frames);
        fk.poses.push(links_pose("tool", "wrist"));
        let model = FkSolverModel::build(&frames, &fk).unwrap();
        assert!(model.joint_poses.is_empty());
        assert_eq!(
            names(&model.constant_poses),
            vec!["tool__tool_mount", "tool_mount__wrist"]
        );
        assert_eq!(
            names(model.pose_composes.iter().map(|c| &c.result)),
            vec!["tool__wrist"]
        );
    }

    #[test]
    fn shared_prefix_is_composed_once() {
        let frames = serial_arm();
        let mut fk = specs(&frames);
        fk.poses.push(links_pose("wrist", "base"));
        fk.poses.push(links_pose("tool", "base"));
        let model = FkSolverModel::build(&frames, &fk).unwrap();

        let results: Vec<String> = model
            .pose_composes
            .iter()
            .map(|c| c.result.to_string())
            .collect();
        assert!(results.contains(&"wrist__base".to_string()));
        assert!(results.contains(&"tool__base".to_string()));
        let unique: BTreeSet<&String> = results.iter().collect();
        assert_eq!(unique.len(), results.len());
    }

    // -- velocities --

    #[test]
    fn velocity_chain_needs_transforms() {
        let frames = serial_arm();
        let mut fk = specs(&frames);
        fk.velocities.push(links_velocity("forearm", "base"));
        let model = FkSolverModel::build(&frames, &fk).unwrap();

        assert_eq!(
            names(model.joint_velocities.keys()),
            vec!["v__forearm__upper_arm", "v__upper_arm__base"]
        );
        assert_eq!(model.velocity_composes.len(), 1);
        let compose = &model.velocity_composes[0];
        assert_eq!(compose.step.arg1.to_string(), "v__forearm__upper_arm");
        assert_eq!(compose.step.arg2.to_string(), "v__upper_arm__base");
        assert_eq!(compose.step.result.to_string(), "v__forearm__base");
        assert_eq!(compose.pose.to_string(), "upper_arm__forearm");
        assert_eq!(
            names(&model.explicit_joint_velocities),
            vec!["v__upper_arm__base"]
        );
    }

    #[test]
    fn shared_velocity_chain_is_composed_once() {
        let frames = serial_arm();
        let mut fk = specs(&frames);
        fk.velocities.push(links_velocity("wrist", "base"));
        fk.velocities.push(links_velocity("forearm", "base"));
        let model = FkSolverModel::build(&frames, &fk).unwrap();

        let steps: Vec<[String; 4]> = model
            .velocity_composes
            .iter()
            .map(|c| {
                [
                    c.step.arg1.to_string(),
                    c.step.arg2.to_string(),
                    c.pose.to_string(),
                    c.step.result.to_string(),
                ]
            })
            .collect();
        assert_eq!(
            steps,
            vec![
                [
                    "v__forearm__upper_arm".to_string(),
                    "v__upper_arm__base".to_string(),
                    "upper_arm__forearm".to_string(),
                    "v__forearm__base".to_string(),
                ],
                [
                    "v__wrist__forearm".to_string(),
                    "v__forearm__base".to_string(),
                    "forearm__wrist".to_string(),
                    "v__wrist__base".to_string(),
                ],
            ]
        );
        assert_eq!(
            names(&model.explicit_joint_velocities),
            vec!["v__upper_arm__base"]
        );

        let mut composed = names(model.pose_composes.iter().map(|c| &c.result));
        composed.sort();
        assert_eq!(composed, vec!["forearm__wrist", "upper_arm__forearm"]);
    }

    #[test]
    fn single_joint_velocity_is_explicit() {
        let frames = serial_arm();
        let mut fk = specs(&frames);
        fk.velocities.push(links_velocity("upper_arm", "base"));
        let model = FkSolverModel::build(&frames, &fk).unwrap();
        assert!(model.velocity_composes.is_empty());
        assert_eq!(
            names(&model.explicit_joint_velocities),
            vec!["v__upper_arm__base"]
        );
    }

    #[test]
    fn backward_joint_velocity_needs_ctransform() {
        let frames = serial_arm();
        let mut fk = specs(&frames);
        fk.velocities.push(links_velocity("base", "upper_arm"));
        let model = FkSolverModel::build(&frames, &fk).unwrap();

        let jv = &model.joint_velocities[&links_velocity("base", "upper_arm")];
        assert_eq!(jv.polarity, Polarity::Negative);
        let ctransform = pose(Frame::joint("shoulder"), Frame::link("base"));
        assert_eq!(jv.ctransform.as_ref(), Some(&ctransform));
        assert!(model.constant_poses.contains(&ctransform));
    }

    #[test]
    fn velocity_endpoints_must_be_links() {
        let frames = serial_arm();
        let mut fk = specs(&frames);
        fk.velocities
            .push(Velocity::new(Frame::joint("elbow"), Frame::link("base")));
        let err = FkSolverModel::build(&frames, &fk).unwrap_err();
        assert!(matches!(err, SolverError::NotALink { ref frame, .. } if frame == "elbow"));
    }

    // -- jacobians --

    #[test]
    fn jacobian_requires_joint_poses() {
        let frames = serial_arm();
        let mut fk = specs(&frames);
        fk.jacobians.push(JacobianSpecs {
            velocity: links_velocity("wrist", "base"),
        });
        let model = FkSolverModel::build(&frames, &fk).unwrap();
        assert_eq!(model.jacobians.len(), 1);
        assert_eq!(model.jacobians[0].columns(), 3);

        let results: BTreeSet<String> = model
            .pose_composes
            .iter()
            .map(|c| c.result.to_string())
            .collect();
        for required in ["elbow__base", "slide__base", "wrist__base"] {
            assert!(results.contains(required), "missing {required}");
        }
        assert_eq!(model.op_count(), model.pose_composes.len() + 4);
    }

    // -- outputs --

    #[test]
    fn outputs_numbered_across_collections() {
        let frames = branched_robot();
        let mut fk = specs(&frames);
        fk.poses.push(links_pose("l_hand", "base"));
        fk.poses.push(links_pose("r_arm", "base"));
        fk.velocities.push(links_velocity("r_arm", "torso"));
        fk.jacobians.push(JacobianSpecs {
            velocity: links_velocity("l_hand", "base"),
        });
        let model = FkSolverModel::build(&frames, &fk).unwrap();

        let indices: Vec<usize> = model
            .outputs
            .poses
            .iter()
            .map(|o| o.index)
            .chain(model.outputs.velocities.iter().map(|o| o.index))
            .chain(model.outputs.jacobians.iter().map(|o| o.index))
            .collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
        assert_eq!(model.outputs.len(), 4);
        assert_eq!(model.joint_space_size, 3);
    }

    // -- errors --

    #[test]
    fn unsupported_joint_off_the_path_is_ignored() {
        let frames = planar_robot();
        let mut fk = specs(&frames);
        fk.poses.push(links_pose("carriage", "base"));
        fk.velocities.push(links_velocity("carriage", "base"));
        let model = FkSolverModel::build(&frames, &fk).unwrap();
        assert_eq!(model.joint_space_size, 2);
        assert_eq!(names(model.joint_poses.keys()), vec!["carriage__rail"]);
    }

    #[test]
    fn unsupported_joint_on_pose_path_aborts_model() {
        let frames = planar_robot();
        let mut fk = specs(&frames);
        fk.poses.push(links_pose("plate", "base"));
        let err = FkSolverModel::build(&frames, &fk).unwrap_err();
        assert!(matches!(err, SolverError::UnsupportedJointKind { ref joint, .. } if joint == "table"));
    }

    #[test]
    fn unsupported_joint_on_velocity_path_aborts_model() {
        let frames = planar_robot();
        let mut fk = specs(&frames);
        fk.velocities.push(links_velocity("plate", "carriage"));
        let err = FkSolverModel::build(&frames, &fk).unwrap_err();
        assert!(matches!(err, SolverError::UnsupportedJointKind { ref joint, .. } if joint == "table"));
    }

    #[test]
    fn attached_frame_pose_is_constant() {
        let mut frames = serial_arm();
        frames.attach_frame("marker", "upper_arm").unwrap();
        let mut fk = specs(&frames);
        fk.poses.push(pose(Frame::attached("marker"), Frame::link("base")));
        let model = FkSolverModel::build(&frames, &fk).unwrap();
        assert!(model
            .constant_poses
            .contains(&pose(Frame::attached("marker"), Frame::link("upper_arm"))));
    }

    // -- specs --

    #[test]
    fn equivalence_ignores_name() {
        let frames = serial_arm();
        let mut a = specs(&frames);
        a.poses.push(links_pose("tool", "base"));
        let mut b = a.clone();
        b.name = "other".into();
        assert!(a.is_equivalent(&b));
        b.poses.push(links_pose("wrist", "base"));
        assert!(!a.is_equivalent(&b));
    }
}
