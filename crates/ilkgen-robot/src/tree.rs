//! Kinematic tree with a regular numbering of links and joints.
//!
//! The root link gets code 0. Every other link gets the same code as the
//! joint that connects it to its parent, assigned in depth-first order from
//! the root, visiting the child joints of a link in name order. Joint codes
//! therefore start at 1.

use std::collections::{HashMap, HashSet};

use crate::error::RobotError;
use crate::types::{JointData, RobotModel};

/// A [`RobotModel`] validated as a tree and numbered.
#[derive(Debug, Clone)]
pub struct KinematicTree {
    model: RobotModel,
    /// Link names by code (index 0 is the root).
    links: Vec<String>,
    /// Joint names by code - 1.
    joints: Vec<String>,
    link_codes: HashMap<String, usize>,
    joint_codes: HashMap<String, usize>,
    /// Link name -> name of the joint connecting it to its parent.
    parent_joint: HashMap<String, String>,
}

impl KinematicTree {
    /// Number the given model.
    ///
    /// # Errors
    ///
    /// Fails if a link has more than one parent joint, or if some link is not
    /// reachable from the root link.
    pub fn new(model: RobotModel) -> Result<Self, RobotError> {
        let mut parent_joint = HashMap::new();
        let mut children: HashMap<&str, Vec<&JointData>> = HashMap::new();
        for joint in model.joints.values() {
            if parent_joint
                .insert(joint.child.clone(), joint.name.clone())
                .is_some()
            {
                return Err(RobotError::NotATree(joint.child.clone()));
            }
            children.entry(joint.parent.as_str()).or_default().push(joint);
        }
        for list in children.values_mut() {
            list.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let mut links = vec![model.root_link.clone()];
        let mut joints = Vec::with_capacity(model.joints.len());
        let mut stack: Vec<&JointData> = children
            .get(model.root_link.as_str())
            .map(|c| c.iter().rev().copied().collect())
            .unwrap_or_default();
        let mut visited: HashSet<&str> = HashSet::from([model.root_link.as_str()]);

        while let Some(joint) = stack.pop() {
            if !visited.insert(joint.child.as_str()) {
                return Err(RobotError::NotATree(joint.child.clone()));
            }
            joints.push(joint.name.clone());
            links.push(joint.child.clone());
            if let Some(grandchildren) = children.get(joint.child.as_str()) {
                stack.extend(grandchildren.iter().rev().copied());
            }
        }

        if let Some(orphan) = model
            .links
            .keys()
            .filter(|name| !visited.contains(name.as_str()))
            .min()
        {
            return Err(RobotError::DisconnectedLink(orphan.clone()));
        }

        let link_codes = links
            .iter()
            .enumerate()
            .map(|(code, name)| (name.clone(), code))
            .collect();
        let joint_codes = joints
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i + 1))
            .collect();

        Ok(Self {
            model,
            links,
            joints,
            link_codes,
            joint_codes,
            parent_joint,
        })
    }

    /// Robot name.
    pub fn name(&self) -> &str {
        &self.model.name
    }

    /// The underlying connectivity model.
    pub fn model(&self) -> &RobotModel {
        &self.model
    }

    /// Name of the root (base) link.
    pub fn base(&self) -> &str {
        &self.model.root_link
    }

    /// Link names in numbering order, root first.
    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Joint names in numbering order.
    pub fn joints(&self) -> &[String] {
        &self.joints
    }

    /// Get a joint by name.
    pub fn joint(&self, name: &str) -> Result<&JointData, RobotError> {
        self.model.joint(name)
    }

    /// Whether the robot has a link with this name.
    pub fn has_link(&self, name: &str) -> bool {
        self.link_codes.contains_key(name)
    }

    /// Code of a link (0 for the root).
    pub fn link_num(&self, link: &str) -> Option<usize> {
        self.link_codes.get(link).copied()
    }

    /// Code of a joint (1-based).
    pub fn joint_num(&self, joint: &str) -> Option<usize> {
        self.joint_codes.get(joint).copied()
    }

    /// The link a joint moves relative to.
    pub fn predecessor<'a>(&self, joint: &'a JointData) -> &'a str {
        &joint.parent
    }

    /// The link a joint moves.
    pub fn successor<'a>(&self, joint: &'a JointData) -> &'a str {
        &joint.child
    }

    /// The joint connecting `link` to its parent, `None` for the root.
    pub fn parent_joint(&self, link: &str) -> Option<&JointData> {
        self.parent_joint
            .get(link)
            .and_then(|name| self.model.joints.get(name))
    }

    /// The joint directly connecting two adjacent links, in either order.
    pub fn link_pair_to_joint(&self, a: &str, b: &str) -> Option<&JointData> {
        self.parent_joint(a)
            .filter(|j| j.parent == b)
            .or_else(|| self.parent_joint(b).filter(|j| j.parent == a))
    }

    /// The unique sequence of links from `from` to `to`, both included.
    pub fn link_path(&self, from: &str, to: &str) -> Result<Vec<&str>, RobotError> {
        let up_from = self.ancestry(from)?;
        let up_to = self.ancestry(to)?;

        let on_from_side: HashSet<&str> = up_from.iter().copied().collect();
        let (lca_pos, lca) = up_to
            .iter()
            .enumerate()
            .find(|(_, link)| on_from_side.contains(*link))
            .map(|(i, link)| (i, *link))
            .ok_or_else(|| RobotError::NoPath {
                from: from.into(),
                to: to.into(),
            })?;

        let mut path: Vec<&str> = up_from.iter().copied().take_while(|l| *l != lca).collect();
        path.push(lca);
        path.extend(up_to[..lca_pos].iter().rev().copied());
        Ok(path)
    }

    /// `link` followed by all its ancestors up to the root.
    fn ancestry(&self, link: &str) -> Result<Vec<&str>, RobotError> {
        let code = self
            .link_num(link)
            .ok_or_else(|| RobotError::MissingLink(link.into()))?;
        let start = self.links[code].as_str();
        let mut chain = vec![start];
        let mut current = start;
        while let Some(joint) = self.parent_joint(current) {
            current = joint.parent.as_str();
            chain.push(current);
        }
        Ok(chain)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JointType, LinkData};

    /// base -> torso, torso -> {left, right}, left -> left_hand
    fn branched() -> KinematicTree {
        let model = RobotModel::from_parts(
            "branched",
            ["base", "torso", "left", "right", "left_hand"].map(LinkData::new),
            [
                JointData::new("waist", JointType::Revolute, "base", "torso"),
                JointData::new("r_shoulder", JointType::Revolute, "torso", "right"),
                JointData::new("l_shoulder", JointType::Prismatic, "torso", "left"),
                JointData::new("l_wrist", JointType::Fixed, "left", "left_hand"),
            ],
        )
        .unwrap();
        KinematicTree::new(model).unwrap()
    }

    // -- numbering --

    #[test]
    fn root_is_code_zero() {
        let tree = branched();
        assert_eq!(tree.base(), "base");
        assert_eq!(tree.link_num("base"), Some(0));
    }

    #[test]
    fn depth_first_numbering_by_joint_name() {
        let tree = branched();
        assert_eq!(
            tree.joints(),
            &["waist", "l_shoulder", "l_wrist", "r_shoulder"]
        );
        assert_eq!(
            tree.links(),
            &["base", "torso", "left", "left_hand", "right"]
        );
        assert_eq!(tree.joint_num("waist"), Some(1));
        assert_eq!(tree.joint_num("r_shoulder"), Some(4));
        assert_eq!(tree.link_num("left_hand"), Some(3));
    }

    // -- adjacency --

    #[test]
    fn predecessor_and_successor() {
        let tree = branched();
        let joint = tree.joint("l_shoulder").unwrap();
        assert_eq!(tree.predecessor(joint), "torso");
        assert_eq!(tree.successor(joint), "left");
    }

    #[test]
    fn link_pair_to_joint_is_symmetric() {
        let tree = branched();
        assert_eq!(tree.link_pair_to_joint("torso", "left").unwrap().name, "l_shoulder");
        assert_eq!(tree.link_pair_to_joint("left", "torso").unwrap().name, "l_shoulder");
        assert!(tree.link_pair_to_joint("left", "right").is_none());
    }

    // -- link_path --

    #[test]
    fn link_path_down_the_tree() {
        let tree = branched();
        assert_eq!(
            tree.link_path("base", "left_hand").unwrap(),
            vec!["base", "torso", "left", "left_hand"]
        );
    }

    #[test]
    fn link_path_across_branches() {
        let tree = branched();
        assert_eq!(
            tree.link_path("left_hand", "right").unwrap(),
            vec!["left_hand", "left", "torso", "right"]
        );
    }

    #[test]
    fn link_path_to_itself() {
        let tree = branched();
        assert_eq!(tree.link_path("torso", "torso").unwrap(), vec!["torso"]);
    }

    #[test]
    fn link_path_unknown_link() {
        let tree = branched();
        assert!(matches!(
            tree.link_path("base", "ghost"),
            Err(RobotError::MissingLink(_))
        ));
    }

    // -- validation --

    #[test]
    fn two_parents_rejected() {
        let model = RobotModel::from_parts(
            "loop",
            ["a", "b", "c"].map(LinkData::new),
            [
                JointData::new("j1", JointType::Revolute, "a", "b"),
                JointData::new("j2", JointType::Revolute, "a", "c"),
                JointData::new("j3", JointType::Revolute, "b", "c"),
            ],
        )
        .unwrap();
        assert!(matches!(
            KinematicTree::new(model),
            Err(RobotError::NotATree(link)) if link == "c"
        ));
    }

    #[test]
    fn disconnected_link_rejected() {
        let model = RobotModel::from_parts(
            "split",
            ["a", "b", "z"].map(LinkData::new),
            [JointData::new("j1", JointType::Revolute, "a", "b")],
        )
        .unwrap();
        assert!(matches!(
            KinematicTree::new(model),
            Err(RobotError::DisconnectedLink(link)) if link == "z"
        ));
    }
}
