//! Frames attached to the robot and the graph connecting them.
//!
//! Every link carries a link frame and every joint a joint frame, both named
//! like their owner. A joint frame is rigidly attached to the joint's
//! predecessor link; the successor link frame moves relative to it with the
//! joint. Additional user frames can be attached rigidly to any link.
//!
//! ```text
//! predecessor link ──(constant)── joint ──(across joint)── successor link
//! ```

use std::collections::HashMap;
use std::fmt;

use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::RobotError;
use crate::tree::KinematicTree;
use crate::types::JointData;

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// What a frame is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameRole {
    /// The reference frame of a link.
    Link,
    /// The reference frame of a joint.
    Joint,
    /// A user frame rigidly attached to a link.
    Attached,
}

/// A named coordinate frame of the robot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Frame {
    name: String,
    role: FrameRole,
}

impl Frame {
    pub fn new(name: impl Into<String>, role: FrameRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn link(name: impl Into<String>) -> Self {
        Self::new(name, FrameRole::Link)
    }

    pub fn joint(name: impl Into<String>) -> Self {
        Self::new(name, FrameRole::Joint)
    }

    pub fn attached(name: impl Into<String>) -> Self {
        Self::new(name, FrameRole::Attached)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn role(&self) -> FrameRole {
        self.role
    }

    pub fn is_link_frame(&self) -> bool {
        self.role == FrameRole::Link
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// FrameRelationKind
// ---------------------------------------------------------------------------

/// How two adjacent frames are related.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameRelationKind {
    /// Rigidly attached to the same body.
    Constant,
    /// Separated by the motion of a joint.
    AcrossJoint,
}

#[derive(Debug, Clone)]
struct FrameEdge {
    kind: FrameRelationKind,
    joint: Option<String>,
}

// ---------------------------------------------------------------------------
// FrameGraph
// ---------------------------------------------------------------------------

/// Undirected graph of all the frames of a robot.
///
/// The graph is a tree, so the shortest path between two frames is the
/// unique path between them.
#[derive(Debug, Clone)]
pub struct FrameGraph {
    tree: KinematicTree,
    graph: UnGraph<Frame, FrameEdge>,
    by_name: HashMap<String, NodeIndex>,
    /// Attached frame name -> link name.
    attachments: HashMap<String, String>,
}

impl FrameGraph {
    /// Build the link and joint frames of `tree`.
    ///
    /// # Errors
    ///
    /// Fails if a link and a joint share a name.
    pub fn new(tree: KinematicTree) -> Result<Self, RobotError> {
        let mut frames = Self {
            tree,
            graph: UnGraph::default(),
            by_name: HashMap::new(),
            attachments: HashMap::new(),
        };

        let links = frames.tree.links().to_vec();
        for link in links {
            frames.add_frame(Frame::link(link))?;
        }

        let joints: Vec<JointData> = frames
            .tree
            .joints()
            .iter()
            .map(|name| frames.tree.joint(name).cloned())
            .collect::<Result<_, _>>()?;
        for joint in joints {
            let joint_node = frames.add_frame(Frame::joint(joint.name.clone()))?;
            let predecessor = frames.link_node(frames.tree.predecessor(&joint))?;
            let successor = frames.link_node(frames.tree.successor(&joint))?;
            frames.graph.add_edge(
                predecessor,
                joint_node,
                FrameEdge {
                    kind: FrameRelationKind::Constant,
                    joint: None,
                },
            );
            frames.graph.add_edge(
                joint_node,
                successor,
                FrameEdge {
                    kind: FrameRelationKind::AcrossJoint,
                    joint: Some(joint.name),
                },
            );
        }

        Ok(frames)
    }

    /// Rigidly attach a new user frame to `link`.
    pub fn attach_frame(
        &mut self,
        name: impl Into<String>,
        link: &str,
    ) -> Result<Frame, RobotError> {
        let name = name.into();
        let link_node = self.link_node(link)?;
        let frame = Frame::attached(name.clone());
        let node = self.add_frame(frame.clone())?;
        self.graph.add_edge(
            link_node,
            node,
            FrameEdge {
                kind: FrameRelationKind::Constant,
                joint: None,
            },
        );
        self.attachments.insert(name, link.into());
        Ok(frame)
    }

    fn link_node(&self, link: &str) -> Result<NodeIndex, RobotError> {
        self.by_name
            .get(link)
            .copied()
            .filter(|idx| self.graph[*idx].is_link_frame())
            .ok_or_else(|| RobotError::MissingLink(link.into()))
    }

    fn add_frame(&mut self, frame: Frame) -> Result<NodeIndex, RobotError> {
        if self.by_name.contains_key(frame.name()) {
            return Err(RobotError::DuplicateFrame(frame.name().into()));
        }
        let name = frame.name().to_string();
        let idx = self.graph.add_node(frame);
        self.by_name.insert(name, idx);
        Ok(idx)
    }

    /// The numbered kinematic tree the frames belong to.
    pub const fn robot(&self) -> &KinematicTree {
        &self.tree
    }

    /// Look up a frame by name.
    pub fn frame(&self, name: &str) -> Option<&Frame> {
        self.by_name.get(name).map(|idx| &self.graph[*idx])
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    fn node(&self, frame: &Frame) -> Result<NodeIndex, RobotError> {
        self.by_name
            .get(frame.name())
            .copied()
            .filter(|idx| self.graph[*idx] == *frame)
            .ok_or_else(|| RobotError::MissingFrame(frame.name().into()))
    }

    /// The sequence of frames from `from` to `to`, both included.
    pub fn path(&self, from: &Frame, to: &Frame) -> Result<Vec<Frame>, RobotError> {
        let start = self.node(from)?;
        let goal = self.node(to)?;
        let (_, nodes) = astar(&self.graph, start, |n| n == goal, |_| 1u32, |_| 0)
            .ok_or_else(|| RobotError::NoPath {
                from: from.name().into(),
                to: to.name().into(),
            })?;
        Ok(nodes.into_iter().map(|n| self.graph[n].clone()).collect())
    }

    /// How two adjacent frames are related; `None` if they are not adjacent.
    pub fn kind(&self, a: &Frame, b: &Frame) -> Option<FrameRelationKind> {
        self.edge(a, b).map(|e| e.kind)
    }

    /// The joint separating two adjacent frames, if they are across a joint.
    pub fn joint(&self, a: &Frame, b: &Frame) -> Option<&JointData> {
        self.edge(a, b)
            .and_then(|e| e.joint.as_deref())
            .and_then(|name| self.tree.joint(name).ok())
    }

    fn edge(&self, a: &Frame, b: &Frame) -> Option<&FrameEdge> {
        let a = self.node(a).ok()?;
        let b = self.node(b).ok()?;
        self.graph.find_edge(a, b).map(|e| &self.graph[e])
    }

    /// The joint owning a joint frame.
    pub fn joint_of_frame(&self, frame: &Frame) -> Option<&JointData> {
        match frame.role() {
            FrameRole::Joint => self.tree.joint(frame.name()).ok(),
            FrameRole::Link | FrameRole::Attached => None,
        }
    }

    /// The frame of the link that `frame` is rigidly attached to.
    pub fn link_frame_of(&self, frame: &Frame) -> Result<Frame, RobotError> {
        match frame.role() {
            FrameRole::Link => Ok(frame.clone()),
            FrameRole::Joint => {
                let joint = self.tree.joint(frame.name())?;
                Ok(Frame::link(self.tree.predecessor(joint)))
            }
            FrameRole::Attached => self
                .attachments
                .get(frame.name())
                .map(Frame::link)
                .ok_or_else(|| RobotError::MissingFrame(frame.name().into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
