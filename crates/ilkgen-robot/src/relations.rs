//! Symbolic relations between frames: relative poses and velocities.
//!
//! Relations are identities, not values. Composing `a` relative to `b` with
//! `b` relative to `c` yields `a` relative to `c`; nothing numeric happens.

use std::fmt;
use std::hash::Hash;

use crate::frames::Frame;

// ---------------------------------------------------------------------------
// Relation
// ---------------------------------------------------------------------------

/// A directed binary relation between two frames that can be chained.
pub trait Relation: Clone + Eq + Hash + fmt::Debug + fmt::Display {
    /// Whether chains of this relation fold with swapped operands.
    ///
    /// Velocity chains are built from the reference outwards, so each binary
    /// step composes the later element with the accumulated earlier ones.
    const PAIRWISE_SWAP: bool = false;

    /// `self` relative to `other`'s target, composed with `other`.
    fn compose(&self, other: &Self) -> Self;
}

// ---------------------------------------------------------------------------
// Pose
// ---------------------------------------------------------------------------

/// Placement of `target` relative to `reference`.
///
/// Ordered by target name, then reference name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pose {
    target: Frame,
    reference: Frame,
}

impl Pose {
    pub const fn new(target: Frame, reference: Frame) -> Self {
        Self { target, reference }
    }

    pub const fn target(&self) -> &Frame {
        &self.target
    }

    pub const fn reference(&self) -> &Frame {
        &self.reference
    }
}

impl Relation for Pose {
    fn compose(&self, other: &Self) -> Self {
        Self::new(self.target.clone(), other.reference.clone())
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}__{}", self.target.name(), self.reference.name())
    }
}

// ---------------------------------------------------------------------------
// Velocity
// ---------------------------------------------------------------------------

/// Spatial velocity of `target` relative to `reference`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Velocity {
    target: Frame,
    reference: Frame,
}

impl Velocity {
    pub const fn new(target: Frame, reference: Frame) -> Self {
        Self { target, reference }
    }

    pub const fn target(&self) -> &Frame {
        &self.target
    }

    pub const fn reference(&self) -> &Frame {
        &self.reference
    }
}

impl Relation for Velocity {
    const PAIRWISE_SWAP: bool = true;

    fn compose(&self, other: &Self) -> Self {
        Self::new(self.target.clone(), other.reference.clone())
    }
}

impl fmt::Display for Velocity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v__{}__{}", self.target.name(), self.reference.name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn link(name: &str) -> Frame {
        Frame::link(name)
    }

    #[test]
    fn pose_compose_chains_endpoints() {
        let ab = Pose::new(link("a"), link("b"));
        let bc = Pose::new(link("b"), link("c"));
        assert_eq!(ab.compose(&bc), Pose::new(link("a"), link("c")));
    }

    #[test]
    fn pose_is_directional() {
        let ab = Pose::new(link("a"), link("b"));
        let ba = Pose::new(link("b"), link("a"));
        assert_ne!(ab, ba);
        assert_eq!(ab.compose(&ba), Pose::new(link("a"), link("a")));
    }

    #[test]
    fn velocity_compose_chains_endpoints() {
        let v21 = Velocity::new(link("l2"), link("l1"));
        let v10 = Velocity::new(link("l1"), link("l0"));
        assert_eq!(v21.compose(&v10), Velocity::new(link("l2"), link("l0")));
    }

    #[test]
    fn swap_flag_per_kind() {
        assert!(!Pose::PAIRWISE_SWAP);
        assert!(Velocity::PAIRWISE_SWAP);
    }

    #[test]
    fn display_identifiers() {
        assert_eq!(Pose::new(link("ee"), link("base")).to_string(), "ee__base");
        assert_eq!(
            Velocity::new(link("ee"), link("base")).to_string(),
            "v__ee__base"
        );
    }

    #[test]
    fn poses_order_by_target_then_reference() {
        let mut poses = vec![
            Pose::new(link("b"), link("a")),
            Pose::new(link("a"), link("c")),
            Pose::new(link("a"), link("b")),
        ];
        poses.sort();
        let names: Vec<String> = poses.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["a__b", "a__c", "b__a"]);
    }
}
