//! Frame graphs of the fixture robots.

use ilkgen_robot::{FrameGraph, load_string};

use crate::urdf;

/// Frame graph of [`urdf::SERIAL_ARM`].
pub fn serial_arm() -> FrameGraph {
    load_string(urdf::SERIAL_ARM).unwrap()
}

/// Frame graph of [`urdf::BRANCHED`].
pub fn branched_robot() -> FrameGraph {
    load_string(urdf::BRANCHED).unwrap()
}

/// Frame graph of [`urdf::PLANAR`].
pub fn planar_robot() -> FrameGraph {
    load_string(urdf::PLANAR).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
