//! User queries: which solvers to generate for a robot.
//!
//! Queries are YAML documents:
//!
//! ```yaml
//! robot: ur5
//! solvers:
//!   - name: fk1
//!     kind: sweeping
//!     outputs:
//!       poses: [{target: ee, reference: base}]
//!       velocities: [{target: wrist, reference: base, kind: 6D}]
//!       jacs: [{target: wrist, reference: base}]
//!   - name: ik1
//!     kind: IK
//!     level: position
//!     cfgSpace: pose
//!     frames: {target: ee, reference: base}
//! ```
//!
//! Frames are referred to by name. Validation against a [`FrameGraph`]
//! resolves every name before any solver model is built.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use ilkgen_robot::{Frame, FrameGraph, Pose, Velocity};

use crate::error::SolverError;
use crate::ik::{CfgSpace, IkLevel, IkSolverSpecs};
use crate::model::{FkSolverSpecs, JacobianSpecs};

const SWEEPING: &str = "sweeping";
const IK: &str = "IK";
const SIX_D: &str = "6D";

// ---------------------------------------------------------------------------
// Query document
// ---------------------------------------------------------------------------

/// A pair of frame names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FramePair {
    pub target: String,
    pub reference: String,
}

impl FramePair {
    pub fn new(target: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            reference: reference.into(),
        }
    }
}

/// A requested relative velocity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VelocityRequest {
    pub target: String,
    pub reference: String,
    #[serde(default = "default_velocity_kind")]
    pub kind: String,
}

fn default_velocity_kind() -> String {
    SIX_D.into()
}

/// Outputs of a sweeping (forward) solver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputsRequest {
    #[serde(default)]
    pub poses: Vec<FramePair>,
    #[serde(default)]
    pub velocities: Vec<VelocityRequest>,
    #[serde(default, alias = "jacobians")]
    pub jacs: Vec<FramePair>,
}

/// One solver entry, as written in the query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SolverRequest {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub outputs: OutputsRequest,
    #[serde(default)]
    pub level: Option<IkLevel>,
    #[serde(default, rename = "cfgSpace")]
    pub cfg_space: Option<CfgSpace>,
    #[serde(default)]
    pub frames: Option<FramePair>,
}

/// A parsed, not yet validated, query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Query {
    pub robot: String,
    #[serde(default)]
    pub solvers: Vec<SolverRequest>,
}

/// The solver requests of a query, resolved against a robot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub forward: Vec<FkSolverSpecs>,
    pub inverse: Vec<IkSolverSpecs>,
}

impl Query {
    /// Parse a YAML query.
    pub fn from_yaml(text: &str) -> Result<Self, SolverError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a YAML query file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SolverError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SolverError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&text)
    }

    /// The query used when none is given: a forward solver `default-fk`
    /// computing the pose of the last-numbered link relative to the base.
    pub fn default_for(frames: &FrameGraph) -> Self {
        let tree = frames.robot();
        let last = tree.links().last().map_or(tree.base(), String::as_str);
        Self {
            robot: tree.name().into(),
            solvers: vec![SolverRequest {
                name: "default-fk".into(),
                kind: SWEEPING.into(),
                outputs: OutputsRequest {
                    poses: vec![FramePair::new(last, tree.base())],
                    ..OutputsRequest::default()
                },
                level: None,
                cfg_space: None,
                frames: None,
            }],
        }
    }

    /// Resolve every frame name against `frames`.
    ///
    /// Solvers of unknown kind are skipped with a warning.
    ///
    /// # Errors
    ///
    /// - [`SolverError::RobotMismatch`] if the query names another robot.
    /// - [`SolverError::UnresolvedFrame`] if a frame name is unknown.
    /// - [`SolverError::UnsupportedVelocityKind`] for non-6D velocities.
    /// - [`SolverError::QueryParse`] if an IK entry lacks a field.
    pub fn validate(&self, frames: &FrameGraph) -> Result<ValidatedQuery, SolverError> {
        let robot = frames.robot().name();
        if self.robot != robot {
            return Err(SolverError::RobotMismatch {
                query: self.robot.clone(),
                model: robot.into(),
            });
        }

        let resolver = Resolver { frames };
        let mut validated = ValidatedQuery::default();
        for solver in &self.solvers {
            match solver.kind.as_str() {
                SWEEPING => validated.forward.push(resolver.forward(solver)?),
                IK => validated.inverse.push(resolver.inverse(solver)?),
                other => warn!(solver = %solver.name, kind = other, "unknown solver kind, skipping"),
            }
        }
        Ok(validated)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

struct Resolver<'a> {
    frames: &'a FrameGraph,
}

impl Resolver<'_> {
    fn robot(&self) -> String {
        self.frames.robot().name().into()
    }

    fn frame(&self, name: &str) -> Result<Frame, SolverError> {
        self.frames
            .frame(name)
            .cloned()
            .ok_or_else(|| SolverError::UnresolvedFrame {
                robot: self.robot(),
                frame: name.into(),
            })
    }

    fn pair(&self, pair: &FramePair) -> Result<(Frame, Frame), SolverError> {
        Ok((self.frame(&pair.target)?, self.frame(&pair.reference)?))
    }

    fn velocity(&self, request: &VelocityRequest) -> Result<Velocity, SolverError> {
        if request.kind != SIX_D {
            return Err(SolverError::UnsupportedVelocityKind(request.kind.clone()));
        }
        Ok(Velocity::new(
            self.frame(&request.target)?,
            self.frame(&request.reference)?,
        ))
    }

    fn forward(&self, solver: &SolverRequest) -> Result<FkSolverSpecs, SolverError> {
        let outputs = &solver.outputs;
        let poses = outputs
            .poses
            .iter()
            .map(|p| self.pair(p).map(|(t, r)| Pose::new(t, r)))
            .collect::<Result<_, _>>()?;
        let velocities = outputs
            .velocities
            .iter()
            .map(|v| self.velocity(v))
            .collect::<Result<_, _>>()?;
        let jacobians = outputs
            .jacs
            .iter()
            .map(|j| {
                self.pair(j).map(|(t, r)| JacobianSpecs {
                    velocity: Velocity::new(t, r),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(FkSolverSpecs {
            name: solver.name.clone(),
            robot: self.robot(),
            poses,
            velocities,
            jacobians,
        })
    }

    fn inverse(&self, solver: &SolverRequest) -> Result<IkSolverSpecs, SolverError> {
        let missing = |field: &str| {
            SolverError::QueryParse(format!("IK solver '{}' has no '{field}'", solver.name))
        };
        let level = solver.level.ok_or_else(|| missing("level"))?;
        let cfg_space = solver.cfg_space.ok_or_else(|| missing("cfgSpace"))?;
        let frames = solver.frames.as_ref().ok_or_else(|| missing("frames"))?;
        let (target, reference) = self.pair(frames)?;
        Ok(IkSolverSpecs {
            name: solver.name.clone(),
            robot: self.robot(),
            level,
            cfg_space,
            target,
            reference,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
