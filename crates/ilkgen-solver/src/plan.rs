//! The full set of solvers to generate for a query.

use ilkgen_robot::FrameGraph;

use crate::error::SolverError;
use crate::ik::IkSolverModel;
use crate::model::FkSolverSpecs;
use crate::query::ValidatedQuery;

/// Forward requests, including those IK solvers depend on, and IK models.
#[derive(Debug, Clone, Default)]
pub struct SolverPlan {
    pub forward: Vec<FkSolverSpecs>,
    pub inverse: Vec<IkSolverModel>,
}

impl SolverPlan {
    /// Bind every IK solver to a forward request, adding the missing ones.
    pub fn new(frames: &FrameGraph, query: ValidatedQuery) -> Result<Self, SolverError> {
        let mut forward = query.forward;
        let mut inverse = Vec::with_capacity(query.inverse.len());
        for specs in &query.inverse {
            let mut model = IkSolverModel::new(frames, specs)?;
            model.bind_required_fk(&mut forward);
            inverse.push(model);
        }
        Ok(Self { forward, inverse })
    }
}
