//! Solver generation for one robot and one query.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use ilkgen_emit::{forward_solver, inverse_solver};
use ilkgen_solver::{FkSolverModel, Query, SolverPlan};

use crate::config::GeneratorConfig;
use crate::error::CliError;

/// Generate every solver requested by `query` (or the default query) for the
/// robot described by the URDF file `robot`.
///
/// A forward solver whose model cannot be built is logged and skipped, along
/// with the IK solvers bound to it; the remaining solvers are still written
/// and the call then fails with [`CliError::Partial`].
///
/// Returns the paths of the written files.
///
/// # Errors
///
/// Fails if the robot or query cannot be loaded, if the query does not
/// validate against the robot, or if a file cannot be written.
pub fn generate(
    robot: &Path,
    query: Option<&Path>,
    config: &GeneratorConfig,
) -> Result<Vec<PathBuf>, CliError> {
    let frames = ilkgen_robot::load_file(robot)?;
    let query = match query {
        Some(path) => Query::from_file(path)?,
        None => Query::default_for(&frames),
    };
    let plan = SolverPlan::new(&frames, query.validate(&frames)?)?;

    std::fs::create_dir_all(&config.output_dir).map_err(|source| CliError::Write {
        path: config.output_dir.clone(),
        source,
    })?;

    let total = plan.forward.len() + plan.inverse.len();
    let mut failed_fk = HashSet::new();
    let mut written = Vec::with_capacity(total);
    for specs in &plan.forward {
        match FkSolverModel::build(&frames, specs) {
            Ok(model) => {
                written.push(write_solver(config, &model.name, &forward_solver(&model))?);
            }
            Err(e) => {
                error!(solver = %specs.name, error = %e, "failed to build forward solver");
                failed_fk.insert(specs.name.as_str());
            }
        }
    }
    let mut failed = failed_fk.len();
    for model in &plan.inverse {
        let fk = model.required_fk().name.as_str();
        if failed_fk.contains(fk) {
            error!(solver = %model.name, fk, "skipping IK solver, its forward solver failed");
            failed += 1;
            continue;
        }
        written.push(write_solver(config, &model.name, &inverse_solver(model))?);
    }

    if failed > 0 {
        return Err(CliError::Partial { failed, total });
    }
    Ok(written)
}

fn write_solver(config: &GeneratorConfig, name: &str, text: &str) -> Result<PathBuf, CliError> {
    let path = config.solver_path(name);
    std::fs::write(&path, text).map_err(|source| CliError::Write {
        path: path.clone(),
        source,
    })?;
    info!(solver = name, path = %path.display(), "solver written");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
