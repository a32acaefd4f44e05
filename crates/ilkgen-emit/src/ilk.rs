//! Rendering of solver models as ILK Lua tables.

use ilkgen_robot::{Pose, Velocity};
use ilkgen_solver::model::{JointVel, VelocityCompose};
use ilkgen_solver::{BinaryComposition, FkSolverModel, GeometricJacobian, IkSolverModel};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// `target__reference`
pub fn pose_id(pose: &Pose) -> String {
    pose.to_string()
}

/// `v__target__reference`
pub fn velocity_id(velocity: &Velocity) -> String {
    velocity.to_string()
}

/// `J_target_reference`, for the Jacobian of `velocity`.
pub fn jacobian_id(velocity: &Velocity) -> String {
    format!(
        "J_{}_{}",
        velocity.target().name(),
        velocity.reference().name()
    )
}

// ---------------------------------------------------------------------------
// Layout helpers
// ---------------------------------------------------------------------------

/// Lines of a Lua table body: a comma after every line but the last.
///
/// Empty groups contribute nothing, so consecutive non-empty groups are
/// separated by exactly one comma.
fn table_body<const N: usize>(groups: [Vec<String>; N]) -> Vec<String> {
    let mut lines: Vec<String> = groups.into_iter().flatten().collect();
    let last = lines.len().saturating_sub(1);
    for line in lines.iter_mut().take(last) {
        line.push(',');
    }
    lines
}

fn push_lines(out: &mut String, indent: &str, lines: &[String]) {
    for line in lines {
        out.push_str(indent);
        out.push_str(line);
        out.push('\n');
    }
}

// ---------------------------------------------------------------------------
// Forward solvers
// ---------------------------------------------------------------------------

fn constant_pose_line(pose: &Pose) -> String {
    format!("{}={{}}", pose_id(pose))
}

fn joint_velocity_line(jv: &JointVel) -> String {
    let head = format!(
        "{} = {{ jtype='{}', index={}, polarity={}",
        velocity_id(&jv.velocity),
        jv.joint.kind,
        jv.joint.index,
        jv.polarity
    );
    match &jv.ctransform {
        Some(pose) => format!("{head}, ctransform='{}' }}", pose_id(pose)),
        None => format!("{head} }}"),
    }
}

fn pose_compose_line(step: &BinaryComposition<Pose>) -> String {
    format!(
        "{{ op='pose-compose', arg1='{}', arg2='{}', res='{}' }}",
        pose_id(&step.arg1),
        pose_id(&step.arg2),
        pose_id(&step.result)
    )
}

fn velocity_compose_line(compose: &VelocityCompose) -> String {
    format!(
        "{{ op='vel-compose', arg1='{}', arg2='{}', pose='{}', res='{}' }}",
        velocity_id(&compose.step.arg1),
        velocity_id(&compose.step.arg2),
        pose_id(&compose.pose),
        velocity_id(&compose.step.result)
    )
}

fn jacobian_lines(jac: &GeometricJacobian) -> Vec<String> {
    let id = jacobian_id(jac.velocity());
    let mut lines = vec![format!(
        "{{ op='geom-jacobian', name='{id}', pose='{}' }}",
        pose_id(jac.target_pose())
    )];
    let columns = jac
        .joints()
        .iter()
        .zip(jac.joint_poses())
        .zip(jac.polarities());
    for ((joint, pose), polarity) in columns {
        lines.push(format!(
            "{{ op='GJac-col', jtype='{}', jac='{id}', col={}, joint_pose='{}', polarity={polarity} }}",
            joint.kind,
            joint.index,
            pose_id(pose)
        ));
    }
    lines
}

/// Render a forward solver model.
pub fn forward_solver(model: &FkSolverModel) -> String {
    let constant: Vec<String> = model.constant_poses.iter().map(constant_pose_line).collect();
    let joint: Vec<String> = model
        .joint_poses
        .iter()
        .map(|(pose, jp)| {
            format!(
                "{} = {{ jtype='{}', dir='{}', input={} }}",
                pose_id(pose),
                jp.joint.kind,
                jp.direction,
                jp.joint.index - 1
            )
        })
        .collect();
    let joint_velocities: Vec<String> = model
        .joint_velocities
        .values()
        .map(joint_velocity_line)
        .collect();

    let ops = table_body([
        model.pose_composes.iter().map(pose_compose_line).collect(),
        model
            .explicit_joint_velocities
            .iter()
            .map(|v| format!("{{ op='vel-joint', arg='{}' }}", velocity_id(v)))
            .collect(),
        model
            .velocity_composes
            .iter()
            .map(velocity_compose_line)
            .collect(),
        model.jacobians.iter().flat_map(jacobian_lines).collect(),
    ]);

    let outputs = table_body([
        model
            .outputs
            .poses
            .iter()
            .map(|o| format!("{} = {{otype='pose', usersort={} }}", pose_id(&o.value), o.index))
            .collect(),
        model
            .outputs
            .velocities
            .iter()
            .map(|o| {
                format!(
                    "{} = {{otype='velocity', usersort={} }}",
                    velocity_id(&o.value),
                    o.index
                )
            })
            .collect(),
        model
            .outputs
            .jacobians
            .iter()
            .map(|o| {
                format!(
                    "{} = {{otype='jacobian', usersort={} }}",
                    jacobian_id(&o.value),
                    o.index
                )
            })
            .collect(),
    ]);

    let mut out = String::from("return {\n");
    out.push_str(&format!("    solverid = '{}',\n", model.name));
    out.push_str("    solver_type = 'forward',\n");
    out.push_str(&format!("    robot_name = '{}',\n", model.robot));
    out.push_str(&format!("    joint_space_size = {},\n", model.joint_space_size));
    out.push_str("    poses = {\n        constant = {\n");
    push_lines(&mut out, "            ", &table_body([constant]));
    out.push_str("        },\n        joint = {\n");
    push_lines(&mut out, "            ", &table_body([joint]));
    out.push_str("        }\n    },\n    joint_velocities = {\n");
    push_lines(&mut out, "        ", &table_body([joint_velocities]));
    out.push_str("    },\n    ops = {\n");
    push_lines(&mut out, "        ", &ops);
    out.push_str("    },\n    outputs = {\n");
    push_lines(&mut out, "        ", &outputs);
    out.push_str("    }\n}\n");
    out
}

// ---------------------------------------------------------------------------
// Inverse solvers
// ---------------------------------------------------------------------------

/// Render an inverse solver model.
pub fn inverse_solver(model: &IkSolverModel) -> String {
    format!(
        "return {{
    solverid = '{}',
    solver_type = 'inverse',
    robot_name = '{}',
    kind = '{}',
    vectors = '{}',
    target = '{}',
    reference = '{}',
    fk = '{}'
}}
",
        model.name,
        model.robot,
        model.level.tag(),
        model.cfg_space,
        model.target.name(),
        model.reference.name(),
        model.required_fk().name
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
