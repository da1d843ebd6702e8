//! Passive forces: joint springs and dof dampers.
//!
//! Computes `qfrc_spring`, `qfrc_damper` and `qfrc_passive` for every world.
//! Corresponds to the spring/damper part of MuJoCo's `engine_passive.c`.
//! Reads joint state only and never touches collision buffers.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::types::flags::disabled;
use crate::types::{DISABLE_PASSIVE, Data, MjJointType, Model};

/// Rotation vector taking orientation `b` to orientation `a` (`log(b⁻¹·a)`).
///
/// Quaternions are MuJoCo-ordered `[w, x, y, z]` and need not be normalized.
/// Matches `mju_subQuat`: the result is the shortest rotation.
#[must_use]
pub fn quat_sub(a: &[f64], b: &[f64]) -> Vector3<f64> {
    let qa = UnitQuaternion::from_quaternion(Quaternion::new(a[0], a[1], a[2], a[3]));
    let qb = UnitQuaternion::from_quaternion(Quaternion::new(b[0], b[1], b[2], b[3]));
    (qb.inverse() * qa).scaled_axis()
}

/// Accumulate joint spring and dof damper forces for every world.
///
/// With `DISABLE_PASSIVE` set, `qfrc_passive` is zeroed and nothing else is
/// written. Worlds run in parallel when the `parallel` feature is enabled.
pub fn mj_fwd_passive(model: &Model, data: &mut Data) {
    if disabled(model, DISABLE_PASSIVE) {
        data.qfrc_passive.as_mut_slice().fill(0.0);
        return;
    }

    let nv = model.nv;
    if nv == 0 {
        return;
    }

    let Data {
        qpos,
        qvel,
        qfrc_spring,
        qfrc_damper,
        qfrc_passive,
        ..
    } = data;
    let (qpos, qvel) = (&*qpos, &*qvel);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        qfrc_spring
            .as_mut_slice()
            .par_chunks_mut(nv)
            .zip(qfrc_damper.as_mut_slice().par_chunks_mut(nv))
            .zip(qfrc_passive.as_mut_slice().par_chunks_mut(nv))
            .enumerate()
            .for_each(|(worldid, ((spring, damper), passive))| {
                let state = WorldState {
                    qpos: qpos.row(worldid),
                    qvel: qvel.row(worldid),
                };
                passive_world(model, worldid, &state, spring, damper, passive);
            });
    }

    #[cfg(not(feature = "parallel"))]
    {
        qfrc_spring
            .as_mut_slice()
            .chunks_mut(nv)
            .zip(qfrc_damper.as_mut_slice().chunks_mut(nv))
            .zip(qfrc_passive.as_mut_slice().chunks_mut(nv))
            .enumerate()
            .for_each(|(worldid, ((spring, damper), passive))| {
                let state = WorldState {
                    qpos: qpos.row(worldid),
                    qvel: qvel.row(worldid),
                };
                passive_world(model, worldid, &state, spring, damper, passive);
            });
    }
}

struct WorldState<'a> {
    qpos: &'a [f64],
    qvel: &'a [f64],
}

fn passive_world(
    model: &Model,
    worldid: usize,
    state: &WorldState<'_>,
    spring: &mut [f64],
    damper: &mut [f64],
    passive: &mut [f64],
) {
    spring.fill(0.0);
    let qpos_spring = model.qpos_spring.row(worldid);

    for jnt in 0..model.njnt {
        let stiffness = *model.jnt_stiffness.get(worldid, jnt);
        if stiffness == 0.0 {
            continue;
        }
        let qadr = model.jnt_qposadr[jnt];
        let dadr = model.jnt_dofadr[jnt];

        match model.jnt_type[jnt] {
            MjJointType::Free => {
                for i in 0..3 {
                    spring[dadr + i] = -stiffness * (state.qpos[qadr + i] - qpos_spring[qadr + i]);
                }
                let dif = quat_sub(
                    &state.qpos[qadr + 3..qadr + 7],
                    &qpos_spring[qadr + 3..qadr + 7],
                );
                for i in 0..3 {
                    spring[dadr + 3 + i] = -stiffness * dif[i];
                }
            }
            MjJointType::Ball => {
                let dif = quat_sub(&state.qpos[qadr..qadr + 4], &qpos_spring[qadr..qadr + 4]);
                for i in 0..3 {
                    spring[dadr + i] = -stiffness * dif[i];
                }
            }
            MjJointType::Hinge | MjJointType::Slide => {
                spring[dadr] = -stiffness * (state.qpos[qadr] - qpos_spring[qadr]);
            }
        }
    }

    let damping = model.dof_damping.row(worldid);
    for dof in 0..model.nv {
        damper[dof] = -damping[dof] * state.qvel[dof];
        passive[dof] = damper[dof] + spring[dof];
    }
}
