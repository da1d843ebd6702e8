//! Per-world simulation state (like mjData, batched over worlds).

use nalgebra::{Matrix3, Vector3};

use super::contact_types::ContactBuffer;
use super::model::Model;
use super::world_array::WorldArray;

/// Batched dynamic state.
///
/// Every table here has exactly `nworld` rows; the contact buffer is shared
/// by all worlds and each [`Contact`](super::contact_types::Contact) records
/// its own world id.
#[derive(Debug)]
pub struct Data {
    /// Number of worlds.
    pub nworld: usize,

    // ==================== Geometry Poses ====================
    /// World-frame geometry positions `(nworld × ngeom)`.
    pub geom_xpos: WorldArray<Vector3<f64>>,
    /// World-frame geometry orientations `(nworld × ngeom)`.
    pub geom_xmat: WorldArray<Matrix3<f64>>,

    // ==================== Generalized State ====================
    /// Positions `(nworld × nq)`.
    pub qpos: WorldArray<f64>,
    /// Velocities `(nworld × nv)`.
    pub qvel: WorldArray<f64>,

    // ==================== Passive Forces ====================
    /// Spring forces `(nworld × nv)`.
    pub qfrc_spring: WorldArray<f64>,
    /// Damper forces `(nworld × nv)`.
    pub qfrc_damper: WorldArray<f64>,
    /// Total passive forces `(nworld × nv)`.
    pub qfrc_passive: WorldArray<f64>,

    // ==================== Contacts ====================
    /// Shared contact output buffer.
    pub contacts: ContactBuffer,
}

impl Data {
    /// Allocate state for `model` with a contact buffer of `naconmax` slots.
    ///
    /// Positions start at world 0's spring reference configuration.
    #[must_use]
    pub fn new(model: &Model, naconmax: usize) -> Self {
        let nworld = model.nworld;
        let qpos0: Vec<f64> = if model.nq == 0 {
            Vec::new()
        } else {
            model.qpos_spring.row(0).to_vec()
        };
        Self {
            nworld,
            geom_xpos: WorldArray::filled(nworld, model.ngeom, Vector3::zeros()),
            geom_xmat: WorldArray::filled(nworld, model.ngeom, Matrix3::identity()),
            qpos: WorldArray::per_world(nworld, &qpos0),
            qvel: WorldArray::filled(nworld, model.nv, 0.0),
            qfrc_spring: WorldArray::filled(nworld, model.nv, 0.0),
            qfrc_damper: WorldArray::filled(nworld, model.nv, 0.0),
            qfrc_passive: WorldArray::filled(nworld, model.nv, 0.0),
            contacts: ContactBuffer::new(naconmax),
        }
    }

    /// Empty the contact buffer and reset its counter.
    pub fn reset_contacts(&mut self) {
        self.contacts.clear();
    }
}
