//! Contact commit: classify a narrowphase result and publish it into the
//! shared contact buffer.

use nalgebra::{Matrix3, Vector3};

use super::params::ContactParams;
use crate::types::{Contact, ContactBuffer, ContactType, PairId, contact_frame};

/// One contact point produced by a narrowphase kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGeometry {
    /// Signed distance (negative = penetration).
    pub dist: f64,
    /// World-frame contact position.
    pub pos: Vector3<f64>,
    /// Contact frame; row 0 is the normal.
    pub frame: Matrix3<f64>,
}

impl ContactGeometry {
    /// Contact with a frame built from `normal`.
    #[must_use]
    pub fn from_normal(dist: f64, pos: Vector3<f64>, normal: &Vector3<f64>) -> Self {
        Self {
            dist,
            pos,
            frame: contact_frame(normal),
        }
    }
}

/// Commit one contact for candidate `id` in world `worldid`.
///
/// The contact is active when `dist < margin`. It is dropped without
/// touching the buffer when it is not wanted as a constraint (skip tag or
/// inactive) and no sensor observes it. Otherwise a slot is reserved; past
/// capacity nothing is written.
///
/// Returns `true` iff a record was written and the contact is active.
pub fn write_contact(
    contacts: &ContactBuffer,
    id: usize,
    geometry: &ContactGeometry,
    params: &ContactParams,
    pair_id: PairId,
    worldid: usize,
) -> bool {
    let active = geometry.dist < params.margin;

    if (pair_id.skips_constraint() || !active) && !pair_id.has_sensor() {
        return false;
    }

    let mut contact_type = ContactType::empty();
    if pair_id.constraint_eligible() && active {
        contact_type |= ContactType::CONSTRAINT;
    }
    if pair_id.has_sensor() {
        contact_type |= ContactType::SENSOR;
    }

    let written = contacts.push(Contact {
        dist: geometry.dist,
        pos: geometry.pos,
        frame: geometry.frame,
        includemargin: params.margin - params.gap,
        friction: params.friction,
        solref: params.solref,
        solreffriction: params.solreffriction,
        solimp: params.solimp,
        dim: params.condim,
        geom: params.geoms,
        worldid,
        contact_type,
        geomcollisionid: id,
    });

    written && active
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn params(margin: f64, gap: f64) -> ContactParams {
        ContactParams {
            geoms: [3, 8],
            margin,
            gap,
            condim: 3,
            friction: [1.0, 1.0, 0.005, 0.0001, 0.0001],
            solref: [0.02, 1.0],
            solreffriction: [0.0, 0.0],
            solimp: [0.9, 0.95, 0.001, 0.5, 2.0],
        }
    }

    fn at(dist: f64) -> ContactGeometry {
        ContactGeometry::from_normal(dist, Vector3::new(0.0, 0.0, 0.5), &Vector3::z())
    }

    #[test]
    fn active_constraint_contact_is_written() {
        let buf = ContactBuffer::new(4);
        let p = params(0.01, 0.004);

        assert!(write_contact(&buf, 11, &at(-0.002), &p, PairId::mixed(), 2));

        let c = buf.get(0).unwrap();
        assert_eq!(buf.nacon(), 1);
        assert_eq!(c.contact_type, ContactType::CONSTRAINT);
        assert_relative_eq!(c.includemargin, 0.006, epsilon = 1e-15);
        assert_eq!(c.geom, [3, 8]);
        assert_eq!(c.worldid, 2);
        assert_eq!(c.geomcollisionid, 11);
        assert_eq!(c.dim, 3);
        assert_relative_eq!(c.normal(), Vector3::z());
    }

    #[test]
    fn inactive_without_sensor_is_dropped_without_counting() {
        let buf = ContactBuffer::new(4);
        assert!(!write_contact(&buf, 0, &at(0.5), &params(0.0, 0.0), PairId::mixed(), 0));
        assert_eq!(buf.nacon(), 0);
    }

    #[test]
    fn dist_equal_to_margin_is_inactive() {
        let buf = ContactBuffer::new(4);
        assert!(!write_contact(&buf, 0, &at(0.01), &params(0.01, 0.0), PairId::mixed(), 0));
        assert!(buf.is_empty());
    }

    #[test]
    fn skip_without_sensor_is_dropped_even_when_penetrating() {
        let buf = ContactBuffer::new(4);
        assert!(!write_contact(&buf, 0, &at(-1.0), &params(0.0, 0.0), PairId::skip(), 0));
        assert_eq!(buf.nacon(), 0);
    }

    #[test]
    fn sensor_only_contact_is_committed_inactive() {
        let buf = ContactBuffer::new(4);
        let tag = PairId::skip().with_sensor(5);

        assert!(!write_contact(&buf, 0, &at(0.3), &params(0.0, 0.0), tag, 0));

        let c = buf.get(0).unwrap();
        assert_eq!(c.contact_type, ContactType::SENSOR);
        assert!(!c.is_constraint());
    }

    #[test]
    fn skip_with_sensor_penetrating_has_sensor_flag_only() {
        let buf = ContactBuffer::new(4);
        let tag = PairId::skip().with_sensor(0);

        // Active but constraint-ineligible: record written, no CONSTRAINT flag
        assert!(write_contact(&buf, 0, &at(-0.1), &params(0.0, 0.0), tag, 0));
        assert_eq!(buf.get(0).unwrap().contact_type, ContactType::SENSOR);
    }

    #[test]
    fn mixed_with_sensor_active_has_both_flags() {
        let buf = ContactBuffer::new(4);
        let tag = PairId::explicit(0).with_sensor(1);

        assert!(write_contact(&buf, 0, &at(-0.1), &params(0.0, 0.0), tag, 0));
        assert_eq!(
            buf.get(0).unwrap().contact_type,
            ContactType::CONSTRAINT | ContactType::SENSOR
        );
    }

    #[test]
    fn overflow_counts_but_never_writes() {
        let buf = ContactBuffer::new(2);
        let p = params(0.0, 0.0);
        let results: Vec<bool> = (0..5)
            .map(|i| write_contact(&buf, i, &at(-0.1), &p, PairId::mixed(), 0))
            .collect();

        assert_eq!(results, vec![true, true, false, false, false]);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.nacon(), 5);
        assert_eq!(buf.overflow(), 3);
        assert!(buf.get(2).is_none());
    }
}
