//! Enums and flag constants shared across the collision core.
//!
//! Geometry and joint types, the contact classification bitset, and the
//! disable-flag bits consulted by the passive-force stage.

use bitflags::bitflags;

/// Geometry type for collision detection.
///
/// Discriminants follow MuJoCo's `mjtGeom` ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeomType {
    /// Plane (infinite, typically used for ground).
    Plane,
    /// Height field terrain.
    Hfield,
    /// Sphere defined by radius.
    #[default]
    Sphere,
    /// Capsule (cylinder with hemispherical caps).
    Capsule,
    /// Ellipsoid.
    Ellipsoid,
    /// Cylinder.
    Cylinder,
    /// Box (rectangular cuboid).
    Box,
    /// Mesh (convex hull used for collision).
    Mesh,
}

impl GeomType {
    /// Whether this geometry carries mesh topology in its collision view.
    #[must_use]
    pub const fn is_mesh(self) -> bool {
        matches!(self, Self::Mesh)
    }
}

/// Joint type following `MuJoCo` conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MjJointType {
    /// Hinge joint (1 DOF): rotation about a single axis.
    #[default]
    Hinge,
    /// Slide joint (1 DOF): translation along a single axis.
    Slide,
    /// Ball joint (3 DOF): quaternion position, angular velocity.
    Ball,
    /// Free joint (6 DOF): position + quaternion, linear + angular velocity.
    Free,
}

impl MjJointType {
    /// Number of position coordinates (nq contribution).
    #[must_use]
    pub const fn nq(self) -> usize {
        match self {
            Self::Hinge | Self::Slide => 1,
            Self::Ball => 4,
            Self::Free => 7,
        }
    }

    /// Number of velocity coordinates / DOFs (nv contribution).
    #[must_use]
    pub const fn nv(self) -> usize {
        match self {
            Self::Hinge | Self::Slide => 1,
            Self::Ball => 3,
            Self::Free => 6,
        }
    }
}

bitflags! {
    /// Classification of a committed contact.
    ///
    /// Flags are independent: a contact may be constraint-active, observed
    /// by a collision sensor, both, or (when committed only for a sensor)
    /// sensor-only.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ContactType: u32 {
        /// The contact participates in constraint solving.
        const CONSTRAINT = 1 << 0;
        /// A collision sensor observes the contact.
        const SENSOR = 1 << 1;
    }
}

/// Disable passive forces (springs and dampers).
pub const DISABLE_PASSIVE: u32 = 1 << 5;

/// Disable contact generation.
pub const DISABLE_CONTACT: u32 = 1 << 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_type_flags_compose() {
        let both = ContactType::CONSTRAINT | ContactType::SENSOR;
        assert!(both.contains(ContactType::CONSTRAINT));
        assert!(both.contains(ContactType::SENSOR));
        assert_eq!(both.bits(), 0b11);
        assert!(ContactType::default().is_empty());
    }

    #[test]
    fn joint_dimensions() {
        assert_eq!(MjJointType::Free.nq(), 7);
        assert_eq!(MjJointType::Free.nv(), 6);
        assert_eq!(MjJointType::Ball.nq(), 4);
        assert_eq!(MjJointType::Ball.nv(), 3);
        assert_eq!(MjJointType::Hinge.nq(), 1);
        assert_eq!(MjJointType::Slide.nv(), 1);
    }

    #[test]
    fn only_mesh_is_mesh() {
        assert!(GeomType::Mesh.is_mesh());
        assert!(!GeomType::Box.is_mesh());
        assert!(!GeomType::Hfield.is_mesh());
    }
}
