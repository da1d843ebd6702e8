//! Contact-related types: broadphase pair tags, committed contact records,
//! and the shared fixed-capacity contact buffer.
//!
//! Contains [`PairId`] (the two-slot tag broadphase attaches to each
//! candidate), [`Contact`] (one committed record), [`ContactBuffer`] (the
//! lock-free bounded append buffer shared by every world), and the
//! [`contact_frame`] helper.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::{Matrix3, Vector3};

use super::enums::ContactType;

/// Broadphase tag attached to every candidate pair.
///
/// Both slots keep MuJoCo's sentinel encoding so kernels branch on a single
/// integer comparison. Accessors convert to `Option` at the API boundary.
///
/// - `contact`: [`PairId::SKIP`] (no constraint generation), [`PairId::MIX`]
///   (derive parameters by mixing), or `>= 0` (explicit pair-override index).
/// - `sensor`: [`PairId::NO_SENSOR`] or `>= 0` (collision sensor id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairId {
    /// Constraint slot: -2 skip, -1 mix, >= 0 explicit pair index.
    pub contact: i32,
    /// Sensor slot: -1 none, >= 0 sensor id.
    pub sensor: i32,
}

impl PairId {
    /// Skip constraint generation entirely.
    pub const SKIP: i32 = -2;
    /// No explicit override; mix geometry parameters.
    pub const MIX: i32 = -1;
    /// No collision sensor attached.
    pub const NO_SENSOR: i32 = -1;

    /// Mixed parameters, no sensor.
    #[must_use]
    pub const fn mixed() -> Self {
        Self {
            contact: Self::MIX,
            sensor: Self::NO_SENSOR,
        }
    }

    /// Explicit pair override at `pair_id`, no sensor.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn explicit(pair_id: usize) -> Self {
        Self {
            contact: pair_id as i32,
            sensor: Self::NO_SENSOR,
        }
    }

    /// No constraint generation, no sensor.
    #[must_use]
    pub const fn skip() -> Self {
        Self {
            contact: Self::SKIP,
            sensor: Self::NO_SENSOR,
        }
    }

    /// Attach collision sensor `sensor_id`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn with_sensor(mut self, sensor_id: usize) -> Self {
        self.sensor = sensor_id as i32;
        self
    }

    /// Explicit pair-override index, if any.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn override_index(self) -> Option<usize> {
        if self.contact >= 0 {
            Some(self.contact as usize)
        } else {
            None
        }
    }

    /// Whether this pair opts out of constraint generation.
    #[inline]
    #[must_use]
    pub const fn skips_constraint(self) -> bool {
        self.contact == Self::SKIP
    }

    /// Whether this pair may produce a constraint (`contact >= -1`).
    #[inline]
    #[must_use]
    pub const fn constraint_eligible(self) -> bool {
        self.contact >= Self::MIX
    }

    /// Attached sensor id, if any.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn sensor(self) -> Option<usize> {
        if self.sensor >= 0 {
            Some(self.sensor as usize)
        } else {
            None
        }
    }

    /// Whether a collision sensor is attached.
    #[inline]
    #[must_use]
    pub const fn has_sensor(self) -> bool {
        self.sensor >= 0
    }
}

impl Default for PairId {
    fn default() -> Self {
        Self::mixed()
    }
}

/// Committed contact record (like mjContact).
///
/// Created exactly once per admitted candidate pair, never mutated after
/// commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Signed distance between the two geometries (negative = penetrating).
    pub dist: f64,
    /// Contact position in world frame.
    pub pos: Vector3<f64>,
    /// Contact frame; row 0 is the normal, rows 1 and 2 the tangents.
    pub frame: Matrix3<f64>,
    /// `margin - gap`: distance below which the constraint engages.
    pub includemargin: f64,
    /// `[sliding1, sliding2, torsional, rolling1, rolling2]`.
    pub friction: [f64; 5],
    /// Solver reference (normal direction).
    pub solref: [f64; 2],
    /// Solver reference (friction directions). `[0, 0]` means "use `solref`".
    pub solreffriction: [f64; 2],
    /// Solver impedance.
    pub solimp: [f64; 5],
    /// Contact dimensionality (1, 3, 4, 6).
    pub dim: i32,
    /// Geometry ids of the colliding pair.
    pub geom: [usize; 2],
    /// World the contact belongs to.
    pub worldid: usize,
    /// Constraint / sensor classification.
    pub contact_type: ContactType,
    /// Index of the originating candidate pair in the collision context.
    pub geomcollisionid: usize,
}

impl Contact {
    /// Contact normal (row 0 of the frame).
    #[inline]
    #[must_use]
    pub fn normal(&self) -> Vector3<f64> {
        self.frame.row(0).transpose()
    }

    /// Whether the contact participates in constraint solving.
    #[inline]
    #[must_use]
    pub fn is_constraint(&self) -> bool {
        self.contact_type.contains(ContactType::CONSTRAINT)
    }

    /// Whether a collision sensor observes the contact.
    #[inline]
    #[must_use]
    pub fn is_sensor(&self) -> bool {
        self.contact_type.contains(ContactType::SENSOR)
    }
}

/// Fixed-capacity contact buffer shared by every world in the batch.
///
/// Writers reserve a slot with a single atomic increment and publish the
/// record into a write-once cell. The counter keeps counting past capacity;
/// overflowing commits are dropped without a write, so `nacon() - capacity()`
/// is the number of lost contacts.
///
/// After all writers have finished (a barrier owned by the caller), every
/// slot in `[0, len())` holds a complete record.
#[derive(Debug)]
pub struct ContactBuffer {
    slots: Box<[OnceLock<Contact>]>,
    nacon: AtomicUsize,
}

impl ContactBuffer {
    /// Allocate a buffer holding at most `capacity` contacts.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| OnceLock::new()).collect(),
            nacon: AtomicUsize::new(0),
        }
    }

    /// Maximum number of live records (`naconmax`).
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Raw counter value. May exceed `capacity()` after overflow.
    #[inline]
    #[must_use]
    pub fn nacon(&self) -> usize {
        self.nacon.load(Ordering::Acquire)
    }

    /// Number of live records: `min(nacon, capacity)`.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nacon().min(self.capacity())
    }

    /// Whether no record has been committed this step.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of contacts dropped because the buffer was full.
    #[inline]
    #[must_use]
    pub fn overflow(&self) -> usize {
        self.nacon().saturating_sub(self.capacity())
    }

    /// Reserve the next slot. Returns `None` once capacity is exhausted.
    ///
    /// The counter is incremented either way.
    #[inline]
    pub fn reserve(&self) -> Option<usize> {
        let cid = self.nacon.fetch_add(1, Ordering::Relaxed);
        (cid < self.capacity()).then_some(cid)
    }

    /// Reserve a slot and publish `contact` into it.
    ///
    /// Returns `false` (and writes nothing) when the buffer is full.
    #[inline]
    pub fn push(&self, contact: Contact) -> bool {
        match self.reserve() {
            // Each reserved index has exactly one writer.
            Some(cid) => self.slots[cid].set(contact).is_ok(),
            None => false,
        }
    }

    /// Record at index `i`, if committed.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&Contact> {
        if i < self.len() {
            self.slots[i].get()
        } else {
            None
        }
    }

    /// Iterate over live records. Order follows arrival order at the counter
    /// and is not deterministic across runs.
    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.slots[..self.len()].iter().filter_map(OnceLock::get)
    }

    /// Reset for the next step.
    pub fn clear(&mut self) {
        let len = self.len();
        for slot in &mut self.slots[..len] {
            slot.take();
        }
        *self.nacon.get_mut() = 0;
    }
}

/// Build a contact frame from a normal.
///
/// Row 0 is the unit normal; rows 1 and 2 are tangents completing a
/// right-handed orthonormal basis. Zero or NaN normals fall back to the
/// world frame.
#[must_use]
pub fn contact_frame(normal: &Vector3<f64>) -> Matrix3<f64> {
    let normal_len = normal.norm();
    if !normal_len.is_finite() || normal_len < 1e-10 {
        return Matrix3::identity();
    }
    let n = normal / normal_len;

    // Reference vector not parallel to the normal
    let reference = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };

    let t1 = (reference - n * n.dot(&reference)).normalize();
    let t2 = n.cross(&t1);
    Matrix3::from_rows(&[n.transpose(), t1.transpose(), t2.transpose()])
}
