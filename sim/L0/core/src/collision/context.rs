//! Broadphase hand-off: candidate pairs, their tags and their worlds.

use tracing::trace;

use crate::config::CollisionConfig;
use crate::error::{CollisionError, CollisionResult};
use crate::types::PairId;

/// Fixed-capacity candidate arrays filled by the broadphase each step.
///
/// The three arrays are parallel and sized once at construction; only the
/// live prefix `[0, len())` is ever read.
#[derive(Debug, Clone)]
pub struct CollisionContext {
    collision_pair: Vec<[usize; 2]>,
    collision_pairid: Vec<PairId>,
    collision_worldid: Vec<usize>,
    ncollision: usize,
}

impl CollisionContext {
    /// Allocate a context holding up to `naconmax` candidates.
    #[must_use]
    pub fn new(naconmax: usize) -> Self {
        Self {
            collision_pair: vec![[0, 0]; naconmax],
            collision_pairid: vec![PairId::default(); naconmax],
            collision_worldid: vec![0; naconmax],
            ncollision: 0,
        }
    }

    /// Allocate a context sized by `config.naconmax`.
    ///
    /// # Errors
    ///
    /// With validation enabled, returns [`CollisionError::InvalidCapacity`]
    /// for a zero capacity and propagates other config errors.
    pub fn from_config(config: &CollisionConfig) -> CollisionResult<Self> {
        if config.validate {
            config.validate()?;
        }
        Ok(Self::new(config.naconmax))
    }

    /// Maximum number of candidates.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.collision_pair.len()
    }

    /// Number of live candidates.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ncollision
    }

    /// Whether there are no live candidates.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ncollision == 0
    }

    /// Append a candidate. Returns `false` (and drops it) when full.
    pub fn push(&mut self, geoms: [usize; 2], pair_id: PairId, worldid: usize) -> bool {
        let i = self.ncollision;
        if i >= self.capacity() {
            trace!(
                geom1 = geoms[0],
                geom2 = geoms[1],
                worldid,
                capacity = self.capacity(),
                "collision context full, candidate dropped"
            );
            return false;
        }
        self.collision_pair[i] = geoms;
        self.collision_pairid[i] = pair_id;
        self.collision_worldid[i] = worldid;
        self.ncollision += 1;
        true
    }

    /// Set the live count after the arrays were filled in place.
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::InvalidCapacity`] if `n` exceeds capacity.
    pub fn set_len(&mut self, n: usize) -> CollisionResult<()> {
        if n > self.capacity() {
            return Err(CollisionError::InvalidCapacity(n));
        }
        self.ncollision = n;
        Ok(())
    }

    /// Forget all candidates. Slot contents are left as they are.
    pub fn clear(&mut self) {
        self.ncollision = 0;
    }

    /// Geometry ids of candidate `i`.
    #[inline]
    #[must_use]
    pub fn pair(&self, i: usize) -> [usize; 2] {
        self.collision_pair[i]
    }

    /// Tag of candidate `i`.
    #[inline]
    #[must_use]
    pub fn pairid(&self, i: usize) -> PairId {
        self.collision_pairid[i]
    }

    /// World of candidate `i`.
    #[inline]
    #[must_use]
    pub fn worldid(&self, i: usize) -> usize {
        self.collision_worldid[i]
    }

    /// Full-capacity arrays for in-place filling by a broadphase.
    ///
    /// Call [`set_len`](Self::set_len) afterwards.
    pub fn slots_mut(&mut self) -> (&mut [[usize; 2]], &mut [PairId], &mut [usize]) {
        (
            &mut self.collision_pair,
            &mut self.collision_pairid,
            &mut self.collision_worldid,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn push_fills_parallel_arrays() {
        let mut ctx = CollisionContext::new(3);
        assert!(ctx.is_empty());
        assert!(ctx.push([0, 1], PairId::mixed(), 0));
        assert!(ctx.push([2, 3], PairId::explicit(4).with_sensor(1), 7));

        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.pair(1), [2, 3]);
        assert_eq!(ctx.pairid(1).override_index(), Some(4));
        assert_eq!(ctx.pairid(1).sensor(), Some(1));
        assert_eq!(ctx.worldid(1), 7);
    }

    #[test]
    fn push_beyond_capacity_is_dropped() {
        let mut ctx = CollisionContext::new(1);
        assert!(ctx.push([0, 1], PairId::mixed(), 0));
        assert!(!ctx.push([1, 2], PairId::mixed(), 0));
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.capacity(), 1);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut ctx = CollisionContext::new(2);
        ctx.push([0, 1], PairId::mixed(), 0);
        ctx.clear();
        assert!(ctx.is_empty());
        assert_eq!(ctx.capacity(), 2);
    }

    #[test]
    fn in_place_fill_then_set_len() {
        let mut ctx = CollisionContext::new(4);
        {
            let (pairs, tags, worlds) = ctx.slots_mut();
            pairs[0] = [5, 6];
            tags[0] = PairId::skip().with_sensor(2);
            worlds[0] = 3;
        }
        ctx.set_len(1).unwrap();
        assert_eq!(ctx.pair(0), [5, 6]);
        assert!(ctx.pairid(0).skips_constraint());
        assert_eq!(ctx.worldid(0), 3);
        assert!(ctx.set_len(5).is_err());
    }

    #[test]
    fn from_config_validates_when_enabled() {
        let zero = CollisionConfig::with_naconmax(0);
        assert!(CollisionContext::from_config(&zero).is_ok());
        assert_eq!(
            CollisionContext::from_config(&zero.with_validation()).unwrap_err(),
            CollisionError::InvalidCapacity(0)
        );
        let ctx = CollisionContext::from_config(&CollisionConfig::with_naconmax(8)).unwrap();
        assert_eq!(ctx.capacity(), 8);
    }
}
