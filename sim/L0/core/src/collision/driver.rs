//! Narrowphase dispatch over the live candidate prefix.
//!
//! For each candidate: resolve parameters, build the two geometry views,
//! run the caller's narrowphase kernel, commit every returned contact.
//! Candidates are independent; the contact buffer's counter is the only
//! shared mutable state.

use smallvec::SmallVec;
use tracing::{debug, warn};

use super::commit::{ContactGeometry, write_contact};
use super::context::CollisionContext;
use super::geom::{Geom, geom_collision_pair};
use super::params::contact_params;
use crate::config::CollisionConfig;
use crate::types::flags::disabled;
use crate::types::{DISABLE_CONTACT, Data, GeomType, Model};

/// Contact points returned by one narrowphase call. Most pairs yield at
/// most four.
pub type ContactSet = SmallVec<[ContactGeometry; 4]>;

/// Per-shape-pair geometric test supplied by the caller.
///
/// Implementations must be pure: they see only the two views and may be
/// called concurrently from many threads.
pub trait Narrowphase: Sync {
    /// Contacts between `geom1` and `geom2`, with distances measured against
    /// `geom1.margin` (both views carry the resolved pair margin).
    fn collide(&self, geom1: &Geom<'_>, geom2: &Geom<'_>, types: [GeomType; 2]) -> ContactSet;
}

/// Summary of one [`collide`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollideStats {
    /// Live candidates processed.
    pub ncandidate: usize,
    /// Live records in the contact buffer afterwards.
    pub nacon: usize,
    /// Records written by this call that are active.
    pub nactive: usize,
    /// Contacts dropped because the buffer was full.
    pub overflow: usize,
}

/// Run the narrowphase over every live candidate in `ctx` and commit the
/// results into `data.contacts`.
///
/// The buffer is not cleared here; call [`Data::reset_contacts`] once per
/// step before the broadphase fills `ctx`. Returns empty stats when
/// `DISABLE_CONTACT` is set.
pub fn collide<N>(
    model: &Model,
    data: &Data,
    ctx: &CollisionContext,
    narrowphase: &N,
    config: &CollisionConfig,
) -> CollideStats
where
    N: Narrowphase + ?Sized,
{
    if disabled(model, DISABLE_CONTACT) {
        return CollideStats::default();
    }

    let ncandidate = ctx.len();
    let run = |cid: usize| collide_candidate(model, data, ctx, cid, narrowphase, config);

    #[cfg(feature = "parallel")]
    let nactive: usize = {
        use rayon::prelude::*;
        (0..ncandidate).into_par_iter().map(run).sum()
    };

    #[cfg(not(feature = "parallel"))]
    let nactive: usize = (0..ncandidate).map(run).sum();

    let stats = CollideStats {
        ncandidate,
        nacon: data.contacts.len(),
        nactive,
        overflow: data.contacts.overflow(),
    };

    debug!(
        ncandidate = stats.ncandidate,
        nacon = stats.nacon,
        nactive = stats.nactive,
        "narrowphase complete"
    );
    if stats.overflow > 0 {
        warn!(
            dropped = stats.overflow,
            capacity = data.contacts.capacity(),
            "contact buffer full, contacts dropped"
        );
    }

    stats
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn collide_candidate<N>(
    model: &Model,
    data: &Data,
    ctx: &CollisionContext,
    cid: usize,
    narrowphase: &N,
    config: &CollisionConfig,
) -> usize
where
    N: Narrowphase + ?Sized,
{
    let pair_id = ctx.pairid(cid);
    let worldid = ctx.worldid(cid);
    let params = contact_params(model, ctx, cid, config);
    let [id1, id2] = params.geoms;

    let (mut geom1, mut geom2) = geom_collision_pair(model, data, params.geoms, worldid);
    geom1.margin = params.margin;
    geom2.margin = params.margin;
    geom1.index = id1 as i32;
    geom2.index = id2 as i32;

    let types = [model.geom_type[id1], model.geom_type[id2]];
    narrowphase
        .collide(&geom1, &geom2, types)
        .iter()
        .filter(|c| write_contact(&data.contacts, cid, c, &params, pair_id, worldid))
        .count()
}
