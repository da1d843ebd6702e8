//! Contact parameter resolution: explicit pair overrides or priority/solmix
//! mixing of two geometries' materials.
//!
//! Corresponds to MuJoCo's `mj_contactParam()`.

use super::context::CollisionContext;
use crate::config::CollisionConfig;
use crate::types::{Model, PairId};

/// Fully resolved contact parameters for one candidate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactParams {
    /// Geometry ids, in candidate order.
    pub geoms: [usize; 2],
    /// Activation threshold.
    pub margin: f64,
    /// Inclusion gap.
    pub gap: f64,
    /// Contact dimensionality.
    pub condim: i32,
    /// `[tan1, tan2, torsional, roll1, roll2]`, each at least the friction floor.
    pub friction: [f64; 5],
    /// Solver reference (normal).
    pub solref: [f64; 2],
    /// Solver reference (friction). Zero unless set by an explicit pair.
    pub solreffriction: [f64; 2],
    /// Solver impedance.
    pub solimp: [f64; 5],
}

/// Resolve parameters for candidate `cid` of the collision context.
#[must_use]
pub fn contact_params(
    model: &Model,
    ctx: &CollisionContext,
    cid: usize,
    config: &CollisionConfig,
) -> ContactParams {
    resolve_contact_params(
        model,
        ctx.pair(cid),
        ctx.pairid(cid),
        ctx.worldid(cid),
        config,
    )
}

/// Resolve parameters for `geoms` in world `worldid`.
///
/// An explicit override index in `pair_id` reads the pair tables directly;
/// otherwise the two geometries' materials are combined. Every friction
/// component is floored at `config.min_mu` in both cases.
#[must_use]
pub fn resolve_contact_params(
    model: &Model,
    geoms: [usize; 2],
    pair_id: PairId,
    worldid: usize,
    config: &CollisionConfig,
) -> ContactParams {
    let mut params = match pair_id.override_index() {
        Some(pair) => explicit_pair_params(model, geoms, pair, worldid),
        None => mixed_params(model, geoms, worldid, config.min_val),
    };
    for mu in &mut params.friction {
        *mu = mu.max(config.min_mu);
    }
    params
}

fn explicit_pair_params(
    model: &Model,
    geoms: [usize; 2],
    pair: usize,
    worldid: usize,
) -> ContactParams {
    ContactParams {
        geoms,
        margin: *model.pair_margin.get(worldid, pair),
        gap: *model.pair_gap.get(worldid, pair),
        condim: model.pair_dim[pair],
        friction: *model.pair_friction.get(worldid, pair),
        solref: *model.pair_solref.get(worldid, pair),
        solreffriction: *model.pair_solreffriction.get(worldid, pair),
        solimp: *model.pair_solimp.get(worldid, pair),
    }
}

fn mixed_params(model: &Model, geoms: [usize; 2], worldid: usize, min_val: f64) -> ContactParams {
    let [g1, g2] = geoms;

    // 1. Priority: the higher-priority geom's friction and condim win outright
    let priority1 = model.geom_priority[g1];
    let priority2 = model.geom_priority[g2];
    let f1 = model.geom_friction.get(worldid, g1);
    let f2 = model.geom_friction.get(worldid, g2);

    let (mix, condim, fri) = if priority1 > priority2 {
        (1.0, model.geom_condim[g1], *f1)
    } else if priority2 > priority1 {
        (0.0, model.geom_condim[g2], *f2)
    } else {
        let s1 = *model.geom_solmix.get(worldid, g1);
        let s2 = *model.geom_solmix.get(worldid, g2);
        (
            solmix_weight(s1, s2, min_val),
            model.geom_condim[g1].max(model.geom_condim[g2]),
            f1.sup(f2),
        )
    };

    // 2. Solver curves, mixed by weight
    let solref = combine_solref(
        *model.geom_solref.get(worldid, g1),
        *model.geom_solref.get(worldid, g2),
        mix,
    );
    let solimp = combine_solimp(
        *model.geom_solimp.get(worldid, g1),
        *model.geom_solimp.get(worldid, g2),
        mix,
    );

    // 3. Margin and gap add up; priority does not apply
    let margin = model.geom_margin.get(worldid, g1) + model.geom_margin.get(worldid, g2);
    let gap = model.geom_gap.get(worldid, g1) + model.geom_gap.get(worldid, g2);

    ContactParams {
        geoms,
        margin,
        gap,
        condim,
        friction: [fri.x, fri.x, fri.y, fri.z, fri.z], // 3→5 unpack
        solref,
        solreffriction: [0.0, 0.0],
        solimp,
    }
}

/// Compute solmix weight, matching MuJoCo's edge-case handling.
/// Returns weight for entity 1 (entity 2 weight = 1 - mix).
#[must_use]
pub fn solmix_weight(s1: f64, s2: f64, min_val: f64) -> f64 {
    if s1 >= min_val && s2 >= min_val {
        s1 / (s1 + s2)
    } else if s1 < min_val && s2 < min_val {
        0.5
    } else if s1 < min_val {
        0.0 // entity 2 dominates
    } else {
        1.0 // entity 1 dominates
    }
}

/// Combine solref using solmix weight.
/// Standard reference (solref\[0\] > 0): weighted average.
/// Direct reference (solref\[0\] <= 0): element-wise minimum.
#[must_use]
pub fn combine_solref(solref1: [f64; 2], solref2: [f64; 2], mix: f64) -> [f64; 2] {
    if solref1[0] > 0.0 && solref2[0] > 0.0 {
        [
            mix * solref1[0] + (1.0 - mix) * solref2[0],
            mix * solref1[1] + (1.0 - mix) * solref2[1],
        ]
    } else {
        [solref1[0].min(solref2[0]), solref1[1].min(solref2[1])]
    }
}

/// Combine solimp using solmix weight (always weighted average).
#[must_use]
pub fn combine_solimp(solimp1: [f64; 5], solimp2: [f64; 5], mix: f64) -> [f64; 5] {
    std::array::from_fn(|i| mix * solimp1[i] + (1.0 - mix) * solimp2[i])
}
