//! Benchmarks for the narrowphase dispatch.
//!
//! Run with: `cargo bench -p sim-collision-core --features parallel`
//!
//! Measures candidates per second through resolve → view → kernel → commit
//! for varying world counts, using a trivial sphere/plane kernel so the
//! core's own overhead dominates.

#![allow(
    missing_docs,
    clippy::wildcard_imports,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::ignored_unit_patterns
)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nalgebra::Vector3;
use sim_collision_core::{
    CollisionConfig, CollisionContext, ContactGeometry, ContactSet, Data, Geom, GeomType,
    MjJointType, Model, Narrowphase, PairId, collide, mj_fwd_passive,
};
use smallvec::smallvec;

const SPHERES_PER_WORLD: usize = 8;

struct PlaneSphere;

impl Narrowphase for PlaneSphere {
    fn collide(&self, plane: &Geom<'_>, sphere: &Geom<'_>, _types: [GeomType; 2]) -> ContactSet {
        let n = plane.normal;
        let dist = n.dot(&(sphere.pos - plane.pos)) - sphere.size.x;
        if dist >= plane.margin {
            return ContactSet::new();
        }
        let pos = sphere.pos - n * (sphere.size.x + 0.5 * dist);
        smallvec![ContactGeometry::from_normal(dist, pos, &n)]
    }
}

fn scene(nworld: usize) -> (Model, Data, CollisionContext) {
    let mut model = Model::new(1 + SPHERES_PER_WORLD, nworld);
    model.geom_type[0] = GeomType::Plane;
    let ncandidate = nworld * SPHERES_PER_WORLD;
    let mut data = model.make_data(ncandidate);
    let mut ctx = CollisionContext::new(ncandidate);

    for w in 0..nworld {
        for i in 0..SPHERES_PER_WORLD {
            // Half the spheres penetrate, half hover
            let z = if i % 2 == 0 { 0.09 } else { 0.2 };
            data.geom_xpos
                .set(w, 1 + i, Vector3::new(i as f64, w as f64, z));
            ctx.push([0, 1 + i], PairId::mixed(), w);
        }
    }
    (model, data, ctx)
}

fn bench_collide(c: &mut Criterion) {
    let config = CollisionConfig::default();
    let mut group = c.benchmark_group("collide");

    for &nworld in &[1, 64, 1024, 8192] {
        let (model, mut data, ctx) = scene(nworld);
        group.throughput(Throughput::Elements(ctx.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(nworld), &nworld, |b, _| {
            b.iter(|| {
                data.reset_contacts();
                collide(&model, &data, &ctx, &PlaneSphere, &config)
            });
        });
    }

    group.finish();
}

fn bench_passive(c: &mut Criterion) {
    let mut group = c.benchmark_group("passive");

    for &nworld in &[1, 64, 1024] {
        let mut model = Model::new(0, nworld);
        for _ in 0..4 {
            model.add_joint(MjJointType::Free, 1.0, 0.1);
        }
        let mut data = model.make_data(1);
        group.bench_with_input(BenchmarkId::from_parameter(nworld), &nworld, |b, _| {
            b.iter(|| mj_fwd_passive(&model, &mut data));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_collide, bench_passive);
criterion_main!(benches);
