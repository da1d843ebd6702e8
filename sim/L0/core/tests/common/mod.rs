//! Shared fixtures: a sphere/plane narrowphase and small scene builders.

#![allow(dead_code)]

use nalgebra::Vector3;
use sim_collision_core::{ContactGeometry, ContactSet, Data, Geom, GeomType, Model, Narrowphase};
use smallvec::smallvec;

/// Sphere-sphere and plane-sphere contacts. Sphere radius is `size.x`.
pub struct SpherePlane;

impl Narrowphase for SpherePlane {
    fn collide(&self, g1: &Geom<'_>, g2: &Geom<'_>, types: [GeomType; 2]) -> ContactSet {
        match types {
            [GeomType::Plane, GeomType::Sphere] => plane_sphere(g1, g2),
            [GeomType::Sphere, GeomType::Plane] => plane_sphere(g2, g1),
            [GeomType::Sphere, GeomType::Sphere] => sphere_sphere(g1, g2),
            _ => ContactSet::new(),
        }
    }
}

fn plane_sphere(plane: &Geom<'_>, sphere: &Geom<'_>) -> ContactSet {
    let n = plane.normal;
    let radius = sphere.size.x;
    let dist = n.dot(&(sphere.pos - plane.pos)) - radius;
    if dist >= plane.margin {
        return ContactSet::new();
    }
    let pos = sphere.pos - n * (radius + 0.5 * dist);
    smallvec![ContactGeometry::from_normal(dist, pos, &n)]
}

fn sphere_sphere(g1: &Geom<'_>, g2: &Geom<'_>) -> ContactSet {
    let d = g2.pos - g1.pos;
    let dist = d.norm() - g1.size.x - g2.size.x;
    if dist >= g1.margin {
        return ContactSet::new();
    }
    let n = d.normalize();
    let pos = g1.pos + n * (g1.size.x + 0.5 * dist);
    smallvec![ContactGeometry::from_normal(dist, pos, &n)]
}

/// Reports the same contact for every pair, whatever the geometry.
pub struct Fixed(pub ContactGeometry);

impl Narrowphase for Fixed {
    fn collide(&self, _g1: &Geom<'_>, _g2: &Geom<'_>, _types: [GeomType; 2]) -> ContactSet {
        smallvec![self.0]
    }
}

/// Ground plane (geom 0) plus `nsphere` spheres of radius 0.1 in a row.
///
/// Sphere `i` sits at `x = i` with its center at `height`.
pub fn plane_and_spheres(nsphere: usize, nworld: usize, height: f64) -> (Model, Data) {
    let mut model = Model::new(1 + nsphere, nworld);
    model.geom_type[0] = GeomType::Plane;
    let mut data = model.make_data(1024);
    for w in 0..nworld {
        for i in 0..nsphere {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f64;
            data.geom_xpos.set(w, 1 + i, Vector3::new(x, 0.0, height));
        }
    }
    (model, data)
}
