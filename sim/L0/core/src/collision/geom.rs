//! Per-pair geometry views handed to narrowphase kernels.
//!
//! [`geom_collision_pair`] projects the shared model and state tables onto
//! two lightweight [`Geom`] values for one `(geom1, geom2, worldid)` triple.
//! The views borrow the mesh tables; nothing is copied beyond pose and size.

use std::ops::Range;

use nalgebra::{Matrix3, Matrix6x3, Vector3};

use crate::types::{Data, Model};

/// Sentinel for absent mesh data in address/count fields.
pub const ABSENT: i32 = -1;

/// Borrowed mesh and convex-polytope tables.
///
/// These are the model's full flat tables; a geom's own range is selected
/// by its address/count fields. Empty for non-mesh geoms.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshTables<'a> {
    /// All mesh vertices.
    pub vert: &'a [Vector3<f64>],
    /// All convex-hull graphs.
    pub graph: &'a [i32],
    /// Polygon normals.
    pub polynormal: &'a [Vector3<f64>],
    /// First vertex entry of each polygon.
    pub polyvertadr: &'a [i32],
    /// Vertex count of each polygon.
    pub polyvertnum: &'a [i32],
    /// Polygon vertex lists.
    pub polyvert: &'a [i32],
    /// First map entry of each vertex.
    pub polymapadr: &'a [i32],
    /// Polygon count of each vertex.
    pub polymapnum: &'a [i32],
    /// Vertex → polygon map.
    pub polymap: &'a [i32],
}

impl<'a> MeshTables<'a> {
    fn of(model: &'a Model) -> Self {
        Self {
            vert: &model.mesh_vert,
            graph: &model.mesh_graph,
            polynormal: &model.mesh_polynormal,
            polyvertadr: &model.mesh_polyvertadr,
            polyvertnum: &model.mesh_polyvertnum,
            polyvert: &model.mesh_polyvert,
            polymapadr: &model.mesh_polymapadr,
            polymapnum: &model.mesh_polymapnum,
            polymap: &model.mesh_polymap,
        }
    }
}

/// Read-only collision view of one geometry in one world.
///
/// Mesh address/count fields hold [`ABSENT`] when the geometry is not a mesh
/// or has no mesh instance assigned. `margin` and `index` are left for later
/// stages to fill.
#[derive(Debug, Clone, Copy)]
pub struct Geom<'a> {
    /// World-frame position.
    pub pos: Vector3<f64>,
    /// World-frame orientation.
    pub rot: Matrix3<f64>,
    /// Third column of `rot`; the outward normal of a plane.
    pub normal: Vector3<f64>,
    /// Shape size.
    pub size: Vector3<f64>,
    /// Contact margin (filled from resolved contact parameters).
    pub margin: f64,
    /// Height-field prism.
    pub hfprism: Matrix6x3<f64>,
    /// First vertex in `mesh.vert`.
    pub vertadr: i32,
    /// Vertex count.
    pub vertnum: i32,
    /// First entry in `mesh.graph`.
    pub graphadr: i32,
    /// Polygon count.
    pub mesh_polynum: i32,
    /// First polygon.
    pub mesh_polyadr: i32,
    /// Shared mesh tables.
    pub mesh: MeshTables<'a>,
    /// Provenance back-reference, -1 when unset.
    pub index: i32,
}

impl Default for Geom<'_> {
    fn default() -> Self {
        Self {
            pos: Vector3::zeros(),
            rot: Matrix3::identity(),
            normal: Vector3::z(),
            size: Vector3::zeros(),
            margin: 0.0,
            hfprism: Matrix6x3::zeros(),
            vertadr: ABSENT,
            vertnum: ABSENT,
            graphadr: ABSENT,
            mesh_polynum: ABSENT,
            mesh_polyadr: ABSENT,
            mesh: MeshTables::default(),
            index: -1,
        }
    }
}

impl<'a> Geom<'a> {
    /// Whether mesh vertex data is present.
    #[inline]
    #[must_use]
    pub fn has_mesh(&self) -> bool {
        self.vertadr >= 0 && self.vertnum >= 0
    }

    /// Vertex range in `mesh.vert`, or `None` when absent.
    #[must_use]
    pub fn vert_span(&self) -> Option<Range<usize>> {
        span(self.vertadr, self.vertnum)
    }

    /// Polygon range in `mesh.polynormal` / `mesh.polyvertadr`, or `None`.
    #[must_use]
    pub fn poly_span(&self) -> Option<Range<usize>> {
        span(self.mesh_polyadr, self.mesh_polynum)
    }

    /// This geometry's vertices (empty when absent).
    #[must_use]
    pub fn verts(&self) -> &'a [Vector3<f64>] {
        self.vert_span()
            .and_then(|r| self.mesh.vert.get(r))
            .unwrap_or_default()
    }

    /// Convex-hull graph starting at `graphadr`, or `None` when absent.
    #[must_use]
    pub fn graph(&self) -> Option<&'a [i32]> {
        let adr = usize::try_from(self.graphadr).ok()?;
        self.mesh.graph.get(adr..)
    }
}

fn span(adr: i32, num: i32) -> Option<Range<usize>> {
    let adr = usize::try_from(adr).ok()?;
    let num = usize::try_from(num).ok()?;
    Some(adr..adr + num)
}

fn geom_view<'a>(model: &'a Model, data: &Data, g: usize, worldid: usize) -> Geom<'a> {
    let rot = *data.geom_xmat.get(worldid, g);
    let mut geom = Geom {
        pos: *data.geom_xpos.get(worldid, g),
        rot,
        normal: rot.column(2).into_owned(),
        size: *model.geom_size.get(worldid, g),
        ..Geom::default()
    };

    if model.geom_type[g].is_mesh() {
        let dataid = model.geom_dataid[g];
        if let Ok(mesh_id) = usize::try_from(dataid) {
            geom.vertadr = model.mesh_vertadr[mesh_id];
            geom.vertnum = model.mesh_vertnum[mesh_id];
            geom.graphadr = model.mesh_graphadr[mesh_id];
            geom.mesh_polynum = model.mesh_polynum[mesh_id];
            geom.mesh_polyadr = model.mesh_polyadr[mesh_id];
        }
        geom.mesh = MeshTables::of(model);
    }

    geom
}

/// Build the two collision views for a candidate pair in world `worldid`.
///
/// Pose comes from `data` (one row per world); size follows the broadcast
/// rule. Never fails: ids are assumed in range.
#[must_use]
pub fn geom_collision_pair<'a>(
    model: &'a Model,
    data: &Data,
    geoms: [usize; 2],
    worldid: usize,
) -> (Geom<'a>, Geom<'a>) {
    (
        geom_view(model, data, geoms[0], worldid),
        geom_view(model, data, geoms[1], worldid),
    )
}
