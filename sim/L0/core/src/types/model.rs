//! Model struct definition and construction helpers.
//!
//! [`Model`] is the read-only description shared by every world in the
//! batch: geometry types and materials, mesh topology, explicit contact-pair
//! overrides, and the joint/dof tables read by the passive stage.
//!
//! # Memory Layout
//!
//! Static tables are plain `Vec`s indexed by entity id. Tables that may vary
//! per world are [`WorldArray`]s with either one row (broadcast) or `nworld`
//! rows; lookups always go through `worldid % rows`.

use nalgebra::Vector3;

use super::data::Data;
use super::enums::{GeomType, MjJointType};
use super::world_array::WorldArray;
use crate::error::{CollisionError, CollisionResult};

/// Default solver reference `[timeconst, dampratio]` (MuJoCo default).
pub const DEFAULT_SOLREF: [f64; 2] = [0.02, 1.0];

/// Default solver impedance `[dmin, dmax, width, midpoint, power]` (MuJoCo default).
pub const DEFAULT_SOLIMP: [f64; 5] = [0.9, 0.95, 0.001, 0.5, 2.0];

/// Default geom friction `[sliding, torsional, rolling]` (MuJoCo default).
pub const DEFAULT_FRICTION: [f64; 3] = [1.0, 0.005, 0.0001];

/// Default contact dimensionality.
pub const DEFAULT_CONDIM: i32 = 3;

/// One convex face of a mesh polytope.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPolygon {
    /// Outward face normal (mesh frame).
    pub normal: Vector3<f64>,
    /// Face vertices as mesh-local vertex indices, counter-clockwise.
    pub verts: Vec<i32>,
}

/// Mesh asset handed to [`Model::add_mesh`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (mesh frame).
    pub vert: Vec<Vector3<f64>>,
    /// Convex-hull adjacency graph in MuJoCo's flat layout. Empty if absent.
    pub graph: Vec<i32>,
    /// Convex polytope faces.
    pub polygons: Vec<MeshPolygon>,
}

/// Parameters of an explicit contact pair (MJCF `<pair>`).
///
/// All fields are fully resolved; no mixing happens for explicit pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PairParams {
    /// Contact dimensionality (1, 3, 4, 6).
    pub condim: i32,
    /// 5-element friction: `[tan1, tan2, torsional, roll1, roll2]`.
    pub friction: [f64; 5],
    /// Solver reference (normal direction).
    pub solref: [f64; 2],
    /// Solver reference (friction directions).
    pub solreffriction: [f64; 2],
    /// Solver impedance.
    pub solimp: [f64; 5],
    /// Distance threshold for contact activation.
    pub margin: f64,
    /// Contact included if distance < margin - gap.
    pub gap: f64,
}

impl Default for PairParams {
    fn default() -> Self {
        let [slide, spin, roll] = DEFAULT_FRICTION;
        Self {
            condim: DEFAULT_CONDIM,
            friction: [slide, slide, spin, roll, roll],
            solref: DEFAULT_SOLREF,
            solreffriction: [0.0, 0.0],
            solimp: DEFAULT_SOLIMP,
            margin: 0.0,
            gap: 0.0,
        }
    }
}

/// Static model shared by every world (like mjModel).
///
/// Per-world tables obey the broadcast rule: one row shared by all worlds,
/// or exactly `nworld` rows.
#[derive(Debug, Clone)]
pub struct Model {
    // ==================== Dimensions ====================
    /// Number of worlds in the batch.
    pub nworld: usize,
    /// Number of collision geometries.
    pub ngeom: usize,
    /// Number of meshes.
    pub nmesh: usize,
    /// Number of explicit contact pairs.
    pub npair: usize,
    /// Number of joints.
    pub njnt: usize,
    /// Number of generalized position coordinates.
    pub nq: usize,
    /// Number of degrees of freedom.
    pub nv: usize,

    // ==================== Options ====================
    /// Disable flags (`DISABLE_*` bits).
    pub disableflags: u32,

    // ==================== Geoms ====================
    /// Geometry type.
    pub geom_type: Vec<GeomType>,
    /// Mesh id for mesh geoms; -1 when no mesh instance is assigned.
    pub geom_dataid: Vec<i32>,
    /// Contact dimensionality.
    pub geom_condim: Vec<i32>,
    /// Contact priority; the higher-priority geom's friction and condim win.
    pub geom_priority: Vec<i32>,
    /// Shape size `(rows × ngeom)`.
    pub geom_size: WorldArray<Vector3<f64>>,
    /// Solver mixing weight `(rows × ngeom)`.
    pub geom_solmix: WorldArray<f64>,
    /// Solver reference `(rows × ngeom)`.
    pub geom_solref: WorldArray<[f64; 2]>,
    /// Solver impedance `(rows × ngeom)`.
    pub geom_solimp: WorldArray<[f64; 5]>,
    /// Friction `[sliding, torsional, rolling]` `(rows × ngeom)`.
    pub geom_friction: WorldArray<Vector3<f64>>,
    /// Contact margin `(rows × ngeom)`.
    pub geom_margin: WorldArray<f64>,
    /// Contact gap `(rows × ngeom)`.
    pub geom_gap: WorldArray<f64>,

    // ==================== Meshes ====================
    /// First vertex of each mesh in `mesh_vert`.
    pub mesh_vertadr: Vec<i32>,
    /// Vertex count of each mesh.
    pub mesh_vertnum: Vec<i32>,
    /// First entry of each mesh in `mesh_graph`; -1 when no graph.
    pub mesh_graphadr: Vec<i32>,
    /// All mesh vertices.
    pub mesh_vert: Vec<Vector3<f64>>,
    /// All convex-hull graphs.
    pub mesh_graph: Vec<i32>,
    /// Polygon count of each mesh.
    pub mesh_polynum: Vec<i32>,
    /// First polygon of each mesh.
    pub mesh_polyadr: Vec<i32>,
    /// Normal of each polygon.
    pub mesh_polynormal: Vec<Vector3<f64>>,
    /// First entry of each polygon in `mesh_polyvert`.
    pub mesh_polyvertadr: Vec<i32>,
    /// Vertex count of each polygon.
    pub mesh_polyvertnum: Vec<i32>,
    /// Polygon vertices (mesh-local vertex ids).
    pub mesh_polyvert: Vec<i32>,
    /// First entry of each vertex in `mesh_polymap`.
    pub mesh_polymapadr: Vec<i32>,
    /// Number of polygons containing each vertex.
    pub mesh_polymapnum: Vec<i32>,
    /// Vertex → polygon map (mesh-local polygon ids).
    pub mesh_polymap: Vec<i32>,

    // ==================== Explicit Pairs ====================
    /// Geometry ids of each explicit pair.
    pub pair_geom: Vec<[usize; 2]>,
    /// Contact dimensionality of each pair.
    pub pair_dim: Vec<i32>,
    /// 5-element friction `(rows × npair)`.
    pub pair_friction: WorldArray<[f64; 5]>,
    /// Solver reference `(rows × npair)`.
    pub pair_solref: WorldArray<[f64; 2]>,
    /// Friction solver reference `(rows × npair)`.
    pub pair_solreffriction: WorldArray<[f64; 2]>,
    /// Solver impedance `(rows × npair)`.
    pub pair_solimp: WorldArray<[f64; 5]>,
    /// Margin `(rows × npair)`.
    pub pair_margin: WorldArray<f64>,
    /// Gap `(rows × npair)`.
    pub pair_gap: WorldArray<f64>,

    // ==================== Joints ====================
    /// Joint type.
    pub jnt_type: Vec<MjJointType>,
    /// First position coordinate of each joint.
    pub jnt_qposadr: Vec<usize>,
    /// First dof of each joint.
    pub jnt_dofadr: Vec<usize>,
    /// Joint stiffness `(rows × njnt)`.
    pub jnt_stiffness: WorldArray<f64>,
    /// Spring reference configuration `(rows × nq)`.
    pub qpos_spring: WorldArray<f64>,
    /// Dof damping `(rows × nv)`.
    pub dof_damping: WorldArray<f64>,
}

impl Model {
    /// Create a model with `ngeom` sphere geoms and MuJoCo default materials.
    ///
    /// All per-world tables start broadcast; call [`WorldArray::expand`] on a
    /// table to give it per-world rows.
    #[must_use]
    pub fn new(ngeom: usize, nworld: usize) -> Self {
        Self {
            nworld: nworld.max(1),
            ngeom,
            nmesh: 0,
            npair: 0,
            njnt: 0,
            nq: 0,
            nv: 0,

            disableflags: 0,

            geom_type: vec![GeomType::Sphere; ngeom],
            geom_dataid: vec![-1; ngeom],
            geom_condim: vec![DEFAULT_CONDIM; ngeom],
            geom_priority: vec![0; ngeom],
            geom_size: WorldArray::filled(1, ngeom, Vector3::new(0.1, 0.0, 0.0)),
            geom_solmix: WorldArray::filled(1, ngeom, 1.0),
            geom_solref: WorldArray::filled(1, ngeom, DEFAULT_SOLREF),
            geom_solimp: WorldArray::filled(1, ngeom, DEFAULT_SOLIMP),
            geom_friction: WorldArray::filled(1, ngeom, Vector3::from(DEFAULT_FRICTION)),
            geom_margin: WorldArray::filled(1, ngeom, 0.0),
            geom_gap: WorldArray::filled(1, ngeom, 0.0),

            mesh_vertadr: vec![],
            mesh_vertnum: vec![],
            mesh_graphadr: vec![],
            mesh_vert: vec![],
            mesh_graph: vec![],
            mesh_polynum: vec![],
            mesh_polyadr: vec![],
            mesh_polynormal: vec![],
            mesh_polyvertadr: vec![],
            mesh_polyvertnum: vec![],
            mesh_polyvert: vec![],
            mesh_polymapadr: vec![],
            mesh_polymapnum: vec![],
            mesh_polymap: vec![],

            pair_geom: vec![],
            pair_dim: vec![],
            pair_friction: WorldArray::default(),
            pair_solref: WorldArray::default(),
            pair_solreffriction: WorldArray::default(),
            pair_solimp: WorldArray::default(),
            pair_margin: WorldArray::default(),
            pair_gap: WorldArray::default(),

            jnt_type: vec![],
            jnt_qposadr: vec![],
            jnt_dofadr: vec![],
            jnt_stiffness: WorldArray::default(),
            qpos_spring: WorldArray::default(),
            dof_damping: WorldArray::default(),
        }
    }

    /// Append a mesh asset and its convex-polytope tables. Returns the mesh id.
    ///
    /// The vertex → polygon map is derived from the polygon vertex lists.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn add_mesh(&mut self, mesh: &MeshData) -> usize {
        let mesh_id = self.nmesh;
        let nvert = mesh.vert.len();

        self.mesh_vertadr.push(self.mesh_vert.len() as i32);
        self.mesh_vertnum.push(nvert as i32);
        self.mesh_vert.extend_from_slice(&mesh.vert);

        if mesh.graph.is_empty() {
            self.mesh_graphadr.push(-1);
        } else {
            self.mesh_graphadr.push(self.mesh_graph.len() as i32);
            self.mesh_graph.extend_from_slice(&mesh.graph);
        }

        self.mesh_polyadr.push(self.mesh_polynormal.len() as i32);
        self.mesh_polynum.push(mesh.polygons.len() as i32);
        for poly in &mesh.polygons {
            self.mesh_polynormal.push(poly.normal);
            self.mesh_polyvertadr.push(self.mesh_polyvert.len() as i32);
            self.mesh_polyvertnum.push(poly.verts.len() as i32);
            self.mesh_polyvert.extend_from_slice(&poly.verts);
        }

        // Vertex → polygon map, one entry per vertex of this mesh
        for v in 0..nvert as i32 {
            self.mesh_polymapadr.push(self.mesh_polymap.len() as i32);
            let mut count = 0;
            for (p, poly) in mesh.polygons.iter().enumerate() {
                if poly.verts.contains(&v) {
                    self.mesh_polymap.push(p as i32);
                    count += 1;
                }
            }
            self.mesh_polymapnum.push(count);
        }

        self.nmesh += 1;
        mesh_id
    }

    /// Turn geom `geom` into a mesh geom backed by `mesh_id`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn set_geom_mesh(&mut self, geom: usize, mesh_id: usize) {
        self.geom_type[geom] = GeomType::Mesh;
        self.geom_dataid[geom] = mesh_id as i32;
    }

    /// Append an explicit contact pair. Returns the pair id.
    pub fn add_pair(&mut self, geom1: usize, geom2: usize, params: &PairParams) -> usize {
        let pair_id = self.npair;
        self.pair_geom.push([geom1, geom2]);
        self.pair_dim.push(params.condim);
        self.pair_friction.push_column(params.friction);
        self.pair_solref.push_column(params.solref);
        self.pair_solreffriction.push_column(params.solreffriction);
        self.pair_solimp.push_column(params.solimp);
        self.pair_margin.push_column(params.margin);
        self.pair_gap.push_column(params.gap);
        self.npair += 1;
        pair_id
    }

    /// Append a joint with uniform stiffness and per-dof damping. Returns the joint id.
    ///
    /// The spring reference is the zero configuration (identity orientation
    /// for ball and free joints).
    pub fn add_joint(&mut self, jnt_type: MjJointType, stiffness: f64, damping: f64) -> usize {
        let jnt_id = self.njnt;
        self.jnt_type.push(jnt_type);
        self.jnt_qposadr.push(self.nq);
        self.jnt_dofadr.push(self.nv);
        self.jnt_stiffness.push_column(stiffness);

        let reference: &[f64] = match jnt_type {
            MjJointType::Hinge | MjJointType::Slide => &[0.0],
            MjJointType::Ball => &[1.0, 0.0, 0.0, 0.0],
            MjJointType::Free => &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
        };
        for &q in reference {
            self.qpos_spring.push_column(q);
        }
        for _ in 0..jnt_type.nv() {
            self.dof_damping.push_column(damping);
        }

        self.nq += jnt_type.nq();
        self.nv += jnt_type.nv();
        self.njnt += 1;
        jnt_id
    }

    /// Check every per-world table against the 1-or-`nworld` row rule and
    /// every static table against the model dimensions.
    ///
    /// # Errors
    ///
    /// Returns the first shape violation found.
    pub fn validate(&self) -> CollisionResult<()> {
        let nw = self.nworld;

        for (field, len) in [
            ("geom_type", self.geom_type.len()),
            ("geom_dataid", self.geom_dataid.len()),
            ("geom_condim", self.geom_condim.len()),
            ("geom_priority", self.geom_priority.len()),
        ] {
            check_len(field, len, self.ngeom)?;
        }
        self.geom_size.check_shape("geom_size", nw, self.ngeom)?;
        self.geom_solmix.check_shape("geom_solmix", nw, self.ngeom)?;
        self.geom_solref.check_shape("geom_solref", nw, self.ngeom)?;
        self.geom_solimp.check_shape("geom_solimp", nw, self.ngeom)?;
        self.geom_friction.check_shape("geom_friction", nw, self.ngeom)?;
        self.geom_margin.check_shape("geom_margin", nw, self.ngeom)?;
        self.geom_gap.check_shape("geom_gap", nw, self.ngeom)?;

        check_len("pair_geom", self.pair_geom.len(), self.npair)?;
        check_len("pair_dim", self.pair_dim.len(), self.npair)?;
        self.pair_friction.check_shape("pair_friction", nw, self.npair)?;
        self.pair_solref.check_shape("pair_solref", nw, self.npair)?;
        self.pair_solreffriction
            .check_shape("pair_solreffriction", nw, self.npair)?;
        self.pair_solimp.check_shape("pair_solimp", nw, self.npair)?;
        self.pair_margin.check_shape("pair_margin", nw, self.npair)?;
        self.pair_gap.check_shape("pair_gap", nw, self.npair)?;

        check_len("jnt_type", self.jnt_type.len(), self.njnt)?;
        self.jnt_stiffness.check_shape("jnt_stiffness", nw, self.njnt)?;
        self.qpos_spring.check_shape("qpos_spring", nw, self.nq)?;
        self.dof_damping.check_shape("dof_damping", nw, self.nv)?;

        Ok(())
    }

    /// Allocate per-world state with a contact buffer of `naconmax` slots.
    #[must_use]
    pub fn make_data(&self, naconmax: usize) -> Data {
        Data::new(self, naconmax)
    }
}

fn check_len(field: &'static str, len: usize, expected: usize) -> CollisionResult<()> {
    if len == expected {
        Ok(())
    } else {
        Err(CollisionError::ColumnCountMismatch {
            field,
            cols: len,
            expected,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn cube() -> MeshData {
        let vert = vec![
            Vector3::new(-1.0, -1.0, -1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(1.0, 1.0, -1.0),
            Vector3::new(-1.0, 1.0, -1.0),
            Vector3::new(-1.0, -1.0, 1.0),
            Vector3::new(1.0, -1.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(-1.0, 1.0, 1.0),
        ];
        let face = |normal: [f64; 3], verts: [i32; 4]| MeshPolygon {
            normal: Vector3::from(normal),
            verts: verts.to_vec(),
        };
        MeshData {
            vert,
            graph: vec![],
            polygons: vec![
                face([0.0, 0.0, -1.0], [0, 3, 2, 1]),
                face([0.0, 0.0, 1.0], [4, 5, 6, 7]),
                face([0.0, -1.0, 0.0], [0, 1, 5, 4]),
                face([0.0, 1.0, 0.0], [2, 3, 7, 6]),
                face([-1.0, 0.0, 0.0], [0, 4, 7, 3]),
                face([1.0, 0.0, 0.0], [1, 2, 6, 5]),
            ],
        }
    }

    #[test]
    fn new_model_has_mujoco_defaults() {
        let model = Model::new(2, 4);
        assert_eq!(model.nworld, 4);
        assert_eq!(*model.geom_solref.get(3, 1), [0.02, 1.0]);
        assert_eq!(*model.geom_solimp.get(0, 0), [0.9, 0.95, 0.001, 0.5, 2.0]);
        assert_eq!(*model.geom_friction.get(2, 0), Vector3::new(1.0, 0.005, 0.0001));
        assert_eq!(model.geom_condim, vec![3, 3]);
        assert_eq!(model.geom_dataid, vec![-1, -1]);
        model.validate().unwrap();
    }

    #[test]
    fn add_mesh_builds_polytope_tables() {
        let mut model = Model::new(1, 1);
        let first = model.add_mesh(&cube());
        let second = model.add_mesh(&cube());
        assert_eq!((first, second), (0, 1));
        assert_eq!(model.mesh_vertadr, vec![0, 8]);
        assert_eq!(model.mesh_vertnum, vec![8, 8]);
        assert_eq!(model.mesh_graphadr, vec![-1, -1]);
        assert_eq!(model.mesh_polyadr, vec![0, 6]);
        assert_eq!(model.mesh_polynum, vec![6, 6]);
        assert_eq!(model.mesh_polyvertadr[7], 28);

        // Every cube corner touches exactly three faces
        assert!(model.mesh_polymapnum.iter().all(|&n| n == 3));
        assert_eq!(model.mesh_polymap.len(), 2 * 8 * 3);
        let adr = model.mesh_polymapadr[0] as usize;
        assert_eq!(&model.mesh_polymap[adr..adr + 3], &[0, 2, 4]);

        model.set_geom_mesh(0, second);
        assert_eq!(model.geom_type[0], GeomType::Mesh);
        assert_eq!(model.geom_dataid[0], 1);
    }

    #[test]
    fn add_pair_and_joint_keep_tables_consistent() {
        let mut model = Model::new(3, 2);
        let pair = model.add_pair(0, 2, &PairParams::default());
        assert_eq!(pair, 0);
        assert_eq!(model.pair_geom, vec![[0, 2]]);
        assert_eq!(*model.pair_friction.get(1, 0), [1.0, 1.0, 0.005, 0.0001, 0.0001]);

        model.add_joint(MjJointType::Free, 1.0, 0.1);
        model.add_joint(MjJointType::Hinge, 2.0, 0.2);
        assert_eq!((model.nq, model.nv, model.njnt), (8, 7, 2));
        assert_eq!(model.jnt_qposadr, vec![0, 7]);
        assert_eq!(model.jnt_dofadr, vec![0, 6]);
        assert_eq!(*model.qpos_spring.get(0, 3), 1.0);
        assert_eq!(*model.dof_damping.get(1, 6), 0.2);
        model.validate().unwrap();
    }

    #[test]
    fn validate_rejects_wrong_row_count() {
        let mut model = Model::new(2, 4);
        model.geom_gap = WorldArray::filled(3, 2, 0.0);
        assert_eq!(
            model.validate(),
            Err(CollisionError::RowCountMismatch {
                field: "geom_gap",
                rows: 3,
                nworld: 4
            })
        );
    }

    #[test]
    fn validate_rejects_short_static_table() {
        let mut model = Model::new(2, 1);
        model.geom_condim.pop();
        assert!(model.validate().is_err());
    }
}
