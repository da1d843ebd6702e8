//! Narrowphase collision core: geometry views, contact parameter mixing, and
//! contact commit.
//!
//! Corresponds to the per-pair half of MuJoCo's `engine_collision_driver.c`
//! plus `mj_contactParam()`. Broadphase and the per-shape geometric tests
//! are supplied by the caller.
//!
//! # Pipeline
//!
//! ```text
//! CollisionContext ──► contact_params ──► geom_collision_pair ──► Narrowphase
//!                                                                     │
//!                       Data::contacts ◄──── write_contact ◄──────────┘
//! ```

mod commit;
mod context;
mod driver;
mod geom;
mod params;

pub use commit::{ContactGeometry, write_contact};
pub use context::CollisionContext;
pub use driver::{CollideStats, ContactSet, Narrowphase, collide};
pub use geom::{ABSENT, Geom, MeshTables, geom_collision_pair};
pub use params::{
    ContactParams, combine_solimp, combine_solref, contact_params, resolve_contact_params,
    solmix_weight,
};
