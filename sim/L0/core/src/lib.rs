//! Batched narrowphase collision core.
//!
//! This crate is the contact-generation stage of a batched, MuJoCo-aligned
//! rigid-body simulator. Many worlds share one [`Model`]; each world owns a
//! row of every per-world table in [`Data`], and all worlds commit into one
//! fixed-capacity [`ContactBuffer`].
//!
//! - [`Model`] is static (geometry, materials, mesh topology, explicit pairs)
//! - [`Data`] is dynamic (poses, joint state, forces, contacts)
//! - [`CollisionContext`] is the broadphase hand-off
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Broadphase (caller)  ──►  CollisionContext                 │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │  one task per candidate
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  contact_params ─► geom_collision_pair ─► Narrowphase       │
//! │                                   └──► write_contact        │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Data::contacts  (shared, lock-free, bounded)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Layer 0 Crate
//!
//! No rendering or engine dependencies. Per-shape narrowphase kernels and
//! the broadphase are supplied through the [`Narrowphase`] trait and
//! [`CollisionContext`].
//!
//! # Quick Start
//!
//! ```ignore
//! use sim_collision_core::{CollisionConfig, CollisionContext, Model, PairId, collide};
//!
//! let config = CollisionConfig::with_naconmax(1024);
//! let model = Model::new(2, 64);
//! let mut data = model.make_data(config.naconmax);
//! let mut ctx = CollisionContext::from_config(&config)?;
//!
//! data.reset_contacts();
//! for worldid in 0..64 {
//!     ctx.push([0, 1], PairId::mixed(), worldid);
//! }
//! let stats = collide(&model, &data, &ctx, &my_narrowphase, &config);
//! println!("{} contacts, {} dropped", stats.nacon, stats.overflow);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,       // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,           // mul_add style changes aren't always clearer
    clippy::option_if_let_else,         // if-let is often more readable than map_or_else
    clippy::doc_markdown,               // Not all technical terms need backticks
)]

// Configuration and errors
pub mod config;
pub mod error;

// Core type definitions (enums, per-world tables, Model, Data, contacts)
pub mod types;

// Narrowphase collision core
pub mod collision;

// Passive forces (sibling stage)
pub mod forward;

pub use collision::{
    CollideStats, CollisionContext, ContactGeometry, ContactParams, ContactSet, Geom,
    Narrowphase, collide, contact_params, geom_collision_pair, resolve_contact_params,
    write_contact,
};
pub use config::{CollisionConfig, DEFAULT_NACONMAX, MJ_MINMU, MJ_MINVAL};
pub use error::{CollisionError, CollisionResult};
pub use forward::{mj_fwd_passive, quat_sub};
pub use types::{
    Contact, ContactBuffer, ContactType, DISABLE_CONTACT, DISABLE_PASSIVE, Data, GeomType,
    MeshData, MeshPolygon, MjJointType, Model, PairId, PairParams, WorldArray,
};
