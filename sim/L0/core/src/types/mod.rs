//! Core type definitions for the batched collision pipeline.
//!
//! This module contains the types that flow through every stage: enums,
//! per-world tables, Model, Data, and the shared contact buffer.

pub(crate) mod contact_types;
pub(crate) mod data;
pub(crate) mod enums;
pub(crate) mod flags;
pub(crate) mod model;
pub(crate) mod world_array;

pub use contact_types::{Contact, ContactBuffer, PairId, contact_frame};
pub use data::Data;
pub use enums::*;
pub use flags::disabled;
pub use model::{
    DEFAULT_CONDIM, DEFAULT_FRICTION, DEFAULT_SOLIMP, DEFAULT_SOLREF, MeshData, MeshPolygon,
    Model, PairParams,
};
pub use world_array::WorldArray;
