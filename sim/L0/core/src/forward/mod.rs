//! Forward-stage force computations that run beside collision.
//!
//! Only passive joint forces live here. They read joint state and write the
//! `qfrc_*` tables, which are disjoint from everything the collision stage
//! touches.

mod passive;

pub use passive::{mj_fwd_passive, quat_sub};
