//! Runtime flag helpers for checking disable bitfields.
//!
//! Flag constants live in `enums.rs`. Helpers that take `&Model` live here.

use super::model::Model;

/// Returns true if the given disable flag is set on the model.
#[inline]
#[must_use]
pub fn disabled(model: &Model, flag: u32) -> bool {
    debug_assert!(
        flag.is_power_of_two(),
        "disabled() called with a multi-bit flag: {flag:#x}"
    );
    model.disableflags & flag != 0
}
