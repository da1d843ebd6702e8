//! Configuration for the collision core.
//!
//! The core consumes a single capacity integer (`naconmax`) plus the two
//! numeric floors used during parameter resolution. Validation of model
//! shapes and context capacity is opt-in.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CollisionError, CollisionResult};

/// Minimum friction coefficient (matches MuJoCo's `mjMINMU`).
pub const MJ_MINMU: f64 = 1e-5;

/// Minimum meaningful value (matches MuJoCo's `mjMINVAL`).
pub const MJ_MINVAL: f64 = 1e-15;

/// Default contact capacity shared by all worlds.
pub const DEFAULT_NACONMAX: usize = 1 << 16;

/// Collision-core configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionConfig {
    /// Capacity of the shared contact buffer and of the broadphase hand-off.
    pub naconmax: usize,
    /// Floor applied to every resolved friction component.
    pub min_mu: f64,
    /// Threshold below which a solmix value is treated as zero.
    pub min_val: f64,
    /// Run shape and capacity checks at construction time.
    pub validate: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            naconmax: DEFAULT_NACONMAX,
            min_mu: MJ_MINMU,
            min_val: MJ_MINVAL,
            validate: false,
        }
    }
}

impl CollisionConfig {
    /// Create a config with the given contact capacity.
    #[must_use]
    pub fn with_naconmax(naconmax: usize) -> Self {
        Self {
            naconmax,
            ..Default::default()
        }
    }

    /// Set the friction floor.
    #[must_use]
    pub fn min_mu(mut self, min_mu: f64) -> Self {
        self.min_mu = min_mu;
        self
    }

    /// Set the solmix zero threshold.
    #[must_use]
    pub fn min_val(mut self, min_val: f64) -> Self {
        self.min_val = min_val;
        self
    }

    /// Enable construction-time validation.
    #[must_use]
    pub fn with_validation(mut self) -> Self {
        self.validate = true;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::InvalidCapacity`] for a zero capacity and
    /// [`CollisionError::InvalidConfig`] for negative or non-finite floors.
    pub fn validate(&self) -> CollisionResult<()> {
        if self.naconmax == 0 {
            return Err(CollisionError::InvalidCapacity(self.naconmax));
        }
        if !self.min_mu.is_finite() || self.min_mu < 0.0 {
            return Err(CollisionError::invalid_config(format!(
                "min_mu must be finite and non-negative, got {}",
                self.min_mu
            )));
        }
        if !self.min_val.is_finite() || self.min_val < 0.0 {
            return Err(CollisionError::invalid_config(format!(
                "min_val must be finite and non-negative, got {}",
                self.min_val
            )));
        }
        Ok(())
    }
}
