//! Policies that encode a single bit into the coefficients of one block.
//!
//! Two policies are provided:
//! - [`RelativeMagnitude`], after Koch and Zhao: the ordering of two mid frequency coefficients
//!   carries the bit. Extraction is blind.
//! - [`AdditiveBias`]: a single coefficient is pushed up or down by a fixed strength. Extraction
//!   is non-blind, the unmodified original is needed to see which way it moved.

use crate::dct2d::{CoefficientGrid, Position};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default strength for the relative magnitude policy, in coefficient units.
pub const DEFAULT_RELATIVE_STRENGTH: f32 = 100.0;

/// Default strength for the additive bias policy, in coefficient units.
pub const DEFAULT_BIAS_STRENGTH: f32 = 150.0;

/// Encoding and decoding of one bit per block.
pub trait EmbeddingPolicy: Send + Sync {
    /// Modify the coefficients to carry `bit`.
    fn embed_bit(&self, coefficients: &mut CoefficientGrid, bit: bool);

    /// Read the bit back, `original` holds the coefficients of the same block in the unmodified
    /// image, if available.
    fn decode_bit(
        &self,
        coefficients: &CoefficientGrid,
        original: Option<&CoefficientGrid>,
    ) -> Result<bool>;

    /// Whether [`EmbeddingPolicy::decode_bit`] works without the original.
    fn is_blind(&self) -> bool;

    /// The perturbation magnitude.
    fn strength(&self) -> f32;
}

/// Forces an ordering between two coefficients.
///
/// A zero is written as `first > second`, a one as `second > first`, by moving each coefficient
/// half the strength apart. Decoding only looks at the sign of `first - second`; the margin
/// is not checked, so a disturbance that flips the ordering silently flips the bit.
#[derive(PartialEq, Debug, Copy, Clone, Serialize, Deserialize)]
pub struct RelativeMagnitude {
    pub strength: f32,
    pub first: Position,
    pub second: Position,
}

impl RelativeMagnitude {
    pub fn new(strength: f32) -> Self {
        RelativeMagnitude {
            strength,
            ..Default::default()
        }
    }
}

impl Default for RelativeMagnitude {
    fn default() -> Self {
        RelativeMagnitude {
            strength: DEFAULT_RELATIVE_STRENGTH,
            first: Position::new(2, 3),
            second: Position::new(3, 2),
        }
    }
}

impl EmbeddingPolicy for RelativeMagnitude {
    fn embed_bit(&self, coefficients: &mut CoefficientGrid, bit: bool) {
        let half = self.strength / 2.0;
        let sign = if bit { -1.0 } else { 1.0 };
        coefficients[self.first] += sign * half;
        coefficients[self.second] -= sign * half;
    }

    fn decode_bit(
        &self,
        coefficients: &CoefficientGrid,
        _original: Option<&CoefficientGrid>,
    ) -> Result<bool> {
        Ok(coefficients[self.first] <= coefficients[self.second])
    }

    fn is_blind(&self) -> bool {
        true
    }

    fn strength(&self) -> f32 {
        self.strength
    }
}

/// Biases one coefficient up for a one, down for a zero.
#[derive(PartialEq, Debug, Copy, Clone, Serialize, Deserialize)]
pub struct AdditiveBias {
    pub strength: f32,
    pub position: Position,
}

impl AdditiveBias {
    pub fn new(strength: f32) -> Self {
        AdditiveBias {
            strength,
            ..Default::default()
        }
    }
}

impl Default for AdditiveBias {
    fn default() -> Self {
        AdditiveBias {
            strength: DEFAULT_BIAS_STRENGTH,
            position: Position::new(4, 4),
        }
    }
}

impl EmbeddingPolicy for AdditiveBias {
    fn embed_bit(&self, coefficients: &mut CoefficientGrid, bit: bool) {
        if bit {
            coefficients[self.position] += self.strength;
        } else {
            coefficients[self.position] -= self.strength;
        }
    }

    fn decode_bit(
        &self,
        coefficients: &CoefficientGrid,
        original: Option<&CoefficientGrid>,
    ) -> Result<bool> {
        let original = original.ok_or(Error::MissingOriginal)?;
        let delta = coefficients[self.position] - original[self.position];
        Ok(delta > 0.0)
    }

    fn is_blind(&self) -> bool {
        false
    }

    fn strength(&self) -> f32 {
        self.strength
    }
}

/// Policy selection, as stored in the read and write configuration.
#[derive(PartialEq, Debug, Copy, Clone, Serialize, Deserialize)]
pub enum Policy {
    RelativeMagnitude(RelativeMagnitude),
    AdditiveBias(AdditiveBias),
}

impl Policy {
    /// The selected policy as a trait object.
    pub fn as_policy(&self) -> &dyn EmbeddingPolicy {
        match self {
            Policy::RelativeMagnitude(p) => p,
            Policy::AdditiveBias(p) => p,
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::RelativeMagnitude(RelativeMagnitude::default())
    }
}
