//! Deterministic generation of trial inputs.
//!
//! Every scalar and point is derived from SHA-512 over a domain label, the
//! 32-byte seed, the trial number and the term index, so any trial can be
//! regenerated from its seed alone.

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha512};

use crate::algebra::PointArith;

const SCALAR_LABEL: &[u8] = b"multimul/scalar";
const POINT_LABEL: &[u8] = b"multimul/point";

/// How the terms of one trial are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialShape {
    pub terms: usize,
    /// Trailing terms whose scalar is forced to zero.
    pub zeros: usize,
    /// Leading terms whose point is forced to the identity.
    pub infinities: usize,
    /// Draw 16-bit scalars instead of full-width ones.
    pub small_scalars: bool,
}

impl TrialShape {
    pub const fn new(terms: usize) -> Self {
        Self {
            terms,
            zeros: 0,
            infinities: 0,
            small_scalars: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TermSampler {
    seed: [u8; 32],
}

impl TermSampler {
    pub const fn new(seed: [u8; 32]) -> Self {
        Self { seed }
    }

    /// Seeds the sampler from the operating system.
    pub fn from_entropy() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::new(seed)
    }

    pub fn seed(&self) -> &[u8; 32] {
        &self.seed
    }

    fn wide(&self, label: &[u8], trial: u64, index: u64) -> [u8; 64] {
        let mut hasher = Sha512::new();
        hasher.update(label);
        hasher.update(self.seed);
        hasher.update(trial.to_le_bytes());
        hasher.update(index.to_le_bytes());

        let mut out = [0u8; 64];
        out.copy_from_slice(&hasher.finalize());
        out
    }

    pub fn scalar(&self, trial: u64, index: u64) -> Scalar {
        Scalar::from_bytes_mod_order_wide(&self.wide(SCALAR_LABEL, trial, index))
    }

    pub fn small_scalar(&self, trial: u64, index: u64) -> Scalar {
        let wide = self.wide(SCALAR_LABEL, trial, index);
        Scalar::from(u64::from(u16::from_le_bytes([wide[0], wide[1]])))
    }

    pub fn point(&self, trial: u64, index: u64) -> RistrettoPoint {
        RistrettoPoint::from_uniform_bytes(&self.wide(POINT_LABEL, trial, index))
    }

    /// Builds the scalars and points of one trial.
    pub fn trial(&self, trial: u64, shape: &TrialShape) -> (Vec<Scalar>, Vec<RistrettoPoint>) {
        let mut scalars = Vec::with_capacity(shape.terms);
        let mut points = Vec::with_capacity(shape.terms);
        let zero_from = shape.terms.saturating_sub(shape.zeros);

        for i in 0..shape.terms {
            let index = i as u64;
            let scalar = if i >= zero_from {
                Scalar::ZERO
            } else if shape.small_scalars {
                self.small_scalar(trial, index)
            } else {
                self.scalar(trial, index)
            };
            let point = if i < shape.infinities {
                RistrettoPoint::infinity()
            } else {
                self.point(trial, index)
            };
            scalars.push(scalar);
            points.push(point);
        }
        (scalars, points)
    }
}
