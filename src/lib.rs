//! Variable-time multi-scalar multiplication over Ristretto255.
//!
//! [`multi_mul`] evaluates `Σ nᵢ·Aᵢ` for up to [`MAX_TERMS`] terms by
//! repeatedly folding the two heaviest terms into each other and finishing
//! the single survivor with a binary ladder. The engine is generic over the
//! [`algebra::ScalarArith`] and [`algebra::PointArith`] traits; the Ristretto
//! implementation lives in [`algebra::ristretto`].
//!
//! None of this is constant time. Scalars passed in must be public.

pub mod algebra;
pub mod job;
pub mod multimul;
pub mod sampler;

pub use multimul::{
    MAX_TERMS, Phase, ReductionStats, multi_mul, multi_mul_batched, multi_mul_batched_with_stats,
    multi_mul_with_stats, naive_multi_mul, scalar_mul,
};
