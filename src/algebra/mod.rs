//! Scalar and point operations consumed by the multi-multiplication engine.
//!
//! The engine never touches field elements or encodings directly. Everything
//! it needs from the group is listed in the two traits below, which keeps the
//! reduction and ladder code independent of the curve backend.

pub mod ristretto;

use core::cmp::Ordering;

/// Integer modulo the group order.
///
/// Comparisons and bit extraction are variable time. Never feed secret
/// scalars through this interface.
pub trait ScalarArith: Copy + Eq {
    fn zero() -> Self;

    fn is_zero(&self) -> bool;

    /// Compares the canonical integer representatives. Not constant time.
    fn cmp_var(&self, other: &Self) -> Ordering;

    fn add(&self, other: &Self) -> Self;

    /// `self - other` mod the group order. The engine only calls this with
    /// `self >= other`, so the result never wraps.
    fn sub(&self, other: &Self) -> Self;

    fn neg(&self) -> Self;

    /// Shifts the scalar right by one bit and returns the bit shifted out.
    fn shr_one(&mut self) -> bool;

    /// Number of significant bits of the canonical representative.
    fn bit_length(&self) -> u32;
}

/// Group element in a representation where addition needs no inversion.
pub trait PointArith: Copy {
    fn infinity() -> Self;

    fn is_infinity(&self) -> bool;

    /// General addition; either operand may be the identity.
    fn add_var(&self, other: &Self) -> Self;

    /// Doubling. The operand must not be the identity.
    fn double_nonzero(&self) -> Self;
}
