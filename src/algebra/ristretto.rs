//! Ristretto255 backend, delegating to `curve25519-dalek`.
//!
//! Ristretto points are stored in extended twisted Edwards coordinates, so
//! additions and doublings avoid field inversions.

use core::cmp::Ordering;

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{Identity, IsIdentity};

use super::{PointArith, ScalarArith};

impl ScalarArith for Scalar {
    #[inline]
    fn zero() -> Self {
        Scalar::ZERO
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.as_bytes().iter().all(|&b| b == 0)
    }

    fn cmp_var(&self, other: &Self) -> Ordering {
        // Little-endian encodings: compare from the most significant byte down.
        self.as_bytes()
            .iter()
            .rev()
            .cmp(other.as_bytes().iter().rev())
    }

    #[inline]
    fn add(&self, other: &Self) -> Self {
        self + other
    }

    #[inline]
    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    #[inline]
    fn neg(&self) -> Self {
        -self
    }

    fn shr_one(&mut self) -> bool {
        let mut bytes = self.to_bytes();
        let mut carry = 0u8;
        for byte in bytes.iter_mut().rev() {
            let low = *byte & 1;
            *byte = (*byte >> 1) | (carry << 7);
            carry = low;
        }
        // Halving a canonical value stays canonical, so the reduction is a no-op.
        *self = Scalar::from_bytes_mod_order(bytes);
        carry == 1
    }

    fn bit_length(&self) -> u32 {
        let bytes = self.as_bytes();
        match bytes.iter().rposition(|&b| b != 0) {
            Some(top) => top as u32 * 8 + (8 - bytes[top].leading_zeros()),
            None => 0,
        }
    }
}

impl PointArith for RistrettoPoint {
    #[inline]
    fn infinity() -> Self {
        RistrettoPoint::identity()
    }

    #[inline]
    fn is_infinity(&self) -> bool {
        self.is_identity()
    }

    #[inline]
    fn add_var(&self, other: &Self) -> Self {
        self + other
    }

    #[inline]
    fn double_nonzero(&self) -> Self {
        debug_assert!(!self.is_identity(), "doubling the identity point");
        self + self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;

    #[test]
    fn test_cmp_var_orders_by_integer_value() {
        let small = Scalar::from(5u64);
        let large = Scalar::from(1u64 << 40);
        assert_eq!(small.cmp_var(&large), Ordering::Less);
        assert_eq!(large.cmp_var(&small), Ordering::Greater);
        assert_eq!(small.cmp_var(&Scalar::from(5u64)), Ordering::Equal);

        // -1 is the largest canonical residue.
        let minus_one = -Scalar::ONE;
        assert_eq!(minus_one.cmp_var(&large), Ordering::Greater);
    }

    #[test]
    fn test_shr_one_extracts_low_bits() {
        let mut s = Scalar::from(0b1011u64);
        let mut bits = Vec::new();
        while !ScalarArith::is_zero(&s) {
            bits.push(s.shr_one());
        }
        assert_eq!(bits, vec![true, true, false, true]);
    }

    #[test]
    fn test_shr_one_carries_across_bytes() {
        let mut s = Scalar::from(0x1_00u64);
        assert!(!s.shr_one());
        assert_eq!(s, Scalar::from(0x80u64));

        let mut top = -Scalar::ONE;
        let expected_bit = top.as_bytes()[0] & 1 == 1;
        assert_eq!(top.shr_one(), expected_bit);
        assert_eq!(top.bit_length(), 252);
    }

    #[test]
    fn test_bit_length() {
        assert_eq!(Scalar::ZERO.bit_length(), 0);
        assert_eq!(Scalar::ONE.bit_length(), 1);
        assert_eq!(Scalar::from(255u64).bit_length(), 8);
        assert_eq!(Scalar::from(256u64).bit_length(), 9);
        assert_eq!((-Scalar::ONE).bit_length(), 253);
    }

    #[test]
    fn test_scalar_add_sub_neg() {
        let a = Scalar::from(10u64);
        let b = Scalar::from(3u64);
        assert_eq!(ScalarArith::sub(&a, &b), Scalar::from(7u64));
        assert_eq!(ScalarArith::add(&a, &b), Scalar::from(13u64));
        assert_eq!(ScalarArith::add(&a, &ScalarArith::neg(&a)), Scalar::ZERO);
    }

    #[test]
    fn test_point_identity_handling() {
        let g = RISTRETTO_BASEPOINT_POINT;
        let o = RistrettoPoint::infinity();
        assert!(o.is_infinity());
        assert!(!g.is_infinity());
        assert_eq!(g.add_var(&o), g);
        assert_eq!(o.add_var(&g), g);
        assert_eq!(g.double_nonzero(), Scalar::from(2u64) * g);
    }
}
