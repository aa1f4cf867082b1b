use super::ReductionStats;
use crate::algebra::{PointArith, ScalarArith};

/// Least-significant-bit-first double-and-add.
///
/// After reduction the residual scalar is almost always tiny, so a plain
/// binary ladder beats any windowed method here. The base is never doubled
/// after the last bit has been consumed.
pub(crate) fn ladder<S, P>(scalar: &S, point: &P, stats: &mut ReductionStats) -> P
where
    S: ScalarArith,
    P: PointArith,
{
    let mut acc = P::infinity();
    if point.is_infinity() {
        return acc;
    }

    let mut remaining = *scalar;
    let mut base = *point;
    while !remaining.is_zero() {
        if remaining.shr_one() {
            acc = acc.add_var(&base);
            stats.ladder_additions += 1;
        }
        if !remaining.is_zero() {
            base = base.double_nonzero();
            stats.ladder_doublings += 1;
        }
    }
    acc
}

/// Single-term scalar multiplication through the same ladder.
pub fn scalar_mul<S: ScalarArith, P: PointArith>(scalar: &S, point: &P) -> P {
    ladder(scalar, point, &mut ReductionStats::default())
}
