use super::ReductionStats;
use super::heap::{Term, TermHeap};
use crate::algebra::{PointArith, ScalarArith};

/// Largest number of rounds [`reduce`] may spend on a heap: the total bit
/// length of its scalars times the number of terms.
///
/// Well-spread scalars collapse far below this. Badly spread ones (one huge
/// scalar next to a tiny one) would otherwise take time linear in their gap.
pub(crate) fn round_budget<S, P>(heap: &TermHeap<S, P>) -> usize
where
    S: ScalarArith,
    P: PointArith,
{
    let total_bits: usize = heap.iter().map(|t| t.scalar.bit_length() as usize).sum();
    total_bits * heap.len()
}

/// Collapses the heap into a single term with the same weighted sum.
///
/// Each round pops the heaviest term `(a, X)` and folds it into the next
/// heaviest `(b, Y)` using `aX + bY = (a - b)X + b(X + Y)`. The resident term
/// keeps its scalar, so it never moves; only the remainder is pushed back.
///
/// Returns `None` once `budget` rounds are spent with more than one term
/// left. The heap then still holds terms with the original weighted sum.
pub(crate) fn reduce<S, P>(
    heap: &mut TermHeap<S, P>,
    stats: &mut ReductionStats,
    budget: usize,
) -> Option<Term<S, P>>
where
    S: ScalarArith,
    P: PointArith,
{
    let mut spent = 0;
    while heap.len() > 1 {
        if spent == budget {
            return None;
        }

        let challenger = heap.pop_max();
        let resident = heap.max_scalar();

        let merged = heap.max_point_mut();
        *merged = challenger.point.add_var(&*merged);
        stats.rounds += 1;
        spent += 1;

        if challenger.scalar == resident {
            stats.absorbed += 1;
        } else {
            heap.push(Term::new(challenger.scalar.sub(&resident), challenger.point));
        }
        debug_assert!(heap.is_heap());
    }

    let last = heap.pop_max();
    debug_assert!(!last.scalar.is_zero());
    Some(last)
}
