//! Variable-time multi-scalar multiplication: `R = Σ nᵢ·Aᵢ` for up to
//! [`MAX_TERMS`] terms per call.
//!
//! The computation runs in three stages:
//!
//! 1. **Filtering** drops zero-scalar terms and loads the rest into a
//!    stack-allocated max-heap keyed by scalar.
//! 2. **Reducing** repeatedly folds the heaviest term into the next heaviest
//!    (`nX + mY = (n - m)X + m(X + Y)`), shrinking the larger scalar by about
//!    half per round on random input, until a single term is left.
//! 3. **Finishing** multiplies the surviving term with a binary ladder. Its
//!    scalar is usually 1 and rarely more than a few bits.
//!
//! Reduction is capped at (total scalar bit length × terms) rounds. Inputs
//! that hit the cap, such as one huge scalar next to a tiny one, finish every
//! remaining term with its own ladder instead.
//!
//! Running time and memory access depend on the scalar values. Only use this
//! with public scalars (verification equations, batch checks), never with
//! secret keys or nonces.

pub mod heap;
mod ladder;
mod reduce;

pub use ladder::scalar_mul;

use crate::algebra::{PointArith, ScalarArith};
use heap::{Term, TermHeap};

/// Largest number of terms accepted by a single [`multi_mul`] call.
pub const MAX_TERMS: usize = 32;

/// Stages of one engine call, in the only order they can occur.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    #[default]
    Start,
    Filtering,
    Reducing,
    Finishing,
    Done,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Filtering => "filtering",
            Phase::Reducing => "reducing",
            Phase::Finishing => "finishing",
            Phase::Done => "done",
        }
    }
}

/// Counters collected while evaluating one multi-multiplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReductionStats {
    /// Terms left after dropping zero scalars.
    pub terms: usize,
    pub rounds: usize,
    /// Rounds where both scalars were equal and the popped term vanished.
    pub absorbed: usize,
    /// Bit length of the scalar handed to the ladder.
    pub residual_bits: u32,
    pub ladder_additions: usize,
    pub ladder_doublings: usize,
    /// Last working stage entered before `Done`.
    pub final_phase: Phase,
    /// Reduction hit its round cap and the leftover terms were laddered one by one.
    pub budget_exhausted: bool,
    phase: Phase,
}

impl ReductionStats {
    fn enter(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "phase went from {:?} to {:?}", self.phase, next);
        if next == Phase::Done {
            self.final_phase = self.phase;
        }
        self.phase = next;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Folds the counters of another call into these, as done for batches.
    pub fn merge(&mut self, other: &ReductionStats) {
        self.terms += other.terms;
        self.rounds += other.rounds;
        self.absorbed += other.absorbed;
        self.residual_bits = self.residual_bits.max(other.residual_bits);
        self.ladder_additions += other.ladder_additions;
        self.ladder_doublings += other.ladder_doublings;
        self.final_phase = self.final_phase.max(other.final_phase);
        self.budget_exhausted |= other.budget_exhausted;
        self.phase = self.phase.max(other.phase);
    }
}

/// Computes `Σ scalars[i] * points[i]`.
///
/// # Panics
/// If the slices differ in length or hold more than [`MAX_TERMS`] entries.
pub fn multi_mul<S: ScalarArith, P: PointArith>(scalars: &[S], points: &[P]) -> P {
    multi_mul_with_stats(scalars, points).0
}

/// [`multi_mul`], also returning what the engine did to get there.
pub fn multi_mul_with_stats<S, P>(scalars: &[S], points: &[P]) -> (P, ReductionStats)
where
    S: ScalarArith,
    P: PointArith,
{
    assert_eq!(
        scalars.len(),
        points.len(),
        "scalars and points must have the same length"
    );
    assert!(
        scalars.len() <= MAX_TERMS,
        "multi_mul takes at most {MAX_TERMS} terms, got {}",
        scalars.len()
    );

    let mut stats = ReductionStats::default();

    stats.enter(Phase::Filtering);
    let mut heap = TermHeap::new();
    for (scalar, point) in scalars.iter().zip(points) {
        if !scalar.is_zero() {
            heap.push(Term::new(*scalar, *point));
        }
    }
    stats.terms = heap.len();
    if heap.is_empty() {
        stats.enter(Phase::Done);
        return (P::infinity(), stats);
    }

    stats.enter(Phase::Reducing);
    let budget = reduce::round_budget(&heap);
    let survivor = reduce::reduce(&mut heap, &mut stats, budget);

    stats.enter(Phase::Finishing);
    let result = match survivor {
        Some(last) => {
            stats.residual_bits = last.scalar.bit_length();
            ladder::ladder(&last.scalar, &last.point, &mut stats)
        }
        None => {
            stats.budget_exhausted = true;
            let mut acc = P::infinity();
            while !heap.is_empty() {
                let term = heap.pop_max();
                stats.residual_bits = stats.residual_bits.max(term.scalar.bit_length());
                acc = acc.add_var(&ladder::ladder(&term.scalar, &term.point, &mut stats));
            }
            acc
        }
    };

    stats.enter(Phase::Done);
    (result, stats)
}

/// Computes `Σ scalars[i] * points[i]` for any number of terms by running
/// [`multi_mul`] over consecutive chunks of [`MAX_TERMS`].
///
/// # Panics
/// If the slices differ in length.
pub fn multi_mul_batched<S: ScalarArith, P: PointArith>(scalars: &[S], points: &[P]) -> P {
    multi_mul_batched_with_stats(scalars, points).0
}

pub fn multi_mul_batched_with_stats<S, P>(scalars: &[S], points: &[P]) -> (P, ReductionStats)
where
    S: ScalarArith,
    P: PointArith,
{
    assert_eq!(
        scalars.len(),
        points.len(),
        "scalars and points must have the same length"
    );

    let mut total = ReductionStats::default();
    let mut acc = P::infinity();
    for (chunk_scalars, chunk_points) in scalars.chunks(MAX_TERMS).zip(points.chunks(MAX_TERMS)) {
        let (partial, stats) = multi_mul_with_stats(chunk_scalars, chunk_points);
        acc = acc.add_var(&partial);
        total.merge(&stats);
    }
    (acc, total)
}

/// Reference sum computed one term at a time. Slow; used for verification.
pub fn naive_multi_mul<S: ScalarArith, P: PointArith>(scalars: &[S], points: &[P]) -> P {
    assert_eq!(
        scalars.len(),
        points.len(),
        "scalars and points must have the same length"
    );
    scalars
        .iter()
        .zip(points)
        .fold(P::infinity(), |acc, (s, p)| acc.add_var(&scalar_mul(s, p)))
}
