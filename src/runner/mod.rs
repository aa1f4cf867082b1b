pub mod parallel;

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::traits::VartimeMultiscalarMul;
use multimul::sampler::{TermSampler, TrialShape};
use multimul::{
    MAX_TERMS, ReductionStats, multi_mul_batched_with_stats, multi_mul_with_stats, naive_multi_mul,
};
use std::time::Instant;

/// Residual bit lengths 0..=8 get their own bucket; the last one holds the rest.
pub const RESIDUAL_BUCKETS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialPlan {
    pub count: u64,
    pub shape: TrialShape,
    pub threads: usize,
    pub bench: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    pub trial: u64,
    pub stats: ReductionStats,
    pub matched: bool,
    pub engine_nanos: u64,
    pub reference_nanos: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub trials: u64,
    pub mismatches: u64,
    pub first_mismatch: Option<u64>,
    pub rounds: u64,
    pub absorbed: u64,
    /// Trials whose reduction hit the round cap.
    pub budget_exhausted: u64,
    pub ladder_additions: u64,
    pub ladder_doublings: u64,
    pub residual_histogram: [u64; RESIDUAL_BUCKETS],
    pub engine_nanos: u128,
    pub reference_nanos: u128,
    pub elapsed_secs: u64,
    pub elapsed_nanos: u128,
}

impl RunStats {
    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        if !outcome.matched {
            self.mismatches += 1;
            self.first_mismatch = Some(
                self.first_mismatch
                    .map_or(outcome.trial, |t| t.min(outcome.trial)),
            );
        }
        self.rounds += outcome.stats.rounds as u64;
        self.absorbed += outcome.stats.absorbed as u64;
        self.budget_exhausted += u64::from(outcome.stats.budget_exhausted);
        self.ladder_additions += outcome.stats.ladder_additions as u64;
        self.ladder_doublings += outcome.stats.ladder_doublings as u64;
        let bucket = (outcome.stats.residual_bits as usize).min(RESIDUAL_BUCKETS - 1);
        self.residual_histogram[bucket] += 1;
        self.engine_nanos += u128::from(outcome.engine_nanos);
        self.reference_nanos += u128::from(outcome.reference_nanos);
    }

    pub fn average_rounds(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.rounds as f64 / self.trials as f64
        }
    }

    /// Reference time over engine time, when the reference was timed.
    pub fn speedup(&self) -> Option<f64> {
        if self.reference_nanos == 0 || self.engine_nanos == 0 {
            None
        } else {
            Some(self.reference_nanos as f64 / self.engine_nanos as f64)
        }
    }
}

/// Generates, evaluates and checks a single trial.
///
/// The engine result is compared with `curve25519-dalek`'s own variable-time
/// multiscalar multiplication; in bench mode the per-term reference is timed
/// and compared as well.
pub fn run_trial(sampler: &TermSampler, shape: &TrialShape, trial: u64, bench: bool) -> TrialOutcome {
    let (scalars, points) = sampler.trial(trial, shape);

    let start = Instant::now();
    let (result, stats) = if scalars.len() > MAX_TERMS {
        multi_mul_batched_with_stats(&scalars, &points)
    } else {
        multi_mul_with_stats(&scalars, &points)
    };
    let engine_nanos = start.elapsed().as_nanos() as u64;

    let expected = RistrettoPoint::vartime_multiscalar_mul(&scalars, &points);
    let mut matched = result == expected;

    let reference_nanos = if bench {
        let start = Instant::now();
        let naive = naive_multi_mul(&scalars, &points);
        let nanos = start.elapsed().as_nanos() as u64;
        matched &= naive == expected;
        nanos
    } else {
        0
    };

    TrialOutcome {
        trial,
        stats,
        matched,
        engine_nanos,
        reference_nanos,
    }
}
