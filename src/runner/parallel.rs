use crate::runner::{RunStats, TrialOutcome, TrialPlan, run_trial};
use crossbeam_channel::{Receiver, Sender, bounded};
use multimul::sampler::TermSampler;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

struct SharedState {
    count: u64,
    next_trial: AtomicU64,
}

pub struct ProgressInfo {
    pub completed: u64,
    pub count: u64,
    pub elapsed_secs: u64,
    pub mismatches: u64,
    pub trials_per_second: u64,
}

/// Runs `plan.count` trials across `plan.threads` workers.
///
/// Trials are numbered `0..count` and handed out through a shared counter, so
/// the set of inputs depends only on the sampler seed, never on scheduling.
pub fn run_trials<F>(plan: &TrialPlan, sampler: &TermSampler, mut progress_callback: F) -> RunStats
where
    F: FnMut(ProgressInfo),
{
    let start_time = Instant::now();
    let thread_count = plan.threads.max(1);

    let shared_state = Arc::new(SharedState {
        count: plan.count,
        next_trial: AtomicU64::new(0),
    });

    let (tx, rx): (Sender<TrialOutcome>, Receiver<TrialOutcome>) = bounded(thread_count * 64);

    let mut handles = Vec::with_capacity(thread_count);
    for _ in 0..thread_count {
        let plan = *plan;
        let sampler = sampler.clone();
        let state = shared_state.clone();
        let tx = tx.clone();

        handles.push(thread::spawn(move || {
            worker_thread(&plan, &sampler, &state, &tx);
        }));
    }

    // The channel closes once every worker has dropped its sender.
    drop(tx);

    let mut stats = RunStats::default();
    let mut last_progress_report = Instant::now();
    let report_interval = Duration::from_secs(1);

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(outcome) => stats.record(&outcome),
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
        }

        if last_progress_report.elapsed() >= report_interval {
            let elapsed = start_time.elapsed();
            progress_callback(ProgressInfo {
                completed: stats.trials,
                count: plan.count,
                elapsed_secs: elapsed.as_secs(),
                mismatches: stats.mismatches,
                trials_per_second: per_second(stats.trials, elapsed),
            });
            last_progress_report = Instant::now();
        }
    }

    for handle in handles {
        if handle.join().is_err() {
            // A panicking worker loses its trial; count it as a mismatch.
            stats.mismatches += 1;
        }
    }

    let elapsed = start_time.elapsed();
    stats.elapsed_secs = elapsed.as_secs();
    stats.elapsed_nanos = elapsed.as_nanos();

    progress_callback(ProgressInfo {
        completed: stats.trials,
        count: plan.count,
        elapsed_secs: stats.elapsed_secs,
        mismatches: stats.mismatches,
        trials_per_second: per_second(stats.trials, elapsed),
    });

    stats
}

fn per_second(trials: u64, elapsed: Duration) -> u64 {
    let nanos = elapsed.as_nanos();
    if nanos == 0 {
        0
    } else {
        (u128::from(trials) * 1_000_000_000 / nanos) as u64
    }
}

fn worker_thread(
    plan: &TrialPlan,
    sampler: &TermSampler,
    state: &Arc<SharedState>,
    tx: &Sender<TrialOutcome>,
) {
    loop {
        let trial = state.next_trial.fetch_add(1, Ordering::Relaxed);
        if trial >= state.count {
            break;
        }

        let outcome = run_trial(sampler, &plan.shape, trial, plan.bench);

        // The receiver only goes away once the run is over.
        if tx.send(outcome).is_err() {
            break;
        }
    }
}
