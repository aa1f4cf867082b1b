use crate::cli::args::Config;
use crate::cli::terminal::{
    colors, failed_indicator, format_count, format_per_call, format_runtime_with_nanos,
    success_indicator,
};
use crate::runner::{RESIDUAL_BUCKETS, RunStats};
use multimul::job::{JobOutcome, encode_point};
use serde_json::{Value, json};

fn bucket_label(bucket: usize) -> String {
    if bucket == RESIDUAL_BUCKETS - 1 {
        format!("{bucket}+")
    } else {
        bucket.to_string()
    }
}

pub fn display_summary(stats: &RunStats, config: &Config) {
    let status = if stats.mismatches == 0 {
        format!("{} all trials matched the reference", success_indicator())
    } else {
        format!(
            "{} {} of {} trials did not match (first: trial {})",
            failed_indicator(),
            colors::red(&format_count(stats.mismatches)),
            format_count(stats.trials),
            stats
                .first_mismatch
                .map_or_else(|| "?".to_string(), |t| t.to_string())
        )
    };
    println!("{status}");

    println!(
        "Overall Stats: {} {} {} {} {} {:.2} {} {}",
        colors::gray("Finished in:"),
        format_runtime_with_nanos(stats.elapsed_secs, stats.elapsed_nanos),
        colors::gray("Trials:"),
        format_count(stats.trials),
        colors::gray("Avg rounds:"),
        stats.average_rounds(),
        colors::gray("Absorbed:"),
        format_count(stats.absorbed),
    );

    println!(
        "Per call: {} {} {} {}",
        colors::gray("engine"),
        format_per_call(stats.engine_nanos, stats.trials),
        colors::gray("ladder adds"),
        format_count(stats.ladder_additions),
    );
    if stats.budget_exhausted > 0 {
        println!(
            "{} {} trials hit the reduction round cap",
            colors::yellow("Note:"),
            format_count(stats.budget_exhausted),
        );
    }
    if config.bench {
        let speedup = stats
            .speedup()
            .map_or_else(|| "-".to_string(), |s| format!("{s:.2}x"));
        println!(
            "Reference: {} {} {} {}",
            colors::gray("per call"),
            format_per_call(stats.reference_nanos, stats.trials),
            colors::gray("speedup"),
            colors::cyan(&speedup),
        );
    }

    let histogram = stats
        .residual_histogram
        .iter()
        .enumerate()
        .filter(|(_, n)| **n > 0)
        .map(|(bucket, n)| format!("{}:{}", bucket_label(bucket), format_count(*n)))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{} {}", colors::gray("Residual bits:"), histogram);
}

pub fn summary_json(stats: &RunStats, config: &Config, seed: &[u8; 32]) -> Value {
    let histogram: serde_json::Map<String, Value> = stats
        .residual_histogram
        .iter()
        .enumerate()
        .map(|(bucket, n)| (bucket_label(bucket), json!(n)))
        .collect();

    json!({
        "seed": hex::encode(seed),
        "terms": config.terms,
        "threads": config.threads,
        "trials": stats.trials,
        "mismatches": stats.mismatches,
        "first_mismatch": stats.first_mismatch,
        "rounds": stats.rounds,
        "average_rounds": stats.average_rounds(),
        "absorbed": stats.absorbed,
        "budget_exhausted": stats.budget_exhausted,
        "ladder_additions": stats.ladder_additions,
        "ladder_doublings": stats.ladder_doublings,
        "residual_bits": histogram,
        "engine_nanos": stats.engine_nanos as u64,
        "reference_nanos": stats.reference_nanos as u64,
        "speedup": stats.speedup(),
        "elapsed_nanos": stats.elapsed_nanos as u64,
    })
}

pub fn display_job_outcome(outcome: &JobOutcome, json: bool) {
    if json {
        println!("{}", outcome.to_json());
        return;
    }

    println!("{} {}", colors::gray("Result:"), colors::green(&encode_point(&outcome.result)));
    println!(
        "{} {} {} {} {} {} {} {}",
        colors::gray("Terms:"),
        outcome.stats.terms,
        colors::gray("Rounds:"),
        outcome.stats.rounds,
        colors::gray("Absorbed:"),
        outcome.stats.absorbed,
        colors::gray("Residual bits:"),
        outcome.stats.residual_bits,
    );
    println!("{} {}", colors::gray("Phase:"), outcome.stats.final_phase.name());
    if outcome.batched {
        println!("{}", colors::gray("(evaluated in chunks of 32 terms)"));
    }
}
