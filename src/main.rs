mod cli;
mod runner;

use cli::{
    args::{Config, parse_and_validate_args},
    display::{display_job_outcome, display_summary, summary_json},
    terminal::{
        clear_progress_line, enable_ansi_support, hide_cursor, print_error, print_header,
        print_progress, reset_terminal,
    },
};
use multimul::job::Job;
use multimul::sampler::TermSampler;
use runner::TrialPlan;
use runner::parallel::{ProgressInfo, run_trials};

fn setup_signal_handler() {
    let result = ctrlc::set_handler(move || {
        reset_terminal();
        println!("\n");
        std::process::exit(130);
    });
    if let Err(e) = result {
        print_error(&format!("Error setting Ctrl+C handler: {e}"));
    }
}

fn fail(message: &str) -> ! {
    print_error(message);
    reset_terminal();
    std::process::exit(1);
}

fn evaluate_job(path: &str, json: bool) {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("Cannot read job file '{path}': {e}")));
    let job = Job::from_json(&text).unwrap_or_else(|e| {
        fail(&format!(
            "{e}\nSUGGESTION: Scalars and points are 64-character hex strings in two arrays of equal length"
        ))
    });
    display_job_outcome(&job.evaluate(), json);
}

fn verify(config: &Config) {
    let sampler = config
        .seed
        .map_or_else(TermSampler::from_entropy, TermSampler::new);
    let seed_hex = hex::encode(sampler.seed());

    let plan = TrialPlan {
        count: config.count,
        shape: config.shape(),
        threads: config.threads,
        bench: config.bench,
    };

    if !config.json {
        let header_length = print_header(config.terms, config.count, config.threads, &seed_hex);
        println!("{}", "─".repeat(header_length));
        hide_cursor();
    }

    let stats = run_trials(&plan, &sampler, |info: ProgressInfo| {
        if !config.json {
            print_progress(
                info.completed,
                info.count,
                info.trials_per_second,
                info.elapsed_secs,
                info.mismatches,
            );
        }
    });

    if config.json {
        println!("{}", summary_json(&stats, config, sampler.seed()));
    } else {
        clear_progress_line();
        display_summary(&stats, config);
        println!("{} {}", cli::colors::gray("Seed:"), seed_hex);
        reset_terminal();
    }

    if stats.mismatches > 0 {
        std::process::exit(1);
    }
}

fn main() {
    enable_ansi_support();
    setup_signal_handler();

    let config = parse_and_validate_args();

    match &config.input {
        Some(path) => evaluate_job(path, config.json),
        None => verify(&config),
    }
}
