use clap::{Arg, ArgAction, ArgMatches, Command};
use multimul::MAX_TERMS;
use multimul::sampler::TrialShape;

use crate::cli::terminal::{print_error, reset_terminal};

/// Largest number of terms per trial; anything above `MAX_TERMS` is chunked.
pub const MAX_TRIAL_TERMS: usize = 1024;

pub const MAX_TRIAL_COUNT: u64 = 10_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub terms: usize,
    pub count: u64,
    pub zeros: usize,
    pub infinities: usize,
    pub small_scalars: bool,
    pub seed: Option<[u8; 32]>,
    pub threads: usize,
    pub input: Option<String>,
    pub json: bool,
    pub bench: bool,
}

impl Config {
    pub fn shape(&self) -> TrialShape {
        TrialShape {
            terms: self.terms,
            zeros: self.zeros,
            infinities: self.infinities,
            small_scalars: self.small_scalars,
        }
    }
}

pub fn build_cli() -> Command {
    Command::new("multimul")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Variable-time multi-scalar multiplication over Ristretto255\nEvaluates JSON jobs or verifies the engine against a reference on random trials")
        .arg(
            Arg::new("bench")
                .long("bench")
                .short('b')
                .help("Also time the per-term reference and report the speedup")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .short('c')
                .value_name("COUNT")
                .help("Number of random trials to run")
                .value_parser(clap::value_parser!(u64))
                .default_value("10000"),
        )
        .arg(
            Arg::new("infinity")
                .long("infinity")
                .short('i')
                .value_name("COUNT")
                .help("Identity points injected at the start of every trial")
                .value_parser(clap::value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .value_name("FILE")
                .help("Evaluate a JSON job ({\"scalars\": [...], \"points\": [...]}) instead of running trials")
                .conflicts_with_all(["count", "zeros", "infinity", "small-scalars", "seed", "bench"]),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the result as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("HEX")
                .help("32-byte hex seed for reproducible trials (default: random)"),
        )
        .arg(
            Arg::new("small-scalars")
                .long("small-scalars")
                .help("Draw 16-bit scalars so equal-scalar merges happen often")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("terms")
                .long("terms")
                .short('n')
                .value_name("N")
                .help("Terms per trial (above 32 the input is split into chunks)")
                .value_parser(clap::value_parser!(usize))
                .default_value("32"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .value_name("COUNT")
                .help("Number of threads to use (default: number of CPU cores)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("zeros")
                .long("zeros")
                .short('z')
                .value_name("COUNT")
                .help("Zero scalars injected at the end of every trial")
                .value_parser(clap::value_parser!(usize))
                .default_value("0"),
        )
}

pub fn parse_seed(text: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(text.trim()).map_err(|e| format!("Invalid seed '{text}': {e}"))?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        format!(
            "Seed must be exactly 32 bytes (64 hex characters), got {} bytes",
            bytes.len()
        )
    })
}

pub fn config_from_matches(matches: &ArgMatches) -> Result<Config, String> {
    let terms = *matches.get_one::<usize>("terms").unwrap_or(&MAX_TERMS);
    let count = *matches.get_one::<u64>("count").unwrap_or(&0);
    let zeros = *matches.get_one::<usize>("zeros").unwrap_or(&0);
    let infinities = *matches.get_one::<usize>("infinity").unwrap_or(&0);

    if terms > MAX_TRIAL_TERMS {
        return Err(format!(
            "Too many terms per trial: {terms} (maximum: {MAX_TRIAL_TERMS})"
        ));
    }
    if count == 0 {
        return Err("Count must be at least 1".to_string());
    }
    if count > MAX_TRIAL_COUNT {
        return Err(format!("Count too large (maximum: {MAX_TRIAL_COUNT})"));
    }
    if zeros > terms {
        return Err(format!(
            "Cannot inject {zeros} zero scalars into {terms} terms\nSUGGESTION: Use --zeros {terms} or fewer, or raise --terms"
        ));
    }
    if infinities > terms {
        return Err(format!(
            "Cannot inject {infinities} identity points into {terms} terms\nSUGGESTION: Use --infinity {terms} or fewer, or raise --terms"
        ));
    }

    let threads = matches
        .get_one::<usize>("threads")
        .map_or_else(num_cpus::get, |t| *t);
    if threads == 0 {
        return Err("Thread count must be at least 1".to_string());
    }

    let seed = matches
        .get_one::<String>("seed")
        .map(|s| parse_seed(s))
        .transpose()?;

    Ok(Config {
        terms,
        count,
        zeros,
        infinities,
        small_scalars: matches.get_flag("small-scalars"),
        seed,
        threads,
        input: matches.get_one::<String>("input").cloned(),
        json: matches.get_flag("json"),
        bench: matches.get_flag("bench"),
    })
}

pub fn parse_and_validate_args() -> Config {
    let matches = build_cli().get_matches();
    match config_from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e);
            reset_terminal();
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, String> {
        let matches = build_cli()
            .try_get_matches_from(std::iter::once("multimul").chain(args.iter().copied()))
            .map_err(|e| e.to_string())?;
        config_from_matches(&matches)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.terms, 32);
        assert_eq!(config.count, 10_000);
        assert_eq!(config.zeros, 0);
        assert_eq!(config.infinities, 0);
        assert!(!config.small_scalars);
        assert!(config.seed.is_none());
        assert!(config.threads >= 1);
        assert!(config.input.is_none());
        assert!(!config.json);
        assert!(!config.bench);
    }

    #[test]
    fn test_trial_options() {
        let seed = "ab".repeat(32);
        let config = parse(&[
            "-n", "7", "-c", "50", "-z", "2", "-i", "1", "--small-scalars", "--seed", &seed,
            "--threads", "3", "--bench", "--json",
        ])
        .unwrap();
        assert_eq!(config.terms, 7);
        assert_eq!(config.count, 50);
        assert_eq!(config.seed, Some([0xab; 32]));
        assert_eq!(config.threads, 3);
        assert!(config.bench && config.json && config.small_scalars);

        let shape = config.shape();
        assert_eq!(shape.terms, 7);
        assert_eq!(shape.zeros, 2);
        assert_eq!(shape.infinities, 1);
        assert!(shape.small_scalars);
    }

    #[test]
    fn test_validation_errors() {
        assert!(parse(&["-c", "0"]).unwrap_err().contains("at least 1"));
        assert!(parse(&["-n", "4", "-z", "5"]).unwrap_err().contains("SUGGESTION"));
        assert!(parse(&["-n", "4", "-i", "9"]).unwrap_err().contains("identity points"));
        assert!(parse(&["-n", "5000"]).unwrap_err().contains("Too many terms"));
        assert!(parse(&["--threads", "0"]).unwrap_err().contains("Thread count"));
        assert!(parse(&["--seed", "1234"]).unwrap_err().contains("32 bytes"));
        assert!(parse(&["--seed", "xyz"]).unwrap_err().contains("Invalid seed"));
    }

    #[test]
    fn test_input_conflicts_with_trial_options() {
        assert!(parse(&["--input", "job.json"]).unwrap().input.is_some());
        assert!(parse(&["--input", "job.json", "--bench"]).is_err());
    }
}
