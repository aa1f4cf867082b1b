use num_format::{Locale, SystemLocale, ToFormattedString};
use std::io::{self, Write};

#[cfg(windows)]
use winapi::um::consoleapi::{GetConsoleMode, SetConsoleMode};
#[cfg(windows)]
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
#[cfg(windows)]
use winapi::um::processenv::GetStdHandle;
#[cfg(windows)]
use winapi::um::winbase::STD_OUTPUT_HANDLE;
#[cfg(windows)]
use winapi::um::wincon::ENABLE_VIRTUAL_TERMINAL_PROCESSING;

// ===== Terminal Control =====

/// Initialize ANSI color support on Windows
#[cfg(windows)]
pub fn enable_ansi_support() {
    unsafe {
        let handle = GetStdHandle(STD_OUTPUT_HANDLE);
        if handle != INVALID_HANDLE_VALUE {
            let mut mode = 0;
            if GetConsoleMode(handle, &mut mode) != 0 {
                SetConsoleMode(handle, mode | ENABLE_VIRTUAL_TERMINAL_PROCESSING);
            }
        }
    }
}

/// Initialize ANSI color support (no-op on non-Windows platforms)
#[cfg(not(windows))]
pub fn enable_ansi_support() {}

pub mod colors {
    use colored::Colorize;

    pub fn red(text: &str) -> String {
        text.red().to_string()
    }

    pub fn green(text: &str) -> String {
        text.green().to_string()
    }

    pub fn yellow(text: &str) -> String {
        text.yellow().to_string()
    }

    pub fn cyan(text: &str) -> String {
        text.cyan().to_string()
    }

    pub fn gray(text: &str) -> String {
        text.bright_black().to_string()
    }
}

pub mod terminal_codes {
    pub const HIDE_CURSOR: &str = "\x1b[?25l";
    pub const SHOW_CURSOR: &str = "\x1b[?25h";
    pub const CLEAR_LINE: &str = "\x1b[2K";
    pub const CR_CLEAR_LINE: &str = "\r\x1b[2K";
}

pub fn failed_indicator() -> String {
    colors::red("✗")
}

pub fn success_indicator() -> String {
    colors::green("✔")
}

pub fn hide_cursor() {
    print!("{}", terminal_codes::HIDE_CURSOR);
    let _ = io::stdout().flush();
}

pub fn reset_terminal() {
    print!("\r{}", terminal_codes::CLEAR_LINE);
    print!("{}", terminal_codes::SHOW_CURSOR);
    let _ = io::stdout().flush();
}

pub fn clear_progress_line() {
    print!("{}", terminal_codes::CR_CLEAR_LINE);
    let _ = io::stdout().flush();
}

/// Prints `ERROR: <message>` on stderr, splitting off a `SUGGESTION:` tail.
pub fn print_error(message: &str) {
    if let Some(pos) = message.find("SUGGESTION:") {
        let (error_part, suggestion_part) = message.split_at(pos);
        eprintln!("{}: {}", colors::red("ERROR"), error_part.trim());
        eprintln!(
            "{}: {}",
            colors::yellow("SUGGESTION"),
            suggestion_part["SUGGESTION:".len()..].trim()
        );
    } else {
        eprintln!("{}: {}", colors::red("ERROR"), message);
    }
}

/// Falls back to plain English grouping when the system locale is unavailable.
pub fn format_count<T: ToFormattedString>(value: T) -> String {
    match SystemLocale::default() {
        Ok(locale) => value.to_formatted_string(&locale),
        Err(_) => value.to_formatted_string(&Locale::en),
    }
}

pub fn format_runtime(elapsed_secs: u64) -> String {
    format_runtime_with_nanos(elapsed_secs, elapsed_secs as u128 * 1_000_000_000)
}

pub fn format_runtime_with_nanos(elapsed_secs: u64, elapsed_nanos: u128) -> String {
    if elapsed_secs == 0 && elapsed_nanos > 0 {
        let millis = (elapsed_nanos / 1_000_000) as u64;
        if millis == 0 {
            return "1ms".to_string();
        }
        return format!("{}ms", millis);
    }

    let hours = elapsed_secs / 3600;
    let minutes = (elapsed_secs % 3600) / 60;
    let seconds = elapsed_secs % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Formats an average cost per call, picking µs or ns.
pub fn format_per_call(total_nanos: u128, calls: u64) -> String {
    if calls == 0 {
        return "-".to_string();
    }
    let nanos = total_nanos / u128::from(calls);
    if nanos >= 10_000 {
        format!("{:.1}µs", nanos as f64 / 1_000.0)
    } else {
        format!("{nanos}ns")
    }
}

pub fn print_progress(
    completed: u64,
    count: u64,
    trials_per_second: u64,
    elapsed_secs: u64,
    mismatches: u64,
) {
    use std::fmt::Write as _;

    let mut progress = format!(
        "\r{}{} {}/{} {} {} {} trials/s {} {} {}",
        terminal_codes::CLEAR_LINE,
        colors::gray("Trials:"),
        format_count(completed),
        format_count(count),
        colors::gray("·"),
        colors::gray("Speed:"),
        format_count(trials_per_second),
        colors::gray("·"),
        colors::gray("Runtime:"),
        format_runtime(elapsed_secs),
    );

    if mismatches > 0 {
        let _ = write!(
            progress,
            " {} {} {}",
            colors::gray("·"),
            colors::gray("Mismatches:"),
            colors::red(&format_count(mismatches))
        );
    }

    let mut stdout = io::stdout();
    let _ = stdout.write_all(progress.as_bytes());
    let _ = stdout.flush();
}

/// Prints the run header and returns its visible width.
pub fn print_header(terms: usize, count: u64, threads: usize, seed_hex: &str) -> usize {
    let header = format!(
        "Verifying {} multi-multiplications of {} terms ({} threads, seed {}…)",
        colors::cyan(&format_count(count)),
        colors::cyan(&terms.to_string()),
        threads,
        &seed_hex[..16.min(seed_hex.len())]
    );
    let plain = format!(
        "Verifying {} multi-multiplications of {} terms ({} threads, seed {}…)",
        format_count(count),
        terms,
        threads,
        &seed_hex[..16.min(seed_hex.len())]
    );
    println!("{header}");
    plain.chars().count()
}
