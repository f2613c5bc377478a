//! Output helpers: status badges and warning rendering.

use owo_colors::OwoColorize;

use catvault_core::Warning;

pub fn success(message: &str) {
    println!("{} {}", "[OK]".green().bold(), message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", "[WARN]".yellow().bold(), message);
}

/// Render every warning an operation surfaced.
pub fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        warn(&warning.to_string());
    }
}
