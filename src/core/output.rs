//! Unified output formatting utilities for consistent CLI presentation.
//!
//! Standardized formatting for all non-interactive git-glance output:
//! red for errors, green for success, muted for hints.

use colored::*;

/// Formats and prints an error message with consistent styling
pub fn print_error(message: &str) {
    eprintln!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a success message with consistent styling
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message with consistent styling
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Formats and prints a muted hint line
pub fn print_hint(message: &str) {
    println!("{}", message.bright_black());
}
