//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print what a capture replay fed into the engine.
pub fn print_replay_summary(events: usize, skipped: usize, tab: i64, media_id: &str) {
    println!();
    println!("{}", style("Replay:").bold());
    println!("  Events:   {}", events);
    if skipped > 0 {
        println!("  Skipped:  {}", style(skipped).yellow());
    }
    println!("  Tab:      {}", tab);
    if media_id.is_empty() {
        println!("  Media:    {}", style("(most recent)").dim());
    } else {
        println!("  Media:    {}", media_id);
    }
    println!();
}
