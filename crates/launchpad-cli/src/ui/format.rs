//! Sizes, durations and the build summary.

use std::path::PathBuf;
use std::time::Duration;

use console::{Term, style};

/// Human-readable byte count.
///
/// ```
/// use launchpad_cli::ui::format_size;
///
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

/// `50ms`, `1.50s` or `1m 30s`.
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Table of emitted server files followed by the total size and build time.
pub fn print_build_summary(preset: &str, files: &[(PathBuf, u64)], duration: Duration) {
    let width = (Term::stderr().size().1 as usize).clamp(20, 80);
    let rule = "─".repeat(width);

    eprintln!(
        "\n{} {}",
        style("Server output").bold().underlined().for_stderr(),
        style(format!("({preset})")).dim().for_stderr()
    );
    eprintln!("{rule}");
    for (file, size) in files {
        eprintln!(
            "  {} {} {}",
            style("▸").blue().for_stderr(),
            style(file.display()).white().bright().for_stderr(),
            style(format_size(*size)).dim().for_stderr()
        );
    }
    eprintln!("{rule}");

    let total: u64 = files.iter().map(|(_, size)| size).sum();
    eprintln!(
        "  {} {} in {}",
        style("Total:").bold().for_stderr(),
        style(format_size(total)).green().for_stderr(),
        style(format_duration(duration)).green().for_stderr()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_pick_the_largest_unit() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1_572_864), "1.50 MB");
        assert_eq!(format_size(2_147_483_648), "2.00 GB");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
