//! Logging setup for the CLI.
//!
//! Libraries emit `tracing` events; this installs the subscriber that prints
//! them. Level selection, in order: `--verbose`, `--quiet`, `RUST_LOG`, then
//! info for the launchpad crates.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: &[&str] = &[
    "launchpad",
    "launchpad_cli",
    "launchpad_bundler",
    "launchpad_config",
    "launchpad_target",
];

/// Filter directives for the given verbosity flags.
pub fn filter_directives(verbose: bool, quiet: bool) -> String {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose || quiet {
        EnvFilter::new(filter_directives(verbose, quiet))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directives(false, false)))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && crate::ui::should_use_color())
        .with_writer(std::io::stderr)
        .compact();

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug_for_every_crate() {
        let directives = filter_directives(true, false);
        for krate in CRATES {
            assert!(directives.contains(&format!("{krate}=debug")));
        }
        let _ = EnvFilter::new(directives);
    }

    #[test]
    fn quiet_keeps_errors_only() {
        assert!(filter_directives(false, true).starts_with("launchpad=error"));
    }
}
