//! Terminal output helpers.

mod format;
mod messages;

pub use format::{format_duration, format_size, print_build_summary};
pub use messages::{info, success, warning};

/// Whether colored output should be used. `NO_COLOR` wins over
/// `FORCE_COLOR`; otherwise stderr must be a terminal.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Apply the color choice to everything printed through this module.
pub fn init_colors(no_color: bool) {
    console::set_colors_enabled_stderr(!no_color && should_use_color());
}

pub(crate) fn colors_enabled() -> bool {
    console::colors_enabled_stderr()
}
