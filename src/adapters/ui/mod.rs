pub mod banner;
pub mod tui;

/// Prints the welcome banner and applies the theme for all subsequent inquire prompts.
/// Call once at startup, before the terminal session begins.
pub fn init_ui() {
    banner::print_welcome();
    tui::apply_theme();
}
