use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Error,
    Subtle,
}

/// Applies a consistent style to a string written to stderr.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Error => style(text).for_stderr().red(),
        StyleType::Subtle => style(text).for_stderr().dim(),
    };
    styled.to_string()
}

/// Prints an upstream failure to stderr, keeping stdout for the conversation.
pub fn print_error(text: &str) {
    eprintln!("{}", style_text(text, StyleType::Error));
}

/// Prints a dimmed note to stderr.
pub fn print_note(text: &str) {
    eprintln!("{}", style_text(text, StyleType::Subtle));
}

/// Creates a spinner on stderr shown while waiting on the network.
///
/// Draws nothing when stderr is not a terminal.
pub fn new_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
