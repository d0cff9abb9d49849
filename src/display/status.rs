//! Status lines printed around a rotation run.

use std::io::stdout;
use std::time::Duration;

use crossterm::execute;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};

use crate::rotator::{MessageList, RotationReport};

fn print_line(color: Color, prefix: &str, message: &str, bold_prefix: bool) {
    let mut stdout = stdout();
    let weight = if bold_prefix {
        Attribute::Bold
    } else {
        Attribute::NormalIntensity
    };
    let _ = execute!(
        stdout,
        SetForegroundColor(color),
        SetAttribute(weight),
        Print(prefix),
        SetAttribute(Attribute::Reset),
        SetForegroundColor(color),
        Print(message),
        ResetColor
    );
    println!();
}

/// Print an error message
pub fn print_error(message: &str) {
    print_line(Color::Red, "✗ Error: ", message, true);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    print_line(Color::Yellow, "⚠ ", message, false);
}

/// Print an info message
pub fn print_info(message: &str) {
    print_line(Color::Cyan, "ℹ ", message, false);
}

/// Print the message list before a terminal run
pub fn print_rotation_header(messages: &MessageList, interval: Duration) {
    print_info(&format!(
        "Rotating {} messages every {} ms (Ctrl+C to stop)",
        messages.len(),
        interval.as_millis()
    ));
    for (i, message) in messages.iter().enumerate() {
        println!("  {}. {}", i + 1, message);
    }
    println!();
}

/// Print how a run ended
pub fn print_rotation_summary(report: &RotationReport) {
    // The rotating line has no trailing newline
    println!();
    let _ = execute!(
        stdout(),
        SetForegroundColor(Color::Green),
        Print(format!(
            "✓ Stopped after {} cycles (next message: #{})",
            report.cycles,
            report.index + 1
        )),
        ResetColor
    );
    println!();
}
