//! Colored progress and diagnostic output (component K): ordinary text in
//! the terminal's default color, warnings in yellow, errors in red — per
//! §6's "Progress output" wording.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Prints an ordinary progress line to stdout in the default color.
pub fn line(message: &str) {
    println!("{message}");
}

/// Prints a warning to stderr in yellow.
pub fn warn(message: &str) {
    let mut stream = StandardStream::stderr(ColorChoice::Auto);
    let _ = stream.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
    let _ = writeln!(stream, "warning: {message}");
    let _ = stream.reset();
}

/// Prints an error to stderr in red.
pub fn error(message: &str) {
    let mut stream = StandardStream::stderr(ColorChoice::Auto);
    let _ = stream.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
    let _ = writeln!(stream, "error: {message}");
    let _ = stream.reset();
}
