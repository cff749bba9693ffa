//! Handles all user-facing output for the CLI.
//!
//! Generated source goes to stdout untouched; everything here is for humans and
//! is colorized when the terminal supports it.

use std::io::Write;
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::assertion::OPERATOR_TABLE;
use crate::engine::{GeneratedMethod, TestClass};
use crate::metadata::ClassMetadata;

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Reports a written test class file.
pub fn print_written(path: &Path, test_class: &TestClass) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let incomplete = test_class.methods.iter().filter(|m| m.is_incomplete()).count();
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(stdout, "Wrote");
    let _ = stdout.reset();
    let _ = writeln!(
        stdout,
        " {} ({} tests, {} incomplete) to {}",
        test_class.test_class_name,
        test_class.methods.len() - incomplete,
        incomplete,
        path.display()
    );
}

/// Prints what generation would produce for each eligible method.
pub fn print_inspection(class: &ClassMetadata, test_class: &TestClass) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    let _ = writeln!(stdout, "--- {} -> {} ---", class.name, test_class.test_class_name);
    let _ = stdout.reset();
    if !test_class.constructor_args.is_empty() {
        let _ = writeln!(stdout, "constructor args: ({})", test_class.constructor_args);
    }

    for method in &test_class.methods {
        print_method(&mut stdout, method);
    }

    let skipped: Vec<_> = class
        .methods
        .iter()
        .filter(|m| !m.is_eligible())
        .map(|m| m.name.as_str())
        .collect();
    if !skipped.is_empty() {
        let _ = stdout.set_color(ColorSpec::new().set_dimmed(true));
        let _ = writeln!(stdout, "skipped: {}", skipped.join(", "));
        let _ = stdout.reset();
    }
}

/// Prints the operator table.
pub fn print_operators() {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let width = OPERATOR_TABLE
        .iter()
        .map(|(operator, _)| operator.len())
        .max()
        .unwrap_or(0);
    for (operator, kind) in OPERATOR_TABLE {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        let _ = write!(stdout, "{operator:<width$}");
        let _ = stdout.reset();
        let _ = writeln!(stdout, "  assert{kind}");
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_method(stdout: &mut StandardStream, method: &GeneratedMethod) {
    let _ = stdout.set_color(ColorSpec::new().set_bold(true));
    let _ = write!(stdout, "test{}", method.name);
    let _ = stdout.reset();
    let _ = write!(stdout, "  <- {}()  ", method.orig_method_name);

    match (&method.assertion, &method.tag) {
        (Some(assertion), Some(tag)) => {
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
            let _ = write!(stdout, "assert{}", assertion.kind);
            let _ = stdout.reset();
            let _ = writeln!(stdout, " [{}]", assertion.template.template_id());
            let _ = writeln!(stdout, "    {}", tag.raw.replace('\n', "\n    "));
        }
        _ => {
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
            let _ = writeln!(stdout, "incomplete");
            let _ = stdout.reset();
        }
    }
}
