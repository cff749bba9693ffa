//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use skelgen::{ClassMetadata, GenerationOptions, SourceMethod};

pub const TIMESTAMP: &str = "2024-03-09 14:05:30";

pub fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .and_then(|date| date.and_hms_opt(14, 5, 30))
        .unwrap()
}

/// Fixed clock and version so generated text is stable.
pub fn options() -> GenerationOptions {
    GenerationOptions::new(timestamp()).with_version("1.0.0")
}

/// Wraps lines into a `/** ... */` doc comment.
pub fn doc(lines: &[&str]) -> String {
    let mut text = String::from("/**\n");
    for line in lines {
        text.push_str(" * ");
        text.push_str(line);
        text.push('\n');
    }
    text.push_str(" */");
    text
}

/// The calculator used across the scenarios: `add` with two tags, a boolean
/// check, an untagged method and a few methods that must be skipped.
pub fn calculator() -> ClassMetadata {
    ClassMetadata::new("\\Acme\\Calculator")
        .with_doc_comment(doc(&["A calculator.", "", "@assert (10)"]))
        .with_method(
            SourceMethod::new("__construct", doc(&["@assert (1) == 1"])).with_constructor(true),
        )
        .with_method(SourceMethod::new(
            "add",
            doc(&["Adds two numbers.", "", "@assert (2, 3) == 5", "@assert (0, 0) == 0"]),
        ))
        .with_method(SourceMethod::new("reset", doc(&["Clears the total."])))
        .with_method(SourceMethod::new(
            "isEmpty",
            doc(&["@assert (value) empty FALSE"]),
        ))
        .with_method(SourceMethod::new("log", doc(&["@assert (1) == 1"])).with_public(false))
        .with_method(
            SourceMethod::new("compute", doc(&["@assert (1) == 1"])).with_abstract(true),
        )
        .with_method(
            SourceMethod::new("parentHelper", doc(&["@assert (1) == 1"]))
                .with_declared_on_target(false),
        )
}
