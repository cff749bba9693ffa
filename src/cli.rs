//! Command-line driver for skelgen.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use chrono::{DateTime, NaiveDateTime};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    engine::print_error,
    err_msg,
    metadata::{ClassMetadata, MetadataManifest, MetadataProvider},
    template::TemplateSet,
    GenerationOptions, SkelError, TestGenerator,
};

pub mod output;

// ============================================================================
// CLI ARGUMENTS - Command-line argument definitions
// ============================================================================

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "skelgen",
    version,
    about = "Generates unit-test class skeletons from @assert annotations in doc comments."
)]
pub struct SkelArgs {
    /// Log pipeline decisions (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: ArgsCommand,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Generate the test class for one class and write it out.
    Generate {
        /// Fully qualified name of the class under test, e.g. `\Acme\Calculator`.
        class: String,
        /// JSON or YAML file with the class metadata.
        #[arg(short, long)]
        metadata: PathBuf,
        /// Fully qualified test class name [default: <class>Test].
        #[arg(long)]
        test_class: Option<String>,
        /// Output file [default: <source dir>/.~unit-tests/<TestClass>.php].
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Print the generated source instead of writing a file.
        #[arg(long)]
        stdout: bool,
        /// Timestamp for the class header (RFC 3339 or `YYYY-MM-DD HH:MM:SS`) [default: now].
        #[arg(long, value_parser = parse_timestamp)]
        timestamp: Option<NaiveDateTime>,
        /// Directory of `<id>.tpl` files replacing the built-in templates.
        #[arg(long)]
        templates: Option<PathBuf>,
    },
    /// Show the tags, assertions and names generation would produce.
    Inspect {
        /// Fully qualified name of the class under test.
        class: String,
        /// JSON or YAML file with the class metadata.
        #[arg(short, long)]
        metadata: PathBuf,
    },
    /// List the supported @assert operators.
    Operators,
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime, String> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(stamp.naive_local());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or_else(|| format!("`{text}` is not an RFC 3339 or `YYYY-MM-DD HH:MM:SS` timestamp"))
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = SkelArgs::parse();
    init_tracing(args.verbose);

    if let Err(e) = execute(args.command) {
        print_error(e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Runs one subcommand.
pub fn execute(command: ArgsCommand) -> Result<(), SkelError> {
    match command {
        ArgsCommand::Generate {
            class,
            metadata,
            test_class,
            output: output_path,
            stdout,
            timestamp,
            templates,
        } => {
            let class = load_class(&metadata, &class)?;

            let mut options = match timestamp {
                Some(stamp) => GenerationOptions::new(stamp),
                None => GenerationOptions::now(),
            };
            if let Some(name) = test_class {
                options = options.with_test_class_name(name);
            }
            let renderer = match templates {
                Some(dir) => TemplateSet::builtin().with_override_dir(dir)?,
                None => TemplateSet::builtin(),
            };

            let generator = TestGenerator::with_renderer(renderer, options);
            let test_class = generator.assemble(&class)?;
            let source = generator.render(&test_class)?;

            if stdout {
                print!("{source}");
                return Ok(());
            }
            let path = output_path
                .unwrap_or_else(|| default_output_path(&class, &test_class.test_class_name));
            write_output(&path, &source)?;
            output::print_written(&path, &test_class);
            Ok(())
        }

        ArgsCommand::Inspect { class, metadata } => {
            let class = load_class(&metadata, &class)?;
            let generator = TestGenerator::new(GenerationOptions::now());
            let test_class = generator.assemble(&class)?;
            output::print_inspection(&class, &test_class);
            Ok(())
        }

        ArgsCommand::Operators => {
            output::print_operators();
            Ok(())
        }
    }
}

// ============================================================================
// FILE HELPERS
// ============================================================================

fn load_class(metadata: &Path, class: &str) -> Result<ClassMetadata, SkelError> {
    let manifest = MetadataManifest::from_path(metadata)?;
    manifest.class_metadata(class).ok_or_else(|| {
        let known = manifest.class_names().collect::<Vec<_>>().join(", ");
        let mut err = err_msg!(
            MetadataUnavailable,
            "no metadata for class `{}` in `{}`",
            class,
            metadata.display()
        );
        if let SkelError::MetadataUnavailable { ctx, .. } = &mut err {
            ctx.help = Some(format!("classes in this file: {known}"));
        }
        err
    })
}

/// `<dir of the class source>/.~unit-tests/<TestClass>.php`, relative to the
/// working directory when the source file is unknown.
pub fn default_output_path(class: &ClassMetadata, test_class_name: &str) -> PathBuf {
    let base = class
        .source_file
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default();
    base.join(".~unit-tests").join(format!("{test_class_name}.php"))
}

fn write_output(path: &Path, source: &str) -> Result<(), SkelError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| {
            err_msg!(Internal, "failed to create directory `{}`", dir.display()).caused_by(e)
        })?;
    }
    fs::write(path, source)
        .map_err(|e| err_msg!(Internal, "failed to write `{}`", path.display()).caused_by(e))?;
    debug!(path = %path.display(), bytes = source.len(), "wrote test class");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let plain = parse_timestamp("2024-03-09 14:05:30").unwrap();
        assert_eq!(plain.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-09 14:05:30");
        let iso = parse_timestamp("2024-03-09T14:05:30").unwrap();
        assert_eq!(iso, plain);
        let rfc = parse_timestamp("2024-03-09T14:05:30+02:00").unwrap();
        assert_eq!(rfc, plain);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_default_output_path() {
        let class = ClassMetadata::new("\\Acme\\Calculator").with_source_file("src/Acme/Calculator.php");
        assert_eq!(
            default_output_path(&class, "CalculatorTest"),
            PathBuf::from("src/Acme/.~unit-tests/CalculatorTest.php")
        );
        let unknown = ClassMetadata::new("Calculator");
        assert_eq!(
            default_output_path(&unknown, "CalculatorTest"),
            PathBuf::from(".~unit-tests/CalculatorTest.php")
        );
    }

    #[test]
    fn test_args_parse() {
        let args = SkelArgs::try_parse_from([
            "skelgen",
            "generate",
            "\\Acme\\Calculator",
            "--metadata",
            "meta.json",
            "--stdout",
            "--timestamp",
            "2024-03-09 14:05:30",
        ])
        .unwrap();
        match args.command {
            ArgsCommand::Generate { class, stdout, timestamp, .. } => {
                assert_eq!(class, "\\Acme\\Calculator");
                assert!(stdout);
                assert!(timestamp.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_output_conflicts_with_stdout() {
        let result = SkelArgs::try_parse_from([
            "skelgen", "generate", "X", "-m", "m.json", "--stdout", "-o", "out.php",
        ]);
        assert!(result.is_err());
    }
}
