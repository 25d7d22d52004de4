//! # beta-protoc
//!
//! Command-line front end: load a message schema, validate it, and generate
//! struct definitions for the selected languages.

use anyhow::Context;
use clap::Parser;
use protoc_codegen::{Generator, LanguageRegistry};
use protoc_schema::SchemaLoader;
use protoc_validation::{ValidationEngine, ValidationReporter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "beta-protoc")]
#[command(
    about = "Generate typed message structs from a JSON message schema, for use in serial communication"
)]
#[command(version)]
struct Cli {
    /// Path to the schema file (JSON, or YAML with a .yaml/.yml extension)
    input: PathBuf,

    /// Output directory for the generated files
    #[arg(short, long, default_value = "./generated")]
    out: PathBuf,

    /// Target languages (default: every supported language)
    #[arg(short, long, num_args = 1..)]
    lang: Vec<String>,

    /// Remove each selected language's output directory before generating
    #[arg(long)]
    clean: bool,

    /// Extra language descriptors (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    languages: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Failures reported to the user as `Error: ...`
#[derive(Error, Debug)]
enum CliError {
    #[error("The specified JSON file does not exist.")]
    InputNotFound,

    #[error("JSON parsing error:\n{0}")]
    Validation(String),

    #[error(transparent)]
    Schema(#[from] protoc_schema::Error),

    #[error(transparent)]
    Codegen(#[from] protoc_codegen::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(out_dir) => {
            println!("Successfully generated code in {}", out_dir.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<PathBuf, CliError> {
    if !cli.input.is_file() {
        return Err(CliError::InputNotFound);
    }

    let out_dir = std::path::absolute(&cli.out)
        .with_context(|| format!("Cannot resolve output directory {}", cli.out.display()))?;
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Cannot create output directory {}", out_dir.display()))?;

    let registry = load_registry(cli.languages.as_deref())?;
    if cli.lang.is_empty() {
        println!(
            "No language specified, generating code for all supported languages: {}",
            registry.supported_string()
        );
    }
    let languages = registry.select(cli.lang.as_slice())?;

    tracing::info!("Loading schema from {}", cli.input.display());
    let document = SchemaLoader::new().load_from_file(&cli.input)?;
    let schema = match ValidationEngine::new().resolve(&document) {
        Ok(schema) => schema,
        Err(protoc_validation::Error::Invalid(diagnostics)) => {
            let details = ValidationReporter::new(&document).render(&diagnostics);
            return Err(CliError::Validation(details));
        }
    };

    let generator = Generator::new(languages);
    if cli.clean {
        generator.clean_outputs(&out_dir)?;
    }
    generator.generate(&schema, &out_dir)?;

    Ok(out_dir)
}

fn load_registry(descriptors: Option<&Path>) -> Result<LanguageRegistry, CliError> {
    let mut registry = LanguageRegistry::builtin();
    if let Some(path) = descriptors {
        tracing::info!("Loading language descriptors from {}", path.display());
        registry.load_from_file(path)?;
    }
    Ok(registry)
}
