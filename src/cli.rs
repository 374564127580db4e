use crate::assembler;
use crate::document::Info;
use crate::serializer::{read_document, serialize_json, serialize_yaml, write_to_file};
use crate::validator::validate;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Default location of the generated document
pub const DEFAULT_OUTPUT: &str = "wsdocs/wsapi.yaml";

pub const DEFAULT_TITLE: &str = "WebSocket API";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_DESCRIPTION: &str = "Generated by wsapi-from-source";

/// WebSocket API doc generator - build a WebSocket API document from annotated Rust sources
#[derive(Parser, Debug)]
#[command(name = "wsapi-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the document from source annotations
    Generate(GenerateArgs),
    /// Check a generated document for structural problems
    Validate(ValidateArgs),
    /// Rewrite a document in canonical form
    Fmt(FmtArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Source directory to scan for Rust files
    #[arg(long = "src", value_name = "DIR", default_value = "./")]
    pub src: PathBuf,

    /// Output file path
    #[arg(long = "out", value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub out: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document to validate
    #[arg(long = "file", value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct FmtArgs {
    /// Document to format
    #[arg(long = "file", value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub file: PathBuf,

    /// Output file (defaults to the input file)
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Run the selected subcommand
pub fn run(args: CliArgs) -> Result<()> {
    debug!("Parsed arguments: {:?}", args);

    match args.command {
        Command::Generate(generate_args) => generate(generate_args),
        Command::Validate(validate_args) => validate_file(validate_args),
        Command::Fmt(fmt_args) => format_file(fmt_args),
    }
}

/// Fill in the info fields no source annotation provided
pub fn apply_info_defaults(info: &mut Info) {
    if info.title.is_empty() {
        info.title = DEFAULT_TITLE.to_string();
    }
    if info.version.is_empty() {
        info.version = DEFAULT_VERSION.to_string();
    }
    if info.description.is_empty() {
        info.description = DEFAULT_DESCRIPTION.to_string();
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    if !args.src.is_dir() {
        anyhow::bail!("Source path is not a directory: {}", args.src.display());
    }

    info!("Parsing Rust files in {}...", args.src.display());
    let extraction = assembler::extract(&args.src)
        .with_context(|| format!("Failed to extract documentation from {}", args.src.display()))?;

    let mut document = extraction.document;
    apply_info_defaults(&mut document.info);

    if document.endpoints.is_empty() {
        warn!("No @WebSocket annotations found in {}", args.src.display());
    }

    info!("Serializing to {:?} format...", args.format);
    let content = match args.format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    write_to_file(&content, &args.out)?;

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Endpoints: {}", document.endpoints.len());
    info!("  - Warnings: {}", extraction.diagnostics.len());
    info!("  - Output: {}", args.out.display());

    Ok(())
}

fn validate_file(args: ValidateArgs) -> Result<()> {
    let document = read_document(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let errors = validate(&document);
    if errors.is_empty() {
        println!("{} is valid", args.file.display());
        return Ok(());
    }

    println!("{} has validation errors:", args.file.display());
    for error in &errors {
        println!("  - {}", error);
    }
    anyhow::bail!("{} validation errors in {}", errors.len(), args.file.display())
}

fn format_file(args: FmtArgs) -> Result<()> {
    let output = args.output.unwrap_or_else(|| args.file.clone());

    let document = read_document(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    write_to_file(&serialize_yaml(&document)?, &output)?;

    if output == args.file {
        info!("Formatted {}", args.file.display());
    } else {
        info!("Formatted {} -> {}", args.file.display(), output.display());
    }

    Ok(())
}
