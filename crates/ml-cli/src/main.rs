//! Mailing-list inversion CLI
//!
//! Command-line tool for finding which mailing lists each address belongs to,
//! from a per-list membership export.

use clap::{Args, Parser, Subcommand, ValueEnum};
use ml_core::decoder::read_bytes;
use ml_core::{
    export_csv, read_header, run_with_spec, to_json, ColumnSpec, ExportOptions, Inversion,
    Preset, PRESETS,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ml-invert")]
#[command(about = "Find which mailing lists each address belongs to", long_about = None)]
#[command(version)]
struct Cli {
    /// Log pipeline stages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Invert an export and print address → lists
    Invert {
        /// Path to the Shift_JIS CSV export
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        columns: ColumnArgs,

        /// Maximum number of addresses to display
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Invert an export and write the result to a file
    Export {
        /// Path to the Shift_JIS CSV export
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        columns: ColumnArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Do not write a UTF-8 byte order mark (CSV only)
        #[arg(long)]
        no_bom: bool,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the header names of an export
    Headers {
        /// Path to the Shift_JIS CSV export
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List the column presets
    Presets,

    /// Create a column configuration file
    CreateConfig {
        #[command(flatten)]
        columns: ColumnArgs,

        /// Output path for the configuration file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Which header names to use for the list and member columns
#[derive(Args)]
struct ColumnArgs {
    /// Preset number or name
    #[arg(short, long)]
    preset: Option<String>,

    /// Column configuration file (JSON)
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Header of the mailing-list address column
    #[arg(short, long)]
    key: Option<String>,

    /// Header of the member column
    #[arg(long)]
    value: Option<String>,
}

impl ColumnArgs {
    fn resolve(&self) -> ml_core::Result<ColumnSpec> {
        let base = match (&self.config, &self.preset) {
            (Some(path), _) => ColumnSpec::load(path)?,
            (None, Some(selector)) => Preset::lookup(selector)?.spec(),
            (None, None) => ColumnSpec::default(),
        };
        Ok(base.with_overrides(self.key.clone(), self.value.clone()))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> ml_core::Result<()> {
    match command {
        Commands::Invert {
            file,
            columns,
            limit,
        } => cmd_invert(&file, &columns.resolve()?, limit),
        Commands::Export {
            file,
            columns,
            format,
            no_bom,
            output,
        } => cmd_export(&file, &columns.resolve()?, format, !no_bom, &output),
        Commands::Headers { file } => cmd_headers(&file),
        Commands::Presets => cmd_presets(),
        Commands::CreateConfig { columns, output } => cmd_create_config(&columns.resolve()?, &output),
    }
}

/// Run the pipeline over one file; a failed run ends the process
fn invert_file(file: &Path, spec: &ColumnSpec) -> ml_core::Result<Inversion> {
    let bytes = read_bytes(file)?;
    tracing::info!(file = %file.display(), bytes = bytes.len(), "read export");

    match run_with_spec(&bytes, spec).into_result() {
        Ok(inversion) => Ok(inversion),
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            eprintln!(
                "Columns in use: key = \"{}\", value = \"{}\"",
                spec.key_header, spec.value_header
            );
            eprintln!("Use --key/--value, --preset or --config to change them.");
            std::process::exit(1);
        }
    }
}

fn cmd_invert(file: &Path, spec: &ColumnSpec, limit: Option<usize>) -> ml_core::Result<()> {
    let inversion = invert_file(file, spec)?;

    println!("{}\t{}", spec.key_header, spec.value_header);
    println!("{}", "-".repeat(24));

    let shown = limit.unwrap_or(inversion.len());
    for (value, keys) in inversion.iter().take(shown) {
        println!("{}", value);
        for (i, key) in keys.iter().enumerate() {
            println!("  {}. {}", i + 1, key);
        }
    }

    if inversion.len() > shown {
        println!("... ({} more addresses)", inversion.len() - shown);
    }

    Ok(())
}

fn cmd_export(
    file: &Path,
    spec: &ColumnSpec,
    format: Format,
    bom: bool,
    output: &Path,
) -> ml_core::Result<()> {
    let inversion = invert_file(file, spec)?;

    match format {
        Format::Csv => export_csv(output, spec, &inversion, ExportOptions { bom })?,
        Format::Json => std::fs::write(output, to_json(&inversion)?)?,
    }

    println!("Exported {} addresses to {}", inversion.len(), output.display());

    Ok(())
}

fn cmd_headers(file: &Path) -> ml_core::Result<()> {
    let header = read_header(&read_bytes(file)?)?;

    println!("File: {}", file.display());
    println!("Columns: {}", header.len());
    println!();
    for (i, name) in header.iter().enumerate() {
        println!("  {}: {}", i, name);
    }

    Ok(())
}

fn cmd_presets() -> ml_core::Result<()> {
    println!("Presets ({}):", PRESETS.len());
    println!();

    let default_spec = ColumnSpec::default();
    for (i, preset) in PRESETS.iter().enumerate() {
        let marker = if preset.matches(&default_spec) { " [default]" } else { "" };
        println!("  {}. {}{}", i + 1, preset.name, marker);
        println!("     key:   {}", preset.key_header);
        println!("     value: {}", preset.value_header);
    }

    Ok(())
}

fn cmd_create_config(spec: &ColumnSpec, output: &Path) -> ml_core::Result<()> {
    spec.save(output)?;

    println!("Created config file: {}", output.display());
    println!("  key:   {}", spec.key_header);
    println!("  value: {}", spec.value_header);
    println!();
    println!("Edit the file if needed, then run:");
    println!("  ml-invert invert --file <export.csv> --config {}", output.display());

    Ok(())
}
