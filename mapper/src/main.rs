//! gcf-mapper CLI - Map GCF/MCF project data to the catalog import format
//!
//! # Commands
//!
//! ```bash
//! gcf-mapper map --gcf-projects gcf.json --mcf-projects mcf.csv --mcf-docs docs.csv
//! gcf-mapper validate mapped.json   # Check a mapped file against the output schemas
//! gcf-mapper columns                # List the columns each source must provide
//! ```
//!
//! Mapped JSON goes to stdout unless `--output` is given; logs go to stderr.

use clap::{Parser, Subcommand};
use gcf_mapper::columns::{
    document_family_required_columns, document_required_columns, event_required_columns,
    family_required_columns,
};
use gcf_mapper::{map_files, validate_mapped_data, InputPaths, MappedData, MapperConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gcf-mapper", version)]
#[command(about = "Map GCF project data to families, documents and events", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map the three source files to a single JSON bundle
    Map {
        /// GCF projects file (JSON)
        #[arg(long)]
        gcf_projects: PathBuf,

        /// MCF projects file (CSV)
        #[arg(long)]
        mcf_projects: PathBuf,

        /// MCF documents file (CSV)
        #[arg(long)]
        mcf_docs: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Date the family status is computed at (default: now)
        #[arg(long, env = "GCF_MAPPER_AS_OF")]
        as_of: Option<String>,

        /// Skip the output schema check
        #[arg(long, env = "GCF_MAPPER_SKIP_VALIDATION")]
        skip_validation: bool,
    },

    /// Validate a mapped JSON bundle against the output schemas
    Validate {
        /// Mapped JSON file
        input: PathBuf,
    },

    /// Show the columns each source table must provide
    Columns,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("gcf_mapper=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gcf_mapper=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Map {
            gcf_projects,
            mcf_projects,
            mcf_docs,
            output,
            as_of,
            skip_validation,
        } => {
            let paths = InputPaths {
                gcf_projects,
                mcf_projects,
                mcf_docs,
            };
            cmd_map(&paths, output.as_deref(), as_of.as_deref(), skip_validation)
        }

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Columns => cmd_columns(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_map(
    paths: &InputPaths,
    output: Option<&Path>,
    as_of: Option<&str>,
    skip_validation: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = MapperConfig {
        skip_validation,
        ..MapperConfig::default()
    };
    if let Some(as_of) = as_of {
        config.as_of = MapperConfig::parse_as_of(as_of)?;
    }

    let outcome = match map_files(paths, &config) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Failed to map GCF data to expected JSON");
            return Err(e.into());
        }
    };
    eprintln!("Finished mapping GCF data.");

    let summary = &outcome.summary;
    eprintln!(
        "   Families: {} ({} skipped)",
        summary.families_mapped, summary.families_dropped
    );
    eprintln!("   Documents: {}", summary.documents_mapped);
    eprintln!("   Events: {}", summary.events_mapped);
    if summary.documents_orphaned + summary.events_orphaned > 0 {
        eprintln!(
            "   Without a mapped family: {} documents, {} events",
            summary.documents_orphaned, summary.events_orphaned
        );
    }
    if summary.schema_violations > 0 {
        eprintln!("   Schema violations: {}", summary.schema_violations);
    }

    let json = serde_json::to_string_pretty(&outcome.data)?;
    write_output(&json, output)?;
    eprintln!("Finished dumping mapped GCF data.");

    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let data: MappedData = serde_json::from_str(&content)?;
    let report = validate_mapped_data(&data)?;

    for violation in report.violations.iter().take(5) {
        eprintln!("\n{:?} {} invalid:", violation.kind, violation.import_id);
        for err in violation.errors.iter().take(3) {
            eprintln!("   - {}", err);
        }
    }

    eprintln!(
        "\nResults: {} valid, {} invalid",
        report.checked - report.violations.len(),
        report.violations.len()
    );

    if !report.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_columns() -> Result<(), Box<dyn std::error::Error>> {
    let sections = [
        ("Projects (families)", family_required_columns()),
        ("Projects (events)", event_required_columns()),
        ("Projects (documents)", document_family_required_columns()),
        ("Documents", document_required_columns()),
    ];

    for (name, columns) in sections {
        println!("{name}:");
        for column in columns {
            println!("  {column}");
        }
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
