//! Boxoffice CLI - bulk-import box-office records from CSV files
//!
//! # Main Commands
//!
//! ```bash
//! boxoffice serve                   # Start HTTP server (port 3000)
//! boxoffice check sales.csv -t tickets   # Validate a file offline
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! boxoffice parse sales.csv         # Just parse CSV rows to JSON
//! boxoffice columns                 # Show expected columns per import type
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use boxoffice::{coerce_row, columns, parse_file, ImportKind, MemoryStorage};

#[derive(Parser)]
#[command(name = "boxoffice")]
#[command(about = "Bulk-import theater box-office records from CSV files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV file and output rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a CSV file against an import type, without persisting
    Check {
        /// Input CSV file
        input: PathBuf,

        /// Import type: events|cast|crew|tickets|feedback
        #[arg(short = 't', long = "type")]
        kind: String,
    },

    /// Show the expected columns for each import type
    Columns,

    /// Start HTTP server (in-memory demo storage)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
        Commands::Check { input, kind } => cmd_check(&input, &kind),
        Commands::Columns => cmd_columns(),
        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Parsing CSV: {}", input.display());

    let rows = parse_file(input)?;

    eprintln!("   Columns: {}", rows.headers.join(", "));
    eprintln!("Parsed {} rows", rows.len());

    let records: Vec<serde_json::Value> = rows
        .rows
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            for header in &rows.headers {
                obj.insert(
                    header.clone(),
                    serde_json::json!(row.get(header).unwrap_or("")),
                );
            }
            serde_json::Value::Object(obj)
        })
        .collect();

    let json = serde_json::to_string_pretty(&records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_check(input: &Path, kind_token: &str) -> Result<(), Box<dyn std::error::Error>> {
    let kind = ImportKind::from_token(kind_token).ok_or_else(|| {
        format!(
            "Unknown import type '{}', expected one of events|cast|crew|tickets|feedback",
            kind_token
        )
    })?;

    eprintln!("Checking {} as {}", input.display(), kind.label());

    let rows = parse_file(input)?;

    let mut valid = 0;
    let mut invalid = 0;

    for row in &rows.rows {
        match coerce_row(kind, row) {
            Ok(_) => valid += 1,
            Err(err) => {
                invalid += 1;
                if invalid <= 10 {
                    eprintln!("   line {}: {}", row.line, err);
                }
            }
        }
    }

    eprintln!("Results: {} valid, {} invalid", valid, invalid);

    if invalid > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_columns() -> Result<(), Box<dyn std::error::Error>> {
    println!("Expected columns per import type (required marked *):\n");

    for kind in ImportKind::ALL {
        let cols: Vec<String> = columns(kind)
            .iter()
            .map(|rule| {
                if rule.required {
                    format!("{}*", rule.name)
                } else {
                    rule.name.to_string()
                }
            })
            .collect();
        println!("  {:<10} {}", kind.token(), cols.join(", "));
    }

    println!("\nDate/time columns use the literal format YYYY-MM-DD HH:MM (24-hour).");
    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Arc::new(MemoryStorage::new());
    boxoffice::server::start_server(port, storage).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
