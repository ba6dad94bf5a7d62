//! Table Builder CLI
//!
//! Validates pipe-delimited outcome, time and team tables and builds the
//! compressed table cache the referee loads at startup.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "table_builder")]
#[command(about = "Validate referee tables and build table caches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Check table files without writing anything
    Validate {
        /// Outcome rows file
        #[arg(long)]
        outcomes: Option<PathBuf>,

        /// Time rows file
        #[arg(long)]
        times: Option<PathBuf>,

        /// Team rows file
        #[arg(long)]
        teams: Option<PathBuf>,
    },

    /// Build the table cache
    Build {
        #[arg(long)]
        outcomes: PathBuf,

        #[arg(long)]
        times: PathBuf,

        /// Output MsgPack+LZ4 file path
        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value = "v1")]
        schema_version: String,

        /// Verify cache after building
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { outcomes, times, teams } => {
            if let Some(path) = outcomes {
                let (table, stats) = table_builder::load_outcome_table(&path)?;
                println!("Outcomes: {} rows, {} tables ({})", stats.parsed, table.table_count(), path.display());
            }
            if let Some(path) = times {
                let (table, stats) = table_builder::load_time_table(&path)?;
                println!("Times:    {} rows, {} entries ({})", stats.parsed, table.len(), path.display());
            }
            if let Some(path) = teams {
                let (index, stats) = table_builder::load_teams(&path)?;
                println!("Teams:    {} loaded, {} skipped ({})", index.len(), stats.skipped, path.display());
            }
        }

        Commands::Build { outcomes, times, out, schema_version, verify, metadata } => {
            println!("Building table cache...");
            println!("   Outcomes: {}", outcomes.display());
            println!("   Times:    {}", times.display());
            println!("   Output:   {}", out.display());
            println!("   Schema:   {}", schema_version);

            let meta = table_builder::build_table_cache(&outcomes, &times, &out, &schema_version)?;

            print_metadata(&meta);

            if verify {
                verify_cache_integrity(&out, &meta.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                save_metadata(&metadata_path, &meta)?;
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &table_builder::CacheMetadata) {
    println!("\nCache built");
    println!("   Outcome tables:  {}", meta.outcome_tables);
    println!("   Time rows:       {}", meta.time_rows);
    println!("   Original size:   {} bytes", meta.original_size);
    println!("   Compressed size: {} bytes", meta.compressed_size);
    println!("   Compression:     {:.1}%", meta.compression_ratio * 100.0);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
    if !meta.missing_tables.is_empty() {
        println!("   Missing tables:  {}", meta.missing_tables.join(", "));
    }
}

#[cfg(feature = "cli")]
fn verify_cache_integrity(cache_path: &std::path::Path, checksum: &str) -> Result<()> {
    println!("\nVerifying cache integrity...");
    if !table_builder::verify_cache(cache_path, checksum)? {
        anyhow::bail!("Cache verification failed - checksum mismatch");
    }
    table_builder::load_table_cache(cache_path)?;
    println!("Cache verification passed");
    Ok(())
}

#[cfg(feature = "cli")]
fn save_metadata(path: &PathBuf, meta: &table_builder::CacheMetadata) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(meta)?;
    std::fs::write(path, metadata_json)?;
    println!("\nMetadata saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("table_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
