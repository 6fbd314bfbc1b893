//! Command-line configuration and logging setup.
//!
//! Flags override the defaults in [`ViewerConfig`]. Nothing is written to
//! disk unless `--log-file` is given.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use crate::types::{Category, DEFAULT_DATA_DIR, ViewerConfig};

#[derive(Debug, Parser)]
#[command(name = "syllabus-tui")]
#[command(about = "Browse a curriculum and mark earned credits")]
#[command(version)]
pub struct Cli {
    /// Directory containing one <category>.yaml file per category
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Subject tables per grid row
    #[arg(long, default_value_t = crate::layout::DEFAULT_TABLES_PER_ROW,
          value_parser = parse_columns)]
    pub columns: usize,

    /// Write a debug log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_columns(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl From<&Cli> for ViewerConfig {
    fn from(cli: &Cli) -> Self {
        ViewerConfig {
            data_dir: cli.data_dir.clone(),
            categories: Category::ALL.to_vec(),
            tables_per_row: cli.columns,
        }
    }
}

/// Initialize file logging. A TUI owns stdout, so logs only go to a file.
pub fn init_logging(path: &Path) -> io::Result<()> {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    let log_file = File::create(path)?;
    // Ignore a second init; the first logger stays active.
    let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
