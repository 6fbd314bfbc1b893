//! syllabus-tui CLI
//!
//! Load the curriculum, then browse it interactively until Esc or Ctrl+C.

use std::process::ExitCode;

use clap::Parser;
use log::info;

use syllabus_tui::config::{Cli, init_logging};
use syllabus_tui::loader::load_curriculum;
use syllabus_tui::tui::{self, App};
use syllabus_tui::types::ViewerConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    if let Some(path) = &cli.log_file {
        init_logging(path).map_err(|e| format!("cannot open log file {}: {}", path.display(), e))?;
    }

    let config = ViewerConfig::from(cli);
    info!("Starting with {:?}", config);

    // Fail before any UI is shown.
    let curriculum = load_curriculum(&config.data_dir, &config.categories).map_err(|e| e.to_string())?;

    let app = App::new(curriculum, config.tables_per_row);
    tui::run(app).map_err(|e| format!("terminal error: {}", e))?;

    println!("Finished.");
    Ok(())
}
