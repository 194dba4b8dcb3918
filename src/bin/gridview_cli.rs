//! CLI tool for gridview - replays an interaction scenario and outputs JSON
//!
//! Usage:
//!   gridview_cli <scenario.json>              # Output snapshot JSON to stdout
//!   gridview_cli <scenario.json> -o out.json  # Output snapshot JSON to file
//!
//! Set `RUST_LOG=gridview=debug` to trace each replayed action.

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};

use gridview::scenario::Scenario;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridview=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let Some(input_path) = args.get(1) else {
        eprintln!("Usage: gridview_cli <scenario.json> [-o output.json]");
        std::process::exit(1);
    };
    let output_path = match (args.get(2), args.get(3)) {
        (Some(flag), Some(path)) if flag == "-o" => Some(path),
        _ => None,
    };

    // Read scenario
    let scenario = match Scenario::from_path(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // Replay
    let snapshot = match scenario.run() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error replaying scenario: {}", e);
            std::process::exit(1);
        }
    };

    let json = match serde_json::to_string_pretty(&snapshot) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            let mut stdout = io::stdout();
            if writeln!(stdout, "{json}").is_err() {
                std::process::exit(1);
            }
        }
    }
}
