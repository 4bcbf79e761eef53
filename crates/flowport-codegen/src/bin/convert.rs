// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Model converter CLI
//!
//! Converts a Mule model JSON file to Ballerina source.
//!
//! Usage:
//!
//! ```text
//! flowport-convert --model <path> [--output <path>] [--summary]
//! ```
//!
//! Example:
//!
//! ```text
//! flowport-convert --model hello.json --output ./hello.bal
//! ```

use flowport_codegen::{CodegenConfig, convert};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

fn print_usage() {
    eprintln!(
        r#"Usage: flowport-convert [OPTIONS]

Convert a Mule model JSON file to Ballerina source.

OPTIONS:
    --model <path>       Path to model JSON file (required)
    --output <path>      Output .bal path (default: print source to stdout)
    --summary            Print a JSON summary (checksum, counts) to stderr
    --help               Show this help message

ENVIRONMENT:
    FLOWPORT_INDENT_WIDTH              Spaces per indentation level (default: 4)
    FLOWPORT_DEFAULT_HOST              Listener host default (default: 0.0.0.0)
    FLOWPORT_DEFAULT_PORT              Listener port default (default: 8081)
    FLOWPORT_DEFAULT_IDLE_TIMEOUT_MS   Idle timeout default (default: 30000)

EXAMPLES:
    # Print generated source
    flowport-convert --model hello.json

    # Write to a file
    flowport-convert --model hello.json --output ./hello.bal
"#
    );
}

struct Args {
    model_path: PathBuf,
    output_path: Option<PathBuf>,
    summary: bool,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = std::env::args().collect();

    let mut model_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut summary = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--model" => {
                i += 1;
                if i >= args.len() {
                    return Err("--model requires a path".to_string());
                }
                model_path = Some(PathBuf::from(&args[i]));
            }
            "--output" => {
                i += 1;
                if i >= args.len() {
                    return Err("--output requires a path".to_string());
                }
                output_path = Some(PathBuf::from(&args[i]));
            }
            "--summary" => {
                summary = true;
            }
            arg => {
                return Err(format!("Unknown argument: {}", arg));
            }
        }
        i += 1;
    }

    let model_path = model_path.ok_or("--model is required")?;

    Ok(Args {
        model_path,
        output_path,
        summary,
    })
}

fn main() -> ExitCode {
    // Initialize minimal logging (default to warn if RUST_LOG not set)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let model_json = match fs::read_to_string(&args.model_path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error reading model file {:?}: {}", args.model_path, e);
            return ExitCode::FAILURE;
        }
    };

    let root = match flowport_dsl::parse_root_str(&model_json) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match convert(&root, &CodegenConfig::from_env()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Conversion failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.summary {
        match serde_json::to_string_pretty(&result) {
            Ok(summary) => eprintln!("{}", summary),
            Err(e) => eprintln!("Warning: could not serialize summary: {}", e),
        }
    }

    match args.output_path {
        Some(output_path) => {
            if let Err(e) = result.write_to(&output_path) {
                eprintln!("Error writing source to {:?}: {}", output_path, e);
                return ExitCode::FAILURE;
            }
            // Print final path to stdout for scripts to capture
            println!("{}", output_path.display());
        }
        None => print!("{}", result.source),
    }

    ExitCode::SUCCESS
}
