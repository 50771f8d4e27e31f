//! Rule Filter CLI
//!
//! Command-line interface for pruning rule documents and validating payloads
//! against the pruned rules.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rule_filter::{
    check_schema, filter_rules, load_rules, load_rules_auto, parse_items, validate_payload,
    FilterResponse, ValidateError,
};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rule-filter")]
#[command(about = "Prune JSON Schema rule documents to a set of retained names")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a rules document down to the given items
    Filter {
        /// Rules source: file path or URL (http:// or https://)
        rules: String,

        /// Items to keep: JSON array or comma separated list
        #[arg(long, short)]
        items: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Wrap output in a {"success": ..., "data"/"message": ...} envelope
        #[arg(long)]
        json: bool,

        /// Fail if the filtered document does not compile as a JSON Schema
        #[arg(long)]
        check: bool,
    },

    /// Validate a payload against the filtered rules
    Validate {
        /// Payload file to validate
        payload: PathBuf,

        /// Rules source: file path or URL (http:// or https://)
        #[arg(long)]
        rules: String,

        /// Items to keep: JSON array or comma separated list
        #[arg(long, short)]
        items: String,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Filter {
            rules,
            items,
            output,
            pretty,
            json,
            check,
        } => run_filter(FilterArgs {
            rules,
            items,
            output,
            pretty,
            json_output: json,
            check,
        }),

        Commands::Validate {
            payload,
            rules,
            items,
            json,
        } => run_validate(&payload, &rules, &items, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct FilterArgs {
    rules: String,
    items: String,
    output: Option<PathBuf>,
    pretty: bool,
    json_output: bool,
    check: bool,
}

fn run_filter(args: FilterArgs) -> Result<(), u8> {
    let FilterArgs {
        rules: rules_source,
        items,
        output,
        pretty,
        json_output,
        check,
    } = args;

    let rules = load_rules_auto(&rules_source).map_err(|e| {
        report_failure(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    let retain = parse_items(&items).map_err(|e| {
        report_failure(json_output, &e.to_string());
        e.exit_code() as u8
    })?;
    debug!(items = retain.len(), "parsed retained items");

    let filtered = filter_rules(&rules, &retain).map_err(|e| {
        report_failure(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    if check {
        check_schema(&filtered).map_err(|e| {
            report_failure(json_output, &e.to_string());
            e.exit_code() as u8
        })?;
    }

    let body = if json_output {
        serde_json::to_value(FilterResponse::ok(filtered)).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?
    } else {
        filtered
    };

    let text = to_json_text(&body, pretty)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &text).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
            info!(path = %path.display(), "wrote filtered rules");
        }
        None => {
            println!("{}", text);
        }
    }

    Ok(())
}

fn run_validate(
    payload_path: &Path,
    rules_source: &str,
    items: &str,
    json_output: bool,
) -> Result<(), u8> {
    let payload = load_rules(payload_path).map_err(|e| {
        report_error(json_output, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;

    let rules = load_rules_auto(rules_source).map_err(|e| {
        report_error(json_output, &format!("loading rules: {}", e));
        e.exit_code() as u8
    })?;

    let retain = parse_items(items).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    match validate_payload(&rules, &retain, &payload) {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(e) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

fn to_json_text(value: &Value, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

/// Report a filter failure as plain text or as a failure envelope.
fn report_failure(json_output: bool, msg: &str) {
    if json_output {
        match serde_json::to_string(&FilterResponse::failure(msg)) {
            Ok(text) => println!("{}", text),
            Err(_) => eprintln!("Error: {}", msg),
        }
    } else {
        eprintln!("Error: {}", msg);
    }
}

/// Output a validation error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
