//! # Directory Service Daemon
//!
//! Main entry point for the directory service host.

use directoryd::{init_logging, DaemonConfig, DaemonRuntime};
use std::env;
use std::path::PathBuf;
use std::process;
use tokio::io::{self, BufReader};
use tracing::{error, info};

/// Options given on the command line
#[derive(Debug, Default)]
struct Options {
    config_path: Option<PathBuf>,
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("directoryd");

    let options = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(program);
        process::exit(1);
    });

    let mut config = match &options.config_path {
        Some(path) => DaemonConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => DaemonConfig::default(),
    };
    if let Some(filter) = options.log_filter {
        config.log_filter = filter;
    }

    if let Err(e) = init_logging(&config.log_filter) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }
    info!(app = %config.default_app, "Directory service starting");

    let runtime = DaemonRuntime::new(&config);
    let input = BufReader::new(io::stdin());
    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Cannot listen for interrupts");
            std::future::pending::<()>().await;
        }
    };

    if let Err(e) = runtime.run(input, io::stdout(), interrupted).await {
        error!(error = %e, "Runtime error");
        process::exit(1);
    }
    info!("Directory service stopped");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                options.config_path = Some(PathBuf::from(&args[i]));
            }
            "--log" | "-l" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --log".to_string());
                }
                options.log_filter = Some(args[i].clone());
            }
            "--help" | "-h" => {
                print_usage(args.first().map(String::as_str).unwrap_or("directoryd"));
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(options)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Reads JSON request lines on stdin and writes responses and");
    eprintln!("connection events as JSON lines on stdout.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>      JSON configuration file");
    eprintln!("  -l, --log <FILTER>       Log filter (default: info, RUST_LOG wins)");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --config directoryd.json", program);
    eprintln!(
        "  echo '{{\"module\":\"connect\",\"action\":\"connect\"}}' | {} --log debug",
        program
    );
}
