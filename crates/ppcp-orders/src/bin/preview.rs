//! # Purchase Unit Preview
//!
//! Prints the purchase unit that would be sent to PayPal for a cart file.
//!
//! ## Usage
//! ```bash
//! # Default settings (plus PPCP_* environment overrides)
//! cargo run -p ppcp-orders --bin ppcp-preview -- cart.json
//!
//! # Explicit settings file
//! cargo run -p ppcp-orders --bin ppcp-preview -- cart.json --config ./orders.toml
//!
//! # See why items were omitted
//! RUST_LOG=ppcp_core=debug cargo run -p ppcp-orders --bin ppcp-preview -- cart.json
//! ```
//!
//! Logs go to stderr; stdout carries only the JSON body.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ppcp_orders::{load_cart, OrdersConfig, PurchaseUnitBuilder};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut cart_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => cart_path = Some(PathBuf::from(other)),
        }
        i += 1;
    }

    let Some(cart_path) = cart_path else {
        print_usage();
        return ExitCode::from(2);
    };

    match run(&cart_path, config_path) {
        Ok(body) => {
            println!("{}", body);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(path = ?cart_path, "Preview failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cart_path: &Path, config_path: Option<PathBuf>) -> Result<String, Box<dyn std::error::Error>> {
    let config = match config_path {
        // An explicit file must exist; the default location may be absent.
        Some(path) if !path.exists() => {
            return Err(format!("config file not found: {}", path.display()).into());
        }
        Some(path) => OrdersConfig::load(Some(path))?,
        None => OrdersConfig::load_or_default(None),
    };

    let cart = load_cart(cart_path)?;
    let unit = PurchaseUnitBuilder::new(&config).build(&cart)?;
    Ok(serde_json::to_string_pretty(&unit)?)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ppcp_core=debug,ppcp_orders=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!("Usage: ppcp-preview <cart.json> [--config <orders.toml>]");
}
