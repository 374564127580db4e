//! WebSocket API doc generator - command-line tool for documenting WebSocket endpoints.
//!
//! This binary scans a Rust source tree for `@WebSocket` comment annotations and writes a
//! WebSocket API document describing every endpoint, its connection parameters and the
//! messages it sends and receives.
//!
//! # Usage
//!
//! ```bash
//! wsapi-from-source [OPTIONS] <COMMAND>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! wsapi-from-source generate --src ./my-service --out wsdocs/wsapi.yaml
//! ```
//!
//! Generate JSON documentation:
//! ```bash
//! wsapi-from-source generate --src ./my-service -f json --out wsdocs/wsapi.json
//! ```
//!
//! Validate and reformat a document:
//! ```bash
//! wsapi-from-source validate --file wsdocs/wsapi.yaml
//! wsapi-from-source fmt --file wsdocs/wsapi.yaml
//! ```

use anyhow::Result;
use clap::Parser;
use log::debug;
use wsapi_from_source::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    debug!("wsapi-from-source {} starting", env!("CARGO_PKG_VERSION"));

    cli::run(args)
}
