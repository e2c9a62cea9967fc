//! Local driver for the Basic-Auth authorizer.
//!
//! Reads a gateway REQUEST-authorizer event as JSON and prints the policy
//! document, or `Unauthorized` with exit status 1.
//!
//! Log verbosity comes from `LOG_LEVEL`. When `RUST_LOG` is set, its
//! directives take precedence over `LOG_LEVEL`.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use basicauth_authorizer::{
    AuthorizationDecision, Authorizer, AuthorizerConfig, AuthorizerError, AuthorizerRequest,
};
use clap::Parser;
use thiserror::Error;
use tracing::{Level, error};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "basicauth-authorizer")]
#[command(version, about = "Evaluate a gateway authorizer event against Basic-Auth credentials", long_about = None)]
struct Cli {
    /// Path to the event JSON; reads stdin when omitted
    #[arg(short, long)]
    event: Option<PathBuf>,

    /// Pretty-print the policy document
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Debug, Error)]
enum DriverError {
    #[error("failed to read event: {0}")]
    Read(#[from] io::Error),

    #[error("failed to parse event: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize policy: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Authorizer(#[from] AuthorizerError),
}

fn read_event(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// `RUST_LOG` directives, when present, override the `LOG_LEVEL` default.
fn init_tracing(level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli, config: &AuthorizerConfig) -> Result<ExitCode, DriverError> {
    let raw = read_event(cli.event.as_ref())?;
    let request: AuthorizerRequest = serde_json::from_str(&raw).map_err(DriverError::Parse)?;

    let decision = Authorizer::from_config(config).authorize(&request)?;

    match decision {
        AuthorizationDecision::Allow(document) => {
            let rendered = if cli.pretty {
                serde_json::to_string_pretty(&document)
            } else {
                document.to_json()
            }
            .map_err(DriverError::Serialize)?;
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        AuthorizationDecision::Unauthorized => {
            println!("Unauthorized");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AuthorizerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    init_tracing(config.log_level.into());

    match run(&cli, &config) {
        Ok(code) => code,
        Err(e) => {
            error!(event = "Driver", phase = "Run", error = e.to_string());
            ExitCode::from(2)
        }
    }
}
