//! `gwcli` entry point.

#![forbid(unsafe_code)]

use std::process;

use tracing_subscriber::EnvFilter;

use gw_cli::config::GatewayConfig;
use gw_cli::credentials::TerminalCredentialSource;
use gw_cli::output::Output;
use gw_cli::services::GatewayServices;
use gw_cli::EXIT_INTERNAL;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GWCLI_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut output = Output::stdio();

    let config = match GatewayConfig::load() {
        Ok(config) => config,
        Err(e) => {
            output.eprintln(format!("ERR: {e}"));
            process::exit(EXIT_INTERNAL);
        }
    };

    let mut services = GatewayServices::new(config);
    let mut credentials = TerminalCredentialSource;
    let code = gw_cli::run(&args, &mut services, &mut credentials, &mut output).await;
    process::exit(code);
}
