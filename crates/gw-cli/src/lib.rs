//! # gw-cli
//!
//! Operator diagnostic CLI for the gateway: master secret and
//! credential management, topology inspection, and the LDAP
//! authentication diagnostic.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod output;
pub mod parser;
pub mod services;

use cli::print_usage;
use credentials::CredentialSource;
use error::CliError;
use output::Output;
use parser::ParseOutcome;
use services::GatewayServices;

/// Exit code for a completed invocation.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code after printing usage.
pub const EXIT_USAGE: i32 = -1;
/// Exit code when no command was recognized.
pub const EXIT_BAD_COMMAND: i32 = -2;
/// Exit code for an unexpected internal failure.
pub const EXIT_INTERNAL: i32 = -3;

/// Parses the argument vector (without the program name), dispatches
/// the selected command, and returns the process exit code.
pub async fn run(
    args: &[String],
    services: &mut GatewayServices,
    credentials: &mut dyn CredentialSource,
    output: &mut Output,
) -> i32 {
    match parser::parse(args) {
        ParseOutcome::Usage { selected } => {
            print_usage(output, selected.as_ref());
            EXIT_USAGE
        }
        ParseOutcome::Ready {
            command: None,
            options: _,
        } => invalid_command(args, output),
        ParseOutcome::Ready {
            command: Some(command),
            options,
        } => {
            services.set_master_override(options.master.clone());
            // A refused precondition is reported like an unusable
            // command line.
            if !commands::validate(&command, &options, services, output) {
                return invalid_command(args, output);
            }
            match commands::execute(command, &options, services, credentials, output).await {
                Ok(()) => EXIT_SUCCESS,
                Err(CliError::ServiceLifecycle(message)) => {
                    // The command could not get its services up;
                    // reported, but not an abnormal exit.
                    tracing::error!(%message, "service lifecycle failure");
                    output.println(format!(
                        "ERR: {message} Please refer to the gwcli log for details."
                    ));
                    EXIT_SUCCESS
                }
                Err(e) => {
                    output.eprintln(format!("{e:?}"));
                    EXIT_INTERNAL
                }
            }
        }
    }
}

fn invalid_command(args: &[String], output: &mut Output) -> i32 {
    output.println("ERROR: Invalid Command");
    output.println(format!(
        "Unrecognized option: {}",
        args.first().map(String::as_str).unwrap_or_default()
    ));
    output.println("A fatal exception has occurred. Program will exit.");
    EXIT_BAD_COMMAND
}
