//! Command implementations and dispatch.

pub mod alias;
pub mod auth;
pub mod cert;
pub mod master;
pub mod topology;
pub mod version;

use crate::cli::{Command, SharedOptions};
use crate::credentials::CredentialSource;
use crate::error::CliResult;
use crate::output::Output;
use crate::services::GatewayServices;

/// Precondition check run before execution. A `false` return means the
/// command printed its refusal and must not execute; the invocation
/// still exits cleanly.
pub fn validate(
    command: &Command,
    options: &SharedOptions,
    services: &GatewayServices,
    output: &mut Output,
) -> bool {
    match command {
        Command::CreateMaster => master::validate(options, services, output),
        _ => true,
    }
}

/// Dispatches the selected command.
pub async fn execute(
    command: Command,
    options: &SharedOptions,
    services: &mut GatewayServices,
    credentials: &mut dyn CredentialSource,
    output: &mut Output,
) -> CliResult<()> {
    match command {
        Command::Version => version::run(output),
        Command::CreateMaster => master::run(options, services, output),
        Command::CreateCert => cert::run(options, services, output),
        Command::CreateAlias { name } => alias::run_create(&name, options, services, output),
        Command::DeleteAlias { name } => alias::run_delete(&name, options, services, output),
        Command::ListAliases => alias::run_list(options, services, output),
        Command::Redeploy => topology::run_redeploy(options, services, output),
        Command::ListTopologies => topology::run_list(services, output),
        Command::ValidateTopology => topology::run_validate(options, services, output),
        Command::AuthTest => {
            let tmp_base = std::env::temp_dir();
            auth::run(
                options,
                services.topology_mut(),
                credentials,
                &auth::LiveAuthDriver,
                &tmp_base,
                output,
            )
            .await
        }
    }
}
