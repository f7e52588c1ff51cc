//! `create-alias`, `delete-alias` and `list-alias` commands.

use gw_secrets::SecretsError;

use crate::cli::SharedOptions;
use crate::error::{CliError, CliResult};
use crate::output::Output;
use crate::services::GatewayServices;

/// Stores a credential alias, with a supplied or generated value.
pub fn run_create(
    name: &str,
    options: &SharedOptions,
    services: &GatewayServices,
    output: &mut Output,
) -> CliResult<()> {
    let aliases = services.alias_service()?;
    let cluster = options.effective_cluster();

    if let Some(value) = &options.value {
        aliases.add(cluster, name, value)?;
        output.success(&format!("{name} has been successfully created."));
    } else if options.generate {
        aliases.generate(cluster, name)?;
        output.success(&format!("{name} has been successfully generated."));
    } else {
        return Err(CliError::InvalidArgument(format!(
            "No value has been set for alias {name}. Consider setting --generate or --value."
        )));
    }
    Ok(())
}

/// Removes a credential alias.
pub fn run_delete(
    name: &str,
    options: &SharedOptions,
    services: &GatewayServices,
    output: &mut Output,
) -> CliResult<()> {
    let aliases = services.alias_service()?;
    let cluster = options.effective_cluster();

    if !aliases.store_exists(cluster) {
        output.println(format!("Invalid cluster name provided: {cluster}"));
        return Ok(());
    }
    match aliases.remove(cluster, name) {
        Ok(()) => {
            output.success(&format!("{name} has been successfully deleted."));
            Ok(())
        }
        Err(SecretsError::AliasNotFound(_)) => {
            output.println(format!("No such alias exists: {name}"));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Lists the credential aliases of a cluster.
pub fn run_list(
    options: &SharedOptions,
    services: &GatewayServices,
    output: &mut Output,
) -> CliResult<()> {
    let aliases = services.alias_service()?;
    let cluster = options.effective_cluster();

    if !aliases.store_exists(cluster) {
        output.println(format!("Invalid cluster name provided: {cluster}"));
        return Ok(());
    }
    let names = aliases.list(cluster)?;
    output.println(format!("Listing aliases for: {cluster}"));
    for name in &names {
        output.println(name);
    }
    output.println(format!("{} items.", names.len()));
    Ok(())
}
