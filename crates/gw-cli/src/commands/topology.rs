//! `redeploy`, `list-topologies` and `validate-topology` commands.

use gw_topology::{validation, TopologyError, TopologyService};

use crate::cli::SharedOptions;
use crate::error::CliResult;
use crate::output::Output;
use crate::services::GatewayServices;

/// Regenerates the deployment artifact for the named topology. Without
/// a cluster the descriptors are only reloaded.
pub fn run_redeploy(
    options: &SharedOptions,
    services: &mut GatewayServices,
    output: &mut Output,
) -> CliResult<()> {
    let store = services.topology_mut();
    store.reload()?;

    if let Some(cluster) = options.cluster.as_deref() {
        if store.find(cluster).is_some() {
            let root = store.redeploy(cluster)?;
            tracing::info!(cluster, root = %root.display(), "topology redeployed");
            output.success(&format!("{cluster} has been successfully redeployed."));
        } else {
            output.println("Invalid cluster name provided. Nothing to redeploy.");
        }
    }
    Ok(())
}

/// Lists the descriptor files in the topologies directory.
pub fn run_list(services: &GatewayServices, output: &mut Output) -> CliResult<()> {
    let store = services.topology();
    output.println("List of files available in the topologies directory");
    output.println(store.topologies_dir().display().to_string());
    match store.descriptor_names() {
        Ok(names) => {
            for name in names {
                output.println(name);
            }
            Ok(())
        }
        Err(TopologyError::DirectoryUnavailable(_)) => {
            output.println("ERR: Topologies directory does not exist.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Parses and validates a topology descriptor, selected by cluster
/// name or explicit path.
pub fn run_validate(
    options: &SharedOptions,
    services: &GatewayServices,
    output: &mut Output,
) -> CliResult<()> {
    let store = services.topology();
    let Some(file) = validation::resolve_descriptor(
        store,
        options.cluster.as_deref(),
        options.path.as_deref(),
    ) else {
        // Neither selector given; fall back to the directory listing.
        return run_list(services, output);
    };

    output.println(format!("File to be validated: {}", file.display()));
    output.println("==========================================");

    if !file.is_file() {
        output.println("The topology file specified does not exist.");
        return Ok(());
    }

    let report = validation::validate_file(&file)?;
    if report.is_valid() {
        output.println("Topology file validated successfully.");
    } else {
        for error in &report.errors {
            output.println(error);
        }
        output.println("Topology validation unsuccessful.");
    }
    Ok(())
}
