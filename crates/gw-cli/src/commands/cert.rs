//! `create-cert` command.

use crate::cli::{SharedOptions, DEFAULT_CLUSTER};
use crate::error::CliResult;
use crate::output::Output;
use crate::services::GatewayServices;

/// Alias holding the identity key passphrase, when one was created.
const IDENTITY_PASSPHRASE_ALIAS: &str = "gateway-identity-passphrase";

/// Generates a self-signed identity certificate for the gateway host.
///
/// The private key is protected with the identity passphrase alias
/// from the gateway's own credential store when present, falling back
/// to the master secret.
pub fn run(options: &SharedOptions, services: &GatewayServices, output: &mut Output) -> CliResult<()> {
    let aliases = services.alias_service()?;
    let keystore = services.keystore_service();

    if !aliases.store_exists(DEFAULT_CLUSTER) {
        aliases.create_store(DEFAULT_CLUSTER)?;
    }
    if !keystore.identity_keystore_exists() {
        keystore.create_identity_keystore()?;
    }

    let passphrase = match aliases.password_for(DEFAULT_CLUSTER, IDENTITY_PASSPHRASE_ALIAS)? {
        Some(passphrase) => passphrase,
        None => services.master_secret()?.to_string(),
    };

    let hostname = options.hostname.as_deref().unwrap_or("localhost");
    keystore.add_self_signed_cert(hostname, &passphrase)?;
    tracing::info!(hostname, "self-signed identity certificate generated");
    output.success("Certificate gateway-identity has been successfully created.");
    Ok(())
}
