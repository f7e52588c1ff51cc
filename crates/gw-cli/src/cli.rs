//! Command definitions and usage text.

use crate::output::Output;

/// Default credential store scope when `--cluster` is not given.
pub const DEFAULT_CLUSTER: &str = "__gateway";

/// The commands the CLI dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print tool and gateway version details.
    Version,
    /// Persist the master secret.
    CreateMaster,
    /// Create a self-signed identity certificate.
    CreateCert,
    /// Store a named credential.
    CreateAlias {
        /// Alias name to create.
        name: String,
    },
    /// Remove a named credential.
    DeleteAlias {
        /// Alias name to delete.
        name: String,
    },
    /// List credential names for a cluster.
    ListAliases,
    /// Regenerate deployment artifacts for a topology.
    Redeploy,
    /// List topology descriptor files.
    ListTopologies,
    /// Validate a topology descriptor.
    ValidateTopology,
    /// Run the LDAP authentication diagnostic.
    AuthTest,
}

impl Command {
    /// One-line usage synopsis.
    #[must_use]
    pub fn usage(&self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::CreateMaster => "create-master [--force]",
            Self::CreateCert => "create-cert [--hostname h]",
            Self::CreateAlias { .. } => {
                "create-alias aliasname [--cluster clustername] [ (--value v) | (--generate) ]"
            }
            Self::DeleteAlias { .. } => "delete-alias aliasname [--cluster clustername]",
            Self::ListAliases => "list-alias [--cluster clustername]",
            Self::Redeploy => "redeploy [--cluster clustername]",
            Self::ListTopologies => "list-topologies",
            Self::ValidateTopology => {
                "validate-topology [--cluster clustername] | [--path \"path/to/file\"]"
            }
            Self::AuthTest => "auth-test [--cluster clustername] [--u username] [--p password] [--g]",
        }
    }

    /// Short description shown below the usage synopsis.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Version => "Displays gateway version information.",
            Self::CreateMaster => {
                "Persist the master secret to disk. The secret is prompted for\n\
                 unless --master is supplied. --force overwrites an existing secret."
            }
            Self::CreateCert => {
                "Create a self-signed certificate for the gateway identity,\n\
                 protected with the identity passphrase alias or the master secret."
            }
            Self::CreateAlias { .. } => {
                "Create a credential alias for the given cluster, with the value\n\
                 supplied via --value or generated via --generate."
            }
            Self::DeleteAlias { .. } => "Delete a credential alias for the given cluster.",
            Self::ListAliases => "List the credential aliases for the given cluster.",
            Self::Redeploy => "Regenerate the deployment artifact for a topology.",
            Self::ListTopologies => "List the topology descriptor files on disk.",
            Self::ValidateTopology => {
                "Parse and validate a topology descriptor, by cluster name or\n\
                 explicit file path. An explicit --path wins."
            }
            Self::AuthTest => {
                "Authenticate a user against the LDAP directory configured in a\n\
                 topology's authentication provider. --g also checks group lookup,\n\
                 --d prints debug detail on failure."
            }
        }
    }
}

/// Every command the usage listing enumerates, in display order.
const ALL_COMMANDS: [Command; 10] = [
    Command::Version,
    Command::CreateMaster,
    Command::CreateCert,
    Command::CreateAlias {
        name: String::new(),
    },
    Command::DeleteAlias {
        name: String::new(),
    },
    Command::ListAliases,
    Command::Redeploy,
    Command::ListTopologies,
    Command::ValidateTopology,
    Command::AuthTest,
];

const DIVIDER: &str =
    "===============================================================================";

/// Prints usage: the full command listing, or a single command's usage
/// when one was already selected before the abort.
pub fn print_usage(output: &mut Output, selected: Option<&Command>) {
    match selected {
        Some(command) => {
            output.println(format!("gwcli {}", command.usage()));
            output.println(command.description());
        }
        None => {
            output.println("Usage: gwcli COMMAND [options]");
            output.println("where COMMAND is one of:");
            for command in &ALL_COMMANDS {
                output.println(DIVIDER);
                output.println(format!("gwcli {}", command.usage()));
                output.println(command.description());
            }
            output.println(DIVIDER);
        }
    }
}

/// Options shared across commands, collected by the argument scanner.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SharedOptions {
    /// Target cluster (`--cluster` / `--topology`).
    pub cluster: Option<String>,
    /// Explicit value for alias creation (`--value`).
    pub value: Option<String>,
    /// Generate the alias value (`--generate`).
    pub generate: bool,
    /// Overwrite an existing master secret (`--force`).
    pub force: bool,
    /// Debug output on authentication failure (`--d`).
    pub debug: bool,
    /// Explicit descriptor path for validation (`--path`).
    pub path: Option<String>,
    /// Certificate hostname (`--hostname`).
    pub hostname: Option<String>,
    /// Username for the authentication diagnostic (`--u`).
    pub user: Option<String>,
    /// Password for the authentication diagnostic (`--p`).
    pub pass: Option<String>,
    /// Also diagnose group lookup (`--g`).
    pub groups: bool,
    /// Non-interactive master secret (`--master`, or `--value` /
    /// `--generate` while create-master is selected).
    pub master: Option<String>,
}

impl SharedOptions {
    /// The cluster to act on, falling back to the gateway's own scope.
    #[must_use]
    pub fn effective_cluster(&self) -> &str {
        self.cluster.as_deref().unwrap_or(DEFAULT_CLUSTER)
    }
}
