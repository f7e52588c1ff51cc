//! `auth-test` command: the LDAP authentication diagnostic.
//!
//! The workflow chains topology lookup, credential collection,
//! descriptor materialization, the live bind, and the optional
//! group-lookup diagnosis. Every directory or filesystem problem
//! inside the workflow is reported as an operator-facing diagnostic
//! line; the command itself completes normally so partial findings
//! still reach the operator.

use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::path::Path;

use gw_auth_ldap::checker::missing_group_params;
use gw_auth_ldap::descriptor::{
    descriptor_path, materialize_deployment, SUPPORTED_PROVIDER_NAME, SUPPORTED_PROVIDER_ROLE,
};
use gw_auth_ldap::{AuthOutcome, LdapAuthenticator};
use gw_topology::TopologyService;

use crate::cli::SharedOptions;
use crate::credentials::CredentialSource;
use crate::error::CliResult;
use crate::output::Output;

/// Seam between the workflow and the live directory handshake.
pub trait AuthDriver {
    /// Bootstraps from the materialized descriptor and submits the
    /// credentials.
    fn authenticate(
        &self,
        descriptor: &Path,
        username: &str,
        password: &str,
    ) -> impl Future<Output = AuthOutcome>;
}

/// Driver performing a real bind against the configured directory.
pub struct LiveAuthDriver;

impl AuthDriver for LiveAuthDriver {
    async fn authenticate(&self, descriptor: &Path, username: &str, password: &str) -> AuthOutcome {
        match LdapAuthenticator::from_descriptor(descriptor) {
            Ok(authenticator) => authenticator.authenticate(username, password).await,
            Err(e) => AuthOutcome::error(e.to_string()),
        }
    }
}

/// Runs the authentication diagnostic against the selected topology.
pub async fn run<D: AuthDriver>(
    options: &SharedOptions,
    store: &mut dyn TopologyService,
    credentials: &mut dyn CredentialSource,
    driver: &D,
    tmp_base: &Path,
    output: &mut Output,
) -> CliResult<()> {
    if let Err(e) = store.reload() {
        output.println(format!("ERR: {e}"));
        return Ok(());
    }

    let cluster = options.effective_cluster().to_string();
    let Some(topology) = store.find(&cluster) else {
        output.println(format!("ERR: Topology: {cluster} does not exist"));
        return Ok(());
    };

    let Some(provider) = topology.provider(SUPPORTED_PROVIDER_ROLE, SUPPORTED_PROVIDER_NAME)
    else {
        output.println(format!(
            "ERR: This tool currently only works with {SUPPORTED_PROVIDER_NAME} as the authentication provider."
        ));
        output.println(format!(
            "ERR: Please update the topology to use \"{SUPPORTED_PROVIDER_NAME}\" as the authentication provider."
        ));
        return Ok(());
    };

    let username = match &options.user {
        Some(user) => Some(user.clone()),
        None => credentials.username(output),
    };
    let password = match &options.pass {
        Some(pass) => Some(pass.clone()),
        None => credentials.password(output),
    };
    // End-of-input during prompting aborts without a diagnostic.
    let (Some(username), Some(password)) = (username, password) else {
        return Ok(());
    };

    let deployment_root = match materialize_deployment(topology, tmp_base) {
        Ok(root) => root,
        Err(e) => {
            output.println(format!("ERR: {e}"));
            return Ok(());
        }
    };

    let descriptor = descriptor_path(&deployment_root);
    if descriptor.is_file() {
        match driver.authenticate(&descriptor, &username, &password).await {
            AuthOutcome::Authenticated(groups) => {
                output.println("LDAP authentication successful!");
                if groups.is_empty() {
                    output.println(format!("{username} does not belong to any groups"));
                    if options.groups {
                        report_group_lookup(&provider.params, output);
                    }
                } else {
                    for group in &groups {
                        output.println(format!("{username} is a member of: {group}"));
                    }
                }
            }
            AuthOutcome::Failed {
                reason,
                cause,
                trace,
            } => {
                output.println(format!("ERR: Unable to authenticate user: {username}"));
                output.println(reason);
                if let Some(cause) = cause {
                    output.println(cause);
                }
                if options.debug {
                    if let Some(trace) = trace {
                        output.println(trace);
                    }
                } else {
                    output.println("For more info, use --d for debug output.");
                }
            }
            AuthOutcome::Error(message) => output.println(format!("ERR: {message}")),
        }
    } else {
        output.println("ERR: No LDAP authentication config file found in the topology.");
    }

    if let Err(e) = fs::remove_dir_all(&deployment_root) {
        output.println(e.to_string());
        output.println("ERR: Error when attempting to delete temp deployment directory.");
    }
    Ok(())
}

fn report_group_lookup(params: &HashMap<String, String>, output: &mut Output) {
    output.println("You were looking for this user's groups but this user does not belong to any.");
    output.println("Your topology file may be incorrectly configured for group lookup.");

    let missing = missing_group_params(params);
    for key in &missing {
        output.println(format!("Error: {key} is not present in topology"));
    }
    if missing.is_empty() {
        output.println("Some of your topology's param values may be incorrect.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::fake::{RejectingCredentialSource, StaticCredentialSource};
    use gw_auth_ldap::descriptor::{P_AUTHORIZATION_ENABLED, P_URL, P_USER_DN_TEMPLATE};
    use gw_topology::FileTopologyStore;
    use std::collections::BTreeSet;

    /// Driver returning a scripted outcome without touching the
    /// network.
    struct FakeDriver {
        outcome: AuthOutcome,
    }

    impl AuthDriver for FakeDriver {
        async fn authenticate(
            &self,
            _descriptor: &Path,
            _username: &str,
            _password: &str,
        ) -> AuthOutcome {
            self.outcome.clone()
        }
    }

    /// Driver that must never be reached.
    struct UnreachableDriver;

    impl AuthDriver for UnreachableDriver {
        async fn authenticate(
            &self,
            _descriptor: &Path,
            _username: &str,
            _password: &str,
        ) -> AuthOutcome {
            panic!("driver must not be consulted");
        }
    }

    const LDAP_TOPOLOGY: &str = r#"
        [[provider]]
        role = "authentication"
        name = "LdapProvider"

        [provider.params]
        "main.ldapRealm.contextFactory.url" = "ldap://localhost:33389"
        "main.ldapRealm.userDnTemplate" = "uid={0},ou=people,dc=example,dc=com"
    "#;

    fn store_with(home: &Path, name: &str, body: &str) -> FileTopologyStore {
        let topologies = home.join("topologies");
        fs::create_dir_all(&topologies).unwrap();
        fs::write(topologies.join(format!("{name}.toml")), body).unwrap();
        FileTopologyStore::new(topologies, home.join("deployments"))
    }

    fn auth_options(cluster: &str) -> SharedOptions {
        SharedOptions {
            cluster: Some(cluster.to_string()),
            user: Some("alice".to_string()),
            pass: Some("hunter2".to_string()),
            ..SharedOptions::default()
        }
    }

    fn groups(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[tokio::test]
    async fn unknown_topology_reports_and_stops() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_with(tmp.path(), "sales", LDAP_TOPOLOGY);
        let mut output = Output::buffer();

        run(
            &auth_options("marketing"),
            &mut store,
            &mut RejectingCredentialSource,
            &UnreachableDriver,
            tmp.path(),
            &mut output,
        )
        .await
        .unwrap();

        assert!(output
            .stdout()
            .contains("ERR: Topology: marketing does not exist"));
    }

    #[tokio::test]
    async fn unsupported_provider_reports_and_stops() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_with(
            tmp.path(),
            "sales",
            r#"
            [[provider]]
            role = "authentication"
            name = "OtherProvider"
            "#,
        );
        let mut output = Output::buffer();

        run(
            &auth_options("sales"),
            &mut store,
            &mut RejectingCredentialSource,
            &UnreachableDriver,
            tmp.path(),
            &mut output,
        )
        .await
        .unwrap();

        let text = output.stdout();
        assert!(text.contains("only works with LdapProvider"));
        assert!(text.contains("Please update the topology"));
    }

    #[tokio::test]
    async fn end_of_input_aborts_silently() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_with(tmp.path(), "sales", LDAP_TOPOLOGY);
        let options = SharedOptions {
            cluster: Some("sales".to_string()),
            ..SharedOptions::default()
        };
        let mut credentials = StaticCredentialSource::new(None, None);
        let mut output = Output::buffer();

        run(
            &options,
            &mut store,
            &mut credentials,
            &UnreachableDriver,
            tmp.path(),
            &mut output,
        )
        .await
        .unwrap();

        assert!(!output.stdout().contains("ERR:"));
    }

    #[tokio::test]
    async fn success_lists_groups_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_with(tmp.path(), "sales", LDAP_TOPOLOGY);
        let driver = FakeDriver {
            outcome: AuthOutcome::Authenticated(groups(&["admins", "users"])),
        };
        let mut output = Output::buffer();

        run(
            &auth_options("sales"),
            &mut store,
            &mut RejectingCredentialSource,
            &driver,
            tmp.path(),
            &mut output,
        )
        .await
        .unwrap();

        let text = output.stdout();
        assert!(text.contains("LDAP authentication successful!"));
        assert!(text.contains("alice is a member of: admins"));
        assert!(text.contains("alice is a member of: users"));
        assert!(!tmp.path().join("sales_deploy.tmp").exists());
    }

    #[tokio::test]
    async fn empty_groups_with_diagnosis_reports_missing_params() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_with(tmp.path(), "sales", LDAP_TOPOLOGY);
        let driver = FakeDriver {
            outcome: AuthOutcome::Authenticated(BTreeSet::new()),
        };
        let mut options = auth_options("sales");
        options.groups = true;
        let mut output = Output::buffer();

        run(
            &options,
            &mut store,
            &mut RejectingCredentialSource,
            &driver,
            tmp.path(),
            &mut output,
        )
        .await
        .unwrap();

        let text = output.stdout();
        assert!(text.contains("alice does not belong to any groups"));
        assert!(text.contains("may be incorrectly configured for group lookup"));
        // The topology sets url and userDnTemplate only; the
        // authorization key is reported for each checklist slot.
        assert_eq!(
            text.matches(&format!(
                "Error: {P_AUTHORIZATION_ENABLED} is not present in topology"
            ))
            .count(),
            2
        );
        assert!(!text.contains(&format!("Error: {P_URL} is not present")));
        assert!(!text.contains(&format!("Error: {P_USER_DN_TEMPLATE} is not present")));
    }

    #[tokio::test]
    async fn failure_prints_hint_without_debug() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_with(tmp.path(), "sales", LDAP_TOPOLOGY);
        let driver = FakeDriver {
            outcome: AuthOutcome::Failed {
                reason: "unable to authenticate as uid=alice".to_string(),
                cause: Some("invalid credentials".to_string()),
                trace: Some("rc=49 full detail".to_string()),
            },
        };
        let mut output = Output::buffer();

        run(
            &auth_options("sales"),
            &mut store,
            &mut RejectingCredentialSource,
            &driver,
            tmp.path(),
            &mut output,
        )
        .await
        .unwrap();

        let text = output.stdout();
        assert!(text.contains("ERR: Unable to authenticate user: alice"));
        assert!(text.contains("unable to authenticate as uid=alice"));
        assert!(text.contains("invalid credentials"));
        assert!(text.contains("For more info, use --d for debug output."));
        assert!(!text.contains("rc=49"));
        assert!(!text.contains("is a member of"));
        assert!(!tmp.path().join("sales_deploy.tmp").exists());
    }

    #[tokio::test]
    async fn failure_prints_trace_with_debug() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_with(tmp.path(), "sales", LDAP_TOPOLOGY);
        let driver = FakeDriver {
            outcome: AuthOutcome::Failed {
                reason: "unable to authenticate as uid=alice".to_string(),
                cause: None,
                trace: Some("rc=49 full detail".to_string()),
            },
        };
        let mut options = auth_options("sales");
        options.debug = true;
        let mut output = Output::buffer();

        run(
            &options,
            &mut store,
            &mut RejectingCredentialSource,
            &driver,
            tmp.path(),
            &mut output,
        )
        .await
        .unwrap();

        let text = output.stdout();
        assert!(text.contains("rc=49 full detail"));
        assert!(!text.contains("use --d"));
    }

    #[tokio::test]
    async fn disabled_provider_reports_missing_config_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_with(
            tmp.path(),
            "sales",
            r#"
            [[provider]]
            role = "authentication"
            name = "LdapProvider"
            enabled = false
            "#,
        );
        let mut output = Output::buffer();

        run(
            &auth_options("sales"),
            &mut store,
            &mut RejectingCredentialSource,
            &UnreachableDriver,
            tmp.path(),
            &mut output,
        )
        .await
        .unwrap();

        assert!(output
            .stdout()
            .contains("ERR: No LDAP authentication config file found in the topology."));
        assert!(!tmp.path().join("sales_deploy.tmp").exists());
    }

    #[tokio::test]
    async fn failed_materialization_reports_and_leaves_no_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_with(tmp.path(), "sales", LDAP_TOPOLOGY);
        // Occupy the conf slot so the descriptor cannot be written.
        let root = tmp.path().join("sales_deploy.tmp");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("conf"), "in the way").unwrap();
        let mut output = Output::buffer();

        run(
            &auth_options("sales"),
            &mut store,
            &mut RejectingCredentialSource,
            &UnreachableDriver,
            tmp.path(),
            &mut output,
        )
        .await
        .unwrap();

        assert!(output.stdout().contains("ERR:"));
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn connection_error_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_with(tmp.path(), "sales", LDAP_TOPOLOGY);
        let driver = FakeDriver {
            outcome: AuthOutcome::error("unable to reach directory: connection refused"),
        };
        let mut output = Output::buffer();

        run(
            &auth_options("sales"),
            &mut store,
            &mut RejectingCredentialSource,
            &driver,
            tmp.path(),
            &mut output,
        )
        .await
        .unwrap();

        assert!(output
            .stdout()
            .contains("ERR: unable to reach directory: connection refused"));
    }
}
