//! Descriptor-driven LDAP authentication.
//!
//! The authenticator is bootstrapped from a materialized security
//! descriptor, performs a simple bind with the user DN template, and,
//! when authorization is enabled, resolves the user's groups. The
//! directory connection is released on every exit path of
//! [`LdapAuthenticator::authenticate`], including error paths.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};

use crate::descriptor::{
    SecurityDescriptor, P_AUTHORIZATION_ENABLED, P_GROUP_OBJECT_CLASS, P_MEMBER_ATTRIBUTE,
    P_MEMBER_ATTRIBUTE_VALUE_TEMPLATE, P_SEARCH_BASE, P_SYSTEM_PASSWORD, P_SYSTEM_USERNAME,
    P_URL, P_USER_DN_TEMPLATE,
};
use crate::error::{AuthError, AuthResult};

const INVALID_CREDENTIALS_RC: u32 = 49;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of driving one authentication attempt.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// The bind succeeded; the set holds the user's groups (possibly
    /// empty).
    Authenticated(BTreeSet<String>),

    /// The directory rejected the credentials.
    Failed {
        /// Human-readable failure reason.
        reason: String,
        /// Underlying cause reported by the directory, when present.
        cause: Option<String>,
        /// Full failure detail for debug output.
        trace: Option<String>,
    },

    /// The attempt could not be carried out (connection, descriptor,
    /// protocol).
    Error(String),
}

impl AuthOutcome {
    /// Creates an error outcome.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

/// Authentication settings extracted from a security descriptor.
#[derive(Debug, Clone)]
pub struct LdapAuthConfig {
    url: String,
    user_dn_template: String,
    authorization_enabled: bool,
    search_base: Option<String>,
    group_object_class: String,
    member_attribute: String,
    member_attribute_value_template: Option<String>,
    system_username: Option<String>,
    system_password: Option<String>,
}

impl LdapAuthConfig {
    /// Extracts the configuration from a descriptor, requiring the
    /// directory URL and user DN template.
    pub fn from_descriptor(descriptor: &SecurityDescriptor) -> AuthResult<Self> {
        let url = descriptor
            .param(P_URL)
            .ok_or_else(|| AuthError::missing(P_URL))?
            .to_string();
        let user_dn_template = descriptor
            .param(P_USER_DN_TEMPLATE)
            .ok_or_else(|| AuthError::missing(P_USER_DN_TEMPLATE))?
            .to_string();

        Ok(Self {
            url,
            user_dn_template,
            authorization_enabled: descriptor
                .param(P_AUTHORIZATION_ENABLED)
                .is_some_and(|v| v.eq_ignore_ascii_case("true")),
            search_base: descriptor.param(P_SEARCH_BASE).map(str::to_string),
            group_object_class: descriptor
                .param(P_GROUP_OBJECT_CLASS)
                .unwrap_or("groupOfNames")
                .to_string(),
            member_attribute: descriptor
                .param(P_MEMBER_ATTRIBUTE)
                .unwrap_or("member")
                .to_string(),
            member_attribute_value_template: descriptor
                .param(P_MEMBER_ATTRIBUTE_VALUE_TEMPLATE)
                .map(str::to_string),
            system_username: descriptor.param(P_SYSTEM_USERNAME).map(str::to_string),
            system_password: descriptor.param(P_SYSTEM_PASSWORD).map(str::to_string),
        })
    }

    /// Expands the user DN template for a username.
    #[must_use]
    pub fn user_dn(&self, username: &str) -> String {
        self.user_dn_template.replace("{0}", username)
    }

    /// Whether group lookup runs after a successful bind.
    #[must_use]
    pub const fn authorization_enabled(&self) -> bool {
        self.authorization_enabled
    }

    fn group_filter(&self, user_dn: &str) -> String {
        let member_value = match &self.member_attribute_value_template {
            Some(template) => template.replace("{0}", user_dn),
            None => user_dn.to_string(),
        };
        format!(
            "(&(objectClass={})({}={}))",
            self.group_object_class,
            self.member_attribute,
            escape_filter_value(&member_value)
        )
    }
}

/// Drives a live authentication handshake against a directory.
#[derive(Debug, Clone)]
pub struct LdapAuthenticator {
    config: LdapAuthConfig,
}

impl LdapAuthenticator {
    /// Bootstraps an authenticator from a materialized descriptor file.
    pub fn from_descriptor(path: &Path) -> AuthResult<Self> {
        let descriptor = SecurityDescriptor::load(path)?;
        let config = LdapAuthConfig::from_descriptor(&descriptor)?;
        Ok(Self { config })
    }

    /// Submits credentials and determines the outcome. The connection
    /// is unbound before returning, whatever the outcome.
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthOutcome {
        let settings = LdapConnSettings::new().set_conn_timeout(CONNECT_TIMEOUT);
        let (conn, mut ldap) =
            match LdapConnAsync::with_settings(settings, &self.config.url).await {
                Ok(pair) => pair,
                Err(e) => return AuthOutcome::error(format!("unable to reach directory: {e}")),
            };

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(error = %e, "LDAP connection driver error");
            }
        });

        let outcome = self.bind_and_lookup(&mut ldap, username, password).await;
        // Scoped release: the subject is logged out on every exit path.
        if let Err(e) = ldap.unbind().await {
            tracing::debug!(error = %e, "unbind after authentication attempt failed");
        }
        outcome
    }

    async fn bind_and_lookup(
        &self,
        ldap: &mut Ldap,
        username: &str,
        password: &str,
    ) -> AuthOutcome {
        let user_dn = self.config.user_dn(username);
        tracing::debug!(user_dn = %user_dn, "attempting bind");

        let bind = match ldap.simple_bind(&user_dn, password).await {
            Ok(result) => result,
            Err(e) => return AuthOutcome::error(e.to_string()),
        };

        if let Err(e) = bind.success() {
            return match e {
                ldap3::LdapError::LdapResult { result }
                    if result.rc == INVALID_CREDENTIALS_RC =>
                {
                    AuthOutcome::Failed {
                        reason: format!("unable to authenticate as {user_dn}"),
                        cause: (!result.text.is_empty()).then(|| result.text.clone()),
                        trace: Some(format!("{result:?}")),
                    }
                }
                other => AuthOutcome::error(other.to_string()),
            };
        }

        if !self.config.authorization_enabled {
            return AuthOutcome::Authenticated(BTreeSet::new());
        }

        match self.lookup_groups(ldap, &user_dn).await {
            Ok(groups) => AuthOutcome::Authenticated(groups),
            Err(e) => {
                // Group lookup problems must not mask a successful bind.
                tracing::warn!(error = %e, "group lookup failed");
                AuthOutcome::Authenticated(BTreeSet::new())
            }
        }
    }

    async fn lookup_groups(
        &self,
        ldap: &mut Ldap,
        user_dn: &str,
    ) -> AuthResult<BTreeSet<String>> {
        let Some(search_base) = self.config.search_base.as_deref() else {
            return Ok(BTreeSet::new());
        };

        // Group search runs under the service account when one is
        // configured; the user bind may not have search rights.
        if let (Some(system_dn), Some(system_password)) = (
            self.config.system_username.as_deref(),
            self.config.system_password.as_deref(),
        ) {
            ldap.simple_bind(system_dn, system_password)
                .await?
                .success()
                .map_err(|e| AuthError::Search(format!("system bind failed: {e}")))?;
        }

        let filter = self.config.group_filter(user_dn);
        let (entries, _result) = ldap
            .search(search_base, Scope::Subtree, &filter, vec!["cn"])
            .await?
            .success()
            .map_err(|e| AuthError::Search(e.to_string()))?;

        let groups = entries
            .into_iter()
            .filter_map(|entry| {
                let entry = SearchEntry::construct(entry);
                entry.attrs.get("cn").and_then(|v| v.first()).cloned()
            })
            .collect();
        Ok(groups)
    }
}

/// Escapes special characters in an LDAP filter value.
fn escape_filter_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\5c"),
            '*' => result.push_str("\\2a"),
            '(' => result.push_str("\\28"),
            ')' => result.push_str("\\29"),
            '\0' => result.push_str("\\00"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn descriptor_with(params: &[(&str, &str)]) -> SecurityDescriptor {
        SecurityDescriptor {
            topology: "sales".to_string(),
            role: "authentication".to_string(),
            name: "LdapProvider".to_string(),
            params: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn config_requires_url_and_dn_template() {
        let err = LdapAuthConfig::from_descriptor(&descriptor_with(&[])).unwrap_err();
        assert!(matches!(err, AuthError::MissingParameter(_)));

        let err = LdapAuthConfig::from_descriptor(&descriptor_with(&[(
            P_URL,
            "ldap://localhost:33389",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains(P_USER_DN_TEMPLATE));
    }

    #[test]
    fn user_dn_template_expansion() {
        let config = LdapAuthConfig::from_descriptor(&descriptor_with(&[
            (P_URL, "ldap://localhost:33389"),
            (P_USER_DN_TEMPLATE, "uid={0},ou=people,dc=example,dc=com"),
        ]))
        .unwrap();

        assert_eq!(
            config.user_dn("alice"),
            "uid=alice,ou=people,dc=example,dc=com"
        );
        assert!(!config.authorization_enabled());
    }

    #[test]
    fn group_filter_uses_template_and_escapes() {
        let config = LdapAuthConfig::from_descriptor(&descriptor_with(&[
            (P_URL, "ldap://localhost:33389"),
            (P_USER_DN_TEMPLATE, "uid={0},ou=people,dc=example,dc=com"),
            (P_AUTHORIZATION_ENABLED, "true"),
            (P_GROUP_OBJECT_CLASS, "groupOfNames"),
            (P_MEMBER_ATTRIBUTE, "member"),
        ]))
        .unwrap();

        assert!(config.authorization_enabled());
        let filter = config.group_filter("uid=a(b),ou=people,dc=example,dc=com");
        assert!(filter.starts_with("(&(objectClass=groupOfNames)(member="));
        assert!(filter.contains("\\28b\\29"));
    }

    #[test]
    fn authorization_flag_is_case_insensitive() {
        let config = LdapAuthConfig::from_descriptor(&descriptor_with(&[
            (P_URL, "ldap://localhost:33389"),
            (P_USER_DN_TEMPLATE, "uid={0}"),
            (P_AUTHORIZATION_ENABLED, "True"),
        ]))
        .unwrap();
        assert!(config.authorization_enabled());
    }

    #[test]
    fn filter_value_escaping() {
        assert_eq!(escape_filter_value("plain"), "plain");
        assert_eq!(escape_filter_value("a*b"), "a\\2ab");
        assert_eq!(escape_filter_value("a\\b"), "a\\5cb");
    }
}
