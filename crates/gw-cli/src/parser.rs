//! Argument scanner.
//!
//! A single left-to-right pass with one token of lookahead. Command
//! tokens select the command; the last one seen wins. Option tokens
//! accumulate into [`SharedOptions`] and are shared across commands,
//! so an option is accepted even when the selected command ignores it.

use uuid::Uuid;

use crate::cli::{Command, SharedOptions};

/// Result of scanning an argument vector.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The scan completed; dispatch on `command` with `options`.
    Ready {
        /// Selected command, if any token selected one.
        command: Option<Command>,
        /// Accumulated options.
        options: SharedOptions,
    },
    /// The scan aborted to usage output.
    Usage {
        /// Command selected before the abort, for command-specific
        /// usage text.
        selected: Option<Command>,
    },
}

/// Scans an argument vector (without the program name).
#[must_use]
pub fn parse(args: &[String]) -> ParseOutcome {
    if args.is_empty() {
        return ParseOutcome::Usage { selected: None };
    }

    let mut command: Option<Command> = None;
    let mut options = SharedOptions::default();
    let mut i = 0;

    while i < args.len() {
        let next = args.get(i + 1).map(String::as_str);
        match args[i].as_str() {
            "version" => command = Some(Command::Version),
            "create-master" => {
                command = Some(Command::CreateMaster);
                // A --generate seen earlier in the vector now applies
                // to the master secret.
                if options.generate {
                    options.generate = false;
                    options.master = Some(Uuid::new_v4().to_string());
                }
                if next == Some("--help") {
                    return ParseOutcome::Usage { selected: command };
                }
            }
            "create-cert" => {
                command = Some(Command::CreateCert);
                if next == Some("--help") {
                    return ParseOutcome::Usage { selected: command };
                }
            }
            "create-alias" => match next {
                Some(name) if name != "--help" => {
                    command = Some(Command::CreateAlias {
                        name: name.to_string(),
                    });
                    i += 1;
                }
                _ => {
                    return ParseOutcome::Usage {
                        selected: Some(Command::CreateAlias {
                            name: String::new(),
                        }),
                    }
                }
            },
            "delete-alias" => match next {
                Some(name) if name != "--help" => {
                    command = Some(Command::DeleteAlias {
                        name: name.to_string(),
                    });
                    i += 1;
                }
                _ => {
                    return ParseOutcome::Usage {
                        selected: Some(Command::DeleteAlias {
                            name: String::new(),
                        }),
                    }
                }
            },
            "list-alias" => command = Some(Command::ListAliases),
            "redeploy" => command = Some(Command::Redeploy),
            "list-topologies" => command = Some(Command::ListTopologies),
            "validate-topology" => {
                if next.is_none() {
                    return ParseOutcome::Usage {
                        selected: Some(Command::ValidateTopology),
                    };
                }
                command = Some(Command::ValidateTopology);
            }
            "auth-test" => {
                if next.is_none() {
                    return ParseOutcome::Usage {
                        selected: Some(Command::AuthTest),
                    };
                }
                command = Some(Command::AuthTest);
            }
            "--value" => {
                let Some(value) = option_value(next) else {
                    return ParseOutcome::Usage { selected: command };
                };
                options.value = Some(value.to_string());
                // While create-master is selected the value doubles as
                // the non-interactive master secret.
                if command == Some(Command::CreateMaster) {
                    options.master = Some(value.to_string());
                }
                i += 1;
            }
            "--cluster" | "--topology" => {
                let Some(value) = option_value(next) else {
                    return ParseOutcome::Usage { selected: command };
                };
                options.cluster = Some(value.to_string());
                i += 1;
            }
            "--path" => {
                let Some(value) = option_value(next) else {
                    return ParseOutcome::Usage { selected: command };
                };
                options.path = Some(value.to_string());
                i += 1;
            }
            "--hostname" => {
                let Some(value) = option_value(next) else {
                    return ParseOutcome::Usage { selected: command };
                };
                options.hostname = Some(value.to_string());
                i += 1;
            }
            "--master" => {
                let Some(value) = option_value(next) else {
                    return ParseOutcome::Usage { selected: command };
                };
                options.master = Some(value.to_string());
                i += 1;
            }
            "--generate" => {
                if command == Some(Command::CreateMaster) {
                    options.master = Some(Uuid::new_v4().to_string());
                } else {
                    options.generate = true;
                }
            }
            "--force" => options.force = true,
            "--d" => options.debug = true,
            "--g" => options.groups = true,
            "--u" => {
                let Some(value) = next else {
                    return ParseOutcome::Usage { selected: command };
                };
                options.user = Some(value.to_string());
                i += 1;
            }
            "--p" => {
                let Some(value) = next else {
                    return ParseOutcome::Usage { selected: command };
                };
                options.pass = Some(value.to_string());
                i += 1;
            }
            "--help" => return ParseOutcome::Usage { selected: command },
            _ => return ParseOutcome::Usage { selected: command },
        }
        i += 1;
    }

    ParseOutcome::Ready { command, options }
}

/// Lookahead value for a value-taking option. Absent tokens and tokens
/// that look like another option abort to usage.
fn option_value(next: Option<&str>) -> Option<&str> {
    next.filter(|v| !v.starts_with('-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_string()).collect()
    }

    fn ready(tokens: &[&str]) -> (Option<Command>, SharedOptions) {
        match parse(&args(tokens)) {
            ParseOutcome::Ready { command, options } => (command, options),
            ParseOutcome::Usage { selected } => {
                panic!("expected ready outcome, got usage for {selected:?}")
            }
        }
    }

    #[test]
    fn empty_args_abort_to_usage() {
        assert_eq!(parse(&[]), ParseOutcome::Usage { selected: None });
    }

    #[test]
    fn last_command_token_wins() {
        let (command, _) = ready(&["version", "list-topologies"]);
        assert_eq!(command, Some(Command::ListTopologies));
    }

    #[test]
    fn alias_commands_consume_the_name() {
        let (command, options) = ready(&["create-alias", "db-pass", "--cluster", "sales"]);
        assert_eq!(
            command,
            Some(Command::CreateAlias {
                name: "db-pass".to_string()
            })
        );
        assert_eq!(options.cluster.as_deref(), Some("sales"));

        let (command, _) = ready(&["delete-alias", "db-pass"]);
        assert_eq!(
            command,
            Some(Command::DeleteAlias {
                name: "db-pass".to_string()
            })
        );
    }

    #[test]
    fn alias_without_name_aborts_with_command_usage() {
        match parse(&args(&["create-alias"])) {
            ParseOutcome::Usage { selected } => {
                assert!(matches!(selected, Some(Command::CreateAlias { .. })));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        match parse(&args(&["create-alias", "--help"])) {
            ParseOutcome::Usage { selected } => {
                assert!(matches!(selected, Some(Command::CreateAlias { .. })));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn bare_auth_test_and_validate_topology_abort() {
        assert_eq!(
            parse(&args(&["auth-test"])),
            ParseOutcome::Usage {
                selected: Some(Command::AuthTest)
            }
        );
        assert_eq!(
            parse(&args(&["validate-topology"])),
            ParseOutcome::Usage {
                selected: Some(Command::ValidateTopology)
            }
        );
        // With any following token the command is accepted.
        let (command, options) = ready(&["auth-test", "--g"]);
        assert_eq!(command, Some(Command::AuthTest));
        assert!(options.groups);
    }

    #[test]
    fn value_options_reject_flag_shaped_values() {
        for tokens in [
            &["create-alias", "a", "--value"][..],
            &["create-alias", "a", "--value", "--cluster"][..],
            &["redeploy", "--cluster"][..],
            &["validate-topology", "--path", "--cluster"][..],
            &["create-cert", "--hostname"][..],
            &["create-master", "--master"][..],
            &["create-master", "--master", "--force"][..],
        ] {
            assert!(
                matches!(parse(&args(tokens)), ParseOutcome::Usage { .. }),
                "expected usage abort for {tokens:?}"
            );
        }
    }

    #[test]
    fn value_doubles_as_master_for_create_master() {
        let (_, options) = ready(&["create-master", "--value", "s3cret"]);
        assert_eq!(options.value.as_deref(), Some("s3cret"));
        assert_eq!(options.master.as_deref(), Some("s3cret"));

        // Without create-master selected only the value is written.
        let (_, options) = ready(&["create-alias", "a", "--value", "s3cret"]);
        assert_eq!(options.value.as_deref(), Some("s3cret"));
        assert_eq!(options.master, None);
    }

    #[test]
    fn generate_is_master_generation_only_under_create_master() {
        let (_, options) = ready(&["create-master", "--generate"]);
        assert!(!options.generate);
        let master = options.master.expect("generated master");
        assert!(Uuid::parse_str(&master).is_ok());

        let (_, options) = ready(&["create-alias", "a", "--generate"]);
        assert!(options.generate);
        assert_eq!(options.master, None);
    }

    #[test]
    fn generate_before_create_master_still_generates_a_master() {
        let (_, options) = ready(&["--generate", "create-master"]);
        assert!(!options.generate);
        assert!(options.master.is_some());
    }

    #[test]
    fn generated_masters_are_unique_per_invocation() {
        let (_, first) = ready(&["create-master", "--generate"]);
        let (_, second) = ready(&["create-master", "--generate"]);
        assert_ne!(first.master, second.master);
    }

    #[test]
    fn help_anywhere_aborts_with_selected_command() {
        assert_eq!(
            parse(&args(&["--help"])),
            ParseOutcome::Usage { selected: None }
        );
        assert_eq!(
            parse(&args(&["list-alias", "--help"])),
            ParseOutcome::Usage {
                selected: Some(Command::ListAliases)
            }
        );
    }

    #[test]
    fn unknown_token_aborts_to_usage() {
        assert_eq!(
            parse(&args(&["frobnicate"])),
            ParseOutcome::Usage { selected: None }
        );
    }

    #[test]
    fn recognized_flags_without_command_complete_the_scan() {
        let (command, options) = ready(&["--force"]);
        assert_eq!(command, None);
        assert!(options.force);
    }

    #[test]
    fn credentials_accept_flag_shaped_values() {
        let (_, options) = ready(&["auth-test", "--u", "alice", "--p", "--secret--"]);
        assert_eq!(options.user.as_deref(), Some("alice"));
        assert_eq!(options.pass.as_deref(), Some("--secret--"));
    }
}
