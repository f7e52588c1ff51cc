//! Interactive credential prompting.
//!
//! The authentication diagnostic prompts for whichever of username and
//! password was not given on the command line. Prompting is behind a
//! trait so command tests can script it. End-of-input leaves the
//! credential unset, which callers treat as a silent abort; a read
//! error is reported and degrades to an empty credential so the
//! workflow still runs to a visible outcome.

use std::io::{self, BufRead, IsTerminal};

use crate::output::Output;

/// Source of credentials not supplied as options.
pub trait CredentialSource {
    /// Prompts for a username. `None` means input ended.
    fn username(&mut self, output: &mut Output) -> Option<String>;

    /// Prompts for a password. `None` means input ended.
    fn password(&mut self, output: &mut Output) -> Option<String>;
}

/// Credential source reading from the controlling terminal, with a
/// plain stdin fallback for piped input.
pub struct TerminalCredentialSource;

impl CredentialSource for TerminalCredentialSource {
    fn username(&mut self, output: &mut Output) -> Option<String> {
        read_visible_line("Username: ", output)
    }

    fn password(&mut self, output: &mut Output) -> Option<String> {
        if io::stdin().is_terminal() {
            match rpassword::prompt_password("Password: ") {
                Ok(password) => Some(password),
                Err(e) => {
                    output.println(e.to_string());
                    Some(String::new())
                }
            }
        } else {
            read_visible_line("Password: ", output)
        }
    }
}

fn read_visible_line(prompt: &str, output: &mut Output) -> Option<String> {
    output.println(prompt.trim_end());
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        Err(e) => {
            output.println(e.to_string());
            Some(String::new())
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted credential sources for command tests.

    use super::*;

    /// Hands out fixed credentials; `None` scripts end-of-input.
    pub struct StaticCredentialSource {
        username: Option<String>,
        password: Option<String>,
    }

    impl StaticCredentialSource {
        pub fn new(username: Option<&str>, password: Option<&str>) -> Self {
            Self {
                username: username.map(str::to_string),
                password: password.map(str::to_string),
            }
        }
    }

    impl CredentialSource for StaticCredentialSource {
        fn username(&mut self, _output: &mut Output) -> Option<String> {
            self.username.clone()
        }

        fn password(&mut self, _output: &mut Output) -> Option<String> {
            self.password.clone()
        }
    }

    /// Panics when consulted, for asserting a workflow never prompts.
    pub struct RejectingCredentialSource;

    impl CredentialSource for RejectingCredentialSource {
        fn username(&mut self, _output: &mut Output) -> Option<String> {
            panic!("credential source must not be consulted");
        }

        fn password(&mut self, _output: &mut Output) -> Option<String> {
            panic!("credential source must not be consulted");
        }
    }
}
