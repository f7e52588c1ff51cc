//! `create-master` command.

use std::fs;
use std::path::Path;

use crate::cli::SharedOptions;
use crate::error::CliResult;
use crate::output::{self, Output};
use crate::services::GatewayServices;

/// Precondition check: refuses to run when the persisted secret would
/// be clobbered without `--force`, or the target is not writable. A
/// refusal prints the reason and skips execution without an error
/// exit.
pub fn validate(options: &SharedOptions, services: &GatewayServices, output: &mut Output) -> bool {
    let master = services.master_service();
    let file = master.master_path();

    if file.is_file() {
        if !options.force {
            output.println(
                "Master secret is already present on disk. Please be aware that overwriting it will require updating other security artifacts. Use --force to overwrite the existing master secret.",
            );
            return false;
        }
        if read_only(&file) {
            output.println(format!(
                "This command requires write permissions on the master secret file: {}",
                file.display()
            ));
            return false;
        }
        return true;
    }

    let dir = master.security_dir();
    if dir.exists() && read_only(dir) {
        output.println(format!(
            "This command requires write permissions on the security directory: {}",
            dir.display()
        ));
        return false;
    }
    true
}

fn read_only(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.permissions().readonly())
}

/// Persists the master secret, prompting twice when it was not given
/// on the command line.
pub fn run(options: &SharedOptions, services: &GatewayServices, output: &mut Output) -> CliResult<()> {
    let secret = match &options.master {
        Some(master) => master.clone(),
        None => {
            let first = output::prompt_password("Enter master secret: ")?;
            let second = output::prompt_password("Enter master secret again: ")?;
            if first != second {
                output.println("Master secrets do not match. Nothing has been persisted.");
                return Ok(());
            }
            first
        }
    };

    services.master_service().persist(&secret, options.force)?;
    output.success("Master secret has been persisted to disk.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    fn services(home: &Path) -> GatewayServices {
        GatewayServices::new(GatewayConfig::new(home))
    }

    #[test]
    fn persists_non_interactive_master() {
        let tmp = tempfile::tempdir().unwrap();
        let services = services(tmp.path());
        let options = SharedOptions {
            master: Some("s3cret".to_string()),
            ..SharedOptions::default()
        };
        let mut output = Output::buffer();

        assert!(validate(&options, &services, &mut output));
        run(&options, &services, &mut output).unwrap();

        assert!(output.stdout().contains("persisted to disk"));
        assert_eq!(services.master_service().read().unwrap().as_str(), "s3cret");
    }

    #[test]
    fn refuses_overwrite_without_force() {
        let tmp = tempfile::tempdir().unwrap();
        let services = services(tmp.path());
        services.master_service().persist("existing", false).unwrap();

        let mut output = Output::buffer();
        assert!(!validate(&SharedOptions::default(), &services, &mut output));
        assert!(output.stdout().contains("Use --force"));
    }

    #[test]
    fn force_allows_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let services = services(tmp.path());
        services.master_service().persist("existing", false).unwrap();

        let options = SharedOptions {
            master: Some("replacement".to_string()),
            force: true,
            ..SharedOptions::default()
        };
        let mut output = Output::buffer();

        assert!(validate(&options, &services, &mut output));
        run(&options, &services, &mut output).unwrap();
        assert_eq!(
            services.master_service().read().unwrap().as_str(),
            "replacement"
        );
    }
}
