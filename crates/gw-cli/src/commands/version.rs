//! `version` command.

use crate::error::CliResult;
use crate::output::Output;

/// Prints tool name and version.
pub fn run(output: &mut Output) -> CliResult<()> {
    output.println(format!("gwcli {}", env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_package_version() {
        let mut output = Output::buffer();
        run(&mut output).unwrap();
        assert!(output.stdout().contains(env!("CARGO_PKG_VERSION")));
    }
}
