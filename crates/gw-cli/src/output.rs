//! Command output handling.
//!
//! All user-facing text goes through [`Output`], which writes to the
//! process streams in normal operation and to in-memory buffers in
//! tests, so command tests can assert on exactly what the operator
//! would see.

use colored::Colorize;

use crate::error::CliResult;

/// Destination for command output.
pub struct Output {
    sink: Sink,
}

enum Sink {
    Stdio,
    Buffer { out: String, err: String },
}

impl Output {
    /// Output writing to stdout/stderr.
    #[must_use]
    pub fn stdio() -> Self {
        Self { sink: Sink::Stdio }
    }

    /// Output capturing into in-memory buffers.
    #[must_use]
    pub fn buffer() -> Self {
        Self {
            sink: Sink::Buffer {
                out: String::new(),
                err: String::new(),
            },
        }
    }

    /// Writes a line to standard output.
    pub fn println(&mut self, line: impl AsRef<str>) {
        match &mut self.sink {
            Sink::Stdio => println!("{}", line.as_ref()),
            Sink::Buffer { out, .. } => {
                out.push_str(line.as_ref());
                out.push('\n');
            }
        }
    }

    /// Writes a line to standard error.
    pub fn eprintln(&mut self, line: impl AsRef<str>) {
        match &mut self.sink {
            Sink::Stdio => eprintln!("{}", line.as_ref()),
            Sink::Buffer { err, .. } => {
                err.push_str(line.as_ref());
                err.push('\n');
            }
        }
    }

    /// Writes a success line with a green marker.
    pub fn success(&mut self, message: &str) {
        let marker = "✓".green().bold();
        self.println(format!("{marker} {message}"));
    }

    /// Captured standard output. Empty when writing to stdio.
    #[must_use]
    pub fn stdout(&self) -> &str {
        match &self.sink {
            Sink::Stdio => "",
            Sink::Buffer { out, .. } => out,
        }
    }

    /// Captured standard error. Empty when writing to stdio.
    #[must_use]
    pub fn stderr(&self) -> &str {
        match &self.sink {
            Sink::Stdio => "",
            Sink::Buffer { err, .. } => err,
        }
    }
}

/// Prompts for a secret without echoing it.
pub fn prompt_password(prompt: &str) -> CliResult<String> {
    Ok(rpassword::prompt_password(prompt)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_captures_streams_separately() {
        let mut output = Output::buffer();
        output.println("to stdout");
        output.eprintln("to stderr");

        assert_eq!(output.stdout(), "to stdout\n");
        assert_eq!(output.stderr(), "to stderr\n");
    }

    #[test]
    fn success_line_contains_message() {
        let mut output = Output::buffer();
        output.success("alias created");
        assert!(output.stdout().contains("alias created"));
    }
}
