//! Terminal host for the command-line interface.
//!
//! The selection is a file (or stdin when it is piped), displayed output goes
//! to stdout or an output file, and notices are written to stderr.

use crate::error::Result;
use crate::host::{Host, NoticeKind};
use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;

/// Host backed by files and the standard streams.
#[derive(Debug, Default)]
pub struct TerminalHost {
    /// File holding the selection (stdin if not specified)
    input: Option<PathBuf>,
    /// Write replacements back into the input file
    in_place: bool,
    /// Output file (stdout if not specified)
    output: Option<PathBuf>,
    /// Suppress informational notices
    quiet: bool,
}

impl TerminalHost {
    pub fn new(input: Option<PathBuf>) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn in_place(mut self, enable: bool) -> Self {
        self.in_place = enable;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn write_output(&self, text: &str) -> Result<()> {
        match self.output {
            Some(ref path) => std::fs::write(path, text)?,
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

impl Host for TerminalHost {
    fn selected_text(&mut self) -> Result<Option<String>> {
        if let Some(ref path) = self.input {
            return Ok(Some(std::fs::read_to_string(path)?));
        }

        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Ok(None);
        }

        let mut text = String::new();
        stdin.lock().read_to_string(&mut text)?;
        Ok(Some(text))
    }

    fn replace_selected_text(&mut self, text: &str) -> Result<()> {
        match (self.in_place, self.input.as_ref()) {
            (true, Some(path)) => std::fs::write(path, text)?,
            _ => self.write_output(text)?,
        }
        Ok(())
    }

    fn notify(&mut self, kind: NoticeKind, message: &str, detail: Option<&str>) {
        if self.quiet && kind == NoticeKind::Info {
            return;
        }
        eprintln!("{}: {}", kind, message);
        if let Some(detail) = detail {
            eprintln!("  {}", detail);
        }
    }

    fn display_output(&mut self, text: &str) -> Result<()> {
        self.write_output(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_selection_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippet.js");
        std::fs::write(&path, "let a = 1;").unwrap();

        let mut host = TerminalHost::new(Some(path));
        assert_eq!(host.selected_text().unwrap().as_deref(), Some("let a = 1;"));
    }

    #[test]
    fn test_replace_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippet.js");
        std::fs::write(&path, "var1").unwrap();

        let mut host = TerminalHost::new(Some(path.clone())).in_place(true);
        host.replace_selected_text("original").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_replace_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.js");
        let output = dir.path().join("out.js");
        std::fs::write(&input, "var1").unwrap();

        let mut host = TerminalHost::new(Some(input.clone())).with_output(Some(output.clone()));
        host.replace_selected_text("original").unwrap();

        assert_eq!(std::fs::read_to_string(&input).unwrap(), "var1");
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "original");
    }
}
