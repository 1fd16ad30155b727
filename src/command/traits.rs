//! Traits and types for running external commands

use async_trait::async_trait;
use std::ffi::OsStr;
use std::fmt;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program name or path
    pub program: String,
    /// Arguments, passed verbatim (no shell interpretation)
    pub args: Vec<String>,
}

impl CommandLine {
    /// Command line with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append an argument taken from an OS string (e.g. a path), lossily converted
    pub fn os_arg(self, arg: impl AsRef<OsStr>) -> Self {
        let arg = arg.as_ref().to_string_lossy().into_owned();
        self.arg(arg)
    }
}

// Shell-style rendering, for logs and error messages only
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,@+%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Captured result of a finished command
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
    /// Exit code; `None` when terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Whether the command exited with code zero
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external commands and captures their output
///
/// A non-zero exit is not an error at this level; callers inspect
/// [`CommandOutput::exit_code`]. Errors are reserved for failing to run the
/// command at all.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion; `metric_tag` names the latency event for the run
    async fn run(&self, command: &CommandLine, metric_tag: &'static str)
    -> crate::Result<CommandOutput>;
}
