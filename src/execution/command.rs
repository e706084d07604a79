//! Command building and representation.

use std::collections::HashMap;
use std::path::PathBuf;

/// A shell command line with its execution options.
///
/// The command line is passed to the platform shell untouched; quoting,
/// variable expansion and builtins are the shell's business. Variable
/// syntax follows the platform the command runs on (`$VAR` under POSIX
/// shells, `%VAR%` under `cmd.exe`).
#[derive(Debug, Clone)]
pub struct Command {
    /// The command line to execute.
    pub command_line: String,
    /// Working directory for the child (if any).
    pub execute_in: Option<PathBuf>,
    /// Environment overrides merged over the ambient environment,
    /// visible to the child only.
    pub env: HashMap<String, String>,
    /// Whether to mirror output live while capturing. `None` selects the
    /// platform default.
    pub use_tee: Option<bool>,
}

impl Command {
    /// Create a new command with the given command line.
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
            execute_in: None,
            env: HashMap::new(),
            use_tee: None,
        }
    }

    /// Set the working directory for the child process.
    pub fn execute_in(mut self, dir: impl Into<PathBuf>) -> Self {
        self.execute_in = Some(dir.into());
        self
    }

    /// Add an environment override for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Add multiple environment overrides.
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.env.insert(k.into(), v.into());
        }
        self
    }

    /// Request or suppress live mirroring of output.
    pub fn use_tee(mut self, tee: bool) -> Self {
        self.use_tee = Some(tee);
        self
    }

    /// Resolve the tee flag against the platform default.
    ///
    /// Mirroring defaults to on where the POSIX strategies run and off
    /// elsewhere; Windows capture has no live-tee distinction.
    pub fn tee_enabled(&self) -> bool {
        self.use_tee.unwrap_or(cfg!(unix))
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::new("")
    }
}
