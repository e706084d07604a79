//! Command dispatch and the public entry points.

use std::io;
use std::path::PathBuf;

use tracing::debug;

use super::{Command, ExecutionResult, ExecutionStrategy};
use crate::error::Result;
use crate::sink::TeeSink;

/// Runs commands, selecting a capture strategy per invocation.
///
/// Selection happens once per call from the OS family, the tee flag and
/// the sink's descriptor capability. A descriptor-less sink is not an
/// error; it routes the call onto the pipe strategy.
#[derive(Debug, Default)]
pub struct CommandRunner;

impl CommandRunner {
    /// Create a new command runner.
    pub fn new() -> Self {
        Self
    }

    /// Run a command, mirroring to the process stdout when tee is enabled.
    pub fn run(&self, command: &Command) -> Result<ExecutionResult> {
        let mut sink = io::stdout();
        self.run_with_sink(command, &mut sink)
    }

    /// Run a command, mirroring to `sink` when tee is enabled.
    pub fn run_with_sink(
        &self,
        command: &Command,
        sink: &mut dyn TeeSink,
    ) -> Result<ExecutionResult> {
        debug!(
            command = %command.command_line,
            tee = command.tee_enabled(),
            "running command"
        );

        #[cfg(windows)]
        {
            super::windows::WindowsStrategy.execute(command, sink)
        }

        #[cfg(unix)]
        {
            let strategy: &dyn ExecutionStrategy =
                if command.tee_enabled() && sink.descriptor().is_none() {
                    debug!("sink has no descriptor, falling back to pipe capture");
                    &super::posix::PosixTeeStrategy
                } else {
                    &super::posix::FdRedirectStrategy
                };
            strategy.execute(command, sink)
        }
    }
}

/// Simple one-shot command execution with default options.
pub fn run_command(command_line: &str) -> Result<ExecutionResult> {
    CommandRunner::new().run(&Command::new(command_line))
}

/// Run a command from inside the given directory.
pub fn run_command_in(command_line: &str, dir: impl Into<PathBuf>) -> Result<ExecutionResult> {
    CommandRunner::new().run(&Command::new(command_line).execute_in(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellCaptureError;
    use crate::sink::BufferSink;

    #[test]
    fn test_run_command_echo() {
        let result = run_command("echo hello").unwrap();
        assert_eq!(result.status, 0);
        assert_eq!(result.output, "hello");
    }

    #[test]
    #[cfg(unix)]
    fn test_descriptorless_sink_falls_back_instead_of_failing() {
        let mut sink = BufferSink::new();
        let command = Command::new("echo mirrored").use_tee(true);
        let result = CommandRunner::new()
            .run_with_sink(&command, &mut sink)
            .unwrap();

        assert_eq!(result.status, 0);
        assert_eq!(result.output, "mirrored");
        assert_eq!(sink.contents(), "mirrored\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_descriptor_sink_takes_fast_path() {
        use std::io::{Read, Seek, SeekFrom};

        let mut sink = tempfile::tempfile().unwrap();
        let command = Command::new("echo mirrored").use_tee(true);
        let result = CommandRunner::new()
            .run_with_sink(&command, &mut sink)
            .unwrap();

        assert_eq!(result.output, "mirrored");

        sink.seek(SeekFrom::Start(0)).unwrap();
        let mut mirrored = String::new();
        sink.read_to_string(&mut mirrored).unwrap();
        assert_eq!(mirrored, "mirrored\n");
    }

    #[test]
    fn test_sink_untouched_without_tee() {
        let mut sink = BufferSink::new();
        let command = Command::new("echo quiet").use_tee(false);
        let result = CommandRunner::new()
            .run_with_sink(&command, &mut sink)
            .unwrap();

        assert_eq!(result.output, "quiet");
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn test_bad_working_directory_is_spawn_error() {
        let command = Command::new("echo hi")
            .use_tee(false)
            .execute_in("/definitely/not/a/directory");
        let err = CommandRunner::new().run(&command).unwrap_err();

        assert!(matches!(err, ShellCaptureError::Spawn(_)));
    }

    #[test]
    fn test_run_command_in() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("probe"), "here").unwrap();

        #[cfg(unix)]
        let line = "cat probe";
        #[cfg(windows)]
        let line = "type probe";

        let result = run_command_in(line, dir.path()).unwrap();
        assert_eq!(result.status, 0);
        assert_eq!(result.output, "here");
    }
}
