//! Windows execution strategy.

use std::io::Read;
use std::process::Stdio;
use std::time::Instant;

use tracing::debug;

use super::{
    status_code, trim_trailing_newline, Command, ExecutionResult, ExecutionStrategy,
    READ_BUFFER_SIZE,
};
use crate::error::{Result, ShellCaptureError};
use crate::sink::TeeSink;

/// The command processor every command line goes through.
const SHELL: &str = "cmd.exe";

/// Pipe capture through `cmd.exe /c`.
///
/// `%VAR%` expansion follows the platform convention; nothing translates
/// variable syntax between shell families. Capture on this family has no
/// live-tee distinction, so the sink is left untouched.
#[derive(Debug, Default)]
pub struct WindowsStrategy;

impl ExecutionStrategy for WindowsStrategy {
    fn execute(&self, command: &Command, _sink: &mut dyn TeeSink) -> Result<ExecutionResult> {
        let start = Instant::now();

        let mut cmd = std::process::Command::new(SHELL);
        cmd.arg("/c").arg(&command.command_line);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        if let Some(dir) = &command.execute_in {
            cmd.current_dir(dir);
        }
        cmd.envs(&command.env);

        let mut child = cmd.spawn().map_err(ShellCaptureError::Spawn)?;
        debug!(pid = child.id(), "spawned cmd.exe with pipe capture");

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ShellCaptureError::Capture("stderr pipe missing".into()))?;
        // Both pipes are bounded; stderr drains on its own thread or an
        // error-heavy child deadlocks against a full buffer.
        let stderr_drain = std::thread::spawn(move || {
            let mut chunk = Vec::new();
            let _ = stderr.read_to_end(&mut chunk);
            chunk
        });

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ShellCaptureError::Capture("stdout pipe missing".into()))?;
        let mut captured = Vec::new();
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            match stdout.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => captured.extend_from_slice(&buf[..n]),
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| ShellCaptureError::Capture("stderr drain thread panicked".into()))?;
        captured.extend_from_slice(&stderr_bytes);

        let status = child.wait()?;

        let output = trim_trailing_newline(String::from_utf8_lossy(&captured).into_owned());
        Ok(ExecutionResult::new(
            status_code(status),
            output,
            start.elapsed(),
        ))
    }
}
