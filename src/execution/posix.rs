//! POSIX execution strategies.
//!
//! Both strategies hand the command line to `/bin/sh -c` and capture
//! combined stdout+stderr; they differ in the capture mechanism:
//!
//! - [`PosixTeeStrategy`] reads a pipe shared by both child streams and
//!   works with any sink, descriptor-backed or not.
//! - [`FdRedirectStrategy`] points the child's streams at a temp file
//!   descriptor and reads the file back, the fast path when mirroring is
//!   off or can target a real descriptor.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::fd::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd};
use std::process::Stdio;
use std::time::Instant;

use tracing::{debug, trace};

use super::{
    status_code, trim_trailing_newline, Command, ExecutionResult, ExecutionStrategy,
    READ_BUFFER_SIZE,
};
use crate::error::{Result, ShellCaptureError};
use crate::sink::TeeSink;

/// The shell every command line goes through.
const SHELL: &str = "/bin/sh";

/// Pipe-based capture with an incremental drain loop and optional live
/// mirroring to the sink.
#[derive(Debug, Default)]
pub struct PosixTeeStrategy;

/// Descriptor redirection onto a private temp file.
#[derive(Debug, Default)]
pub struct FdRedirectStrategy;

/// Shell invocation with the command's options applied to the child only.
///
/// Environment overrides and the working directory are spawn parameters;
/// the parent's ambient state is never touched.
fn shell_command(line: &str, options: &Command) -> std::process::Command {
    let mut cmd = std::process::Command::new(SHELL);
    cmd.arg("-c").arg(line);
    cmd.stdin(Stdio::null());
    if let Some(dir) = &options.execute_in {
        cmd.current_dir(dir);
    }
    cmd.envs(&options.env);
    cmd
}

/// Create the pipe both child streams write into.
///
/// Sharing one write end is what merges stderr into stdout at the OS
/// level, so interleaving is whatever order the OS delivered.
fn merged_pipe() -> io::Result<(File, OwnedFd)> {
    let mut fds = [0 as libc::c_int; 2];
    if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: pipe() handed us two freshly created descriptors we now own.
    let reader = unsafe { OwnedFd::from_raw_fd(fds[0]) };
    let writer = unsafe { OwnedFd::from_raw_fd(fds[1]) };

    // Keep the read end out of the child; the write end is re-duped onto
    // the child's stdio at spawn time.
    if unsafe { libc::fcntl(reader.as_raw_fd(), libc::F_SETFD, libc::FD_CLOEXEC) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok((File::from(reader), writer))
}

impl ExecutionStrategy for PosixTeeStrategy {
    fn execute(&self, command: &Command, sink: &mut dyn TeeSink) -> Result<ExecutionResult> {
        let start = Instant::now();
        let (mut reader, writer) = merged_pipe()?;

        let mut cmd = shell_command(&command.command_line, command);
        cmd.stdout(Stdio::from(writer.try_clone()?));
        cmd.stderr(Stdio::from(writer));

        let mut child = cmd.spawn().map_err(ShellCaptureError::Spawn)?;
        // The Command still holds our copies of the write end; dropping it
        // is what lets the drain loop see EOF once the child exits.
        drop(cmd);
        debug!(pid = child.id(), "spawned shell with pipe capture");

        // Drain while the child runs. Waiting for exit first would deadlock
        // as soon as the child fills the pipe buffer.
        let tee = command.tee_enabled();
        let mut captured = Vec::new();
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    captured.extend_from_slice(&buf[..n]);
                    if tee {
                        // Mirroring is best-effort; a failing sink must not
                        // abort capture.
                        let _ = sink.write_all(&buf[..n]);
                        let _ = sink.flush();
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let status = child.wait()?;
        trace!(bytes = captured.len(), "pipe drained");

        let output = trim_trailing_newline(String::from_utf8_lossy(&captured).into_owned());
        Ok(ExecutionResult::new(
            status_code(status),
            output,
            start.elapsed(),
        ))
    }
}

impl ExecutionStrategy for FdRedirectStrategy {
    fn execute(&self, command: &Command, sink: &mut dyn TeeSink) -> Result<ExecutionResult> {
        if command.tee_enabled() {
            execute_mirrored(command, sink)
        } else {
            execute_captured(command)
        }
    }
}

/// Exclusive capture: both child streams land in a private temp file and
/// nothing reaches the parent's real stdout or stderr.
fn execute_captured(command: &Command) -> Result<ExecutionResult> {
    let start = Instant::now();
    let mut capture = tempfile::tempfile()?;

    let mut cmd = shell_command(&command.command_line, command);
    cmd.stdout(Stdio::from(capture.try_clone()?));
    cmd.stderr(Stdio::from(capture.try_clone()?));

    let mut child = cmd.spawn().map_err(ShellCaptureError::Spawn)?;
    drop(cmd);
    debug!(pid = child.id(), "spawned shell with descriptor redirection");

    let status = child.wait()?;

    // The child's descriptors shared our file offset; rewind before the
    // read-back. The file is delete-on-close.
    capture.seek(SeekFrom::Start(0))?;
    let mut captured = Vec::new();
    capture.read_to_end(&mut captured)?;

    let output = trim_trailing_newline(String::from_utf8_lossy(&captured).into_owned());
    Ok(ExecutionResult::new(
        status_code(status),
        output,
        start.elapsed(),
    ))
}

/// Mirrored capture: `tee` duplicates the merged output onto the sink's
/// descriptor and a log file. The command's own exit status travels
/// through a status file, since the pipeline status would be tee's.
fn execute_mirrored(command: &Command, sink: &mut dyn TeeSink) -> Result<ExecutionResult> {
    let raw = sink
        .descriptor()
        .ok_or(ShellCaptureError::DescriptorUnavailable)?;
    let start = Instant::now();

    let log = tempfile::NamedTempFile::new()?;
    let sts = tempfile::NamedTempFile::new()?;
    let pipeline = format!(
        "( {} ; echo $? > '{}' ) 2>&1 | tee '{}'",
        command.command_line,
        sts.path().display(),
        log.path().display(),
    );

    // SAFETY: the sink contract keeps the descriptor open while the sink
    // is borrowed, which outlives the child.
    let dest = unsafe { BorrowedFd::borrow_raw(raw) };

    let mut cmd = shell_command(&pipeline, command);
    cmd.stdout(Stdio::from(dest.try_clone_to_owned()?));
    cmd.stderr(Stdio::from(dest.try_clone_to_owned()?));

    let mut child = cmd.spawn().map_err(ShellCaptureError::Spawn)?;
    drop(cmd);
    debug!(pid = child.id(), "spawned tee pipeline");

    let pipeline_status = child.wait()?;

    let captured = std::fs::read(log.path())?;
    let status = std::fs::read_to_string(sts.path())?
        .trim()
        .parse::<i32>()
        .unwrap_or_else(|_| status_code(pipeline_status));
    trace!(bytes = captured.len(), status, "tee pipeline finished");

    let output = trim_trailing_newline(String::from_utf8_lossy(&captured).into_owned());
    Ok(ExecutionResult::new(status, output, start.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::BufferSink;

    #[test]
    fn test_merged_pipe_roundtrip() {
        let (mut reader, writer) = merged_pipe().unwrap();
        let mut write_file = File::from(writer);
        write_file.write_all(b"ping").unwrap();
        drop(write_file);

        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        assert_eq!(text, "ping");
    }

    #[test]
    fn test_shell_command_shape() {
        let options = Command::new("echo hi");
        let cmd = shell_command(&options.command_line, &options);
        assert_eq!(cmd.get_program(), SHELL);

        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["-c", "echo hi"]);
    }

    #[test]
    fn test_tee_strategy_captures_echo() {
        let mut sink = BufferSink::new();
        let command = Command::new("echo ping").use_tee(true);
        let result = PosixTeeStrategy.execute(&command, &mut sink).unwrap();

        assert_eq!(result.status, 0);
        assert_eq!(result.output, "ping");
        assert_eq!(sink.contents(), "ping\n");
    }

    #[test]
    fn test_tee_strategy_leaves_sink_alone_without_tee() {
        let mut sink = BufferSink::new();
        let command = Command::new("echo quiet").use_tee(false);
        let result = PosixTeeStrategy.execute(&command, &mut sink).unwrap();

        assert_eq!(result.output, "quiet");
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn test_fd_strategy_captures_echo() {
        let mut sink = BufferSink::new();
        let command = Command::new("echo pong").use_tee(false);
        let result = FdRedirectStrategy.execute(&command, &mut sink).unwrap();

        assert_eq!(result.status, 0);
        assert_eq!(result.output, "pong");
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn test_fd_strategy_rejects_descriptorless_tee() {
        let mut sink = BufferSink::new();
        let command = Command::new("echo nope").use_tee(true);
        let err = FdRedirectStrategy
            .execute(&command, &mut sink)
            .unwrap_err();

        assert!(matches!(err, ShellCaptureError::DescriptorUnavailable));
    }
}
