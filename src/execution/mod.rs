//! Command execution engine.
//!
//! This module runs a shell command line to completion and hands back its
//! exit status together with the combined stdout+stderr text:
//! - strategy selection per platform family
//! - scoped environment and working-directory overrides
//! - optional live tee to a caller-supplied sink
//!
//! # Example
//!
//! ```no_run
//! use shell_capture::execution::run_command;
//!
//! let result = run_command("echo hello").unwrap();
//! assert_eq!(result.status, 0);
//! assert_eq!(result.output, "hello");
//! ```

mod command;
mod result;
mod runner;

#[cfg(unix)]
pub mod posix;
#[cfg(windows)]
pub mod windows;

pub use command::Command;
pub use result::ExecutionResult;
pub use runner::{run_command, run_command_in, CommandRunner};

#[cfg(unix)]
pub use posix::{FdRedirectStrategy, PosixTeeStrategy};
#[cfg(windows)]
pub use windows::WindowsStrategy;

use crate::error::Result;
use crate::sink::TeeSink;

/// Buffer size for draining child output.
pub(crate) const READ_BUFFER_SIZE: usize = 4096;

/// One way of running a command and capturing its combined output.
///
/// One implementation exists per platform family;
/// [`CommandRunner`] selects among them once per call.
pub trait ExecutionStrategy {
    /// Run the command to completion, capturing combined stdout+stderr and
    /// mirroring it to `sink` when the command requests tee.
    fn execute(&self, command: &Command, sink: &mut dyn TeeSink) -> Result<ExecutionResult>;
}

/// Remove at most one trailing newline from captured text.
///
/// Commands like `echo X` append a newline that is not part of the value.
pub(crate) fn trim_trailing_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

/// Map a child exit status to the integer reported to callers.
pub(crate) fn status_code(status: std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status
            .code()
            .or_else(|| status.signal().map(|sig| -sig))
            .unwrap_or(-1)
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(-1)
    }
}
