//! # shell-capture
//!
//! Run shell commands and capture combined stdout+stderr, with optional
//! live tee.
//!
//! Given a command line, the crate spawns it through the platform shell,
//! buffers everything the child writes to either stream, optionally
//! mirrors that output live to a destination of the caller's choosing,
//! and returns the exit status together with the captured text. The tee
//! destination can be anything that implements `Write`: destinations
//! backed by a real OS descriptor take a direct-redirection fast path,
//! and everything else is served by pipe capture.
//!
//! ## Features
//!
//! - **Combined capture**: stdout and stderr merged at the OS level, in
//!   delivery order
//! - **Live tee**: mirror output while it is produced, to any sink
//! - **Scoped overrides**: per-call environment variables and working
//!   directory, visible to the child only
//! - **Descriptor-less sinks**: in-memory destinations select a fallback
//!   instead of failing
//!
//! ## Quick Start
//!
//! ```no_run
//! use shell_capture::{Command, CommandRunner};
//!
//! fn main() -> shell_capture::Result<()> {
//!     // Initialize logging
//!     shell_capture::logging::try_init().ok();
//!
//!     let runner = CommandRunner::new();
//!     let result = runner.run(&Command::new("echo hello").use_tee(false))?;
//!
//!     assert_eq!(result.status, 0);
//!     assert_eq!(result.output, "hello");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod execution;
pub mod logging;
pub mod sink;

// Re-export commonly used types
pub use error::{Result, ShellCaptureError};
pub use execution::{
    run_command, run_command_in, Command, CommandRunner, ExecutionResult, ExecutionStrategy,
};
pub use sink::{BufferSink, RawDescriptor, TeeSink};
