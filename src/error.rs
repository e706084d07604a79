//! Error types for shell-capture.

use thiserror::Error;

/// Main error type for shell-capture operations.
///
/// A child process that runs and exits non-zero is not an error; that is
/// reported through [`ExecutionResult::status`](crate::ExecutionResult).
/// Errors here mean the invocation itself could not be carried out.
#[derive(Error, Debug)]
pub enum ShellCaptureError {
    /// The OS refused to create the child process at all (missing shell,
    /// permission denied, unusable working directory).
    #[error("failed to spawn shell process: {0}")]
    Spawn(#[source] std::io::Error),

    /// Capture plumbing failed after a successful spawn.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A capture resource was unexpectedly unavailable.
    #[error("output capture failed: {0}")]
    Capture(String),

    /// The destination sink exposes no OS descriptor.
    ///
    /// Only produced when the descriptor fast path is invoked directly;
    /// [`CommandRunner`](crate::CommandRunner) falls back to the pipe
    /// strategy instead of surfacing this.
    #[error("destination sink has no OS descriptor")]
    DescriptorUnavailable,
}

/// Convenience Result type for shell-capture operations.
pub type Result<T> = std::result::Result<T, ShellCaptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such shell");
        let err = ShellCaptureError::Spawn(io_err);
        assert!(err.to_string().contains("spawn"));
    }

    #[test]
    fn test_io_conversion_is_not_spawn() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let shell_err: ShellCaptureError = io_err.into();
        assert!(matches!(shell_err, ShellCaptureError::Io(_)));
        assert!(!matches!(shell_err, ShellCaptureError::Spawn(_)));
    }

    #[test]
    fn test_capture_display() {
        let err = ShellCaptureError::Capture("status file unreadable".into());
        assert!(err.to_string().contains("status file unreadable"));
    }

    #[test]
    fn test_descriptor_unavailable_display() {
        let err = ShellCaptureError::DescriptorUnavailable;
        assert!(err.to_string().contains("descriptor"));
    }
}
