//! Execution result types.

use std::time::Duration;

/// Result of running a command to completion.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Child exit status. Zero on success; non-zero values are
    /// platform-defined, and on unix a signal death reports the negated
    /// signal number.
    pub status: i32,
    /// Combined stdout+stderr text, interleaved in the order the capture
    /// mechanism delivered it, with one trailing newline removed.
    pub output: String,
    /// Wall-clock time from spawn to drain completion.
    pub duration: Duration,
}

impl ExecutionResult {
    /// Create a new execution result.
    pub fn new(status: i32, output: String, duration: Duration) -> Self {
        Self {
            status,
            output,
            duration,
        }
    }

    /// Check if the command succeeded (status 0).
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Check if the command failed (non-zero status).
    pub fn failed(&self) -> bool {
        self.status != 0
    }

    /// Captured output split into lines.
    pub fn output_lines(&self) -> impl Iterator<Item = &str> {
        self.output.lines()
    }
}

impl Default for ExecutionResult {
    fn default() -> Self {
        Self {
            status: 0,
            output: String::new(),
            duration: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_result_new() {
        let result = ExecutionResult::new(0, "hello".to_string(), Duration::from_millis(100));

        assert_eq!(result.status, 0);
        assert_eq!(result.output, "hello");
        assert_eq!(result.duration, Duration::from_millis(100));
    }

    #[test]
    fn test_execution_result_success() {
        let result = ExecutionResult::new(0, String::new(), Duration::ZERO);
        assert!(result.success());
        assert!(!result.failed());
    }

    #[test]
    fn test_execution_result_failed() {
        let result = ExecutionResult::new(127, "not found".to_string(), Duration::ZERO);
        assert!(!result.success());
        assert!(result.failed());
    }

    #[test]
    fn test_output_lines() {
        let result = ExecutionResult::new(0, "line1\nline2\nline3".to_string(), Duration::ZERO);
        let lines: Vec<_> = result.output_lines().collect();
        assert_eq!(lines, vec!["line1", "line2", "line3"]);
    }
}
