// ABOUTME: Caller-owned execution context shared across plugin invocations.
// ABOUTME: Holds the child's stdio endpoints, accumulated errors, and the last exit code.

use super::error::RunError;
use super::stream::{InputStream, OutputStream};

/// Streams and error history for one or more plugin runs.
///
/// The runner resets the exit code before every invocation and appends to
/// the error list on every failure. The error list is never cleared
/// automatically.
#[derive(Debug, Default)]
pub struct RunContext {
    pub(crate) input: InputStream,
    pub(crate) output: OutputStream,
    pub(crate) error: OutputStream,
    errors: Vec<RunError>,
    last_exit_code: i32,
}

impl RunContext {
    pub fn new(input: InputStream, output: OutputStream, error: OutputStream) -> Self {
        Self {
            input,
            output,
            error,
            errors: Vec::new(),
            last_exit_code: 0,
        }
    }

    /// Context that hands the parent's own stdio to every child.
    pub fn inherit() -> Self {
        Self::new(
            InputStream::Inherit,
            OutputStream::Inherit,
            OutputStream::Inherit,
        )
    }

    pub fn with_input(mut self, input: InputStream) -> Self {
        self.input = input;
        self
    }

    pub fn with_output(mut self, output: OutputStream) -> Self {
        self.output = output;
        self
    }

    pub fn with_error(mut self, error: OutputStream) -> Self {
        self.error = error;
        self
    }

    /// Replace the stdin source for the next invocation.
    pub fn set_input(&mut self, input: InputStream) {
        self.input = input;
    }

    pub fn add_error(&mut self, err: RunError) {
        self.errors.push(err);
    }

    pub fn errors(&self) -> &[RunError] {
        &self.errors
    }

    pub fn last_error(&self) -> Option<&RunError> {
        self.errors.last()
    }

    pub fn last_exit_code(&self) -> i32 {
        self.last_exit_code
    }

    pub fn set_last_exit_code(&mut self, code: i32) {
        self.last_exit_code = code;
    }

    /// Clear the exit code ahead of the next invocation.
    pub fn reset(&mut self) {
        self.last_exit_code = 0;
    }

    /// True once any run failed or the last run exited non-zero.
    pub fn is_errored(&self) -> bool {
        !self.errors.is_empty() || self.last_exit_code != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::BuildError;

    #[test]
    fn fresh_context_is_clean() {
        let ctx = RunContext::default();
        assert_eq!(ctx.last_exit_code(), 0);
        assert!(ctx.errors().is_empty());
        assert!(!ctx.is_errored());
    }

    #[test]
    fn reset_keeps_error_history() {
        let mut ctx = RunContext::default();
        ctx.set_last_exit_code(2);
        ctx.add_error(RunError::from(BuildError::UnsupportedCommand));
        assert!(ctx.is_errored());

        ctx.reset();
        assert_eq!(ctx.last_exit_code(), 0);
        assert_eq!(ctx.errors().len(), 1);
        assert!(ctx.is_errored());
    }

    #[test]
    fn non_zero_exit_code_alone_marks_errored() {
        let mut ctx = RunContext::default();
        ctx.set_last_exit_code(1);
        assert!(ctx.is_errored());
    }
}
