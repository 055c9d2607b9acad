// ABOUTME: Process runner error types with SNAFU pattern.
// ABOUTME: Covers command rendering, spawn, stream, and exit status failures.

use snafu::Snafu;
use std::io;

use crate::command::BuildError;

/// Failure to run a plugin container.
///
/// Cloneable so the same error can be recorded in a
/// [`RunContext`](super::RunContext) and returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RunError {
    #[snafu(display("{source}"))]
    Build { source: BuildError },

    #[snafu(display("command line is empty"))]
    EmptyCommand,

    #[snafu(display("failed to start {program}: {message}"))]
    Spawn {
        program: String,
        kind: io::ErrorKind,
        message: String,
    },

    #[snafu(display("failed to stream {stream} of {program}: {message}"))]
    Stream {
        program: String,
        stream: &'static str,
        message: String,
    },

    #[snafu(display("{program} exited with status {code}"))]
    Exit { program: String, code: i32 },

    #[snafu(display("{program} was terminated by a signal"))]
    Terminated { program: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunErrorKind {
    /// The command line could not be rendered.
    Unsupported,
    /// The runtime executable could not be started.
    SpawnFailed,
    /// Copying between the caller's streams and the child failed.
    StreamFailed,
    /// The child ran and exited unsuccessfully.
    NonZeroExit,
}

impl RunError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RunErrorKind {
        match self {
            RunError::Build { .. } => RunErrorKind::Unsupported,
            RunError::EmptyCommand | RunError::Spawn { .. } => RunErrorKind::SpawnFailed,
            RunError::Stream { .. } => RunErrorKind::StreamFailed,
            RunError::Exit { .. } | RunError::Terminated { .. } => RunErrorKind::NonZeroExit,
        }
    }

    /// Exit code of the child, when it exited with one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunError::Exit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<BuildError> for RunError {
    fn from(source: BuildError) -> Self {
        RunError::Build { source }
    }
}
