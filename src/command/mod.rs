// ABOUTME: Container runtime command line construction.
// ABOUTME: Renders structured invocation parameters into a deterministic podman command line.

mod builder;
mod parts;

pub use builder::CommandBuilder;
pub use parts::{
    CliDefaults, CliParts, DEFAULT_RUNTIME_PATH, DEFAULT_SUBCOMMAND, DEFAULT_WORKSPACE, UidMap,
    VolumeMap,
};

/// Errors raised while rendering a command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The image descriptor overrides the container entrypoint.
    #[error("command is not yet supported")]
    UnsupportedCommand,
}
