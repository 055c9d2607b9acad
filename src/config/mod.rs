// ABOUTME: Runtime settings resolved from the process environment and CLI flags.
// ABOUTME: The only place environment variables are read; core types take explicit values.

use std::path::PathBuf;

use crate::command::{CliDefaults, CommandBuilder};
use crate::runner::ModuleRunner;

/// Environment variable overriding the container runtime executable.
pub const RUNTIME_PATH_ENV: &str = "ITZ_PODMAN_PATH";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeSettings {
    /// Runtime executable. `None` uses `/usr/local/bin/podman`.
    pub runtime_path: Option<String>,
    /// Host directory mounted at the container workspace.
    pub workspace: Option<PathBuf>,
    /// Extra flags placed right after the runtime subcommand.
    pub flags: Vec<String>,
}

impl RuntimeSettings {
    /// Settings seeded from `ITZ_PODMAN_PATH`. Blank values are ignored.
    pub fn from_env() -> Self {
        let runtime_path = std::env::var(RUNTIME_PATH_ENV)
            .ok()
            .filter(|path| !path.trim().is_empty());
        Self {
            runtime_path,
            ..Self::default()
        }
    }

    /// Apply an explicit runtime path, keeping the current one when `None`.
    pub fn runtime_path(mut self, path: Option<String>) -> Self {
        if path.is_some() {
            self.runtime_path = path;
        }
        self
    }

    pub fn workspace(mut self, workspace: Option<PathBuf>) -> Self {
        self.workspace = workspace;
        self
    }

    pub fn flags(mut self, flags: Vec<String>) -> Self {
        self.flags = flags;
        self
    }

    pub fn cli_defaults(&self) -> CliDefaults {
        CliDefaults {
            path: self.runtime_path.clone(),
            flags: self.flags.clone(),
            ..CliDefaults::default()
        }
    }

    /// A builder with the runtime, flags, and workspace mount applied.
    pub fn command_builder(&self) -> CommandBuilder {
        let mut builder = CommandBuilder::new(Some(self.cli_defaults()));
        if let Some(workspace) = &self.workspace {
            builder.with_workspace(workspace.display().to_string());
        }
        builder
    }

    pub fn runner(&self) -> ModuleRunner {
        ModuleRunner::new(self.command_builder())
    }
}
