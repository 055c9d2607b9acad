// ABOUTME: Image descriptor types naming the container plugin for a stage or hook.
// ABOUTME: Covers image reference, arguments, environment variables, and volume mounts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single environment variable handed to a plugin container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVarInfo {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl EnvVarInfo {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for EnvVarInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A host directory mounted into a plugin container.
///
/// `name` is the host path, `mount_path` the path inside the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub name: String,
    #[serde(rename = "mountPath")]
    pub mount_path: String,
}

impl VolumeInfo {
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
        }
    }
}

/// Describes the container that implements a lifecycle stage or hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(default)]
    pub image: String,

    /// Entrypoint override. Not supported by the command builder yet.
    #[serde(default)]
    pub command: Vec<String>,

    /// Inline script for the plugin. Carried as data; never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    /// Container arguments. Carried as data; never rendered.
    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub env: Vec<EnvVarInfo>,

    #[serde(default, rename = "volumeMounts")]
    pub volume_mounts: Vec<VolumeInfo>,
}

impl ImageInfo {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }

    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push(EnvVarInfo::new(name, value));
        self
    }

    pub fn with_volume(mut self, host: impl Into<String>, mount_path: impl Into<String>) -> Self {
        self.volume_mounts.push(VolumeInfo::new(host, mount_path));
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Whether the descriptor asks for an entrypoint override.
    pub fn has_command(&self) -> bool {
        !self.command.is_empty()
    }
}
