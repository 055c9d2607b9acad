// ABOUTME: Fluent builder for podman command lines.
// ABOUTME: Setters mutate the parts in place; build renders without side effects.

use super::BuildError;
use super::parts::{CliDefaults, CliParts, UidMap, VolumeMap};
use crate::manifest::{EnvVarInfo, ImageInfo};

/// Builds container runtime command lines from structured parameters so
/// callers never interpolate strings themselves.
///
/// Setters take `&mut self` like [`std::process::Command`], so a builder can
/// be configured once and reused for several builds.
///
/// No shell escaping is performed: values containing whitespace are split
/// into separate arguments when the line is executed.
#[derive(Debug, Clone, Default)]
pub struct CommandBuilder {
    parts: CliParts,
}

impl CommandBuilder {
    /// Create a builder from optional defaults. Unset or blank values fall
    /// back to `/usr/local/bin/podman`, `run`, and `/workspace`.
    pub fn new(defaults: Option<CliDefaults>) -> Self {
        Self {
            parts: CliParts::from_defaults(defaults.unwrap_or_default()),
        }
    }

    pub fn parts(&self) -> &CliParts {
        &self.parts
    }

    /// Override the runtime executable.
    pub fn with_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.parts.path = path.into();
        self
    }

    /// Override the runtime subcommand.
    pub fn with_cmd(&mut self, cmd: impl Into<String>) -> &mut Self {
        self.parts.cmd = cmd.into();
        self
    }

    /// Append a flag after any flags supplied through the defaults.
    pub fn with_flag(&mut self, flag: impl Into<String>) -> &mut Self {
        self.parts.flags.push(flag.into());
        self
    }

    pub fn with_flags<I, S>(&mut self, flags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parts.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Set the container image.
    pub fn with_image(&mut self, image: impl Into<String>) -> &mut Self {
        self.parts.image = Some(image.into());
        self
    }

    /// Mount a local directory at the configured workspace path.
    pub fn with_workspace(&mut self, local_dir: impl Into<String>) -> &mut Self {
        let workdir = self.parts.workdir.clone();
        self.with_volume(local_dir, workdir)
    }

    pub fn with_volume(
        &mut self,
        local_dir: impl Into<String>,
        container_dir: impl Into<String>,
    ) -> &mut Self {
        self.push_volume(local_dir.into(), container_dir.into(), None)
    }

    /// Add a volume mapping with a mount option suffix, e.g. `Z`.
    pub fn with_volume_opt(
        &mut self,
        local_dir: impl Into<String>,
        container_dir: impl Into<String>,
        option: impl Into<String>,
    ) -> &mut Self {
        self.push_volume(local_dir.into(), container_dir.into(), Some(option.into()))
    }

    /// Map `count` ids starting at `local_user` on the host to
    /// `container_user` in the container.
    pub fn with_user_map(&mut self, local_user: u32, container_user: u32, count: u32) -> &mut Self {
        self.parts.uid_maps.push(UidMap {
            container: container_user,
            host: local_user,
            count,
        });
        self
    }

    /// Publish a container port. A later mapping for the same host port
    /// replaces the earlier one in place.
    pub fn with_port(
        &mut self,
        local_port: impl Into<String>,
        container_port: impl Into<String>,
    ) -> &mut Self {
        self.parts
            .ports
            .insert(local_port.into(), container_port.into());
        self
    }

    /// Add `-e NAME=VALUE`. Duplicates are kept and rendered in call order.
    pub fn with_envvar(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.parts.envvars.push(EnvVarInfo::new(name, value));
        self
    }

    /// Render the configured command line.
    pub fn build(&self) -> String {
        self.parts.render()
    }

    /// Render a command line for the given image descriptor on top of the
    /// configured parts. The builder itself is left untouched.
    ///
    /// Only the image, env vars, and volume mounts are used; `args` are not
    /// part of the rendered line.
    pub fn build_from(&self, info: &ImageInfo) -> Result<String, BuildError> {
        if info.has_command() {
            return Err(BuildError::UnsupportedCommand);
        }

        let mut scoped = self.clone();
        scoped.with_image(info.image.as_str());
        for envvar in &info.env {
            scoped.with_envvar(envvar.name.as_str(), envvar.value.as_str());
        }
        for volume in &info.volume_mounts {
            scoped.with_volume(volume.name.as_str(), volume.mount_path.as_str());
        }
        Ok(scoped.build())
    }

    fn push_volume(
        &mut self,
        host: String,
        container: String,
        option: Option<String>,
    ) -> &mut Self {
        self.parts.volume_maps.push(VolumeMap {
            host,
            container,
            option,
        });
        self
    }
}
