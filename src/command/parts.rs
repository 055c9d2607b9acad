// ABOUTME: The pieces of a container runtime command line and their defaults.
// ABOUTME: Volume and UID map entries render themselves; defaults fill blank settings.

use indexmap::IndexMap;
use std::fmt;

use crate::manifest::EnvVarInfo;

pub const DEFAULT_RUNTIME_PATH: &str = "/usr/local/bin/podman";
pub const DEFAULT_SUBCOMMAND: &str = "run";
pub const DEFAULT_WORKSPACE: &str = "/workspace";

/// A `-v host:container[:option]` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMap {
    pub host: String,
    pub container: String,
    /// Mount option such as `Z` for SELinux relabeling.
    pub option: Option<String>,
}

impl fmt::Display for VolumeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.option.as_deref() {
            Some(option) if !option.is_empty() => {
                write!(f, "{}:{}:{}", self.host, self.container, option)
            }
            _ => write!(f, "{}:{}", self.host, self.container),
        }
    }
}

/// A `--uidmap container:host:count` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UidMap {
    pub container: u32,
    pub host: u32,
    pub count: u32,
}

impl fmt::Display for UidMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.container, self.host, self.count)
    }
}

/// Caller supplied starting values for a [`CommandBuilder`](super::CommandBuilder).
///
/// Blank or missing strings fall back to the crate defaults.
#[derive(Debug, Clone, Default)]
pub struct CliDefaults {
    pub path: Option<String>,
    pub cmd: Option<String>,
    pub workdir: Option<String>,
    pub flags: Vec<String>,
    pub envvars: Vec<EnvVarInfo>,
}

impl CliDefaults {
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn cmd(mut self, cmd: impl Into<String>) -> Self {
        self.cmd = Some(cmd.into());
        self
    }

    pub fn workdir(mut self, workdir: impl Into<String>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }
}

/// Everything that goes into one rendered command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliParts {
    pub path: String,
    pub cmd: String,
    pub image: Option<String>,
    pub flags: Vec<String>,
    pub workdir: String,
    pub volume_maps: Vec<VolumeMap>,
    /// Host port to container port. Insertion ordered so rendering is stable.
    pub ports: IndexMap<String, String>,
    pub uid_maps: Vec<UidMap>,
    pub envvars: Vec<EnvVarInfo>,
}

impl CliParts {
    pub fn from_defaults(defaults: CliDefaults) -> Self {
        Self {
            path: or_default(defaults.path, DEFAULT_RUNTIME_PATH),
            cmd: or_default(defaults.cmd, DEFAULT_SUBCOMMAND),
            workdir: or_default(defaults.workdir, DEFAULT_WORKSPACE),
            image: None,
            flags: defaults.flags,
            volume_maps: Vec::new(),
            ports: IndexMap::new(),
            uid_maps: Vec::new(),
            envvars: defaults.envvars,
        }
    }

    /// Render the command line in its fixed token order:
    /// path, cmd, flags, uid maps, volumes, ports, env vars, image.
    pub fn render(&self) -> String {
        let mut tokens: Vec<String> = vec![self.path.clone(), self.cmd.clone()];
        tokens.extend(self.flags.iter().cloned());
        for uid_map in &self.uid_maps {
            tokens.push(format!("--uidmap {uid_map}"));
        }
        for volume in &self.volume_maps {
            tokens.push(format!("-v {volume}"));
        }
        for (host, container) in &self.ports {
            tokens.push(format!("-p {host}:{container}"));
        }
        for envvar in &self.envvars {
            tokens.push(format!("-e {envvar}"));
        }
        if let Some(image) = self.image.as_deref().filter(|i| !i.is_empty()) {
            tokens.push(image.to_string());
        }
        tokens.join(" ").trim().to_string()
    }
}

impl Default for CliParts {
    fn default() -> Self {
        Self::from_defaults(CliDefaults::default())
    }
}

fn or_default(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_map_with_and_without_option() {
        let plain = VolumeMap {
            host: "/tmp/data".to_string(),
            container: "/var/app/db".to_string(),
            option: None,
        };
        assert_eq!(plain.to_string(), "/tmp/data:/var/app/db");

        let labeled = VolumeMap {
            option: Some("Z".to_string()),
            ..plain.clone()
        };
        assert_eq!(labeled.to_string(), "/tmp/data:/var/app/db:Z");

        let blank = VolumeMap {
            option: Some(String::new()),
            ..plain
        };
        assert_eq!(blank.to_string(), "/tmp/data:/var/app/db");
    }

    #[test]
    fn uid_map_renders_container_first() {
        let map = UidMap {
            container: 1000,
            host: 0,
            count: 1,
        };
        assert_eq!(map.to_string(), "1000:0:1");
    }

    #[test]
    fn blank_defaults_fall_back() {
        let parts = CliParts::from_defaults(CliDefaults {
            path: Some("   ".to_string()),
            ..CliDefaults::default()
        });
        assert_eq!(parts.path, DEFAULT_RUNTIME_PATH);
        assert_eq!(parts.cmd, DEFAULT_SUBCOMMAND);
        assert_eq!(parts.workdir, DEFAULT_WORKSPACE);
        assert!(parts.flags.is_empty());
    }

    #[test]
    fn empty_image_is_not_rendered() {
        let mut parts = CliParts::default();
        parts.image = Some(String::new());
        assert_eq!(parts.render(), "/usr/local/bin/podman run");
    }
}
