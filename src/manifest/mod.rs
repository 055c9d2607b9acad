// ABOUTME: Module manifest types and loading for install manifests.
// ABOUTME: Handles YAML parsing and apiVersion/kind support checks.

mod api_version;
mod image;

pub use api_version::{API_NAME, ApiVersion, ParseApiVersionError, SUPPORTED_API_VERSIONS};
pub use image::{EnvVarInfo, ImageInfo, VolumeInfo};

use crate::error::{Error, Result};
use crate::hooks::Hook;
use crate::lifecycle::Stage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The only manifest kind this crate knows how to deploy.
pub const INSTALL_KIND: &str = "InstallManifest";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataInfo {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookInfo {
    #[serde(default)]
    pub list: ImageInfo,

    #[serde(default)]
    pub validate: ImageInfo,

    #[serde(default)]
    pub get_state: ImageInfo,
}

impl HookInfo {
    pub fn image(&self, hook: Hook) -> &ImageInfo {
        match hook {
            Hook::List => &self.list,
            Hook::Validate => &self.validate,
            Hook::GetState => &self.get_state,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleInfo {
    #[serde(default)]
    pub pre_deploy: ImageInfo,

    #[serde(default)]
    pub deploy: ImageInfo,

    #[serde(default)]
    pub post_deploy: ImageInfo,
}

impl LifecycleInfo {
    pub fn image(&self, stage: Stage) -> &ImageInfo {
        match stage {
            Stage::PreDeploy => &self.pre_deploy,
            Stage::Deploy => &self.deploy,
            Stage::PostDeploy => &self.post_deploy,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecInfo {
    #[serde(default)]
    pub hooks: HookInfo,

    #[serde(default)]
    pub lifecycle: LifecycleInfo,
}

/// A deployable module as described by its install manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    #[serde(default, rename = "apiVersion")]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub metadata: MetadataInfo,

    #[serde(default)]
    pub spec: SpecInfo,
}

impl ModuleInfo {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn is_supported_kind(&self) -> bool {
        self.kind == INSTALL_KIND
    }

    pub fn is_supported_version(&self) -> bool {
        self.api_version
            .parse::<ApiVersion>()
            .map(|version| version.is_supported())
            .unwrap_or(false)
    }

    pub fn is_supported(&self) -> bool {
        self.is_supported_kind() && self.is_supported_version()
    }

    /// Turn the support checks into an error naming the offending field.
    pub fn ensure_supported(&self) -> Result<()> {
        if !self.is_supported_version() {
            return Err(Error::UnsupportedVersion(self.api_version.clone()));
        }
        if !self.is_supported_kind() {
            return Err(Error::UnsupportedKind(self.kind.clone()));
        }
        Ok(())
    }

    pub fn stage_image(&self, stage: Stage) -> &ImageInfo {
        self.spec.lifecycle.image(stage)
    }

    pub fn hook_image(&self, hook: Hook) -> &ImageInfo {
        self.spec.hooks.image(hook)
    }
}

/// Source of module descriptors.
pub trait ModuleLoader {
    /// Load the module at `uri`.
    ///
    /// Unsupported manifests still load; callers check [`ModuleInfo::is_supported`].
    fn load(&self, uri: &Path) -> Result<ModuleInfo>;

    /// Load the module and fail if its apiVersion or kind is unsupported.
    fn load_supported(&self, uri: &Path) -> Result<ModuleInfo> {
        let module = self.load(uri)?;
        module.ensure_supported()?;
        Ok(module)
    }
}

/// Loads manifests from YAML (or JSON) files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestFileLoader;

impl ManifestFileLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ModuleLoader for ManifestFileLoader {
    fn load(&self, uri: &Path) -> Result<ModuleInfo> {
        tracing::debug!("Loading module from manifest file {}", uri.display());
        if !uri.is_file() {
            return Err(Error::ManifestNotFound(uri.to_path_buf()));
        }
        let content = std::fs::read_to_string(uri)?;
        let module = ModuleInfo::from_yaml(&content)?;
        if !module.is_supported() {
            tracing::warn!(
                "module {} ({} {}) is not supported",
                module.metadata.name,
                module.kind,
                module.api_version
            );
        }
        Ok(module)
    }
}
