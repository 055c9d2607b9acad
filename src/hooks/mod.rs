// ABOUTME: Informational hooks a module exposes beside its ordered lifecycle.
// ABOUTME: Maps list, validate, and get_state to commands that run the hook's container.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::event::ModuleEventType;
use crate::manifest::{ImageInfo, ModuleInfo};
use crate::runner::{ModuleRunner, RunContext, RunError};

/// Side-channel operations that never change lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Report the parameters the module accepts.
    List,
    /// Check parameter values before deployment.
    Validate,
    /// Report the module's current external state.
    GetState,
}

impl Hook {
    pub const ALL: [Hook; 3] = [Hook::List, Hook::Validate, Hook::GetState];

    /// Name used in manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::List => "list",
            Hook::Validate => "validate",
            Hook::GetState => "get_state",
        }
    }

    /// Event type a plugin expects on stdin, if the hook takes input.
    pub fn request_event(&self) -> Option<ModuleEventType> {
        match self {
            Hook::List => None,
            Hook::Validate => Some(ModuleEventType::ValidateHookRequest),
            Hook::GetState => Some(ModuleEventType::GetStateHookRequest),
        }
    }

    /// Event type a plugin answers with on stdout.
    pub fn response_event(&self) -> ModuleEventType {
        match self {
            Hook::List => ModuleEventType::ListHookResponse,
            Hook::Validate => ModuleEventType::ValidateHookResponse,
            Hook::GetState => ModuleEventType::GetStateHookResponse,
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown hook: {0}")]
pub struct ParseHookError(String);

impl FromStr for Hook {
    type Err = ParseHookError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "list" => Ok(Hook::List),
            "validate" => Ok(Hook::Validate),
            "get_state" | "get-state" => Ok(Hook::GetState),
            other => Err(ParseHookError(other.to_string())),
        }
    }
}

/// A hook bound to the image that implements it.
#[derive(Debug, Clone, Copy)]
pub struct HookCmd<'a> {
    hook: Hook,
    image: &'a ImageInfo,
}

impl<'a> HookCmd<'a> {
    pub fn new(hook: Hook, image: &'a ImageInfo) -> Self {
        Self { hook, image }
    }

    pub fn hook(&self) -> Hook {
        self.hook
    }

    pub fn image(&self) -> &'a ImageInfo {
        self.image
    }

    /// Run the hook's container.
    pub fn invoke(&self, runner: &ModuleRunner, ctx: &mut RunContext) -> Result<(), RunError> {
        tracing::info!("Running {} hook: {}", self.hook, self.image.image);
        runner.run_image(ctx, self.image)
    }
}

/// Hook name to command lookup for one module.
#[derive(Debug, Clone, Default)]
pub struct HookRegistry<'a> {
    hooks: HashMap<Hook, HookCmd<'a>>,
}

impl<'a> HookRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register all three hooks from a module's manifest.
    pub fn from_module(module: &'a ModuleInfo) -> Self {
        let mut registry = Self::new();
        for hook in Hook::ALL {
            registry.insert(HookCmd::new(hook, module.hook_image(hook)));
        }
        registry
    }

    /// Register a hook command, returning the one it replaced.
    pub fn insert(&mut self, cmd: HookCmd<'a>) -> Option<HookCmd<'a>> {
        self.hooks.insert(cmd.hook(), cmd)
    }

    pub fn get(&self, hook: Hook) -> Option<&HookCmd<'a>> {
        tracing::trace!("Getting hook for: {hook}");
        self.hooks.get(&hook)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_names() {
        assert_eq!(Hook::List.as_str(), "list");
        assert_eq!(Hook::Validate.as_str(), "validate");
        assert_eq!(Hook::GetState.as_str(), "get_state");
    }

    #[test]
    fn parse_accepts_cli_spelling() {
        assert_eq!("get-state".parse::<Hook>().unwrap(), Hook::GetState);
        assert_eq!("get_state".parse::<Hook>().unwrap(), Hook::GetState);
        assert!("status".parse::<Hook>().is_err());
    }

    #[test]
    fn only_input_hooks_have_request_events() {
        assert!(Hook::List.request_event().is_none());
        assert!(Hook::Validate.request_event().is_some());
        assert!(Hook::GetState.request_event().is_some());
    }

    #[test]
    fn registry_binds_each_hook_to_its_image() {
        let mut module = ModuleInfo::default();
        module.spec.hooks.list = ImageInfo::new("lister");
        module.spec.hooks.validate = ImageInfo::new("validator");
        module.spec.hooks.get_state = ImageInfo::new("stater");

        let registry = HookRegistry::from_module(&module);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(Hook::List).unwrap().image().image, "lister");
        assert_eq!(registry.get(Hook::Validate).unwrap().image().image, "validator");
        assert_eq!(registry.get(Hook::GetState).unwrap().image().image, "stater");
    }

    #[test]
    fn insert_replaces_existing_hook() {
        let first = ImageInfo::new("first");
        let second = ImageInfo::new("second");
        let mut registry = HookRegistry::new();

        assert!(registry.insert(HookCmd::new(Hook::List, &first)).is_none());
        let replaced = registry.insert(HookCmd::new(Hook::List, &second)).unwrap();

        assert_eq!(replaced.image().image, "first");
        assert_eq!(registry.get(Hook::List).unwrap().image().image, "second");
    }
}
