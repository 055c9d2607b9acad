// ABOUTME: Resolution of a module's external state during initialization.
// ABOUTME: Pluggable so callers can interpret get-state hook output.

use super::state::State;
use crate::manifest::ModuleInfo;
use crate::runner::{ModuleRunner, RunContext, RunError};

/// Decides which state an initializing module is really in.
///
/// An error moves the module to `errored`.
pub trait StateResolver {
    fn resolve(
        &self,
        module: &ModuleInfo,
        runner: &ModuleRunner,
        ctx: &mut RunContext,
    ) -> Result<State, RunError>;
}

/// Resolver that performs no I/O and reports the module as configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeConfigured;

impl StateResolver for AssumeConfigured {
    fn resolve(
        &self,
        _module: &ModuleInfo,
        _runner: &ModuleRunner,
        _ctx: &mut RunContext,
    ) -> Result<State, RunError> {
        Ok(State::Configured)
    }
}

impl<F> StateResolver for F
where
    F: Fn(&ModuleInfo, &ModuleRunner, &mut RunContext) -> Result<State, RunError>,
{
    fn resolve(
        &self,
        module: &ModuleInfo,
        runner: &ModuleRunner,
        ctx: &mut RunContext,
    ) -> Result<State, RunError> {
        self(module, runner, ctx)
    }
}
