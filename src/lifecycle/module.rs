// ABOUTME: The deployable module state machine driving a module through its lifecycle.
// ABOUTME: Iteration yields the handler for the current state; execution performs the transition.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use super::command::{DEFAULT_HANDLERS, StateCmd};
use super::error::LifecycleError;
use super::resolver::{AssumeConfigured, StateResolver};
use super::state::{Stage, State};
use crate::hooks::{Hook, HookCmd, HookRegistry};
use crate::manifest::ModuleInfo;
use crate::runner::{ModuleRunner, RunContext, RunError};

/// One deployment attempt of a module.
///
/// Holds exactly one current state and remembers the one before it.
/// `done` and `errored` are terminal. Not meant to be shared between
/// threads; drive it from a single caller.
pub struct DeployableModule<'a> {
    module: &'a ModuleInfo,
    runner: ModuleRunner,
    ctx: RunContext,
    cmds: HashMap<State, StateCmd>,
    hooks: HookRegistry<'a>,
    resolver: Box<dyn StateResolver + 'a>,
    previous: State,
    current: State,
}

impl<'a> DeployableModule<'a> {
    /// Create a module in the `invalid` state with the default handler table.
    pub fn new(module: &'a ModuleInfo, runner: ModuleRunner, ctx: RunContext) -> Self {
        let mut deployment = Self::bare(module, runner, ctx);
        deployment.cmds = DEFAULT_HANDLERS.into_iter().collect();
        deployment
    }

    /// Create a module with a caller supplied handler table.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::AlreadyExists` if two handlers name the same state.
    pub fn with_handlers<I>(
        module: &'a ModuleInfo,
        runner: ModuleRunner,
        ctx: RunContext,
        handlers: I,
    ) -> Result<Self, LifecycleError>
    where
        I: IntoIterator<Item = (State, StateCmd)>,
    {
        let mut deployment = Self::bare(module, runner, ctx);
        for (state, cmd) in handlers {
            deployment.add_cmd(state, cmd)?;
        }
        Ok(deployment)
    }

    fn bare(module: &'a ModuleInfo, runner: ModuleRunner, ctx: RunContext) -> Self {
        Self {
            module,
            runner,
            ctx,
            cmds: HashMap::new(),
            hooks: HookRegistry::from_module(module),
            resolver: Box::new(AssumeConfigured),
            previous: State::Invalid,
            current: State::Invalid,
        }
    }

    /// Replace how the `initializing` handler resolves external state.
    pub fn with_state_resolver(mut self, resolver: impl StateResolver + 'a) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn module(&self) -> &'a ModuleInfo {
        self.module
    }

    pub fn runner(&self) -> &ModuleRunner {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut ModuleRunner {
        &mut self.runner
    }

    pub fn run_context(&self) -> &RunContext {
        &self.ctx
    }

    pub fn run_context_mut(&mut self) -> &mut RunContext {
        &mut self.ctx
    }

    pub fn state(&self) -> State {
        self.current
    }

    pub fn previous_state(&self) -> State {
        self.previous
    }

    pub fn is_errored(&self) -> bool {
        self.current == State::Errored
    }

    /// Move to `state`, remembering the current one as previous.
    pub fn notify(&mut self, state: State) {
        tracing::debug!("{} -> {}", self.current, state);
        self.previous = self.current;
        self.current = state;
    }

    /// Register the handler for `state`.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::AlreadyExists` if `state` already has one; the
    /// existing handler is kept.
    pub fn add_cmd(&mut self, state: State, cmd: StateCmd) -> Result<(), LifecycleError> {
        tracing::trace!("Adding command for: {state}");
        match self.cmds.entry(state) {
            Entry::Occupied(_) => Err(LifecycleError::AlreadyExists(state)),
            Entry::Vacant(slot) => {
                slot.insert(cmd);
                Ok(())
            }
        }
    }

    pub fn get_cmd_for(&self, state: State) -> Option<StateCmd> {
        tracing::trace!("Getting command for: {state}");
        self.cmds.get(&state).copied()
    }

    /// The handler for the current state and whether it is a real step.
    ///
    /// Terminal states, and states without a handler, yield `Noop` and `false`.
    /// The caller runs the handler with [`execute`](Self::execute).
    pub fn next_step(&self) -> (StateCmd, bool) {
        if self.current.is_terminal() {
            return (StateCmd::Noop, false);
        }
        match self.get_cmd_for(self.current) {
            Some(cmd) => {
                tracing::trace!("Found handler for state {}: {:?}", self.current, cmd);
                (cmd, true)
            }
            None => (StateCmd::Noop, false),
        }
    }

    /// Perform a handler, transitioning state as it dictates.
    ///
    /// Stage failures move the module to `errored`; the error is also in the
    /// run context.
    pub fn execute(&mut self, cmd: StateCmd) -> Result<(), RunError> {
        match cmd {
            StateCmd::Advance(state) => {
                self.notify(state);
                Ok(())
            }
            StateCmd::ResolveState => self.resolve_state(),
            StateCmd::RunStage(stage) => self.run_stage(stage),
            StateCmd::Noop => Ok(()),
        }
    }

    /// Step until the lifecycle ends, running the final no-op step too.
    ///
    /// Returns the number of steps taken. Stops at the first failing stage.
    pub fn run_to_completion(&mut self) -> Result<usize, RunError> {
        let mut steps = 0;
        loop {
            let (cmd, has_more) = self.next_step();
            self.execute(cmd)?;
            steps += 1;
            if !has_more {
                return Ok(steps);
            }
        }
    }

    pub fn hook(&self, hook: Hook) -> Option<&HookCmd<'a>> {
        self.hooks.get(hook)
    }

    /// Run a hook's container. Lifecycle state is not touched.
    pub fn run_hook(&mut self, hook: Hook) -> Result<(), RunError> {
        match self.hooks.get(hook) {
            Some(cmd) => cmd.invoke(&self.runner, &mut self.ctx),
            None => Ok(()),
        }
    }

    fn resolve_state(&mut self) -> Result<(), RunError> {
        match self.resolver.resolve(self.module, &self.runner, &mut self.ctx) {
            Ok(state) => {
                self.notify(state);
                Ok(())
            }
            Err(err) => {
                self.notify(State::Errored);
                Err(err)
            }
        }
    }

    fn run_stage(&mut self, stage: Stage) -> Result<(), RunError> {
        if self.current != stage.running_state() {
            self.notify(stage.running_state());
        }
        let image = self.module.stage_image(stage);
        let result = self.runner.run_image(&mut self.ctx, image);
        match &result {
            Ok(()) => self.notify(stage.finished_state()),
            Err(err) => {
                tracing::error!("{stage} failed: {err}");
                self.notify(State::Errored);
            }
        }
        result
    }
}

impl fmt::Debug for DeployableModule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployableModule")
            .field("module", &self.module.metadata.name)
            .field("previous", &self.previous)
            .field("current", &self.current)
            .finish()
    }
}
