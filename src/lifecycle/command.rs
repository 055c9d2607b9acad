// ABOUTME: Handler commands bound to lifecycle states.
// ABOUTME: A closed set of actions so dispatch is checked exhaustively at compile time.

use super::state::{Stage, State};

/// The action a deployable module performs for its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCmd {
    /// Move to the given state without touching anything external.
    Advance(State),
    /// Ask the module's state resolver where the module stands.
    ResolveState,
    /// Run the stage's container, then move to its finished state or `errored`.
    RunStage(Stage),
    /// Do nothing. Yielded once no further step exists.
    Noop,
}

/// The handler table every deployable module starts with.
pub const DEFAULT_HANDLERS: [(State, StateCmd); 10] = [
    (State::Invalid, StateCmd::Advance(State::Initializing)),
    (State::Initializing, StateCmd::ResolveState),
    (State::Configured, StateCmd::Advance(State::Validated)),
    (State::Validated, StateCmd::Advance(State::PreDeploying)),
    (State::PreDeploying, StateCmd::RunStage(Stage::PreDeploy)),
    (State::PreDeployed, StateCmd::Advance(State::Deploying)),
    (State::Deploying, StateCmd::RunStage(Stage::Deploy)),
    (State::Deployed, StateCmd::Advance(State::PostDeploying)),
    (State::PostDeploying, StateCmd::RunStage(Stage::PostDeploy)),
    (State::PostDeployed, StateCmd::Advance(State::Done)),
];
