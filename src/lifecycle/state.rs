// ABOUTME: Lifecycle states, their fixed default order, and the deployment stages.
// ABOUTME: Each stage owns a running state and a finished state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a deployable module is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Invalid,
    Initializing,
    Configured,
    Validated,
    PreDeploying,
    PreDeployed,
    Deploying,
    Deployed,
    PostDeploying,
    PostDeployed,
    Done,
    Errored,
}

/// The order states are visited in when nothing fails.
pub const DEFAULT_ORDER: [State; 11] = [
    State::Invalid,
    State::Initializing,
    State::Configured,
    State::Validated,
    State::PreDeploying,
    State::PreDeployed,
    State::Deploying,
    State::Deployed,
    State::PostDeploying,
    State::PostDeployed,
    State::Done,
];

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Invalid => "invalid",
            State::Initializing => "initializing",
            State::Configured => "configured",
            State::Validated => "validated",
            State::PreDeploying => "predeploying",
            State::PreDeployed => "predeployed",
            State::Deploying => "deploying",
            State::Deployed => "deployed",
            State::PostDeploying => "postdeploying",
            State::PostDeployed => "postdeployed",
            State::Done => "done",
            State::Errored => "errored",
        }
    }

    /// No handler advances past a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Done | State::Errored)
    }

    /// The state after this one in [`DEFAULT_ORDER`].
    pub fn next(&self) -> Option<State> {
        let idx = DEFAULT_ORDER.iter().position(|s| s == self)?;
        DEFAULT_ORDER.get(idx + 1).copied()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown lifecycle state: {0}")]
pub struct ParseStateError(String);

impl FromStr for State {
    type Err = ParseStateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DEFAULT_ORDER
            .iter()
            .chain(std::iter::once(&State::Errored))
            .find(|s| s.as_str() == value)
            .copied()
            .ok_or_else(|| ParseStateError(value.to_string()))
    }
}

/// A lifecycle step that runs a plugin container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    PreDeploy,
    Deploy,
    PostDeploy,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::PreDeploy, Stage::Deploy, Stage::PostDeploy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::PreDeploy => "pre_deploy",
            Stage::Deploy => "deploy",
            Stage::PostDeploy => "post_deploy",
        }
    }

    /// State the module is in while the stage's container runs.
    pub fn running_state(&self) -> State {
        match self {
            Stage::PreDeploy => State::PreDeploying,
            Stage::Deploy => State::Deploying,
            Stage::PostDeploy => State::PostDeploying,
        }
    }

    /// State the module moves to when the container succeeds.
    pub fn finished_state(&self) -> State {
        match self {
            Stage::PreDeploy => State::PreDeployed,
            Stage::Deploy => State::Deployed,
            Stage::PostDeploy => State::PostDeployed,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
