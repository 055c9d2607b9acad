// ABOUTME: Deployment lifecycle state machine for container-implemented modules.
// ABOUTME: Exports states, handler commands, the resolver seam, and the DeployableModule.

mod command;
mod error;
mod module;
mod resolver;
mod state;

pub use command::{DEFAULT_HANDLERS, StateCmd};
pub use error::LifecycleError;
pub use module::DeployableModule;
pub use resolver::{AssumeConfigured, StateResolver};
pub use state::{DEFAULT_ORDER, ParseStateError, Stage, State};
