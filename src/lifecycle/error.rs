// ABOUTME: Error types for lifecycle handler registration.
// ABOUTME: Duplicate registration is a setup-time programming error.

use super::State;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// A handler is already registered for this state.
    #[error("handler for state {0} already exists")]
    AlreadyExists(State),
}
