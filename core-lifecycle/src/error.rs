use bridge_traits::{BridgeError, LifecycleState};
use std::fmt;
use thiserror::Error;

/// A lifecycle callback that is undefined for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolViolation {
    /// Callback that arrived out of order
    pub callback: &'static str,
    /// State at the time; `None` before the first create
    pub state: Option<LifecycleState>,
}

impl fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            Some(state) => write!(f, "{} while {}", self.callback, state),
            None => write!(f, "{} before create", self.callback),
        }
    }
}

#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The runtime could not allocate the bridge. Unrecoverable; the host
    /// must let the process crash.
    #[error("Bridge initialization failed: {0}")]
    FatalInitFailure(#[source] BridgeError),

    #[error("Lifecycle protocol violation: {0}")]
    ProtocolViolation(ProtocolViolation),
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
