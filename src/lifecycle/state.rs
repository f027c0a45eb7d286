//! Lifecycle states and terminal outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an asynchronous unit of work is in its life.
///
/// ```text
/// Started -> (Suspended <-> Resumed)* -> Completed | TimedOut | Errored
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Work began on the entering thread.
    Started,
    /// No thread is running the work; it waits to be resumed.
    Suspended,
    /// Work continues, possibly on another thread.
    Resumed,
    /// The work finished with a response.
    Completed,
    /// The host gave up waiting.
    TimedOut,
    /// The work failed.
    Errored,
}

impl LifecycleState {
    /// Returns `true` for the three mutually exclusive end states.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::TimedOut | Self::Errored)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Started => "started",
            Self::Suspended => "suspended",
            Self::Resumed => "resumed",
            Self::Completed => "completed",
            Self::TimedOut => "timed_out",
            Self::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// How the work ended, reported to the listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A response was produced.
    Completed {
        /// The response status code.
        status_code: u16,
    },
    /// The host's timeout fired first.
    TimedOut,
    /// Processing failed.
    Errored {
        /// What went wrong.
        message: String,
    },
}

impl Outcome {
    /// Returns the state this outcome moves the lifecycle into.
    pub fn state(&self) -> LifecycleState {
        match self {
            Self::Completed { .. } => LifecycleState::Completed,
            Self::TimedOut => LifecycleState::TimedOut,
            Self::Errored { .. } => LifecycleState::Errored,
        }
    }

    /// Returns `true` if the request should be reported as successful.
    ///
    /// Status codes below 400 count as success. Timeouts and errors never do.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { status_code } if *status_code < 400)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(LifecycleState::Started, false)]
    #[test_case(LifecycleState::Suspended, false)]
    #[test_case(LifecycleState::Resumed, false)]
    #[test_case(LifecycleState::Completed, true)]
    #[test_case(LifecycleState::TimedOut, true)]
    #[test_case(LifecycleState::Errored, true)]
    fn test_is_terminal(state: LifecycleState, terminal: bool) {
        assert_eq!(state.is_terminal(), terminal);
    }

    #[test]
    fn test_outcome_success() {
        assert!(Outcome::Completed { status_code: 200 }.is_success());
        assert!(!Outcome::Completed { status_code: 503 }.is_success());
        assert!(!Outcome::TimedOut.is_success());
        assert!(!Outcome::Errored { message: "boom".into() }.is_success());
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_value(Outcome::Completed { status_code: 204 }).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "completed", "status_code": 204 }));
        assert_eq!(Outcome::TimedOut.state().to_string(), "timed_out");
    }
}
