use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::bank::QaRecord;

/// Worker lifecycle states.
///
/// Idle is both the initial state and the terminal state after a stop;
/// Stopping covers the window between a stop request and the loop
/// actually winding down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    #[default]
    Idle,
    Running,
    Stopping,
}

impl WorkerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Idle => "idle",
            WorkerState::Running => "running",
            WorkerState::Stopping => "stopping",
        }
    }
}

impl FromStr for WorkerState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(WorkerState::Idle),
            "running" => Ok(WorkerState::Running),
            "stopping" => Ok(WorkerState::Stopping),
            _ => Err(()),
        }
    }
}

/// Events the worker delivers to its observer, in iteration order.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// A tick got through the match stage: cache hit, fresh match, or no
    /// match at all (`record: None`).
    Result {
        query: String,
        record: Option<QaRecord>,
        from_cache: bool,
        timestamp: DateTime<Utc>,
    },
    /// The loop entered a new lifecycle state.
    Status {
        state: WorkerState,
        timestamp: DateTime<Utc>,
    },
    /// One iteration failed; the loop keeps running.
    Error {
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl WorkerEvent {
    pub fn result(query: String, record: Option<QaRecord>, from_cache: bool) -> Self {
        WorkerEvent::Result {
            query,
            record,
            from_cache,
            timestamp: Utc::now(),
        }
    }

    pub fn status(state: WorkerState) -> Self {
        WorkerEvent::Status {
            state,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        WorkerEvent::Error {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_string_roundtrip() {
        for state in [WorkerState::Idle, WorkerState::Running, WorkerState::Stopping] {
            assert_eq!(state.as_str().parse(), Ok(state));
        }
        assert_eq!("paused".parse::<WorkerState>(), Err(()));
    }

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(WorkerState::default(), WorkerState::Idle);
    }
}
