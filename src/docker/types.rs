use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Describes a container to create. The runtime turns this into whatever
/// its API needs (for the CLI driver, a `docker run` argument list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub network: String,
    /// Published on the host under the same number, TCP only.
    pub port: u16,
    pub env: BTreeMap<String, String>,
    /// Docker memory notation, e.g. `512m`.
    pub memory_limit: String,
}

/// Container lifecycle state as reported by `docker inspect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Other(String),
}

impl ContainerState {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "created" => Self::Created,
            "running" => Self::Running,
            "paused" => Self::Paused,
            "restarting" => Self::Restarting,
            "removing" => Self::Removing,
            "exited" => Self::Exited,
            "dead" => Self::Dead,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Running => f.write_str("running"),
            Self::Paused => f.write_str("paused"),
            Self::Restarting => f.write_str("restarting"),
            Self::Removing => f.write_str("removing"),
            Self::Exited => f.write_str("exited"),
            Self::Dead => f.write_str("dead"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Failure talking to the container runtime.
///
/// `Display` yields the runtime's own message so it can be passed through
/// to API clients unmodified.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to invoke `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{message}")]
    Command {
        exit_code: Option<i32>,
        message: String,
    },
    #[error("No such container: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_states() {
        assert_eq!(ContainerState::parse("running"), ContainerState::Running);
        assert_eq!(ContainerState::parse("exited\n"), ContainerState::Exited);
        assert_eq!(ContainerState::parse("Created"), ContainerState::Created);
    }

    #[test]
    fn parse_unknown_state_is_preserved() {
        let state = ContainerState::parse("hibernating");
        assert_eq!(state, ContainerState::Other("hibernating".into()));
        assert!(!state.is_running());
        assert_eq!(state.to_string(), "hibernating");
    }

    #[test]
    fn only_running_counts_as_running() {
        assert!(ContainerState::Running.is_running());
        for state in [
            ContainerState::Created,
            ContainerState::Paused,
            ContainerState::Restarting,
            ContainerState::Exited,
            ContainerState::Dead,
        ] {
            assert!(!state.is_running(), "{state} should not be running");
        }
    }

    #[test]
    fn command_error_displays_runtime_message_verbatim() {
        let err = RuntimeError::Command {
            exit_code: Some(125),
            message: "Error response from daemon: pull access denied".into(),
        };
        assert_eq!(
            err.to_string(),
            "Error response from daemon: pull access denied"
        );
    }
}
