use letitride_execution::GameError;
use letitride_types::{ConfigError, ErrorKind};
use thiserror::Error;

/// Why a run aborted. No variant carries partial results.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("configuration error: {0}")]
    Configuration(#[source] ConfigError),
    #[error("unimplemented: {0}")]
    Unimplemented(#[source] ConfigError),
    #[error("unit {unit_index} failed: {source}")]
    Execution {
        unit_index: u64,
        #[source]
        source: GameError,
    },
    #[error("worker for batch {batch} failed: {reason}")]
    WorkerTransport { batch: usize, reason: String },
    #[error("merge failed: {0}")]
    Merge(String),
    #[error("progress callback failed: {0}")]
    Progress(#[source] anyhow::Error),
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        match err.kind() {
            ErrorKind::Configuration => SimulationError::Configuration(err),
            ErrorKind::Unimplemented => SimulationError::Unimplemented(err),
        }
    }
}

impl SimulationError {
    /// Unit that triggered the abort, when known.
    pub fn unit_index(&self) -> Option<u64> {
        match self {
            SimulationError::Execution { unit_index, .. } => Some(*unit_index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_kinds() {
        let err: SimulationError = ConfigError::NoStopCondition.into();
        assert!(matches!(err, SimulationError::Configuration(_)));

        let err: SimulationError = ConfigError::Unimplemented {
            feature: "custom strategy",
        }
        .into();
        assert!(matches!(err, SimulationError::Unimplemented(_)));
        assert_eq!(err.unit_index(), None);
    }

    #[test]
    fn test_execution_carries_unit() {
        let err = SimulationError::Execution {
            unit_index: 500,
            source: GameError::DeckExhausted,
        };
        assert_eq!(err.unit_index(), Some(500));
        assert_eq!(err.to_string(), "unit 500 failed: deck exhausted");
    }
}
