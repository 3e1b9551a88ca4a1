use thiserror::Error;

use crate::optimizer::VariableKey;

/// Failures raised while turning a request into a dispatch plan.
///
/// Precondition errors are raised before any model is built. The variable
/// errors mean the solving engine and the model builder disagree about the
/// variables of a model, which is a bug rather than bad input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    #[error("expected {periods} forecast items, got {forecasts}")]
    PeriodMismatch { periods: usize, forecasts: usize },

    #[error("degenerate configuration: {0}")]
    DegenerateConfiguration(String),

    #[error("solver returned a value for unknown variable {key}")]
    UnmappedVariable { key: VariableKey },

    #[error("solver returned no value for variable {key}")]
    MissingVariable { key: VariableKey },

    #[error("solver task failed: {0}")]
    SolverTask(String),
}

impl DispatchError {
    /// True for errors caused by the request rather than by this service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DispatchError::PeriodMismatch { .. } | DispatchError::DegenerateConfiguration(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::VariableKind;

    #[test]
    fn test_error_display() {
        let err = DispatchError::PeriodMismatch { periods: 3, forecasts: 2 };
        assert_eq!(err.to_string(), "expected 3 forecast items, got 2");

        let err = DispatchError::UnmappedVariable {
            key: VariableKey::new(VariableKind::OnOff, 7),
        };
        assert_eq!(err.to_string(), "solver returned a value for unknown variable onOff7");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(DispatchError::DegenerateConfiguration("x".into()).is_client_error());
        assert!(!DispatchError::SolverTask("panic".into()).is_client_error());
    }
}
