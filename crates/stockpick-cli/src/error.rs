use std::path::PathBuf;

use thiserror::Error;

use stockpick_core::{
    AssemblyError, ConfigError, CoreError, InvalidInputError, ValidationError, ValidationErrors,
};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("command error: {0}")]
    Command(String),

    #[error("strict mode failed: warnings={warning_count}")]
    StrictModeViolation { warning_count: usize },

    #[error("order rejected by guardrails: {violations}")]
    GuardrailRejected { violations: String },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::InvalidInput(_) => 2,
            Self::Assembly(_) => 2,
            Self::Config(_) => 2,
            Self::Command(_) => 2,
            Self::StrictModeViolation { .. } => 5,
            Self::GuardrailRejected { .. } => 6,
            Self::Serialization(_) => 4,
            Self::Read { .. } => 10,
            Self::Io(_) => 10,
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value.into())
    }
}

impl From<CoreError> for CliError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::Validation(errors) => Self::Validation(errors),
            CoreError::InvalidInput(error) => Self::InvalidInput(error),
            CoreError::Assembly(error) => Self::Assembly(error),
            CoreError::Serialization(error) => Self::Serialization(error),
            other => Self::Command(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_category() {
        assert_eq!(CliError::from(ValidationError::EmptyTicker).exit_code(), 2);
        assert_eq!(
            CliError::from(InvalidInputError::NonPositivePrice { price: 0.0 }).exit_code(),
            2
        );
        assert_eq!(
            CliError::StrictModeViolation { warning_count: 1 }.exit_code(),
            5
        );
        assert_eq!(
            CliError::GuardrailRejected {
                violations: String::new()
            }
            .exit_code(),
            6
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(CliError::from(io).exit_code(), 10);
        let json = serde_json::from_str::<serde_json::Value>("{").expect_err("malformed");
        assert_eq!(CliError::from(json).exit_code(), 4);
    }

    #[test]
    fn invalid_pick_keeps_its_index_in_the_message() {
        let error = CliError::from(CoreError::InvalidPick {
            index: 2,
            errors: ValidationError::EmptyTicker.into(),
        });
        assert_eq!(error.exit_code(), 2);
        assert!(error.to_string().contains("pick #2"));
    }
}
