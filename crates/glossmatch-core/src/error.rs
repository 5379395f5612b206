//! Error types for glossary loading and quiz rounds.
//!
//! Every failure the core can produce is returned to the caller as one of
//! these variants. None of them are retried automatically; the presentation
//! layer renders them and waits for a corrective action from the user.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while obtaining a glossary.
#[derive(Debug, Error)]
pub enum GlossaryError {
    /// The source text is not well-formed JSON/TOML.
    #[error("failed to parse glossary {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// The source parsed, but its contents are not a usable glossary.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No glossary source is configured, or the named file does not exist.
    #[error("glossary not found: {0}")]
    NotFound(String),

    /// An alternate source was requested without privileged access.
    #[error("permission denied: replacing the glossary requires privileged access")]
    PermissionDenied,

    /// Reading the source failed for a reason other than a missing file.
    #[error("failed to read glossary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A structurally valid source whose contents break a glossary invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid glossary entry '{key}': {problem}")]
pub struct ValidationError {
    /// The offending key, or `<root>` for problems with the whole document.
    pub key: String,
    pub problem: ValidationProblem,
}

impl ValidationError {
    pub(crate) fn new(key: impl Into<String>, problem: ValidationProblem) -> Self {
        Self {
            key: key.into(),
            problem,
        }
    }
}

/// What exactly is wrong with a glossary entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationProblem {
    #[error("expected an object at the top level, found {actual}")]
    NotAnObject { actual: &'static str },

    #[error("term must be a non-empty string")]
    EmptyKey,

    #[error("expected {expected}, found {actual}")]
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("explanation is empty")]
    EmptyExplanation,

    #[error("glossary contains no terms")]
    NoEntries,
}

/// Errors from operating on a quiz round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The operation is not valid in the round's current phase.
    #[error("operation not valid in this round phase ({answered} of {total} answered)")]
    OutOfRange { answered: usize, total: usize },

    /// The chosen explanation number does not exist.
    #[error("answer {chosen} is out of range, expected a number from 1 to {max}")]
    InvalidInput { chosen: usize, max: usize },

    /// The round was built from a glossary that has since been replaced.
    #[error("round was started with a different glossary; start a new round")]
    StaleRound,
}

impl QuizError {
    /// Returns `true` if the user can fix this by entering another answer.
    pub fn is_input_error(&self) -> bool {
        matches!(self, QuizError::InvalidInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_key_and_problem() {
        let err = ValidationError::new(
            "Guna",
            ValidationProblem::WrongType {
                expected: "a string",
                actual: "a number",
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("'Guna'"));
        assert!(msg.contains("expected a string, found a number"));
    }

    #[test]
    fn only_invalid_input_is_an_input_error() {
        assert!(QuizError::InvalidInput { chosen: 9, max: 3 }.is_input_error());
        assert!(!QuizError::OutOfRange {
            answered: 2,
            total: 2
        }
        .is_input_error());
        assert!(!QuizError::StaleRound.is_input_error());
    }

    #[test]
    fn out_of_range_message_is_phase_neutral() {
        let msg = QuizError::OutOfRange {
            answered: 1,
            total: 3,
        }
        .to_string();
        assert_eq!(
            msg,
            "operation not valid in this round phase (1 of 3 answered)"
        );
        assert!(!msg.contains("finished"));
    }
}
