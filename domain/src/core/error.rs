//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("session has no intent; the interview must start from the Intent phase")]
    MissingIntent,

    #[error("unknown question id: {0}")]
    UnknownQuestion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            DomainError::UnknownQuestion("q9".to_string()).to_string(),
            "unknown question id: q9"
        );
        assert!(DomainError::MissingIntent.to_string().contains("Intent phase"));
    }
}
