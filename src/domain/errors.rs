use thiserror::Error;

/// Errors that can occur while reading or writing team stats
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// Missing or malformed input, checked before the store is touched
    #[error("{0}")]
    Validation(String),

    /// The (team, year) key is already taken
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// Underlying persistence failure
    #[error("Store error: {0}")]
    Store(String),
}

impl StatsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Conflict raised when a (team, year) pair already exists
    pub fn duplicate_team_year() -> Self {
        Self::Conflict("Team already exists for this year. Cannot add duplicate team-year.".to_string())
    }
}

pub type StatsResult<T> = Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_is_prefixed() {
        let err = StatsError::store("connection reset");
        assert_eq!(err.to_string(), "Store error: connection reset");
    }

    #[test]
    fn validation_error_displays_message_verbatim() {
        let err = StatsError::validation("Year is required");
        assert_eq!(err.to_string(), "Year is required");
    }

    #[test]
    fn duplicate_is_a_conflict() {
        assert!(matches!(
            StatsError::duplicate_team_year(),
            StatsError::Conflict(_)
        ));
    }
}
