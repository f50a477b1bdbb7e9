//! Error types for dynsql

use thiserror::Error;

/// Result type alias for dynsql operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while building statement models.
///
/// Rendering itself never fails: a condition that decides not to render simply
/// contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlError {
    /// A required part of a statement was missing at build time
    #[error("Invalid argument: {field} is required")]
    InvalidArgument { field: &'static str },

    /// A statement declared more than one generated key where exactly one was expected
    #[error("Expected exactly one generated key column, found {found}: {columns:?}")]
    AmbiguousGeneratedKey { found: usize, columns: Vec<String> },

    /// A statement declared no generated key where exactly one was expected
    #[error("Expected exactly one generated key column, found none")]
    MissingGeneratedKey,
}

impl SqlError {
    /// Create an invalid argument error naming the missing field
    pub fn invalid_argument(field: &'static str) -> Self {
        Self::InvalidArgument { field }
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Check if this is a generated key error (ambiguous or missing)
    pub fn is_generated_key(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousGeneratedKey { .. } | Self::MissingGeneratedKey
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_names_field() {
        let err = SqlError::invalid_argument("select list");
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Invalid argument: select list is required");
    }

    #[test]
    fn test_ambiguous_generated_key_message() {
        let err = SqlError::AmbiguousGeneratedKey {
            found: 2,
            columns: vec!["id".to_string(), "uuid".to_string()],
        };
        assert!(err.is_generated_key());
        assert!(err.to_string().contains("found 2"));
    }
}
