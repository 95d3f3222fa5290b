//! Error types for the cache crate
//!
//! Cache operations are total and report absence through `Option`/`bool`.
//! Only configuration parsing can fail.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidConfig { var: &'static str, value: String },

    /// Unknown write policy name
    #[error("Unknown write policy: {0:?} (expected \"keep\" or \"bump\")")]
    InvalidWritePolicy(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::InvalidConfig {
            var: "CACHE_CAPACITY",
            value: "lots".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for CACHE_CAPACITY: \"lots\"");

        let err = CacheError::InvalidWritePolicy("sometimes".to_string());
        assert!(err.to_string().contains("sometimes"));
    }
}
