//! Error types for the authority registry.

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Caller is not the registry owner.
    #[error("unauthorized: {caller} is not the registry owner")]
    Unauthorized { caller: String },

    /// Authority id is already present.
    #[error("authority already registered: {id}")]
    AlreadyRegistered { id: String },

    /// Status is not an allowed value for the operation.
    #[error("invalid status: {status}")]
    InvalidStatus { status: String },

    /// Authority id was never registered.
    #[error("authority not found: {id}")]
    NotFound { id: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Snapshot could not be read, written or validated.
    #[error("snapshot error: {message}")]
    Snapshot { message: String },
}

impl RegistryError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 1,
            Self::Config { .. } => 2,

            // Rejected mutations
            Self::Unauthorized { .. } => 3,
            Self::AlreadyRegistered { .. } => 4,
            Self::InvalidStatus { .. } => 5,

            Self::Snapshot { .. } => 6,
        }
    }

    /// Whether this is one of the four rejections a registry operation can
    /// return (as opposed to an I/O or configuration failure).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. }
                | Self::AlreadyRegistered { .. }
                | Self::InvalidStatus { .. }
                | Self::NotFound { .. }
        )
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_rejection() {
        let errors = [
            RegistryError::NotFound { id: "a".into() },
            RegistryError::Unauthorized { caller: "b".into() },
            RegistryError::AlreadyRegistered { id: "a".into() },
            RegistryError::InvalidStatus {
                status: "pending".into(),
            },
        ];
        let mut codes: Vec<i32> = errors.iter().map(RegistryError::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(errors.iter().all(RegistryError::is_rejection));
    }

    #[test]
    fn test_ambient_errors_are_not_rejections() {
        let err = RegistryError::Snapshot {
            message: "truncated".into(),
        };
        assert!(!err.is_rejection());
        assert_eq!(err.exit_code(), 6);
        assert_eq!(err.to_string(), "snapshot error: truncated");
    }
}
