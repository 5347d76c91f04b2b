/// Error type for connection management and health checks.
///
/// Query errors raised by repositories stay as `sea_orm::DbErr`; this type covers
/// the infrastructure around them.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DatabaseError::HealthCheckFailed("timeout".into());
        assert_eq!(err.to_string(), "Health check failed: timeout");

        let err = DatabaseError::ConnectionFailed("refused".into());
        assert!(err.to_string().starts_with("Connection failed"));
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_from_db_err() {
        let err: DatabaseError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(err, DatabaseError::Postgres(_)));
        assert!(err.to_string().contains("boom"));
    }
}
