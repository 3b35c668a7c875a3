//! Unified error type for the whole crate.
//!
//! Services return [`Result`]; the HTTP layer maps each variant onto a status
//! code in [`crate::api::ApiError`].

use thiserror::Error;

/// Every failure a service or the start-up sequence can report.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file or an override is unusable.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong.
        message: String,
    },

    /// A query failed, including unique and foreign-key violations.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The addressed row does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name, e.g. `"product"`.
        entity: &'static str,
        /// The missing id.
        id: i64,
    },

    /// An input field points at a row that does not exist.
    #[error("Referenced {entity} {id} does not exist")]
    UnknownReference {
        /// Entity name of the referenced row.
        entity: &'static str,
        /// The dangling id.
        id: i64,
    },

    /// Input failed a field check.
    #[error("Invalid input: {message}")]
    Validation {
        /// Which field failed and why.
        message: String,
    },

    /// A price, quantity or fee is negative or not finite.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value.
        amount: f64,
    },

    /// Login with an unknown email or a wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No session matched a lookup.
    #[error("No session matches {lookup}")]
    SessionNotFound {
        /// Description of the lookup, with any token redacted.
        lookup: String,
    },

    /// argon2 could not hash or parse a password.
    #[error("Password hashing failed: {message}")]
    PasswordHash {
        /// Error reported by argon2.
        message: String,
    },

    /// Binding or serving the listener failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
