//! Unified error type for the studio ledger.
//!
//! Every fallible operation in `core`, `config` and `bot` returns [`Result`].
//! Database errors from `SeaORM` are converted automatically so `?` works at
//! every call site.

use thiserror::Error;

/// All errors that can surface from the studio ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any error reported by the database layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error while reading configuration or data files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Amount is non-finite, negative, or otherwise unusable
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A value failed boundary validation (unknown enum label, bad date, ...)
    #[error("Invalid input for {field}: {message}")]
    InvalidInput {
        /// Field or parameter that was rejected
        field: String,
        /// Why it was rejected
        message: String,
    },

    /// Year/month pair does not name a calendar month
    #[error("Invalid period: {year}-{month}")]
    InvalidPeriod {
        /// Requested year
        year: i32,
        /// Requested month (1-12 expected)
        month: u32,
    },

    /// No blueprint with the given id
    #[error("Recurring blueprint not found: {id}")]
    BlueprintNotFound {
        /// Blueprint id
        id: i64,
    },

    /// No ledger entry with the given id
    #[error("Ledger entry not found: {id}")]
    EntryNotFound {
        /// Entry id
        id: i64,
    },

    /// Building a reply message failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Integer conversion overflowed
    #[error("Numeric conversion error: {0}")]
    Conversion(#[from] std::num::TryFromIntError),

    /// Error raised by the Discord framework
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for an [`Error::InvalidInput`].
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
