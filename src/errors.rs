//! Unified error types for `ProductionBuddy`.
//!
//! Every fallible operation in the crate returns [`Result`]. Store failures abort
//! the whole operation; the bot layer logs them and turns them into a single
//! user-facing message.

use thiserror::Error;

/// All errors produced by the core and the bot layer.
#[derive(Debug, Error)]
pub enum Error {
    /// The store rejected a query or write.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A required field was missing before a write.
    #[error("Validation failed: {message}")]
    Validation {
        /// Which field was missing or malformed
        message: String,
    },

    /// A size quantity was negative.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending quantity
        quantity: i64,
    },

    /// A size list such as `PP=1,M=3` could not be parsed.
    #[error("Invalid size list '{input}': {reason}")]
    InvalidSizes {
        /// The raw text that was entered
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// No order header carries the given code.
    #[error("Order '{code}' not found")]
    OrderNotFound {
        /// The business order code
        code: String,
    },

    /// The order is already in the terminal Delivered state.
    #[error("Order '{code}' was already delivered")]
    AlreadyDelivered {
        /// The business order code
        code: String,
    },

    /// Filesystem failure (config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting a report into a message buffer failed.
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error.
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
