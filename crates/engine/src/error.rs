//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] returned when a transaction, account or rule id is unknown.
//! - [`InvalidAmount`] and [`InvalidDate`] returned when user input can't be
//!   parsed.
//! - [`Validation`] returned when a draft is missing required fields.
//! - [`InvalidFile`] and [`InvalidRow`] returned by the CSV import.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`Validation`]: EngineError::Validation
//!  [`InvalidFile`]: EngineError::InvalidFile
//!  [`InvalidRow`]: EngineError::InvalidRow
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidFile(String),
    #[error("line {line}: {message}")]
    InvalidRow { line: u64, message: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidFile(a), Self::InvalidFile(b)) => a == b,
            (
                Self::InvalidRow {
                    line: la,
                    message: ma,
                },
                Self::InvalidRow {
                    line: lb,
                    message: mb,
                },
            ) => la == lb && ma == mb,
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
