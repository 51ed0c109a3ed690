//! Error taxonomy for phonebook operations.
//!
//! Parse-level errors are meant to be recovered by re-prompting the user,
//! `DuplicateContact` aborts the current mutation, and `StoreUnavailable`
//! is fatal at startup. See [`Error::is_recoverable`].

use std::path::PathBuf;
use thiserror::Error;

use crate::contact::Field;

/// Errors that can occur while parsing input or touching the contact store.
#[derive(Debug, Error)]
pub enum Error {
    /// Phone string does not match the accepted pattern
    #[error("Incorrect phone number: '{0}'")]
    InvalidPhoneFormat(String),

    /// Key/value input could not be parsed
    #[error("Invalid params string: {0}")]
    MalformedQuery(String),

    /// Input parsed but one of its values is unacceptable
    #[error("Invalid params: {0}")]
    InvalidQuery(String),

    /// A new contact is missing required fields
    #[error("You have to fill all required parameters to continue, missing: {}", join_fields(.missing))]
    IncompleteContact { missing: Vec<Field> },

    /// The uniqueness invariant would be violated
    #[error("Such a contact already exists: {0}")]
    DuplicateContact(String),

    /// The backing file could not be read at startup
    #[error("Contact file {} is unavailable: {reason}", .path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed row in the backing file
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration file could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the caller should re-prompt instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidPhoneFormat(_)
                | Error::MalformedQuery(_)
                | Error::InvalidQuery(_)
                | Error::IncompleteContact { .. }
        )
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => Error::Io(io),
                other => Error::Parse(format!("{:?}", other)),
            }
        } else {
            Error::Parse(err.to_string())
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
