//! phonebook-core: contact records, query parsing and a CSV-backed store.
//!
//! This crate holds everything except the terminal front end:
//! - [`Contact`] and the closed [`Field`] set
//! - phone canonicalization ([`normalize_phone`])
//! - `key=value` queries ([`Query`])
//! - fixed-size pagination ([`Pager`])
//! - the [`Store`], which keeps memory and the backing file in sync
//!
//! Front ends (the `phonebook` binary, tests) own all I/O with the user and
//! drive the store through its public methods.

pub mod config;
pub mod contact;
pub mod error;
pub mod file;
pub mod pager;
pub mod phone;
pub mod query;
pub mod safe_io;
pub mod sample;
pub mod store;

pub use config::{Config, ConfigDefaults};
pub use contact::{Contact, Field};
pub use error::{Error, Result};
pub use file::{ContactFile, CsvFile};
pub use pager::{Page, Pager};
pub use phone::normalize_phone;
pub use query::{CANCEL_SENTINEL, Prompted, Query, QueryKey};
pub use store::{ContactId, EditOutcome, Lookup, Store};
