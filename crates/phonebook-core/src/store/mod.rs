//! The contact store.
//!
//! [`Store`] owns the authoritative in-memory list of contacts (insertion
//! order preserved) and mediates every mutation of the backing file.
//!
//! # Consistency
//!
//! Records are canonicalized whenever they cross the store boundary (load,
//! add, update): names and company are trimmed and title-cased, phones are
//! normalized. Memory and disk therefore always hold the same values.
//!
//! Mutations hit the file first and only then touch memory:
//! - `add` appends one row, then pushes the contact;
//! - `update` rewrites the whole file atomically from a prepared copy of the
//!   list, then swaps the copy in.
//!
//! A failed write leaves the in-memory set exactly as it was.
//!
//! # Uniqueness
//!
//! No two contacts may be equal in all six normalized fields. Checks are a
//! linear scan, which is fine for the intended hundreds to low thousands of
//! records. Every edit rewrites the full file; that is the scalability limit.

use log::{debug, info, warn};
use std::path::Path;

use crate::contact::{Contact, Field};
use crate::error::{Error, Result};
use crate::file::{ContactFile, CsvFile};
use crate::phone::normalize_phone;
use crate::query::{Prompted, Query};

/// Position of a contact within the store.
///
/// Only valid until the next mutation of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactId(usize);

/// Result of resolving a query to a single contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    NotFound,
    Unique(ContactId),
    /// More than one contact matched; the caller should narrow the query.
    Ambiguous(usize),
}

/// Result of [`Store::edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated(Contact),
    NotFound,
    Ambiguous(usize),
    Cancelled,
}

/// In-memory contact set synchronized with a backing file.
#[derive(Debug)]
pub struct Store<F: ContactFile = CsvFile> {
    file: F,
    contacts: Vec<Contact>,
}

impl Store<CsvFile> {
    /// Load the CSV file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(CsvFile::new(path.as_ref()))
    }
}

impl<F: ContactFile> Store<F> {
    /// Read every row from `file`.
    ///
    /// Any failure (missing file, malformed row, bad phone) is reported as
    /// [`Error::StoreUnavailable`]. A row equal to an earlier one is dropped
    /// with a warning; the file keeps it until the next rewrite.
    pub fn load(file: F) -> Result<Self> {
        let unavailable = |reason: String| Error::StoreUnavailable {
            path: file.path().to_path_buf(),
            reason,
        };

        let rows = file.read_all().map_err(|e| unavailable(e.to_string()))?;
        let mut contacts = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            // +2: one for the header, one for 1-based numbering
            let contact =
                canonicalize(row).map_err(|e| unavailable(format!("row {}: {}", i + 2, e)))?;
            if contacts.iter().any(|c: &Contact| c.same_as(&contact)) {
                warn!(
                    "row {} duplicates an earlier contact, skipping: {}",
                    i + 2,
                    contact
                );
                continue;
            }
            contacts.push(contact);
        }

        info!(
            "loaded {} contacts from {}",
            contacts.len(),
            file.path().display()
        );
        Ok(Self { file, contacts })
    }

    pub fn file(&self) -> &F {
        &self.file
    }

    /// Every contact, in insertion order.
    pub fn list(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.get(id.0)
    }

    /// Contacts matching every term of `query`, in store order.
    pub fn filter(&self, query: &Query) -> Vec<&Contact> {
        query.filter(&self.contacts)
    }

    /// Parse `text` and filter by it. A cancelled prompt yields no results.
    pub fn search(&self, text: &str) -> Result<Vec<&Contact>> {
        match Query::parse(text)? {
            Prompted::Ready(query) => Ok(self.filter(&query)),
            Prompted::Cancelled => Ok(Vec::new()),
        }
    }

    /// Resolve `query` to exactly one contact.
    pub fn locate(&self, query: &Query) -> Lookup {
        let mut matches = self
            .contacts
            .iter()
            .enumerate()
            .filter(|(_, c)| query.matches(c))
            .map(|(i, _)| i);

        let lookup = match (matches.next(), matches.next()) {
            (None, _) => Lookup::NotFound,
            (Some(i), None) => Lookup::Unique(ContactId(i)),
            (Some(_), Some(_)) => Lookup::Ambiguous(2 + matches.count()),
        };
        debug!("lookup {:?} -> {:?}", query, lookup);
        lookup
    }

    /// True when no stored contact (other than `except`) equals `candidate`
    /// in normalized form.
    pub fn is_unique(&self, candidate: &Contact, except: Option<ContactId>) -> bool {
        !self
            .contacts
            .iter()
            .enumerate()
            .any(|(i, c)| Some(ContactId(i)) != except && c.same_as(candidate))
    }

    /// Add a new contact.
    ///
    /// The contact is canonicalized, checked for uniqueness, appended to the
    /// backing file and only then added to memory.
    pub fn add(&mut self, contact: Contact) -> Result<&Contact> {
        let contact = canonicalize(contact)?;
        if !self.is_unique(&contact, None) {
            debug!("rejecting duplicate contact: {}", contact);
            return Err(Error::DuplicateContact(contact.to_string()));
        }

        self.file.append_one(&contact)?;
        self.contacts.push(contact);
        Ok(&self.contacts[self.contacts.len() - 1])
    }

    /// Parse a full `key=value` line and add the resulting contact.
    pub fn add_from_text(&mut self, text: &str) -> Result<Prompted<Contact>> {
        let query = match Query::parse(text)? {
            Prompted::Ready(query) => query,
            Prompted::Cancelled => return Ok(Prompted::Cancelled),
        };
        let contact = query.to_contact()?;
        self.add(contact).cloned().map(Prompted::Ready)
    }

    /// Apply `changes` to the contact at `id`.
    ///
    /// The edited copy must stay unique among the other contacts. The whole
    /// file is rewritten from the updated list before memory is changed.
    pub fn update(&mut self, id: ContactId, changes: &Query) -> Result<&Contact> {
        let current = self
            .contacts
            .get(id.0)
            .ok_or_else(|| Error::InvalidQuery(format!("no contact at position {}", id.0)))?;

        let updated = canonicalize(changes.apply_to(current)?)?;
        if !self.is_unique(&updated, Some(id)) {
            debug!("rejecting edit that duplicates: {}", updated);
            return Err(Error::DuplicateContact(updated.to_string()));
        }

        let mut next = self.contacts.clone();
        next[id.0] = updated;
        self.file.write_all(&next)?;
        self.contacts = next;
        Ok(&self.contacts[id.0])
    }

    /// Find the single contact matching `query_text` and apply `update_text`.
    ///
    /// Returns `NotFound` / `Ambiguous` without touching anything when the
    /// query does not resolve to exactly one contact.
    pub fn edit(&mut self, query_text: &str, update_text: &str) -> Result<EditOutcome> {
        let query = match Query::parse(query_text)? {
            Prompted::Ready(query) => query,
            Prompted::Cancelled => return Ok(EditOutcome::Cancelled),
        };
        let id = match self.locate(&query) {
            Lookup::NotFound => return Ok(EditOutcome::NotFound),
            Lookup::Ambiguous(n) => return Ok(EditOutcome::Ambiguous(n)),
            Lookup::Unique(id) => id,
        };
        let changes = match Query::parse(update_text)? {
            Prompted::Ready(changes) => changes,
            Prompted::Cancelled => return Ok(EditOutcome::Cancelled),
        };
        self.update(id, &changes)
            .cloned()
            .map(EditOutcome::Updated)
    }
}

/// Normalize names and company, canonicalize both phones.
fn canonicalize(contact: Contact) -> Result<Contact> {
    let mut contact = contact.normalized();
    for field in [Field::WorkPhone, Field::PersonalPhone] {
        let phone = normalize_phone(contact.get(field))?;
        contact.set(field, phone);
    }
    Ok(contact)
}
