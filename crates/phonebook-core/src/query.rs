//! Key/value query parsing and exact-match filtering.
//!
//! A query line looks like `last_name=Ivanov first_name=Ivan`: pairs are
//! separated by single spaces and split on `=`. There is no escaping, so
//! values cannot contain spaces or `=`.
//!
//! Keys that are not contact fields are kept (as [`QueryKey::Unknown`]) so a
//! search with a typo simply matches nothing instead of failing. Phone
//! values are canonicalized during parsing.

use indexmap::IndexMap;
use log::debug;
use std::str::FromStr;

use crate::contact::{Contact, Field};
use crate::error::{Error, Result};
use crate::phone::normalize_phone;

/// Input that cancels the current prompt.
pub const CANCEL_SENTINEL: &str = "q";

/// Outcome of a parser that honours the cancel sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompted<T> {
    Ready(T),
    Cancelled,
}

impl<T> Prompted<T> {
    /// The ready value, or `None` when cancelled.
    pub fn ready(self) -> Option<T> {
        match self {
            Prompted::Ready(value) => Some(value),
            Prompted::Cancelled => None,
        }
    }
}

/// Key of a query term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Field(Field),
    Unknown(String),
}

impl QueryKey {
    fn parse(key: &str) -> Self {
        match Field::from_str(key) {
            Ok(field) => QueryKey::Field(field),
            Err(_) => QueryKey::Unknown(key.to_string()),
        }
    }
}

/// A conjunctive set of `field = value` constraints.
///
/// Terms keep their input order; a repeated key overwrites the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    terms: IndexMap<QueryKey, String>,
}

impl Query {
    /// Parse a query line.
    ///
    /// Returns `Cancelled` for the cancel sentinel, [`Error::MalformedQuery`]
    /// for empty input or a pair without exactly one `=`, and
    /// [`Error::InvalidQuery`] when a phone value cannot be normalized.
    pub fn parse(line: &str) -> Result<Prompted<Query>> {
        if line == CANCEL_SENTINEL {
            return Ok(Prompted::Cancelled);
        }
        if line.is_empty() {
            return Err(Error::MalformedQuery("empty input".to_string()));
        }

        let mut terms = IndexMap::new();
        for pair in line.split(' ') {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::MalformedQuery(format!("'{}' is not a key=value pair", pair))
            })?;
            if key.is_empty() || value.contains('=') {
                return Err(Error::MalformedQuery(format!(
                    "'{}' is not a key=value pair",
                    pair
                )));
            }

            let key = QueryKey::parse(key);
            let value = match &key {
                QueryKey::Field(field) if field.is_phone() => normalize_phone(value)
                    .map_err(|e| Error::InvalidQuery(format!("{}: {}", field, e)))?,
                _ => value.to_string(),
            };
            terms.insert(key, value);
        }

        let query = Query { terms };
        debug!("parsed query: {:?}", query.terms);
        Ok(Prompted::Ready(query))
    }

    /// Build a query from known fields only.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (Field, S)>,
        S: Into<String>,
    {
        Query {
            terms: fields
                .into_iter()
                .map(|(field, value)| (QueryKey::Field(field), value.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Value supplied for a field, if any.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.terms.get(&QueryKey::Field(field)).map(String::as_str)
    }

    /// Terms addressing known fields, in input order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> {
        self.terms.iter().filter_map(|(key, value)| match key {
            QueryKey::Field(field) => Some((*field, value.as_str())),
            QueryKey::Unknown(_) => None,
        })
    }

    /// Keys that are not contact fields, in input order.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().filter_map(|key| match key {
            QueryKey::Unknown(name) => Some(name.as_str()),
            QueryKey::Field(_) => None,
        })
    }

    /// Fail with [`Error::InvalidQuery`] if any key is not a contact field.
    pub fn require_known_fields(&self) -> Result<()> {
        let unknown: Vec<&str> = self.unknown_keys().collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidQuery(format!(
                "unknown field(s): {}",
                unknown.join(", ")
            )))
        }
    }

    /// Exact, raw-string match on every term. An unknown key never matches.
    pub fn matches(&self, contact: &Contact) -> bool {
        self.terms.iter().all(|(key, value)| match key {
            QueryKey::Field(field) => contact.get(*field) == value,
            QueryKey::Unknown(_) => false,
        })
    }

    /// Keep the contacts matching every term, preserving order.
    pub fn filter<'a, I>(&self, contacts: I) -> Vec<&'a Contact>
    where
        I: IntoIterator<Item = &'a Contact>,
    {
        contacts.into_iter().filter(|c| self.matches(c)).collect()
    }

    /// Build a new contact; every field must be present and known.
    pub fn to_contact(&self) -> Result<Contact> {
        self.require_known_fields()?;
        let missing: Vec<Field> = Field::all().filter(|f| self.get(*f).is_none()).collect();
        if !missing.is_empty() {
            return Err(Error::IncompleteContact { missing });
        }

        let mut contact = Contact::default();
        for (field, value) in self.fields() {
            contact.set(field, value);
        }
        Ok(contact)
    }

    /// Copy `contact` with this query's values written over it.
    pub fn apply_to(&self, contact: &Contact) -> Result<Contact> {
        self.require_known_fields()?;
        let mut updated = contact.clone();
        for (field, value) in self.fields() {
            updated.set(field, value);
        }
        Ok(updated)
    }
}
