//! Contact record and its field set.
//!
//! A [`Contact`] is a fixed-arity tuple of six named strings. Fields are
//! addressed through the closed [`Field`] enumeration rather than by
//! attribute name, so user-supplied keys are resolved once at parse time.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Identifier of one of the six contact fields.
///
/// Declaration order is the canonical column order used for rendering and
/// for the header row of the backing file.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    LastName,
    FirstName,
    Patronymic,
    Company,
    WorkPhone,
    PersonalPhone,
}

impl Field {
    /// All fields in canonical order.
    pub fn all() -> impl Iterator<Item = Field> {
        Field::iter()
    }

    /// Phone fields hold canonical digits and are never re-cased.
    pub fn is_phone(self) -> bool {
        matches!(self, Field::WorkPhone | Field::PersonalPhone)
    }
}

/// One phonebook entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    last_name: String,
    first_name: String,
    patronymic: String,
    company: String,
    work_phone: String,
    personal_phone: String,
}

impl Contact {
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        patronymic: impl Into<String>,
        company: impl Into<String>,
        work_phone: impl Into<String>,
        personal_phone: impl Into<String>,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            patronymic: patronymic.into(),
            company: company.into(),
            work_phone: work_phone.into(),
            personal_phone: personal_phone.into(),
        }
    }

    /// Raw (un-normalized) value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::LastName => &self.last_name,
            Field::FirstName => &self.first_name,
            Field::Patronymic => &self.patronymic,
            Field::Company => &self.company,
            Field::WorkPhone => &self.work_phone,
            Field::PersonalPhone => &self.personal_phone,
        }
    }

    /// Replace the raw value of a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::LastName => &mut self.last_name,
            Field::FirstName => &mut self.first_name,
            Field::Patronymic => &mut self.patronymic,
            Field::Company => &mut self.company,
            Field::WorkPhone => &mut self.work_phone,
            Field::PersonalPhone => &mut self.personal_phone,
        };
        *slot = value.into();
    }

    /// Normalized view: name and company trimmed and title-cased, phones
    /// passed through as stored.
    pub fn to_map(&self) -> IndexMap<Field, String> {
        Field::all()
            .map(|field| (field, normalize_value(field, self.get(field))))
            .collect()
    }

    /// A copy of this contact with every field normalized.
    pub fn normalized(&self) -> Contact {
        let mut out = self.clone();
        for field in Field::all() {
            out.set(field, normalize_value(field, self.get(field)));
        }
        out
    }

    /// Uniqueness comparison: full-tuple equality on the normalized form.
    pub fn same_as(&self, other: &Contact) -> bool {
        Field::all().all(|field| {
            normalize_value(field, self.get(field)) == normalize_value(field, other.get(field))
        })
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.to_map().into_values().collect();
        f.write_str(&values.join(" "))
    }
}

fn normalize_value(field: Field, value: &str) -> String {
    if field.is_phone() {
        value.to_string()
    } else {
        title_case(value.trim())
    }
}

/// Title-case a string: the first letter of every alphabetic run is
/// upper-cased and the rest lower-cased. Any non-letter starts a new run,
/// so `"anna-maria o'neil"` becomes `"Anna-Maria O'Neil"`.
///
/// Only the first character of an expanding upper-case mapping stays
/// capital (`"ßtudio"` becomes `"Sstudio"`), and a letter whose lower-case
/// form is several characters is left alone. The result is a fixed point:
/// `title_case(&title_case(s)) == title_case(s)`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if !c.is_alphabetic() {
            out.push(c);
            in_word = false;
        } else if in_word {
            out.push(lower_one(c));
        } else {
            let mut upper = c.to_uppercase();
            out.push(upper.next().unwrap_or(c));
            out.extend(upper.map(lower_one));
            in_word = true;
        }
    }
    out
}

/// Single-character lower-case mapping, or `c` itself when it would expand.
fn lower_one(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}
