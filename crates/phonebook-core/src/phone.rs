//! Phone number canonicalization.
//!
//! Accepts Russian-style numbers with an optional `+7` or `8` prefix and
//! loose separators, and produces the canonical `8XXXXXXXXXX` form.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Prefix, then `(code) group-group-group` with optional single space/hyphen
/// separators. Anchored at both ends; the prefix is optional, so a bare
/// ten-digit number is accepted. Digits are ASCII only (`\d` would also
/// match other scripts).
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:\+7|8)?\s?-?\(?(?P<code>[0-9]{3})\)?\s?-?(?P<gr1>[0-9]{3})\s?-?(?P<gr2>[0-9]{2})\s?-?(?P<gr3>[0-9]{2})\s*$",
    )
    .expect("phone pattern is valid")
});

/// Length of a canonical phone number.
const CANONICAL_LEN: usize = 11;

/// Normalize a free-form phone number into canonical form.
///
/// Returns [`Error::InvalidPhoneFormat`] when the input does not match.
pub fn normalize_phone(input: &str) -> Result<String> {
    let caps = PHONE_PATTERN
        .captures(input)
        .ok_or_else(|| Error::InvalidPhoneFormat(input.to_string()))?;

    let mut out = String::with_capacity(CANONICAL_LEN);
    out.push('8');
    for group in ["code", "gr1", "gr2", "gr3"] {
        out.push_str(&caps[group]);
    }
    Ok(out)
}

/// Whether a string is already in canonical form.
#[cfg(test)]
pub(crate) fn is_canonical(phone: &str) -> bool {
    phone.len() == CANONICAL_LEN
        && phone.starts_with('8')
        && phone.bytes().all(|b| b.is_ascii_digit())
}
