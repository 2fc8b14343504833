//! Canonical address syntax check.
//!
//! The accepted grammar is deliberately narrow: an ASCII local part, a single
//! `@`, and a dotted domain ending in an alphabetic TLD of two letters or more.

mod types;

pub use types::{Address, FormatError};

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email syntax pattern failed to compile. This is a bug.")
});

/// Returns `true` when `email` matches the canonical syntax. The input is not
/// trimmed.
pub fn is_valid_format(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Splits `email` around its `@`. Anything other than exactly two parts is
/// rejected.
pub fn split_address(email: &str) -> Result<Address<'_>, FormatError> {
    let parts = email.split('@').count();
    match email.split_once('@') {
        Some((local, domain)) if parts == 2 => Ok(Address { local, domain }),
        _ => Err(FormatError::Split { parts }),
    }
}

/// Syntax check followed by the split. This is the order the verifier applies.
pub fn parse_address(email: &str) -> Result<Address<'_>, FormatError> {
    if !is_valid_format(email) {
        return Err(FormatError::Syntax);
    }
    split_address(email)
}
