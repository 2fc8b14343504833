//! Disposable-domain lookup table.
//!
//! The set is built once and handed to the verifier; it is never mutated
//! afterwards, so workers share it through the verifier's `Arc` without locking.

use std::collections::HashSet;

use phf::{Set, phf_set};

static BUILTIN: Set<&'static str> = phf_set! {
    "mailinator.com",
    "guerrillamail.com",
    "temp-mail.org",
    "10minutemail.com",
    "yopmail.com",
    "trashmail.com",
    "sharklasers.com",
    "getnada.com",
    "dispostable.com",
    "maildrop.cc",
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisposableDomains {
    domains: HashSet<String>,
}

impl DisposableDomains {
    /// An empty table. Nothing is flagged.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The compiled-in list of well-known throwaway providers.
    pub fn builtin() -> Self {
        Self::from_domains(BUILTIN.iter().copied())
    }

    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::empty().with_extra(domains)
    }

    /// Adds `domains` to the table. Blank entries are ignored.
    pub fn with_extra<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for domain in domains {
            let key = normalize(domain.as_ref());
            if !key.is_empty() {
                self.domains.insert(key);
            }
        }
        self
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(&normalize(domain))
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

fn normalize(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_flags_known_providers() {
        let table = DisposableDomains::builtin();
        assert!(table.contains("mailinator.com"));
        assert!(table.contains("guerrillamail.com"));
        assert!(table.contains("temp-mail.org"));
        assert!(!table.contains("example.com"));
        assert_eq!(table.len(), BUILTIN.len());
    }

    #[test]
    fn lookup_ignores_case_and_trailing_dot() {
        let table = DisposableDomains::builtin();
        assert!(table.contains("Mailinator.COM"));
        assert!(table.contains("mailinator.com."));
    }

    #[test]
    fn extra_domains_extend_the_table() {
        let table = DisposableDomains::builtin().with_extra(["burner.test", "  ", "Spam.Example"]);
        assert!(table.contains("burner.test"));
        assert!(table.contains("spam.example"));
        assert_eq!(table.len(), BUILTIN.len() + 2);
    }

    #[test]
    fn empty_table_flags_nothing() {
        let table = DisposableDomains::empty();
        assert!(table.is_empty());
        assert!(!table.contains("mailinator.com"));
    }
}
