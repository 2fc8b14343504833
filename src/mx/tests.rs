use super::{Error, LookupMx, MxRecord, MxStatus, resolver};
use trust_dns_resolver::error::ResolveError;

type LookupResult = Result<Vec<MxRecord>, Error>;
type LookupFn = dyn Fn(&str) -> LookupResult + Send + Sync;

pub(crate) struct StubResolver {
    pub on_lookup: Box<LookupFn>,
}

impl StubResolver {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> LookupResult + Send + Sync + 'static,
    {
        Self {
            on_lookup: Box::new(f),
        }
    }

    /// Answers every query with `records`.
    pub(crate) fn answering(records: Vec<MxRecord>) -> Self {
        Self::new(move |_| Ok(records.clone()))
    }

    pub(crate) fn failing(message: &'static str) -> Self {
        Self::new(move |domain| {
            Err(Error::Lookup {
                domain: domain.to_string(),
                source: ResolveError::from(message),
            })
        })
    }

    /// Fails the test if the verifier reaches DNS at all.
    pub(crate) fn unreachable() -> Self {
        Self::new(|domain| panic!("unexpected MX lookup for {domain}"))
    }
}

impl LookupMx for StubResolver {
    fn lookup_mx(&self, domain: &str) -> LookupResult {
        (self.on_lookup)(domain)
    }
}

#[test]
fn normalize_domain_rejects_empty() {
    let err = resolver::normalize_domain("  ").expect_err("empty domain should fail");
    assert!(matches!(err, Error::EmptyDomain));
}

#[test]
fn normalize_domain_lowercases() {
    let ascii = resolver::normalize_domain("Example.COM").expect("valid domain");
    assert_eq!(ascii, "example.com");
}

#[test]
fn resolve_with_sorts_and_dedups_records() {
    let stub = StubResolver::new(|domain| {
        assert_eq!(domain, "example.com");
        Ok(vec![
            MxRecord::new(20, "mx2.example.com"),
            MxRecord::new(10, "mx1.example.com"),
            MxRecord::new(10, "mx1.example.com"),
            MxRecord::new(30, "mx3.example.com"),
        ])
    });

    let status = resolver::resolve_with(&stub, "example.com").expect("lookup succeeds");
    let records = status.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].preference, 10);
    assert_eq!(records[0].exchange, "mx1.example.com");
    assert_eq!(records[2].preference, 30);
}

#[test]
fn resolve_with_handles_no_records() {
    let stub = StubResolver::answering(Vec::new());
    let status = resolver::resolve_with(&stub, "example.com").expect("lookup succeeds");
    assert!(matches!(status, MxStatus::NoRecords));
    assert!(status.records().is_empty());
}

#[test]
fn resolve_with_propagates_lookup_failure() {
    let stub = StubResolver::failing("SERVFAIL");
    let err = resolver::resolve_with(&stub, "example.com").expect_err("lookup fails");
    assert!(matches!(err, Error::Lookup { ref domain, .. } if domain == "example.com"));
    assert!(err.to_string().contains("example.com"), "{err}");
}

#[test]
fn normalize_exchange_trims_dot_and_lowercases() {
    let out = resolver::normalize_exchange("Mail.EXAMPLE.com.");
    assert_eq!(out, "mail.example.com");
}
