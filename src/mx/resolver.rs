use trust_dns_resolver::{Resolver, error::ResolveErrorKind};

use super::{Error, MxRecord, MxStatus};

/// Source of MX records for a domain.
///
/// Implementations must report "the domain has no MX records" as an empty
/// list rather than an error.
pub trait LookupMx: Send + Sync {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error>;
}

/// Lookup through the host's resolver configuration.
///
/// A fresh resolver is built for every lookup, so no answer is cached between
/// two verifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl LookupMx for SystemResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        let resolver =
            Resolver::from_system_conf().map_err(|source| Error::ResolverConfig { source })?;
        let lookup = match resolver.mx_lookup(domain) {
            Ok(lookup) => lookup,
            Err(err) if matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(Error::Lookup {
                    domain: domain.to_string(),
                    source,
                });
            }
        };
        Ok(lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(&mx.exchange().to_utf8())))
            .collect())
    }
}

/// Lookup MX records for `domain` using the system resolver.
pub fn check_mx(domain: &str) -> Result<MxStatus, Error> {
    resolve_with(&SystemResolver, domain)
}

/// Normalizes `domain` via IDNA, queries `resolver` and returns the records
/// sorted by ascending preference with duplicates removed.
pub fn resolve_with<R>(resolver: &R, domain: &str) -> Result<MxStatus, Error>
where
    R: LookupMx + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    let records = resolver.lookup_mx(&ascii)?;
    Ok(MxStatus::from_records(records))
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(|source| Error::InvalidDomain {
        domain: trimmed.to_string(),
        source,
    })
}

/// Exchange names come back fully qualified; the trailing root dot is dropped.
pub(crate) fn normalize_exchange(exchange: &str) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}
