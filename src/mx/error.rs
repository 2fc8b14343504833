use std::io;

use thiserror::Error;
use trust_dns_resolver::error::ResolveError;

/// Why the mail servers of a domain could not be determined.
#[derive(Debug, Error)]
pub enum MxError {
    #[error("empty domain")]
    EmptyDomain,
    #[error("'{domain}' is not a valid IDNA domain")]
    InvalidDomain {
        domain: String,
        #[source]
        source: idna::Errors,
    },
    #[error("cannot load the system resolver configuration: {source}")]
    ResolverConfig {
        #[source]
        source: io::Error,
    },
    #[error("MX query for {domain} failed: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: ResolveError,
    },
}
