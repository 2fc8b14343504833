//! The verification decision pipeline.
//!
//! [`Verifier::verify`] applies, in order: syntax check, address split,
//! disposable-domain lookup, (MOCK) deterministic classification, MX lookup,
//! (LITE) MX-only verdict, and (LIVE) the SMTP probe. The first conclusive
//! branch wins. Nothing in here returns an error; every failure ends up in
//! the [`VerificationResult`].

mod mock;
mod types;

pub use mock::mock_bucket;
pub use types::{Deliverability, Outcome, UNKNOWN_PROVIDER, VerificationResult, Verdict};

use chrono::Utc;
use tracing::{debug, info};

use crate::config::{EngineConfig, Mode};
use crate::disposable::DisposableDomains;
use crate::mx::{self, LookupMx, SystemResolver};
use crate::smtp::{MailboxProbe, SmtpProbe};
use crate::validator::{self, FormatError};

pub struct Verifier {
    mode: Mode,
    disposable: DisposableDomains,
    resolver: Box<dyn LookupMx>,
    probe: Box<dyn MailboxProbe>,
}

impl Verifier {
    /// A verifier backed by the system resolver and a default [`SmtpProbe`].
    pub fn new(mode: Mode, disposable: DisposableDomains) -> Self {
        Self {
            mode,
            disposable,
            resolver: Box::new(SystemResolver),
            probe: Box::new(SmtpProbe::default()),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.mode, config.disposable_domains())
            .with_probe(SmtpProbe::new(config.probe.clone()))
    }

    pub fn with_resolver<R>(mut self, resolver: R) -> Self
    where
        R: LookupMx + 'static,
    {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_probe<P>(mut self, probe: P) -> Self
    where
        P: MailboxProbe + 'static,
    {
        self.probe = Box::new(probe);
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn verify(&self, email: &str) -> VerificationResult {
        let timestamp = Utc::now();
        let (provider, outcome) = self.evaluate(email);
        debug!(%email, ?outcome, "verification finished");
        VerificationResult::from_outcome(email, provider, outcome, timestamp)
    }

    /// Returns the provider (domain) when the address could be split, and the
    /// deciding branch.
    fn evaluate<'e>(&self, email: &'e str) -> (Option<&'e str>, Outcome) {
        let address = match validator::parse_address(email) {
            Ok(address) => address,
            Err(FormatError::Syntax) => return (None, Outcome::InvalidFormat),
            Err(err) => {
                debug!(%email, error = %err, "address could not be split");
                return (None, Outcome::Unsplittable);
            }
        };
        let domain = address.domain;
        (Some(domain), self.classify_domain(email, domain))
    }

    fn classify_domain(&self, email: &str, domain: &str) -> Outcome {
        if self.disposable.contains(domain) {
            return Outcome::Disposable;
        }

        if self.mode == Mode::Mock {
            return mock::classify(email);
        }

        let status = match mx::resolve_with(self.resolver.as_ref(), domain) {
            Ok(status) => status,
            Err(err) => {
                info!(error = %err, "MX lookup failed");
                return Outcome::NoMailServer;
            }
        };
        let hosts = status.records();
        if hosts.is_empty() {
            debug!(%domain, "no MX records");
            return Outcome::NoMailServer;
        }

        if self.mode == Mode::Lite {
            return Outcome::MxPresent;
        }

        let signal = self.probe.probe(email, domain, hosts);
        if signal.ambiguous && !signal.deliverable {
            info!(%domain, host = %hosts[0].exchange, "SMTP probe inconclusive");
        }
        Outcome::from_signal(signal)
    }
}
