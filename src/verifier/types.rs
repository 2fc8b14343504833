use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::smtp::ProbeSignal;
use crate::validator;

/// Provider reported when the address could not be parsed.
pub const UNKNOWN_PROVIDER: &str = "unknown";

pub(crate) const CATCH_ALL_ERROR: &str = "Catch-all domain detected";
pub(crate) const PROBE_FAILED_ERROR: &str = "Verification failed due to network/timeout";
pub(crate) const INTERNAL_ERROR: &str = "Internal verification failure";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Deliverability {
    Deliverable,
    Undeliverable,
    Risky,
    Unknown,
}

impl fmt::Display for Deliverability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Deliverable => "DELIVERABLE",
            Self::Undeliverable => "UNDELIVERABLE",
            Self::Risky => "RISKY",
            Self::Unknown => "UNKNOWN",
        })
    }
}

/// Which pipeline branch decided the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    InvalidFormat,
    Unsplittable,
    Disposable,
    MockUndeliverable,
    MockRisky,
    MockDeliverable,
    NoMailServer,
    MxPresent,
    CatchAll,
    MailboxAccepted,
    ProbeInconclusive,
    MailboxRejected,
    InternalFailure,
}

/// Classification, score and error text of one [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub deliverability: Deliverability,
    pub score: f64,
    pub error: Option<&'static str>,
}

impl Outcome {
    pub fn verdict(self) -> Verdict {
        use Deliverability::{Deliverable, Risky, Undeliverable, Unknown};
        let (deliverability, score, error) = match self {
            Self::InvalidFormat | Self::Unsplittable => (Undeliverable, 0.0, None),
            Self::Disposable => (Risky, 0.4, None),
            Self::MockUndeliverable => (Undeliverable, 0.1, None),
            Self::MockRisky => (Risky, 0.5, None),
            Self::MockDeliverable => (Deliverable, 0.95, None),
            Self::NoMailServer => (Undeliverable, 0.0, None),
            Self::MxPresent => (Deliverable, 0.7, None),
            Self::CatchAll => (Risky, 0.5, Some(CATCH_ALL_ERROR)),
            Self::MailboxAccepted => (Deliverable, 0.9, None),
            Self::ProbeInconclusive => (Risky, 0.5, Some(PROBE_FAILED_ERROR)),
            Self::MailboxRejected => (Undeliverable, 0.1, None),
            Self::InternalFailure => (Unknown, 0.0, Some(INTERNAL_ERROR)),
        };
        Verdict {
            deliverability,
            score,
            error,
        }
    }

    /// Maps a probe's `(deliverable, ambiguous)` pair onto an outcome.
    pub fn from_signal(signal: ProbeSignal) -> Self {
        match (signal.deliverable, signal.ambiguous) {
            (true, true) => Self::CatchAll,
            (true, false) => Self::MailboxAccepted,
            (false, true) => Self::ProbeInconclusive,
            (false, false) => Self::MailboxRejected,
        }
    }
}

/// The serialized verification record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub email: String,
    pub is_valid_format: bool,
    pub is_disposable_email: bool,
    pub deliverability: Deliverability,
    pub quality_score: f64,
    pub provider: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationResult {
    /// Builds the record for `outcome`. Deliverability, score and error all
    /// come from the same [`Verdict`].
    pub fn from_outcome(
        email: &str,
        provider: Option<&str>,
        outcome: Outcome,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let verdict = outcome.verdict();
        Self {
            email: email.to_string(),
            is_valid_format: outcome != Outcome::InvalidFormat,
            is_disposable_email: outcome == Outcome::Disposable,
            deliverability: verdict.deliverability,
            quality_score: verdict.score,
            provider: provider.unwrap_or(UNKNOWN_PROVIDER).to_string(),
            timestamp,
            error: verdict.error.map(str::to_string),
        }
    }

    /// Record substituted when verifying `email` panicked.
    pub fn internal_failure(email: &str) -> Self {
        let provider = validator::split_address(email).ok().map(|a| a.domain);
        Self {
            is_valid_format: validator::is_valid_format(email),
            ..Self::from_outcome(email, provider, Outcome::InternalFailure, Utc::now())
        }
    }
}
