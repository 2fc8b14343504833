#![forbid(unsafe_code)]
//! mailnull: email deliverability verification.
//!
//! An address goes through a syntax check, a disposable-domain lookup, an MX
//! lookup and (in LIVE mode) an SMTP probe. See [`Verifier`] for direct use and
//! [`WorkerPool`] for bounded concurrent verification.

pub mod config;
pub mod disposable;
pub mod mx;
pub mod pool;
pub mod smtp;
pub mod validator;
pub mod verifier;

pub use config::{ConfigError, ConfigFile, EngineConfig, Mode};
pub use disposable::DisposableDomains;
pub use mx::{Error as MxError, LookupMx, MxRecord, MxStatus, SystemResolver, check_mx};
pub use pool::{PoolError, ResultSink, WorkerPool};
pub use smtp::{MailboxProbe, ProbeError, ProbeOptions, ProbeSignal, SmtpProbe};
pub use validator::{Address, FormatError, is_valid_format, parse_address};
pub use verifier::{Deliverability, Outcome, VerificationResult, Verifier};
