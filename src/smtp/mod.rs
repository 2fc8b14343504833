//! SMTP mailbox probe.
//!
//! [`SmtpProbe`] opens one connection to the most preferred MX host and walks
//! it through greeting, `EHLO`/`HELO`, `MAIL FROM` and `RCPT TO`. An accepted
//! recipient is followed by a second `RCPT TO` for a random local part to
//! detect catch-all domains. Nothing is ever delivered: the connection is
//! dropped before `DATA`.
//!
//! Failures never escape the probe; they become [`ProbeSignal::INCONCLUSIVE`].

mod error;
mod options;
mod session;
mod state;
mod types;
mod util;

pub use error::ProbeError;
pub use options::ProbeOptions;
pub use session::{SmtpReply, Transport};
pub use types::{ProbeSignal, ProbeStage};
pub use util::{FixedLocalPart, LocalPartGenerator, RandomLocalPart};

use std::net::TcpStream;

use tracing::debug;

use crate::mx::MxRecord;
use session::connect_host;
use state::{ProbeContext, ProbeState};

/// Anything that can judge whether a mailbox accepts mail.
pub trait MailboxProbe: Send + Sync {
    /// `hosts` is ordered by preference; implementations may only use the
    /// first entry.
    fn probe(&self, email: &str, domain: &str, hosts: &[MxRecord]) -> ProbeSignal;
}

/// Live SMTP implementation of [`MailboxProbe`].
pub struct SmtpProbe {
    options: ProbeOptions,
    local_parts: Box<dyn LocalPartGenerator>,
}

impl SmtpProbe {
    pub fn new(options: ProbeOptions) -> Self {
        Self {
            options,
            local_parts: Box::new(RandomLocalPart::default()),
        }
    }

    /// Replaces the generator used for the catch-all recipient.
    pub fn with_local_parts<G>(mut self, generator: G) -> Self
    where
        G: LocalPartGenerator + 'static,
    {
        self.local_parts = Box::new(generator);
        self
    }
}

impl Default for SmtpProbe {
    fn default() -> Self {
        Self::new(ProbeOptions::default())
    }
}

impl MailboxProbe for SmtpProbe {
    fn probe(&self, email: &str, domain: &str, hosts: &[MxRecord]) -> ProbeSignal {
        let Some(primary) = hosts.first() else {
            debug!(%domain, "no MX host to probe");
            return ProbeSignal::INCONCLUSIVE;
        };
        let host = primary.exchange.as_str();
        let connect = || -> Result<TcpStream, ProbeError> {
            connect_host(host, self.options.port, self.options.connect_timeout)
        };
        let mail_from = self.options.envelope_sender();
        let ctx = ProbeContext {
            connect: &connect,
            handshake_deadline: self.options.handshake_deadline,
            helo_name: self.options.helo_name(),
            mail_from: &mail_from,
            target: email,
            domain,
            local_parts: self.local_parts.as_ref(),
        };
        let signal = ProbeState::Disconnected.run(&ctx);
        debug!(%host, %domain, ?signal, "SMTP probe finished");
        signal
    }
}
