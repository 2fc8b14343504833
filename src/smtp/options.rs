use std::time::Duration;

/// Tunables for [`SmtpProbe`](crate::smtp::SmtpProbe).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub port: u16,
    pub connect_timeout: Duration,
    /// Budget for everything after the TCP connect (greeting, hello, MAIL,
    /// RCPT). `None` disables it.
    pub handshake_deadline: Option<Duration>,
    pub helo_identity: String,
    pub mail_from: String,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            connect_timeout: Duration::from_secs(5),
            handshake_deadline: Some(Duration::from_secs(15)),
            helo_identity: "mailnull.com".to_string(),
            mail_from: "verify@mailnull.com".to_string(),
        }
    }
}

impl ProbeOptions {
    /// Name announced in `EHLO`/`HELO`. Falls back to `localhost` when unset.
    pub fn helo_name(&self) -> &str {
        let name = self.helo_identity.trim();
        if name.is_empty() { "localhost" } else { name }
    }

    /// Reverse path used in `MAIL FROM`. When unset a `postmaster@` address
    /// at the HELO name is synthesised.
    pub fn envelope_sender(&self) -> String {
        let sender = self.mail_from.trim();
        if sender.is_empty() {
            format!("postmaster@{}", self.helo_name())
        } else {
            sender.to_string()
        }
    }
}
