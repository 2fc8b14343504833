use std::fmt;

/// The two booleans a probe reports: whether the mailbox was accepted and
/// whether the answer is ambiguous (catch-all, or no conclusive answer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeSignal {
    pub deliverable: bool,
    pub ambiguous: bool,
}

impl ProbeSignal {
    /// Target accepted, random recipient refused.
    pub const ACCEPTED: Self = Self::new(true, false);
    /// Target and random recipient both accepted.
    pub const CATCH_ALL: Self = Self::new(true, true);
    /// Target refused with a 5xx.
    pub const REJECTED: Self = Self::new(false, false);
    /// Connection, handshake or reply failure.
    pub const INCONCLUSIVE: Self = Self::new(false, true);

    pub const fn new(deliverable: bool, ambiguous: bool) -> Self {
        Self {
            deliverable,
            ambiguous,
        }
    }
}

/// Step of the handshake, used to label failures in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStage {
    Connect,
    Greeting,
    Hello,
    MailFrom,
    RcptTo,
    CatchAll,
}

impl fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Greeting => "greeting",
            Self::Hello => "hello",
            Self::MailFrom => "mail-from",
            Self::RcptTo => "rcpt-to",
            Self::CatchAll => "catch-all",
        })
    }
}
