//! Structure of the TOML configuration file. Every key is optional; missing
//! keys keep their default.

use serde::Deserialize;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub(crate) engine: EngineSection,
    #[serde(default)]
    pub(crate) smtp: SmtpSection,
    #[serde(default)]
    pub(crate) disposable: DisposableSection,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct EngineSection {
    pub(crate) mode: Option<String>,
    pub(crate) workers: Option<usize>,
    pub(crate) queue_capacity: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct SmtpSection {
    pub(crate) port: Option<u16>,
    pub(crate) connect_timeout_ms: Option<u64>,
    /// `0` disables the deadline.
    pub(crate) handshake_deadline_ms: Option<u64>,
    pub(crate) helo_identity: Option<String>,
    pub(crate) mail_from: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct DisposableSection {
    pub(crate) extra_domains: Option<Vec<String>>,
}
