//! Runtime configuration: operating mode, pool sizing and probe tunables.
//!
//! Values start from [`EngineConfig::default`], may be overlaid by a TOML
//! [`ConfigFile`], and are finally overridden by the caller (the CLI maps its
//! flags and environment variables onto the public fields).

mod error;
mod file;

pub use error::ConfigError;
pub use file::ConfigFile;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::disposable::DisposableDomains;
use crate::smtp::ProbeOptions;

/// How deep the verification pipeline goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// MX lookup followed by an SMTP probe.
    #[default]
    Live,
    /// MX lookup only.
    Lite,
    /// Deterministic classification without any network access.
    Mock,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("live") {
            Ok(Self::Live)
        } else if value.eq_ignore_ascii_case("lite") {
            Ok(Self::Lite)
        } else if value.eq_ignore_ascii_case("mock") {
            Ok(Self::Mock)
        } else {
            Err(ConfigError::UnknownMode(value.to_string()))
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Live => "LIVE",
            Self::Lite => "LITE",
            Self::Mock => "MOCK",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub mode: Mode,
    pub workers: usize,
    pub queue_capacity: usize,
    pub probe: ProbeOptions,
    /// Added on top of the built-in disposable list.
    pub extra_disposable_domains: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Live,
            workers: 10,
            queue_capacity: 100,
            probe: ProbeOptions::default(),
            extra_disposable_domains: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with the TOML file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw).map_err(|source| ConfigError::Parse { source })?;
        let mut config = Self::default();
        config.apply(file)?;
        Ok(config)
    }

    /// Overlays every key present in `file`.
    pub fn apply(&mut self, file: ConfigFile) -> Result<(), ConfigError> {
        let ConfigFile {
            engine,
            smtp,
            disposable,
        } = file;

        if let Some(mode) = engine.mode {
            self.mode = mode.parse()?;
        }
        if let Some(workers) = engine.workers {
            self.workers = workers;
        }
        if let Some(capacity) = engine.queue_capacity {
            self.queue_capacity = capacity;
        }

        if let Some(port) = smtp.port {
            self.probe.port = port;
        }
        if let Some(ms) = smtp.connect_timeout_ms {
            self.probe.connect_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = smtp.handshake_deadline_ms {
            self.probe.handshake_deadline = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(helo) = smtp.helo_identity {
            self.probe.helo_identity = helo;
        }
        if let Some(mail_from) = smtp.mail_from {
            self.probe.mail_from = mail_from;
        }

        if let Some(domains) = disposable.extra_domains {
            self.extra_disposable_domains.extend(domains);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "queue_capacity must be at least 1".into(),
            ));
        }
        if self.probe.connect_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "connect timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Built-in disposable list plus the configured extras.
    pub fn disposable_domains(&self) -> DisposableDomains {
        DisposableDomains::builtin().with_extra(&self.extra_disposable_domains)
    }
}
