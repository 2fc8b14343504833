use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mailnull::EngineConfig;

#[derive(Parser)]
#[command(name = "mailnull-cli", version, about = "Email deliverability verification")]
pub struct Cli {
    /// addresses to verify
    pub emails: Vec<String>,

    /// also read addresses from stdin (one per line)
    #[arg(long)]
    pub stdin: bool,

    /// mode: LIVE|LITE|MOCK (default LIVE)
    #[arg(long, env = "MODE")]
    pub mode: Option<String>,

    /// TOML config file, overridden by flags and environment
    #[arg(long, env = "MAILNULL_CONFIG")]
    pub config: Option<PathBuf>,

    /// number of worker threads
    #[arg(long)]
    pub workers: Option<usize>,

    /// pending jobs accepted before submission blocks
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// SMTP port of the MX hosts
    #[arg(long)]
    pub port: Option<u16>,

    /// TCP connect timeout (ms)
    #[arg(long = "connect-timeout")]
    pub connect_timeout_ms: Option<u64>,

    /// deadline for the whole SMTP conversation (ms, 0 disables)
    #[arg(long = "deadline")]
    pub handshake_deadline_ms: Option<u64>,

    /// name announced in EHLO/HELO
    #[arg(long)]
    pub helo: Option<String>,

    /// envelope sender for MAIL FROM
    #[arg(long = "from")]
    pub mail_from: Option<String>,

    /// output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// log filter, e.g. INFO or mailnull=debug
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// log format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Ndjson,
    Human,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Defaults, then the config file, then flags and environment.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)
                .with_context(|| format!("load config {}", path.display()))?,
            None => EngineConfig::default(),
        };

        if let Some(mode) = &self.mode {
            config.mode = mode.parse().context("invalid MODE")?;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
        if let Some(port) = self.port {
            config.probe.port = port;
        }
        if let Some(ms) = self.connect_timeout_ms {
            config.probe.connect_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.handshake_deadline_ms {
            config.probe.handshake_deadline = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(helo) = &self.helo {
            config.probe.helo_identity = helo.clone();
        }
        if let Some(mail_from) = &self.mail_from {
            config.probe.mail_from = mail_from.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailnull::Mode;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mailnull-cli").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "--mode",
            "mock",
            "--workers",
            "3",
            "--deadline",
            "0",
            "--from",
            "probe@example.net",
            "a@example.com",
            "b@example.com",
        ]);
        assert_eq!(cli.emails, ["a@example.com", "b@example.com"]);
        let config = cli.engine_config().expect("valid config");
        assert_eq!(config.mode, Mode::Mock);
        assert_eq!(config.workers, 3);
        assert_eq!(config.queue_capacity, 100);
        assert_eq!(config.probe.handshake_deadline, None);
        assert_eq!(config.probe.mail_from, "probe@example.net");
    }

    #[test]
    fn unknown_mode_is_fatal() {
        let cli = parse(&["--mode", "turbo", "a@example.com"]);
        assert!(cli.engine_config().is_err());
    }

    #[test]
    fn zero_workers_is_fatal() {
        let cli = parse(&["--workers", "0", "a@example.com"]);
        assert!(cli.engine_config().is_err());
    }
}
