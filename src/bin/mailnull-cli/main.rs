mod args;
mod logging;
mod output;

use std::io::{self, BufRead, Write};
use std::sync::{Arc, mpsc};

use anyhow::{Context, Result, bail};
use mailnull::{Deliverability, VerificationResult, Verifier, WorkerPool};
use tracing::{debug, info};

use crate::args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format);

    let emails = collect_emails(&cli)?;
    if emails.is_empty() {
        bail!("no email provided");
    }

    let config = cli.engine_config()?;
    info!(
        mode = %config.mode,
        workers = config.workers,
        queue_capacity = config.queue_capacity,
        "starting mailnull"
    );

    let verifier = Arc::new(Verifier::from_config(&config));
    let pool = WorkerPool::start(verifier, config.workers, config.queue_capacity)
        .context("start worker pool")?;
    let results = verify_all(&pool, &emails)?;
    let completed = pool.shutdown();
    debug!(completed, "worker pool drained");

    let rendered = output::render(&results, cli.format, cli.pretty)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes()).context("write stdout")?;
    stdout.flush().context("flush stdout")?;

    // exit codes: 0 ok, 2 some address undeliverable, 1 fatal
    if results
        .iter()
        .any(|r| r.deliverability == Deliverability::Undeliverable)
    {
        std::process::exit(2);
    }
    Ok(())
}

/// Positional addresses first, then stdin lines. Blank lines are skipped.
fn collect_emails(cli: &Cli) -> Result<Vec<String>> {
    let mut emails = cli.emails.clone();
    if cli.stdin {
        for line in io::stdin().lock().lines() {
            let line = line.context("read stdin")?;
            let email = line.trim();
            if !email.is_empty() {
                emails.push(email.to_string());
            }
        }
    }
    Ok(emails)
}

/// Submits every address with its own sink and collects the results in
/// request order.
fn verify_all(pool: &WorkerPool, emails: &[String]) -> Result<Vec<VerificationResult>> {
    let mut pending = Vec::with_capacity(emails.len());
    for email in emails {
        let (tx, rx) = mpsc::channel();
        pool.submit(email.as_str(), tx)
            .with_context(|| format!("submit {email}"))?;
        pending.push(rx);
    }
    pending
        .into_iter()
        .zip(emails)
        .map(|(rx, email)| {
            rx.recv()
                .with_context(|| format!("no result for {email}"))
        })
        .collect()
}
