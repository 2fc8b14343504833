use anyhow::Result;
use mailnull::VerificationResult;
use serde::Serialize;

use crate::args::OutputFormat;

#[derive(Serialize)]
struct Batch<'a> {
    results: &'a [VerificationResult],
}

/// One address renders as a bare object, several as `{"results": [...]}`.
pub fn render(
    results: &[VerificationResult],
    format: OutputFormat,
    pretty: bool,
) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            match results {
                [single] => out.push_str(&to_json(single, pretty)?),
                _ => out.push_str(&to_json(&Batch { results }, pretty)?),
            }
            out.push('\n');
        }
        OutputFormat::Ndjson => {
            for result in results {
                out.push_str(&serde_json::to_string(result)?);
                out.push('\n');
            }
        }
        OutputFormat::Human => {
            for result in results {
                out.push_str(&human_line(result));
                out.push('\n');
            }
        }
    }
    Ok(out)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn human_line(result: &VerificationResult) -> String {
    let mut line = format!(
        "[{}] {} score={:.2} provider={}",
        result.deliverability, result.email, result.quality_score, result.provider
    );
    if result.is_disposable_email {
        line.push_str(" disposable");
    }
    if let Some(error) = &result.error {
        line.push_str(" :: ");
        line.push_str(error);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mailnull::Outcome;

    fn sample(email: &str, outcome: Outcome) -> VerificationResult {
        let timestamp = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let provider = email.split_once('@').map(|(_, domain)| domain);
        VerificationResult::from_outcome(email, provider, outcome, timestamp)
    }

    #[test]
    fn single_result_is_a_bare_object() {
        let out = render(&[sample("a@b.com", Outcome::MockRisky)], OutputFormat::Json, false)
            .expect("render");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["email"], "a@b.com");
        assert!(value.get("results").is_none());
    }

    #[test]
    fn several_results_keep_request_order() {
        let results = [
            sample("z@b.com", Outcome::MockDeliverable),
            sample("a@b.com", Outcome::MockRisky),
        ];
        let out = render(&results, OutputFormat::Json, true).expect("render");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        let emails: Vec<_> = value["results"]
            .as_array()
            .expect("results array")
            .iter()
            .map(|r| r["email"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(emails, ["z@b.com", "a@b.com"]);
    }

    #[test]
    fn ndjson_prints_one_line_per_result() {
        let results = [
            sample("a@b.com", Outcome::MockRisky),
            sample("c@d.com", Outcome::MxPresent),
        ];
        let out = render(&results, OutputFormat::Ndjson, false).expect("render");
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn human_line_shows_error_text() {
        let line = human_line(&sample("user@example.com", Outcome::CatchAll));
        assert_eq!(
            line,
            "[RISKY] user@example.com score=0.50 provider=example.com :: Catch-all domain detected"
        );
    }
}
