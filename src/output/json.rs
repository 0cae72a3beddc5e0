use crate::error::Result;
use crate::GateReport;

/// Render a gate report as pretty-printed JSON.
pub fn render(report: &GateReport) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Outcome, Policy, PolicyAxis, SeverityCount, Verdict};

    #[test]
    fn renders_counts_outcomes_and_verdict() {
        let counts = SeverityCount::new(2, 0);
        let report = GateReport {
            target: ".".into(),
            counts,
            policy: Policy {
                fail_on: PolicyAxis::HighOnly,
                warn_on: PolicyAxis::Unset,
            },
            outcomes: vec![Outcome::Fail(counts.explain())],
            verdict: Verdict::Fail,
            generated_at: chrono::Utc::now(),
        };

        let value: serde_json::Value = serde_json::from_str(&render(&report).unwrap()).unwrap();
        assert_eq!(value["counts"]["high"], 2);
        assert_eq!(value["policy"]["fail_on"], "high");
        assert_eq!(value["policy"]["warn_on"], "unset");
        assert_eq!(value["outcomes"][0]["level"], "fail");
        assert_eq!(value["verdict"], "fail");
        assert!(value["generated_at"].is_string());
    }
}
