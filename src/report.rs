use crate::stress::StressReport;
use serde_json::{json, Value};

const MAX_LISTED: usize = 10;

/// Human-readable summary of a stress run.
pub fn render_text(report: &StressReport) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str(&format!("  ringcheck {} run, size {}  ({})\n", report.mode, report.size, now));
    out.push_str("═══════════════════════════════════════════════\n\n");

    if let Some(seed) = report.seed {
        out.push_str(&format!("  seed: {}\n", seed));
    }
    out.push_str(&format!("  {} of {} passed\n", report.passed, report.cases_run));

    if report.metatest {
        out.push_str(&format!(
            "  metatest: {} corrupted, {} undetected\n",
            report.corrupted,
            report.undetected()
        ));
    }

    let genuine: Vec<_> = report.failures.iter().filter(|f| !f.corrupted).collect();
    if !genuine.is_empty() {
        out.push_str(&format!("\n── Failures ({}) ─────────────────────────────\n", genuine.len()));
        for f in genuine.iter().take(MAX_LISTED) {
            out.push_str(&format!("  {}:\n    Expected {:?}\n         Got {:?}\n", f.case, f.expected, f.got));
        }
        if genuine.len() > MAX_LISTED {
            out.push_str(&format!("  … {} more\n", genuine.len() - MAX_LISTED));
        }
    }

    out.push('\n');
    out.push_str(if report.ok() { "  ● OK\n" } else { "  ✖ FAILED\n" });
    out
}

pub fn render_json(report: &StressReport) -> Value {
    json!({
        "ringcheck_version": env!("CARGO_PKG_VERSION"),
        "timestamp":  chrono::Local::now().to_rfc3339(),
        "ok":         report.ok(),
        "undetected": report.undetected(),
        "report":     report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stress::CaseOutcome;

    fn failing() -> StressReport {
        StressReport {
            mode: "sweep",
            size: 3,
            cases_run: 2,
            passed: 1,
            failures: vec![CaseOutcome {
                case: "size=3 insertions=2 depth=1".into(),
                expected: vec![1, -1, 0],
                got: vec![1, 0, -1],
                corrupted: false,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn text_lists_failures() {
        let text = render_text(&failing());
        assert!(text.contains("1 of 2 passed"));
        assert!(text.contains("Expected [1, -1, 0]"));
        assert!(text.contains("FAILED"));
    }

    #[test]
    fn json_carries_report() {
        let v = render_json(&failing());
        assert_eq!(v["ok"], false);
        assert_eq!(v["report"]["cases_run"], 2);
        assert_eq!(v["report"]["failures"][0]["got"], json!([1, 0, -1]));
    }
}
