//! Per-case reports and the aggregate evaluation summary.

use std::io::Write;

use crate::metrics::MetricResult;

/// Outcome of a single metric on a single case.
#[derive(Debug, Clone)]
pub struct MetricOutcome {
    pub name: String,
    pub result: MetricResult,
}

/// Report for one graded test case.
#[derive(Debug, Clone)]
pub struct EvalReport {
    /// Case label: the prompt that was under test.
    pub case: String,
    /// Whether all metrics passed.
    pub passed: bool,
    /// Individual metric outcomes.
    pub metrics: Vec<MetricOutcome>,
    /// Wall-clock duration of the case, in milliseconds.
    pub duration_ms: u64,
}

impl EvalReport {
    pub fn new(case: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            case: case.into(),
            passed: true,
            metrics: Vec::new(),
            duration_ms,
        }
    }

    /// Add a metric outcome and update the passed status.
    pub fn add_metric(&mut self, name: impl Into<String>, result: MetricResult) {
        let passed = result.passed();
        self.metrics.push(MetricOutcome {
            name: name.into(),
            result,
        });
        if !passed {
            self.passed = false;
        }
    }

    /// Print a per-case summary to the terminal.
    pub fn print_summary<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        let status = if self.passed { "PASS" } else { "FAIL" };
        let status_color = if self.passed { "\x1b[32m" } else { "\x1b[31m" };
        let reset = "\x1b[0m";

        writeln!(
            w,
            "\n{}{}{} {} ({}ms)",
            status_color, status, reset, self.case, self.duration_ms
        )?;

        for metric in &self.metrics {
            let (icon, color) = match &metric.result {
                MetricResult::Pass => ("✓", "\x1b[32m"),
                MetricResult::Fail { .. } => ("✗", "\x1b[31m"),
                MetricResult::Score { value, max } => {
                    if *value >= *max * 0.7 {
                        ("●", "\x1b[32m")
                    } else {
                        ("●", "\x1b[33m")
                    }
                }
                MetricResult::Skip { .. } => ("○", "\x1b[90m"),
            };

            write!(w, "  {}{}{} {}", color, icon, reset, metric.name)?;

            match &metric.result {
                MetricResult::Fail { reason } => writeln!(w, ": {}", reason)?,
                MetricResult::Score { value, max } => writeln!(w, ": {:.1}/{:.1}", value, max)?,
                MetricResult::Skip { reason } => writeln!(w, ": {}", reason)?,
                MetricResult::Pass => writeln!(w)?,
            }
        }

        Ok(())
    }

    /// Convert to JSON for scripting.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "case": self.case,
            "passed": self.passed,
            "duration_ms": self.duration_ms,
            "metrics": self.metrics.iter().map(|m| {
                match &m.result {
                    MetricResult::Pass => serde_json::json!({
                        "name": m.name,
                        "status": "pass",
                    }),
                    MetricResult::Fail { reason } => serde_json::json!({
                        "name": m.name,
                        "status": "fail",
                        "reason": reason,
                    }),
                    MetricResult::Score { value, max } => serde_json::json!({
                        "name": m.name,
                        "status": "score",
                        "value": value,
                        "max": max,
                    }),
                    MetricResult::Skip { reason } => serde_json::json!({
                        "name": m.name,
                        "status": "skip",
                        "reason": reason,
                    }),
                }
            }).collect::<Vec<_>>(),
        })
    }
}

/// Aggregate over all graded cases.
#[derive(Debug, Default)]
pub struct EvalSummary {
    pub reports: Vec<EvalReport>,
    pub total_duration_ms: u64,
}

impl EvalSummary {
    pub fn add(&mut self, report: EvalReport) {
        self.total_duration_ms += report.duration_ms;
        self.reports.push(report);
    }

    pub fn passed_count(&self) -> usize {
        self.reports.iter().filter(|r| r.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.reports.iter().filter(|r| !r.passed).count()
    }

    pub fn pass_rate(&self) -> f64 {
        if self.reports.is_empty() {
            0.0
        } else {
            self.passed_count() as f64 / self.reports.len() as f64
        }
    }

    /// Print the aggregate summary.
    pub fn print_summary<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        for report in &self.reports {
            report.print_summary(w)?;
        }

        writeln!(w, "\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            w,
            "Results: {}/{} passed ({:.0}%)",
            self.passed_count(),
            self.reports.len(),
            self.pass_rate() * 100.0
        )?;
        writeln!(w, "Duration: {}ms", self.total_duration_ms)?;
        writeln!(w, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "total": self.reports.len(),
            "passed": self.passed_count(),
            "failed": self.failed_count(),
            "pass_rate": self.pass_rate(),
            "total_duration_ms": self.total_duration_ms,
            "cases": self.reports.iter().map(|r| r.to_json()).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_passed_tracking() {
        let mut report = EvalReport::new("list files", 12);
        report.add_metric("a", MetricResult::Pass);
        assert!(report.passed);

        report.add_metric(
            "b",
            MetricResult::Fail {
                reason: "nope".to_string(),
            },
        );
        assert!(!report.passed);
    }

    #[test]
    fn test_skip_does_not_fail_report() {
        let mut report = EvalReport::new("case", 1);
        report.add_metric(
            "a",
            MetricResult::Skip {
                reason: "n/a".to_string(),
            },
        );
        assert!(report.passed);
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = EvalSummary::default();

        let mut pass = EvalReport::new("one", 10);
        pass.add_metric("m", MetricResult::Pass);
        summary.add(pass);

        let mut fail = EvalReport::new("two", 15);
        fail.add_metric(
            "m",
            MetricResult::Fail {
                reason: "bad".to_string(),
            },
        );
        summary.add(fail);

        assert_eq!(summary.passed_count(), 1);
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.pass_rate(), 0.5);
        assert_eq!(summary.total_duration_ms, 25);
    }

    #[test]
    fn test_summary_json_shape() {
        let mut summary = EvalSummary::default();
        let mut report = EvalReport::new("one", 10);
        report.add_metric("m", MetricResult::Pass);
        summary.add(report);

        let json = summary.to_json();
        assert_eq!(json["total"], 1);
        assert_eq!(json["passed"], 1);
        assert_eq!(json["cases"][0]["case"], "one");
        assert_eq!(json["cases"][0]["metrics"][0]["status"], "pass");
    }
}
