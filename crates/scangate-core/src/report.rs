//! 扫描报告（对外输出的 JSON 结构）
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::outcome::{OutcomeKind, ScanOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
    Error,
    /// 不适用，不计为错误
    Skipped,
}

/// 单个扫描器的报告
#[derive(Debug, Clone, Serialize)]
pub struct ScannerReport {
    pub scanner: String,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ScanOutcome>,
    pub running_time_ms: u128,
}

impl ScannerReport {
    pub fn skipped(scanner: &str) -> Self {
        Self { scanner: scanner.to_string(), status: ReportStatus::Skipped, outcome: None, running_time_ms: 0 }
    }

    pub fn from_outcome(scanner: &str, outcome: ScanOutcome, running_time_ms: u128) -> Self {
        let status = match outcome.kind() {
            OutcomeKind::Clean => ReportStatus::Passed,
            OutcomeKind::Findings => ReportStatus::Failed,
            OutcomeKind::ToolFault => ReportStatus::Error,
        };
        Self { scanner: scanner.to_string(), status, outcome: Some(outcome), running_time_ms }
    }

    pub fn message(&self) -> Option<&str> {
        self.outcome.as_ref().and_then(|o| o.message())
    }
}

/// 一次运行的汇总
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub project_path: PathBuf,
    pub passed: bool,
    pub scanners: Vec<ScannerReport>,
}

impl ScanSummary {
    pub fn new(project_path: PathBuf, scanners: Vec<ScannerReport>) -> Self {
        let passed = scanners.iter().all(|r| matches!(r.status, ReportStatus::Passed | ReportStatus::Skipped));
        Self { project_path, passed, scanners }
    }

    pub fn count(&self, status: ReportStatus) -> usize {
        self.scanners.iter().filter(|r| r.status == status).count()
    }

    /// 以格式化 JSON 写出
    pub fn write_json(&self, out: &mut dyn Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_passes_with_skips_only() {
        let s = ScanSummary::new(PathBuf::from("."), vec![ScannerReport::skipped("Gosec")]);
        assert!(s.passed);
        assert_eq!(s.count(ReportStatus::Skipped), 1);
    }

    #[test]
    fn findings_fail_summary() {
        let reports = vec![
            ScannerReport::from_outcome("Gosec", ScanOutcome::Success, 5),
            ScannerReport::from_outcome("Brakeman", ScanOutcome::Failure { findings: "{}".into() }, 9),
        ];
        let s = ScanSummary::new(PathBuf::from("/repo"), reports);
        assert!(!s.passed);
        assert_eq!(s.count(ReportStatus::Failed), 1);
    }

    #[test]
    fn json_carries_findings_verbatim() {
        let findings = "{\"warnings\":[1]}\n";
        let s = ScanSummary::new(
            PathBuf::from("/repo"),
            vec![ScannerReport::from_outcome("Brakeman", ScanOutcome::Failure { findings: findings.into() }, 1)],
        );
        let mut buf = Vec::new();
        s.write_json(&mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["passed"], false);
        assert_eq!(v["scanners"][0]["status"], "failed");
        assert_eq!(v["scanners"][0]["outcome"]["findings"], findings);
    }
}
