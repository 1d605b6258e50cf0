//! 归一化扫描结果
use serde::Serialize;

/// 一次适配器调用的归一化结果（每次调用恰好一个）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// 干净扫描，无发现
    Success,
    /// 工具报告了问题；findings 为工具原始输出，不做改写
    Failure { findings: String },
    /// 工具故障：合成的一行诊断 + 原始 stderr
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<i32>,
        stderr: String,
    },
}

/// 结果分类（对应错误分类：Clean / Findings / ToolFault）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Clean,
    Findings,
    ToolFault,
}

impl ScanOutcome {
    pub fn tool_fault(message: impl Into<String>, status: Option<i32>, stderr: impl Into<String>) -> Self {
        ScanOutcome::Error { message: message.into(), status, stderr: stderr.into() }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            ScanOutcome::Success => OutcomeKind::Clean,
            ScanOutcome::Failure { .. } => OutcomeKind::Findings,
            ScanOutcome::Error { .. } => OutcomeKind::ToolFault,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, ScanOutcome::Success)
    }

    /// 诊断信息（仅 Error 有）
    pub fn message(&self) -> Option<&str> {
        match self {
            ScanOutcome::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(ScanOutcome::Success.kind(), OutcomeKind::Clean);
        assert_eq!(ScanOutcome::Failure { findings: "x".into() }.kind(), OutcomeKind::Findings);
        let e = ScanOutcome::tool_fault("boom", Some(2), "trace");
        assert_eq!(e.kind(), OutcomeKind::ToolFault);
        assert_eq!(e.message(), Some("boom"));
        assert!(!e.passed());
    }

    #[test]
    fn serializes_with_tag() {
        let v = serde_json::to_value(ScanOutcome::tool_fault("boom", None, "")).unwrap();
        assert_eq!(v, serde_json::json!({ "result": "error", "message": "boom", "stderr": "" }));
        let v = serde_json::to_value(ScanOutcome::Success).unwrap();
        assert_eq!(v, serde_json::json!({ "result": "success" }));
    }
}
