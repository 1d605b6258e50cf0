//! gosec（Go 不安全编码模式扫描）适配器
//!
//! gosec 的行为：
//! - 无漏洞：退出码 0，stdout 与 stderr 均有输出
//! - 有漏洞：退出码 1，stdout 与 stderr 均有输出
//! - 编译错误：退出码 1，只写 stderr
//!
//! 仅凭退出码无法区分“发现问题”与“无法编译”，需要结合 JSON 中的统计信息。
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ScanError;
use crate::outcome::ScanOutcome;
use crate::process::{ProcessResult, ToolCommand};
use crate::repository::RepositoryContext;
use crate::scanner::Scanner;

pub const NAME: &str = "Gosec";
pub(crate) const DEFAULT_EXECUTABLE: &str = "gosec";
const NO_PACKAGES: &str = "No packages found";
const ZERO_LINES: &str = "0 lines of code were scanned";

/// gosec -fmt=json 的报告结构（只取分类所需字段）
#[derive(Debug, Deserialize)]
struct GosecReport {
    #[serde(rename = "Stats")]
    stats: GosecStats,
    /// 包路径 -> 编译错误
    #[serde(rename = "Golang errors", default)]
    golang_errors: Option<Map<String, Value>>,
    #[serde(rename = "Issues", default)]
    issues: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct GosecStats {
    lines: i64,
}

impl GosecReport {
    fn has_golang_errors(&self) -> bool {
        self.golang_errors.as_ref().is_some_and(|m| !m.is_empty())
    }

    fn has_issues(&self) -> bool {
        self.issues.as_ref().is_some_and(|v| !v.is_empty())
    }
}

pub struct Gosec {
    executable: String,
}

impl Gosec {
    pub fn new(executable: Option<String>) -> Self {
        Self { executable: executable.unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string()) }
    }
}

impl Scanner for Gosec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn should_run(&self, ctx: &RepositoryContext) -> Result<bool, ScanError> {
        Ok(ctx.dep_lock_present()
            || ctx.go_mod_present()
            || ctx.go_sum_present()
            || ctx.first_file_with_extension("go").is_some())
    }

    fn command(&self) -> ToolCommand {
        // 支持 go modules，扫描整个模块树
        ToolCommand::new(self.executable.as_str()).arg("-fmt=json").arg("./...")
    }

    fn classify(&self, result: &ProcessResult) -> ScanOutcome {
        classify(result)
    }
}

pub fn classify(result: &ProcessResult) -> ScanOutcome {
    let status = Some(result.status);

    // 这种情况不会产生 JSON，必须在解析前判断
    if result.stdout.trim().is_empty() && result.stderr.contains(NO_PACKAGES) {
        return ScanOutcome::tool_fault(ZERO_LINES, status, result.stderr.as_str());
    }

    let report: GosecReport = match serde_json::from_str(&result.stdout) {
        Ok(r) => r,
        Err(e) => {
            return ScanOutcome::tool_fault(
                format!("gosec produced unparseable JSON output: {e}"),
                status,
                result.stderr.as_str(),
            );
        }
    };
    let lines = report.stats.lines;

    if result.success && lines > 0 {
        return ScanOutcome::Success;
    }
    if result.status == 1 && (report.has_golang_errors() || report.has_issues()) {
        return ScanOutcome::Failure { findings: result.stdout.clone() };
    }
    if lines == 0 {
        return ScanOutcome::tool_fault(ZERO_LINES, status, result.stderr.as_str());
    }
    ScanOutcome::tool_fault(format!("gosec exited with build error: {}", result.stderr), status, result.stderr.as_str())
}
