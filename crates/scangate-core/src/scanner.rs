//! 扫描器适配接口与适配器边界
use std::time::Instant;
use tracing::{info, warn};

use crate::error::ScanError;
use crate::outcome::ScanOutcome;
use crate::process::{ProcessResult, ProcessRunner, ToolCommand};
use crate::report::{ReportStatus, ScannerReport};
use crate::repository::RepositoryContext;

/// 单个第三方工具的适配器
pub trait Scanner: Send + Sync {
    /// 报告中使用的名称
    fn name(&self) -> &'static str;

    /// 适用性判断；解析清单失败时返回 Err
    fn should_run(&self, ctx: &RepositoryContext) -> Result<bool, ScanError>;

    /// 要执行的命令行
    fn command(&self) -> ToolCommand;

    /// 将进程结果归一化（纯函数，对任意退出码都有结果）
    fn classify(&self, result: &ProcessResult) -> ScanOutcome;

    /// 在项目根目录执行工具并分类；只有进程无法启动时返回 Err
    fn run(&self, ctx: &RepositoryContext, runner: &dyn ProcessRunner) -> Result<ScanOutcome, ScanError> {
        let result = runner.run(&self.command(), ctx.path_to_repo())?;
        Ok(self.classify(&result))
    }
}

/// 适配器边界：门控 → 执行 → 分类，所有错误都在这里转换为 Error 结果
/// 每个扫描器恰好产生一份报告
pub fn execute_scanner(scanner: &dyn Scanner, ctx: &RepositoryContext, runner: &dyn ProcessRunner) -> ScannerReport {
    let name = scanner.name();
    let started = Instant::now();

    let outcome = match scanner.should_run(ctx) {
        Ok(false) => {
            info!(scanner = name, "skipping: not applicable");
            return ScannerReport::skipped(name);
        }
        Ok(true) => match scanner.run(ctx, runner) {
            Ok(outcome) => outcome,
            Err(e) => ScanOutcome::tool_fault(format!("{name} could not be executed: {e}"), None, ""),
        },
        Err(e) => ScanOutcome::tool_fault(format!("{name} applicability check failed: {e}"), None, ""),
    };

    let report = ScannerReport::from_outcome(name, outcome, started.elapsed().as_millis());
    match report.status {
        ReportStatus::Error => warn!(scanner = name, message = ?report.message(), "scanner errored"),
        status => info!(scanner = name, ?status, running_time_ms = report.running_time_ms, "scanner finished"),
    }
    report
}
