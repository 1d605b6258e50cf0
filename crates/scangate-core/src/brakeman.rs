//! Brakeman（Rails 应用漏洞扫描）适配器
//!
//! Brakeman 的退出码约定：
//! - 0：无漏洞，报告写 stdout
//! - 3（warning）/ 7（error）：发现漏洞，报告写 stdout
//! - 其他（通常为 1）：异常，信息写 stderr
//!
//! 3 和 7 对调用方不做区分，统一为 Failure。
use std::sync::Arc;

use crate::error::ScanError;
use crate::outcome::ScanOutcome;
use crate::process::{ProcessResult, ToolCommand};
use crate::repository::RepositoryContext;
use crate::resolver::DependencyResolver;
use crate::scanner::Scanner;

pub const NAME: &str = "Brakeman";
pub(crate) const DEFAULT_EXECUTABLE: &str = "brakeman";
const FRAMEWORK_GEM: &str = "rails";
const APP_DIR: &str = "app";
const FINDINGS_STATUSES: [i32; 2] = [3, 7];

pub struct Brakeman {
    executable: String,
    resolver: Arc<dyn DependencyResolver>,
}

impl Brakeman {
    pub fn new(executable: Option<String>, resolver: Arc<dyn DependencyResolver>) -> Self {
        Self { executable: executable.unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string()), resolver }
    }

    fn has_rails_gem(&self, ctx: &RepositoryContext) -> Result<bool, ScanError> {
        Ok(ctx.dependency_names(self.resolver.as_ref())?.contains(FRAMEWORK_GEM))
    }
}

impl Scanner for Brakeman {
    fn name(&self) -> &'static str {
        NAME
    }

    fn should_run(&self, ctx: &RepositoryContext) -> Result<bool, ScanError> {
        // 先判断 Gemfile，缺失时不调用解析器
        Ok(ctx.gemfile_present() && self.has_rails_gem(ctx)? && ctx.dir_exists(APP_DIR))
    }

    fn command(&self) -> ToolCommand {
        // CI=true 避免交互式报告
        ToolCommand::new(self.executable.as_str()).arg("-f").arg("json").env("CI", "true")
    }

    fn classify(&self, result: &ProcessResult) -> ScanOutcome {
        classify(result)
    }
}

pub fn classify(result: &ProcessResult) -> ScanOutcome {
    if result.success {
        return ScanOutcome::Success;
    }
    if FINDINGS_STATUSES.contains(&result.status) {
        return ScanOutcome::Failure { findings: result.stdout.clone() };
    }
    ScanOutcome::tool_fault("brakeman exited with an unexpected exit status", Some(result.status), result.stderr.as_str())
}
