//! 扫描主流程：构建扫描器并并行执行
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::brakeman::{self, Brakeman};
use crate::config::Config;
use crate::error::ScanError;
use crate::gosec::{self, Gosec};
use crate::process::ProcessRunner;
use crate::report::{ReportStatus, ScanSummary, ScannerReport};
use crate::repository::RepositoryContext;
use crate::resolver::{BundlerResolver, DependencyResolver};
use crate::scanner::{execute_scanner, Scanner};

/// 已知扫描器名（按执行与输出顺序）
pub const KNOWN_SCANNERS: [&str; 2] = [brakeman::NAME, gosec::NAME];

/// 运行选项
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// 线程数：None 表示自动（等于 CPU 核数）
    pub threads: Option<usize>,
}

/// 按配置构建扫描器（active_scanners 为空时启用全部）
pub fn available_scanners(config: &Config) -> Result<Vec<Box<dyn Scanner>>, ScanError> {
    available_scanners_with(config, Arc::new(BundlerResolver))
}

pub fn available_scanners_with(
    config: &Config,
    resolver: Arc<dyn DependencyResolver>,
) -> Result<Vec<Box<dyn Scanner>>, ScanError> {
    let names: Vec<String> = match &config.active_scanners {
        Some(list) => list.clone(),
        None => KNOWN_SCANNERS.iter().map(|s| s.to_string()).collect(),
    };

    let mut out: Vec<Box<dyn Scanner>> = Vec::with_capacity(names.len());
    let mut seen: HashSet<String> = HashSet::new();
    for name in names {
        // 重复的名字只保留第一次出现
        if !seen.insert(name.clone()) {
            continue;
        }
        let executable = config.scanner(&name).executable;
        let scanner: Box<dyn Scanner> = match name.as_str() {
            brakeman::NAME => Box::new(Brakeman::new(executable, Arc::clone(&resolver))),
            gosec::NAME => Box::new(Gosec::new(executable)),
            _ => return Err(ScanError::UnknownScanner(name)),
        };
        out.push(scanner);
    }
    Ok(out)
}

/// 并行执行所有扫描器，输出顺序与 scanners 顺序一致
/// 扫描器之间无共享可变状态
pub fn run_scanners(
    ctx: &RepositoryContext,
    scanners: &[Box<dyn Scanner>],
    runner: &dyn ProcessRunner,
    opts: &RunOptions,
) -> Result<ScanSummary, ScanError> {
    let threads = opts.threads.unwrap_or_else(num_cpus::get).max(1);
    info!(repo = %ctx.path_to_repo().display(), scanners = scanners.len(), threads, "starting scan");

    let reports: Vec<ScannerReport> = if threads > 1 && scanners.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        pool.install(|| scanners.par_iter().map(|s| execute_scanner(s.as_ref(), ctx, runner)).collect())
    } else {
        scanners.iter().map(|s| execute_scanner(s.as_ref(), ctx, runner)).collect()
    };

    let summary = ScanSummary::new(ctx.path_to_repo().to_path_buf(), reports);
    info!(
        passed = summary.passed,
        failed = summary.count(ReportStatus::Failed),
        errored = summary.count(ReportStatus::Error),
        skipped = summary.count(ReportStatus::Skipped),
        "scan finished"
    );
    Ok(summary)
}
