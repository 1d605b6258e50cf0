//! 扫描器适配核心库
//!
//! 设计要点：
//! - 每个适配器包装一个第三方静态分析工具（Brakeman / gosec）。
//! - 先做适用性判断，再以外部进程方式运行工具，最后把退出码与 stdout/stderr 归一化为 Success / Failure / Error。
//! - 分类函数是全函数：任何退出码都映射到唯一结果；解析失败等异常在适配器边界转换为 Error，不会中断整体运行。
//! - 适配器之间无共享可变状态，可并行执行。

mod error;
mod outcome;
mod process;
mod resolver;
mod repository;
mod config;
mod report;
mod scanner;
mod scan;

pub mod brakeman;
pub mod gosec;

pub use error::{ResolveError, ScanError};
pub use outcome::{OutcomeKind, ScanOutcome};
pub use process::{ProcessResult, ProcessRunner, ShellRunner, ToolCommand};
pub use resolver::{BundlerResolver, DependencyResolver};
pub use repository::RepositoryContext;
pub use config::{load_config, parse_config, Config, ScannerConfig, DEFAULT_CONFIG_PATH};
pub use report::{ReportStatus, ScanSummary, ScannerReport};
pub use scanner::{execute_scanner, Scanner};
pub use scan::{available_scanners, available_scanners_with, run_scanners, RunOptions, KNOWN_SCANNERS};
