//! 错误类型（库内统一使用 thiserror）
use std::path::PathBuf;

/// 依赖解析失败（Gemfile / Gemfile.lock）
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest {path}:{line}: {text}")]
    Malformed { path: PathBuf, line: usize, text: String },
}

/// 扫描器适配层错误
/// 注意：这些错误在适配器边界被转换为 Error 结果，不会中断整体运行
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("unknown scanner: {0}")]
    UnknownScanner(String),
}
