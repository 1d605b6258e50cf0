//! 被扫描项目的只读视图（仅供适用性判断使用）
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ResolveError;
use crate::resolver::DependencyResolver;

pub(crate) const GEMFILE: &str = "Gemfile";
pub(crate) const GEMFILE_LOCK: &str = "Gemfile.lock";
pub(crate) const GOPKG_LOCK: &str = "Gopkg.lock";
pub(crate) const GO_MOD: &str = "go.mod";
pub(crate) const GO_SUM: &str = "go.sum";

#[derive(Debug, Clone)]
pub struct RepositoryContext {
    path_to_repo: PathBuf,
}

impl RepositoryContext {
    pub fn new(path_to_repo: impl Into<PathBuf>) -> Self {
        Self { path_to_repo: path_to_repo.into() }
    }

    pub fn path_to_repo(&self) -> &Path {
        &self.path_to_repo
    }

    pub fn file_exists(&self, rel: &str) -> bool {
        self.path_to_repo.join(rel).is_file()
    }

    pub fn dir_exists(&self, rel: &str) -> bool {
        self.path_to_repo.join(rel).is_dir()
    }

    pub fn gemfile_present(&self) -> bool {
        self.file_exists(GEMFILE)
    }

    pub fn gemfile_lock_present(&self) -> bool {
        self.file_exists(GEMFILE_LOCK)
    }

    pub fn dep_lock_present(&self) -> bool {
        self.file_exists(GOPKG_LOCK)
    }

    pub fn go_mod_present(&self) -> bool {
        self.file_exists(GO_MOD)
    }

    pub fn go_sum_present(&self) -> bool {
        self.file_exists(GO_SUM)
    }

    /// 项目根目录下（不递归）第一个指定扩展名的文件
    /// 按文件名排序，保证结果可复现；与 shell glob 一致，忽略以 . 开头的文件
    pub fn first_file_with_extension(&self, ext: &str) -> Option<PathBuf> {
        WalkDir::new(&self.path_to_repo)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .map(|e| e.into_path())
            .find(|p| p.extension().and_then(|s| s.to_str()) == Some(ext))
    }

    /// 解析 Gemfile / Gemfile.lock 中的依赖名（委托给外部解析器）
    pub fn dependency_names(&self, resolver: &dyn DependencyResolver) -> Result<BTreeSet<String>, ResolveError> {
        resolver.resolve_dependency_names(&self.path_to_repo.join(GEMFILE), &self.path_to_repo.join(GEMFILE_LOCK))
    }
}
