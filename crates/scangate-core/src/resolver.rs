//! Ruby 依赖名解析（Gemfile + Gemfile.lock）
//!
//! 只关心依赖名集合，不解析版本约束，也不做真正的依赖求解。
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::ResolveError;

/// 依赖解析器（适用性判断专用，只读、无副作用）
pub trait DependencyResolver: Send + Sync {
    fn resolve_dependency_names(&self, manifest: &Path, lock: &Path) -> Result<BTreeSet<String>, ResolveError>;
}

/// 默认实现：读取 Gemfile 中声明的 gem，并合并 lock 文件 DEPENDENCIES 段
#[derive(Debug, Default, Clone, Copy)]
pub struct BundlerResolver;

fn gem_line_regex() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    // gem "name" / gem 'name'，后面可跟版本等参数
    RX.get_or_init(|| Regex::new(r#"^gem\s*\(?\s*(?:"([^"]+)"|'([^']+)')"#).expect("valid regex"))
}

fn lock_dep_regex() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    // "  rails (~> 7.0)!" → rails
    RX.get_or_init(|| Regex::new(r"^  ([A-Za-z0-9_.\-]+)(?:\s+\([^)]*\))?!?\s*$").expect("valid regex"))
}

impl DependencyResolver for BundlerResolver {
    fn resolve_dependency_names(&self, manifest: &Path, lock: &Path) -> Result<BTreeSet<String>, ResolveError> {
        let gemfile = read(manifest)?;
        let mut names = parse_gemfile(manifest, &gemfile)?;

        if lock.is_file() {
            let lockfile = read(lock)?;
            names.extend(parse_lock_dependencies(lock, &lockfile)?);
        }
        Ok(names)
    }
}

fn read(path: &Path) -> Result<String, ResolveError> {
    std::fs::read_to_string(path).map_err(|source| ResolveError::Io { path: path.to_path_buf(), source })
}

/// 解析 Gemfile 中的 gem 声明
pub(crate) fn parse_gemfile(path: &Path, text: &str) -> Result<BTreeSet<String>, ResolveError> {
    let mut out = BTreeSet::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // 只处理 gem 关键字本身（排除 gemspec 等）
        let is_gem = line == "gem" || line.starts_with("gem ") || line.starts_with("gem(") || line.starts_with("gem\t");
        if !is_gem {
            continue;
        }
        if let Some(caps) = gem_line_regex().captures(line) {
            if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
                out.insert(m.as_str().to_string());
            }
            continue;
        }
        // 参数为变量或表达式（gem lib / gem ENV.fetch(..)）时无法静态解析，跳过，由 lock 文件补齐
        // 缺少参数或字符串未闭合才算格式错误
        let arg = line[3..].trim_start().trim_start_matches('(').trim_start();
        if arg.is_empty() || arg.starts_with('"') || arg.starts_with('\'') {
            return Err(ResolveError::Malformed { path: path.to_path_buf(), line: idx + 1, text: line.to_string() });
        }
    }
    Ok(out)
}

/// 解析 Gemfile.lock 的 DEPENDENCIES 段
pub(crate) fn parse_lock_dependencies(path: &Path, text: &str) -> Result<BTreeSet<String>, ResolveError> {
    let mut out = BTreeSet::new();
    let mut in_deps = false;
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            in_deps = false;
            continue;
        }
        if !line.starts_with(' ') {
            in_deps = line.trim_end() == "DEPENDENCIES";
            continue;
        }
        if !in_deps {
            continue;
        }
        match lock_dep_regex().captures(line) {
            Some(caps) => {
                out.insert(caps[1].to_string());
            }
            None => {
                return Err(ResolveError::Malformed { path: path.to_path_buf(), line: idx + 1, text: line.trim().to_string() });
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn p() -> PathBuf {
        PathBuf::from("Gemfile")
    }

    #[test]
    fn gemfile_names() {
        let text = r#"
source 'https://rubygems.org'
ruby '3.2.0'

gem 'rails', '~> 7.0'
gem "pg"
# gem 'commented'
group :development do
  gem 'byebug', platforms: [:mri]
end
gemspec
"#;
        let names = parse_gemfile(&p(), text).unwrap();
        let expected: BTreeSet<String> = ["rails", "pg", "byebug"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn gemfile_unterminated_quote_is_malformed() {
        let err = parse_gemfile(&p(), "gem 'pg'\ngem 'rails\n").unwrap_err();
        match err {
            ResolveError::Malformed { line, text, .. } => {
                assert_eq!(line, 2);
                assert_eq!(text, "gem 'rails");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(parse_gemfile(&p(), "gem\n").is_err());
        assert!(parse_gemfile(&p(), "gem(\"rails)\n").is_err());
    }

    #[test]
    fn gemfile_dynamic_gem_calls_are_skipped() {
        let text = r#"
gem 'rails', '~> 7.1'
%w[rspec-core rspec-rails].each do |lib|
  gem lib
end
gem ENV.fetch('DB_GEM', 'pg')
gem(name)
"#;
        let names = parse_gemfile(&p(), text).unwrap();
        let expected: BTreeSet<String> = ["rails"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn lock_supplies_dynamically_declared_gems() {
        let dir = tempfile::tempdir().unwrap();
        let gemfile = dir.path().join("Gemfile");
        let lock = dir.path().join("Gemfile.lock");
        std::fs::write(&gemfile, "%w[rails pg].each { |g| gem g }\n").unwrap();
        std::fs::write(&lock, "DEPENDENCIES\n  pg\n  rails (~> 7.1)\n").unwrap();
        let names = BundlerResolver.resolve_dependency_names(&gemfile, &lock).unwrap();
        assert!(names.contains("rails"));
        assert!(names.contains("pg"));
    }

    #[test]
    fn lock_dependencies_section() {
        let text = "GEM\n  remote: https://rubygems.org/\n  specs:\n    actionpack (7.0.4)\n\nPLATFORMS\n  ruby\n\nDEPENDENCIES\n  rails (~> 7.0)\n  sqlite3\n  local_gem!\n\nBUNDLED WITH\n   2.4.1\n";
        let names = parse_lock_dependencies(Path::new("Gemfile.lock"), text).unwrap();
        let expected: BTreeSet<String> = ["rails", "sqlite3", "local_gem"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn resolver_tolerates_missing_lock() {
        let dir = tempfile::tempdir().unwrap();
        let gemfile = dir.path().join("Gemfile");
        std::fs::write(&gemfile, "gem 'sinatra'\n").unwrap();
        let names = BundlerResolver.resolve_dependency_names(&gemfile, &dir.path().join("Gemfile.lock")).unwrap();
        assert!(names.contains("sinatra"));
        assert!(!names.contains("rails"));
    }
}
