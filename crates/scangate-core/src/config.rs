//! 配置文件加载（TOML）
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 默认配置路径
pub const DEFAULT_CONFIG_PATH: &str = "./scangate.toml";

/// 单个扫描器的配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScannerConfig {
    /// 可执行文件路径；为空则使用工具默认名
    #[serde(default)]
    pub executable: Option<String>,
}

/// 顶层配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// 启用的扫描器名；为空表示全部
    #[serde(default)]
    pub active_scanners: Option<Vec<String>>,
    #[serde(default)]
    pub scanners: BTreeMap<String, ScannerConfig>,
}

impl Config {
    pub fn scanner(&self, name: &str) -> ScannerConfig {
        self.scanners.get(name).cloned().unwrap_or_default()
    }
}

/// 加载配置：
/// - 显式指定的路径必须存在
/// - 未指定时读取默认路径，不存在则使用默认配置
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    if !explicit && !path.is_file() {
        return Ok(Config::default());
    }
    let txt = std::fs::read_to_string(&path).with_context(|| format!("read config {}", path.display()))?;
    parse_config(&txt).with_context(|| format!("parse config {}", path.display()))
}

pub fn parse_config(txt: &str) -> Result<Config> {
    Ok(toml::from_str(txt)?)
}
