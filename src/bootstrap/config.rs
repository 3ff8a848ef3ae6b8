//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Read TOML configuration files / 读取 TOML 配置文件
//! - ✅ Parse TOML into AppConfig DTO / 将 TOML 解析为 AppConfig DTO
//! - ✅ Report I/O and parsing errors with context / 报告带上下文的 I/O 和解析错误
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**

use std::path::{Path, PathBuf};

use anyhow::Context;
use pc_core::config::AppConfig;

/// Directory name under the platform data dir.
const APP_DIR_NAME: &str = "profilecrop";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// Missing sections result in empty values; nothing is validated.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// System-default configuration rooted at the platform data directory.
/// 使用系统数据目录的默认配置。
pub fn default_config() -> AppConfig {
    let base = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
    AppConfig::with_system_defaults(base.join(APP_DIR_NAME))
}

/// Load the given file when it exists, otherwise fall back to the system
/// defaults.
pub fn resolve_config(config_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match config_path {
        Some(path) if path.exists() => load_config(path.to_path_buf()),
        _ => Ok(default_config()),
    }
}
