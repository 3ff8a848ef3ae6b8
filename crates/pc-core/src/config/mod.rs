//! # Pure Data Module / 纯数据模块 - Data Transfer Objects Only
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//!
//! Unknown enum spellings fall back to the profile defaults; everything else
//! is taken as-is. Empty strings are valid facts.

use std::path::PathBuf;

use crate::profile_image::{
    Boundary, ImageEncoding, RenderRequest, Viewport, ViewportShape, WidgetOptions,
    DEFAULT_DOWNLOAD_URL_TEMPLATE,
};

/// Label shown on the upload modal when none is configured.
pub const DEFAULT_MODAL_LABEL: &str = "Upload Contact Profile Image";

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Root directory of the filesystem image store (no existence check)
    /// 图片存储根目录（不检查是否存在）
    pub storage_root: PathBuf,

    /// Download endpoint template, `{id}` is replaced by the image reference
    pub download_url_template: String,

    /// Upload modal label
    pub modal_label: String,

    /// Crop widget geometry
    pub widget: WidgetOptions,

    /// Output format of the rendered crop
    pub render: RenderRequest,

    /// Directory for log files (empty means stdout only)
    pub log_dir: PathBuf,

    pub file_logging: bool,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// Missing values become empty strings/paths; missing widget geometry
    /// falls back to the profile widget defaults.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let defaults = WidgetOptions::profile_default();
        let widget = toml_value.get("widget");
        let int = |key: &str, fallback: u32| -> u32 {
            widget
                .and_then(|w| w.get(key))
                .and_then(|v| v.as_integer())
                .map(|v| v as u32)
                .unwrap_or(fallback)
        };

        let render = toml_value.get("render");

        Ok(Self {
            storage_root: PathBuf::from(
                toml_value
                    .get("storage")
                    .and_then(|s| s.get("root_dir"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
            download_url_template: toml_value
                .get("display")
                .and_then(|d| d.get("download_url_template"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            modal_label: toml_value
                .get("display")
                .and_then(|d| d.get("modal_label"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            widget: WidgetOptions {
                viewport: Viewport {
                    width: int("viewport_width", defaults.viewport.width),
                    height: int("viewport_height", defaults.viewport.height),
                    shape: widget
                        .and_then(|w| w.get("viewport_shape"))
                        .and_then(|v| v.as_str())
                        .and_then(ViewportShape::parse)
                        .unwrap_or(defaults.viewport.shape),
                },
                boundary: Boundary {
                    width: int("boundary_width", defaults.boundary.width),
                    height: int("boundary_height", defaults.boundary.height),
                },
                show_zoomer: widget
                    .and_then(|w| w.get("show_zoomer"))
                    .and_then(|v| v.as_bool())
                    .unwrap_or(defaults.show_zoomer),
            },
            render: RenderRequest {
                encoding: render
                    .and_then(|r| r.get("encoding"))
                    .and_then(|v| v.as_str())
                    .and_then(ImageEncoding::parse)
                    .unwrap_or(ImageEncoding::Png),
                circle: render
                    .and_then(|r| r.get("circle"))
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
            },
            log_dir: PathBuf::from(
                toml_value
                    .get("logging")
                    .and_then(|l| l.get("log_dir"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
            file_logging: toml_value
                .get("logging")
                .and_then(|l| l.get("file_logging"))
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }

    /// Create AppConfig with system-default paths for production use
    /// 生产环境使用：创建具有系统默认路径的 AppConfig
    ///
    /// The base directory should be computed by the caller (e.g. `dirs` crate).
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            storage_root: data_dir.join("images"),
            download_url_template: DEFAULT_DOWNLOAD_URL_TEMPLATE.to_string(),
            modal_label: DEFAULT_MODAL_LABEL.to_string(),
            widget: WidgetOptions::profile_default(),
            render: RenderRequest::default(),
            log_dir: data_dir.join("logs"),
            file_logging: true,
        }
    }

    /// Download template, falling back to the default endpoint when empty.
    pub fn download_url_template_or_default(&self) -> &str {
        if self.download_url_template.is_empty() {
            DEFAULT_DOWNLOAD_URL_TEMPLATE
        } else {
            &self.download_url_template
        }
    }

    pub fn modal_label_or_default(&self) -> &str {
        if self.modal_label.is_empty() {
            DEFAULT_MODAL_LABEL
        } else {
            &self.modal_label
        }
    }
}
