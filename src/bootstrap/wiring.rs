//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Create infra implementations (crop widget, fs store, refresh bus) / 创建 infra 层具体实现
//! - ✅ Inject them into the use cases / 将依赖注入到用例
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//! ❌ **No configuration validation / 禁止做配置验证**
//!
//! > **This is the only place allowed to depend on pc-infra + pc-app simultaneously.**
//! > **这是唯一允许同时依赖 pc-infra 和 pc-app 的地方。**

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use pc_app::{DisplaySettings, PanelDeps, ProfileImageDisplay, SaveProfileImage};
use pc_core::config::AppConfig;
use pc_core::RecordId;
use pc_infra::refresh::broadcast_refresh::DEFAULT_CAPACITY;
use pc_infra::{BroadcastRecordRefresh, FsLocalFileReader, FsProfileImageStore, ImageCropWidget};

/// Assembled adapters and the shared use cases built on them.
///
/// 组装后的运行时：持有适配器并创建记录页面的头像展示。
pub struct ProfileCropRuntime {
    crop_widget: Arc<ImageCropWidget>,
    store: Arc<FsProfileImageStore>,
    refresh: Arc<BroadcastRecordRefresh>,
    panel_deps: PanelDeps,
    save_profile_image: Arc<SaveProfileImage>,
    settings: DisplaySettings,
}

/// Build every adapter from configuration.
pub fn wire_dependencies(config: &AppConfig) -> ProfileCropRuntime {
    let crop_widget = Arc::new(ImageCropWidget::new());
    let store = Arc::new(FsProfileImageStore::new(config.storage_root.clone()));
    let local_files = Arc::new(FsLocalFileReader::new());
    let refresh = Arc::new(BroadcastRecordRefresh::new(DEFAULT_CAPACITY));

    let panel_deps = PanelDeps::new(crop_widget.clone(), store.clone(), local_files);
    let save_profile_image = Arc::new(SaveProfileImage::new(store.clone(), refresh.clone()));

    info!(storage_root = %config.storage_root.display(), "profilecrop dependencies wired");

    ProfileCropRuntime {
        crop_widget,
        store,
        refresh,
        panel_deps,
        save_profile_image,
        settings: DisplaySettings::from_config(config),
    }
}

impl ProfileCropRuntime {
    /// Profile image display of one record page.
    pub fn display_for(&self, record_id: RecordId) -> ProfileImageDisplay {
        ProfileImageDisplay::new(
            record_id,
            self.store.clone(),
            self.save_profile_image.clone(),
            self.panel_deps.clone(),
            self.settings.clone(),
        )
    }

    /// Record ids whose cached fields must be re-read.
    pub fn subscribe_refresh(&self) -> broadcast::Receiver<RecordId> {
        self.refresh.subscribe()
    }

    pub fn crop_widget(&self) -> &Arc<ImageCropWidget> {
        &self.crop_widget
    }

    pub fn store(&self) -> &Arc<FsProfileImageStore> {
        &self.store
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }
}
