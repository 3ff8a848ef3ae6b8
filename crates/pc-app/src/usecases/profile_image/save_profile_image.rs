use std::sync::Arc;

use tracing::info;

use pc_core::ports::{ImagePersistencePort, RecordRefreshPort};
use pc_core::{RecordId, SaveIntent, SaveResult};

#[derive(Debug, thiserror::Error)]
pub enum SaveProfileImageError {
    #[error("serialize image metadata failed: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("persist profile image failed: {0}")]
    Persist(#[source] anyhow::Error),
    #[error("refresh record failed: {0}")]
    Refresh(#[source] anyhow::Error),
}

/// Use case for persisting a panel result on a record.
/// 将面板结果保存到记录上的用例。
pub struct SaveProfileImage {
    persistence: Arc<dyn ImagePersistencePort>,
    refresh: Arc<dyn RecordRefreshPort>,
}

impl SaveProfileImage {
    pub fn new(
        persistence: Arc<dyn ImagePersistencePort>,
        refresh: Arc<dyn RecordRefreshPort>,
    ) -> Self {
        Self {
            persistence,
            refresh,
        }
    }

    /// Persist the cropped image (or its removal), then ask for the record
    /// to be refreshed.
    ///
    /// The refresh is only requested after a successful save.
    #[tracing::instrument(
        name = "usecase.save_profile_image.execute",
        skip(self, result),
        fields(record_id = %record_id, intent = ?result.intent())
    )]
    pub async fn execute(
        &self,
        record_id: &RecordId,
        result: &SaveResult,
    ) -> Result<SaveIntent, SaveProfileImageError> {
        let metadata_json = result.file_metadata_json()?;

        self.persistence
            .save_image(
                record_id,
                result.cropped_image_base64.as_deref(),
                metadata_json.as_deref(),
            )
            .await
            .map_err(SaveProfileImageError::Persist)?;

        self.refresh
            .notify_record_updated(record_id)
            .await
            .map_err(SaveProfileImageError::Refresh)?;

        let intent = result.intent();
        info!(record_id = %record_id, intent = ?intent, "profile image saved");
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::*;
    use pc_core::{ImageMetadata, RegionConfig};
    use std::sync::Mutex;

    type SavedCall = (RecordId, Option<String>, Option<String>);

    /// Records every call; fails when `fail` is set.
    #[derive(Default)]
    struct RecordingPersistence {
        calls: Mutex<Vec<SavedCall>>,
        fail: bool,
    }

    #[async_trait]
    impl ImagePersistencePort for RecordingPersistence {
        async fn save_image(
            &self,
            record_id: &RecordId,
            base64_image: Option<&str>,
            file_metadata_json: Option<&str>,
        ) -> anyhow::Result<()> {
            if self.fail {
                return Err(anyhow::anyhow!("storage offline"));
            }
            self.calls.lock().unwrap().push((
                record_id.clone(),
                base64_image.map(str::to_string),
                file_metadata_json.map(str::to_string),
            ));
            Ok(())
        }
    }

    mock! {
        pub Refresh {}

        #[async_trait]
        impl RecordRefreshPort for Refresh {
            async fn notify_record_updated(&self, record_id: &RecordId) -> anyhow::Result<()>;
        }
    }

    fn metadata() -> ImageMetadata {
        ImageMetadata::new("photo.jpg", 10, "image/jpeg", 1_700_000_000_000)
    }

    #[tokio::test]
    async fn test_replace_passes_cropped_bytes_and_metadata_json() {
        let persistence = Arc::new(RecordingPersistence::default());
        let mut refresh = MockRefresh::new();
        refresh
            .expect_notify_record_updated()
            .with(eq(RecordId::from("003xx")))
            .times(1)
            .returning(|_| Ok(()));

        let uc = SaveProfileImage::new(persistence.clone(), Arc::new(refresh));
        let result = SaveResult::cropped(
            Some(metadata()),
            Some("b3JpZw==".to_string()),
            Some(RegionConfig::new([0, 0, 10, 10], 1.0, 1)),
            "Y3JvcA==".to_string(),
        );

        let intent = uc.execute(&RecordId::from("003xx"), &result).await.unwrap();
        assert_eq!(intent, SaveIntent::Replace);

        let calls = persistence.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, RecordId::from("003xx"));
        assert_eq!(calls[0].1.as_deref(), Some("Y3JvcA=="));
        assert_eq!(calls[0].2, Some(metadata().to_json().unwrap()));
    }

    #[tokio::test]
    async fn test_removal_passes_null_image() {
        let persistence = Arc::new(RecordingPersistence::default());
        let mut refresh = MockRefresh::new();
        refresh
            .expect_notify_record_updated()
            .times(1)
            .returning(|_| Ok(()));

        let uc = SaveProfileImage::new(persistence.clone(), Arc::new(refresh));

        let intent = uc
            .execute(&RecordId::from("003xx"), &SaveResult::removal(Some(metadata())))
            .await
            .unwrap();
        assert_eq!(intent, SaveIntent::Remove);

        let calls = persistence.calls.lock().unwrap();
        assert!(calls[0].1.is_none());
        assert!(calls[0].2.is_some());
    }

    #[tokio::test]
    async fn test_persist_failure_skips_refresh() {
        let persistence = Arc::new(RecordingPersistence {
            fail: true,
            ..Default::default()
        });
        let mut refresh = MockRefresh::new();
        refresh.expect_notify_record_updated().never();

        let uc = SaveProfileImage::new(persistence, Arc::new(refresh));

        let err = uc
            .execute(&RecordId::from("003xx"), &SaveResult::removal(None))
            .await
            .unwrap_err();
        assert!(matches!(err, SaveProfileImageError::Persist(_)));
    }

    #[tokio::test]
    async fn test_refresh_failure_is_reported() {
        let mut refresh = MockRefresh::new();
        refresh
            .expect_notify_record_updated()
            .returning(|_| Err(anyhow::anyhow!("no subscribers")));

        let uc = SaveProfileImage::new(
            Arc::new(RecordingPersistence::default()),
            Arc::new(refresh),
        );

        let err = uc
            .execute(&RecordId::from("003xx"), &SaveResult::removal(None))
            .await
            .unwrap_err();
        assert!(matches!(err, SaveProfileImageError::Refresh(_)));
    }
}
