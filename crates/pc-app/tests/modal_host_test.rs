mod common;

use std::sync::Arc;

use common::*;
use pc_app::{ModalError, ModalParams, PanelError, UploadModalHost};
use pc_core::{ImageReference, ModalOutcome, PanelState, ReadyState, RegionConfig};

fn host_deps(widget: &Arc<FakeCropWidget>) -> pc_app::PanelDeps {
    deps(
        widget,
        Arc::new(InMemoryRetrieval::with_image("069xxx", b"stored-bytes")),
        Arc::new(InMemoryLocalFiles::with_file(
            "photo.jpg",
            photo_metadata(),
            PHOTO_BYTES,
        )),
    )
}

fn stored_params() -> ModalParams {
    ModalParams {
        label: "Upload Contact Profile Image".to_string(),
        reference: Some(ImageReference::from("069xxx")),
        metadata: Some(photo_metadata()),
        prior_region: Some(RegionConfig::new([0, 0, 10, 10], 1.0, 1)),
        ..Default::default()
    }
}

#[tokio::test]
async fn modal_open_then_cancel_resolves_cancelled() {
    let widget = Arc::new(FakeCropWidget::default());
    let (host, resolution) = UploadModalHost::new(stored_params(), host_deps(&widget));

    host.mount().await.expect("mount");
    assert_eq!(widget.live_count(), 1);
    host.cancel().await.expect("cancel");

    let outcome = resolution.wait().await;
    assert_eq!(outcome, ModalOutcome::Cancelled);
    assert_eq!(serde_json::to_string(&outcome).unwrap(), "\"cancelled\"");
    assert_eq!(widget.live_count(), 0);
}

#[tokio::test]
async fn modal_cancel_while_stalled_loading_resolves_cancelled() {
    let widget = Arc::new(FakeCropWidget::default());
    let deps = deps(
        &widget,
        Arc::new(InMemoryRetrieval::default()),
        Arc::new(InMemoryLocalFiles::default()),
    );
    let (host, resolution) = UploadModalHost::new(stored_params(), deps);
    assert!(host.mount().await.is_err());
    assert_eq!(host.panel().state().await, PanelState::Loading);

    host.cancel().await.expect("cancel");

    let outcome = resolution.wait().await;
    assert_eq!(serde_json::to_string(&outcome).unwrap(), "\"cancelled\"");
    assert_eq!(widget.live_count(), 0);
}

#[tokio::test]
async fn modal_cancel_after_delete_resolves_cancelled() {
    let widget = Arc::new(FakeCropWidget::default());
    let (host, resolution) = UploadModalHost::new(stored_params(), host_deps(&widget));
    host.mount().await.expect("mount");

    let state = host.panel().delete().await.expect("delete");
    assert_eq!(state, PanelState::Ready(ReadyState::REMOVAL_PENDING));
    host.cancel().await.expect("cancel");

    let outcome = resolution.wait().await;
    assert_eq!(serde_json::to_string(&outcome).unwrap(), "\"cancelled\"");
    assert_eq!(widget.live_count(), 0);
    assert_eq!(widget.max_live(), 1);
}

#[tokio::test]
async fn modal_save_resolves_with_panel_result() {
    let widget = Arc::new(FakeCropWidget::default());
    let (host, resolution) = UploadModalHost::new(stored_params(), host_deps(&widget));
    host.mount().await.expect("mount");

    let result = host.save().await.expect("save");

    assert_eq!(widget.live_count(), 0);
    assert_eq!(resolution.wait().await, ModalOutcome::Saved(result));
}

#[tokio::test]
async fn modal_resolves_only_once() {
    let widget = Arc::new(FakeCropWidget::default());
    let (host, resolution) = UploadModalHost::new(stored_params(), host_deps(&widget));
    host.mount().await.expect("mount");

    host.cancel().await.expect("cancel");
    let err = host.cancel().await.unwrap_err();
    assert!(matches!(err, ModalError::AlreadyResolved));

    let err = host.save().await.unwrap_err();
    assert!(matches!(err, ModalError::Panel(PanelError::Rejected(_))));

    assert!(resolution.wait().await.is_cancelled());
}

#[tokio::test]
async fn modal_dropped_without_resolution_reads_as_cancelled() {
    let widget = Arc::new(FakeCropWidget::default());
    let (host, resolution) = UploadModalHost::new(stored_params(), host_deps(&widget));
    host.mount().await.expect("mount");

    drop(host);

    assert!(resolution.wait().await.is_cancelled());
    assert_eq!(widget.live_count(), 0);
}

#[tokio::test]
async fn modal_stays_usable_after_failed_load() {
    let widget = Arc::new(FakeCropWidget::default());
    let deps = deps(
        &widget,
        Arc::new(InMemoryRetrieval::default()),
        Arc::new(InMemoryLocalFiles::with_file(
            "photo.jpg",
            photo_metadata(),
            PHOTO_BYTES,
        )),
    );
    let (host, resolution) = UploadModalHost::new(stored_params(), deps);

    assert!(host.mount().await.is_err());
    assert_eq!(host.panel().state().await, PanelState::Loading);
    assert_eq!(host.label(), "Upload Contact Profile Image");

    host.panel()
        .choose_file("photo.jpg")
        .await
        .expect("choose file");
    let result = host.save().await.expect("save");

    assert_eq!(result.file_metadata, Some(photo_metadata()));
    assert!(matches!(resolution.wait().await, ModalOutcome::Saved(_)));
}
