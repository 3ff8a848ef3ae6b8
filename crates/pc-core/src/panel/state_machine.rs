//! Upload/crop panel state machine.
//!
//! Defines a pure state transition function for one editing session. Side
//! effects are described as [`PanelAction`]s and executed by the caller.

use serde::Serialize;

/// Flags carried by the `Ready` state.
///
/// 就绪状态的标志位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadyState {
    /// The session differs from what is stored.
    pub dirty: bool,
    /// A crop widget handle is live.
    pub widget_live: bool,
}

impl ReadyState {
    pub const CLEAN: Self = Self {
        dirty: false,
        widget_live: true,
    };
    pub const FRESH_FILE: Self = Self {
        dirty: true,
        widget_live: true,
    };
    pub const REMOVAL_PENDING: Self = Self {
        dirty: true,
        widget_live: false,
    };
}

/// Upload/crop panel state.
///
/// 上传裁剪面板状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PanelState {
    /// No file, no widget.
    ///
    /// 无文件、无控件。
    Empty,
    /// Fetching the stored image. Stays here when the fetch fails.
    ///
    /// 正在获取已存储的图片。
    Loading,
    /// Reading a locally chosen file; `resume` is restored if the read fails.
    ///
    /// 正在读取本地文件。
    Reading { resume: Box<PanelState> },
    /// Image bound to the widget, or a removal pending.
    ///
    /// 可编辑。
    Ready(ReadyState),
    /// Forwarding a pan/zoom to the widget; `resume` is restored if it is rejected.
    ///
    /// 正在应用裁剪区域。
    Adjusting { resume: ReadyState },
    /// Rendering the final crop.
    ///
    /// 正在渲染裁剪结果。
    Saving { resume: ReadyState },
    /// Result emitted or cancelled; terminal.
    ///
    /// 已关闭（终态）。
    Closed,
}

/// Events that drive the panel.
///
/// 驱动面板的事件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PanelEvent {
    // Lifecycle
    Open { has_reference: bool },
    Cancel,

    // User actions
    ChooseFile,
    AdjustRegion,
    Delete,
    Save,

    // Results (from the orchestrator)
    StoredImageFetched,
    StoredImageFetchFailed,
    LocalFileRead,
    LocalFileReadFailed,
    WidgetMountFailed,
    RegionApplied,
    RegionRejected,
    RenderSucceeded,
    RenderFailed,
}

/// Side-effects produced by state transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelAction {
    /// Fetch the stored image bytes for the session's reference.
    FetchStoredImage,
    /// Read the chosen local file.
    ReadLocalFile,
    /// Destroy any live handle, then initialize and bind a fresh one.
    MountWidget { replay_region: bool },
    /// Forward the pending region to the live widget.
    ApplyRegion,
    /// Destroy the live widget handle, if any.
    DestroyWidget,
    /// Drop the session's image bytes and region.
    ClearImage,
    /// Render the current selection.
    RenderCrop,
    /// Emit the rendered crop as the save result.
    EmitCropped,
    /// Emit a removal save result.
    EmitRemoval,
}

/// Which panel controls are usable in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Affordances {
    pub delete_enabled: bool,
    pub save_enabled: bool,
    /// Spinner shown.
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("panel event {event:?} is not accepted in state {state:?}")]
pub struct PanelTransitionError {
    pub state: PanelState,
    pub event: PanelEvent,
}

impl PanelState {
    pub fn affordances(&self) -> Affordances {
        match self {
            Self::Ready(ready) => Affordances {
                delete_enabled: ready.widget_live,
                save_enabled: ready.widget_live || ready.dirty,
                busy: false,
            },
            Self::Loading | Self::Reading { .. } | Self::Adjusting { .. } | Self::Saving { .. } => {
                Affordances {
                    delete_enabled: false,
                    save_enabled: false,
                    busy: true,
                }
            }
            Self::Empty | Self::Closed => Affordances {
                delete_enabled: false,
                save_enabled: false,
                busy: false,
            },
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    pub fn is_dirty(&self) -> bool {
        match self {
            Self::Ready(ready)
            | Self::Adjusting { resume: ready }
            | Self::Saving { resume: ready } => ready.dirty,
            Self::Reading { resume } => resume.is_dirty(),
            _ => false,
        }
    }
}

/// Pure panel state machine.
///
/// 纯状态机：不包含副作用。
pub struct PanelStateMachine;

impl PanelStateMachine {
    pub fn transition(
        state: PanelState,
        event: PanelEvent,
    ) -> Result<(PanelState, Vec<PanelAction>), PanelTransitionError> {
        match (state, event) {
            (PanelState::Empty, PanelEvent::Open { has_reference: true }) => {
                Ok((PanelState::Loading, vec![PanelAction::FetchStoredImage]))
            }
            (PanelState::Empty, PanelEvent::Open { has_reference: false }) => {
                Ok((PanelState::Empty, Vec::new()))
            }
            (PanelState::Loading, PanelEvent::StoredImageFetched) => Ok((
                PanelState::Ready(ReadyState::CLEAN),
                vec![PanelAction::MountWidget {
                    replay_region: true,
                }],
            )),
            // Fetch failures stall the panel; a local file or cancel still works.
            (PanelState::Loading, PanelEvent::StoredImageFetchFailed) => {
                Ok((PanelState::Loading, Vec::new()))
            }
            (
                state @ (PanelState::Empty | PanelState::Loading | PanelState::Ready(_)),
                PanelEvent::ChooseFile,
            ) => Ok((
                PanelState::Reading {
                    resume: Box::new(state),
                },
                vec![PanelAction::ReadLocalFile],
            )),
            (PanelState::Reading { .. }, PanelEvent::LocalFileRead) => Ok((
                PanelState::Ready(ReadyState::FRESH_FILE),
                vec![PanelAction::MountWidget {
                    replay_region: false,
                }],
            )),
            (PanelState::Reading { resume }, PanelEvent::LocalFileReadFailed) => {
                Ok((*resume, Vec::new()))
            }
            (PanelState::Ready(_), PanelEvent::WidgetMountFailed) => Ok((
                PanelState::Empty,
                vec![PanelAction::DestroyWidget, PanelAction::ClearImage],
            )),
            (PanelState::Ready(ready), PanelEvent::AdjustRegion) if ready.widget_live => Ok((
                PanelState::Adjusting { resume: ready },
                vec![PanelAction::ApplyRegion],
            )),
            (PanelState::Adjusting { .. }, PanelEvent::RegionApplied) => Ok((
                PanelState::Ready(ReadyState {
                    dirty: true,
                    widget_live: true,
                }),
                Vec::new(),
            )),
            (PanelState::Adjusting { resume }, PanelEvent::RegionRejected) => {
                Ok((PanelState::Ready(resume), Vec::new()))
            }
            (PanelState::Ready(ready), PanelEvent::Delete) if ready.widget_live => Ok((
                PanelState::Ready(ReadyState::REMOVAL_PENDING),
                vec![PanelAction::DestroyWidget, PanelAction::ClearImage],
            )),
            (PanelState::Ready(ready), PanelEvent::Save) if ready.widget_live => Ok((
                PanelState::Saving { resume: ready },
                vec![PanelAction::RenderCrop],
            )),
            (PanelState::Ready(ready), PanelEvent::Save) if ready.dirty => {
                Ok((PanelState::Closed, vec![PanelAction::EmitRemoval]))
            }
            (PanelState::Saving { .. }, PanelEvent::RenderSucceeded) => Ok((
                PanelState::Closed,
                vec![PanelAction::DestroyWidget, PanelAction::EmitCropped],
            )),
            (PanelState::Saving { resume }, PanelEvent::RenderFailed) => {
                Ok((PanelState::Ready(resume), Vec::new()))
            }
            (state, PanelEvent::Cancel) if !state.is_closed() => {
                Ok((PanelState::Closed, vec![PanelAction::DestroyWidget]))
            }
            (state, event) => Err(PanelTransitionError { state, event }),
        }
    }
}
