//! Upload/crop panel domain module.
//!
//! This module defines the editing-session state machine types.

pub mod state_machine;

pub use state_machine::{
    Affordances, PanelAction, PanelEvent, PanelState, PanelStateMachine, PanelTransitionError,
    ReadyState,
};
