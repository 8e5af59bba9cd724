//! Action enum; every state transition in the TUI flows through the
//! app's action channel.

use std::sync::Arc;

use idatlas_core::{CountryCode, ViewSnapshot};

use crate::screen::ScreenId;

/// Everything that can happen in the TUI.
#[derive(Debug, Clone)]
pub enum Action {
    // Loop plumbing
    Tick,
    Render,
    Resize(u16, u16),
    Quit,

    // Navigation
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // Engine events; published by the data bridge
    SnapshotUpdated(Arc<ViewSnapshot>),

    // Selection
    Select(CountryCode),
    ClearSelection,

    // Filter dimensions (toggle set membership)
    ToggleLevel(u8),
    ToggleType(u32),
    ToggleRegion(String),
    ClearFilters,

    // Year cutoff and playback
    YearEarlier,
    YearLater,
    ClearYear,
    TogglePlayback,

    // Feedback
    Notify(Notification),
}

/// Transient toast shown in the bottom-right corner.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
        }
    }
}
