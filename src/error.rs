use serde::Serialize;

/// How long a [`Notice`] stays on screen.
pub const NOTICE_DISMISS_MS: u32 = 3000;

/// Failures reported by the visualization widget. None of these are fatal:
/// the session logs them and turns them into a [`Notice`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("puzzle widget could not be constructed: {0}")]
    Construction(String),
    #[error("puzzle widget not ready after {attempts} checks")]
    NotReady { attempts: u32 },
    #[error("puzzle widget has no timeline control")]
    TimelineUnavailable,
    #[error("timeline control failed: {0}")]
    Timeline(String),
}

/// A short message for the user that dismisses itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub message: String,
    pub dismiss_after_ms: u32,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            dismiss_after_ms: NOTICE_DISMISS_MS,
        }
    }
}
