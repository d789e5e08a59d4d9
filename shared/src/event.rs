use serde::{Deserialize, Serialize};

use crate::capabilities::{GeolocationResult, ShareResult, TimerOutput};
use crate::catalog::EmergencyType;
use crate::config::SosConfig;

// --- Event enum: large variants boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Screen lifecycle
    Opened,
    Configure(Box<SosConfig>),

    // Incident commands
    SelectType(EmergencyType),
    SetMessage(String),
    Arm,
    Cancel,
    Reset,

    // Location & contact
    RequestLocation,
    ShareLocation,
    Dial { number: String },

    // UI chrome
    DismissError,
    DismissToast,

    // Capability responses
    TimerElapsed(TimerOutput),
    LocationResolved(Box<GeolocationResult>),
    NativeShareFinished(Box<ShareResult>),
    ClipboardCopyFinished(Box<ShareResult>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Configure(_) => "configure",
            Self::SelectType(_) => "select_type",
            Self::SetMessage(_) => "set_message",
            Self::Arm => "arm",
            Self::Cancel => "cancel",
            Self::Reset => "reset",
            Self::RequestLocation => "request_location",
            Self::ShareLocation => "share_location",
            Self::Dial { .. } => "dial",
            Self::DismissError => "dismiss_error",
            Self::DismissToast => "dismiss_toast",
            Self::TimerElapsed(_) => "timer_elapsed",
            Self::LocationResolved(_) => "location_resolved",
            Self::NativeShareFinished(_) => "native_share_finished",
            Self::ClipboardCopyFinished(_) => "clipboard_copy_finished",
        }
    }

    /// Capability responses are produced by the core itself, everything
    /// else originates from the user.
    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::TimerElapsed(_)
                | Self::LocationResolved(_)
                | Self::NativeShareFinished(_)
                | Self::ClipboardCopyFinished(_)
        )
    }
}
