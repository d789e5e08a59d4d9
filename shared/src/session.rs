//! The emergency incident state machine.
//!
//! `idle → armed → {dispatched | cancelled}`, and both terminal states go
//! back to `idle` through [`EmergencySession::reset`]. Arming allocates a
//! [`TimerId`]; the scheduler feeds ticks back through
//! [`EmergencySession::tick`] and any tick for a handle that is no longer
//! active is ignored. The handle is released on both exits from `armed`.
//!
//! Every command returns a `Result`: a precondition violation is an error,
//! never a silent no-op, and leaves the session untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::capabilities::TimerId;
use crate::catalog::EmergencyType;
use crate::model::Position;

/// Grace window between arming and automatic dispatch.
pub const COUNTDOWN_SECS: u32 = 30;
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Armed,
    Dispatched,
    Cancelled,
}

impl SessionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Armed => "armed",
            Self::Dispatched => "dispatched",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dispatched | Self::Cancelled)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IncidentId(Uuid);

impl IncidentId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    SelectType,
    SetMessage,
    Arm,
    Cancel,
    Reset,
    ShareLocation,
    Configure,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SelectType => "select an emergency type",
            Self::SetMessage => "edit the message",
            Self::Arm => "arm",
            Self::Cancel => "cancel",
            Self::Reset => "reset",
            Self::ShareLocation => "share location",
            Self::Configure => "reconfigure",
        })
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    #[error("session is {0}")]
    Status(SessionStatus),

    #[error("no emergency type selected")]
    NoEmergencyType,

    #[error("no location acquired")]
    NoLocation,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
    #[error("cannot {command}: {violation}")]
    InvalidState { command: Command, violation: Violation },
}

impl SessionError {
    const fn invalid(command: Command, violation: Violation) -> Self {
        Self::InvalidState { command, violation }
    }

    #[must_use]
    pub const fn command(&self) -> Command {
        match self {
            Self::InvalidState { command, .. } => *command,
        }
    }

    #[must_use]
    pub const fn violation(&self) -> Violation {
        match self {
            Self::InvalidState { violation, .. } => *violation,
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Returned by a successful `arm()`: the handle the scheduler must tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Armed {
    pub timer: TimerId,
    pub incident: IncidentId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Handle is not the active timer; nothing changed.
    Stale,
    Counting { remaining: u32 },
    /// Countdown hit zero. The handle has been released.
    Dispatched { timer: TimerId },
}

/// Read model handed to observers after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub emergency_type: Option<EmergencyType>,
    pub message: Option<String>,
    pub location: Option<Position>,
    pub countdown_seconds_remaining: u32,
    pub incident: Option<IncidentId>,
}

#[derive(Clone, Default)]
pub struct EmergencySession {
    status: SessionStatus,
    emergency_type: Option<EmergencyType>,
    message: Option<String>,
    location: Option<Position>,
    countdown: u32,
    incident: Option<IncidentId>,
    timer: Option<TimerId>,
    next_timer: u64,
}

impl EmergencySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn emergency_type(&self) -> Option<EmergencyType> {
        self.emergency_type
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn location(&self) -> Option<Position> {
        self.location
    }

    pub fn countdown_seconds_remaining(&self) -> u32 {
        self.countdown
    }

    pub fn incident(&self) -> Option<IncidentId> {
        self.incident
    }

    pub fn active_timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn select_type(&mut self, kind: EmergencyType) -> SessionResult<()> {
        match self.status {
            SessionStatus::Idle | SessionStatus::Armed => {
                self.emergency_type = Some(kind);
                Ok(())
            }
            status => Err(SessionError::invalid(
                Command::SelectType,
                Violation::Status(status),
            )),
        }
    }

    /// Stored verbatim.
    pub fn set_message(&mut self, text: impl Into<String>) -> SessionResult<()> {
        if self.status == SessionStatus::Dispatched {
            return Err(SessionError::invalid(
                Command::SetMessage,
                Violation::Status(self.status),
            ));
        }
        self.message = Some(text.into());
        Ok(())
    }

    pub fn arm(&mut self) -> SessionResult<Armed> {
        if self.status != SessionStatus::Idle {
            return Err(SessionError::invalid(
                Command::Arm,
                Violation::Status(self.status),
            ));
        }
        if self.emergency_type.is_none() {
            return Err(SessionError::invalid(Command::Arm, Violation::NoEmergencyType));
        }

        let timer = self.allocate_timer();
        let incident = IncidentId::generate();
        self.status = SessionStatus::Armed;
        self.countdown = COUNTDOWN_SECS;
        self.timer = Some(timer);
        self.incident = Some(incident);

        Ok(Armed { timer, incident })
    }

    pub fn tick(&mut self, id: TimerId) -> Tick {
        if self.status != SessionStatus::Armed || self.timer != Some(id) {
            return Tick::Stale;
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return Tick::Counting {
                remaining: self.countdown,
            };
        }

        self.status = SessionStatus::Dispatched;
        self.timer = None;
        Tick::Dispatched { timer: id }
    }

    /// Returns the released timer handle so the caller can tear it down.
    pub fn cancel(&mut self) -> SessionResult<TimerId> {
        let timer = match (self.status, self.timer) {
            (SessionStatus::Armed, Some(timer)) if self.countdown > 0 => timer,
            (status, _) => {
                return Err(SessionError::invalid(
                    Command::Cancel,
                    Violation::Status(status),
                ))
            }
        };

        self.status = SessionStatus::Cancelled;
        self.timer = None;
        self.emergency_type = None;
        self.message = None;
        Ok(timer)
    }

    pub fn reset(&mut self) -> SessionResult<()> {
        if self.status == SessionStatus::Armed {
            return Err(SessionError::invalid(
                Command::Reset,
                Violation::Status(self.status),
            ));
        }

        self.status = SessionStatus::Idle;
        self.emergency_type = None;
        self.message = None;
        self.countdown = 0;
        self.incident = None;
        self.timer = None;
        Ok(())
    }

    /// Location is independent of the incident lifecycle; a newer fix
    /// replaces an older one and nothing else clears it.
    pub fn record_location(&mut self, position: Position) {
        self.location = Some(position);
    }

    pub fn shareable_location(&self) -> SessionResult<Position> {
        self.location
            .ok_or(SessionError::invalid(Command::ShareLocation, Violation::NoLocation))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            emergency_type: self.emergency_type,
            message: self.message.clone(),
            location: self.location,
            countdown_seconds_remaining: self.countdown,
            incident: self.incident,
        }
    }

    fn allocate_timer(&mut self) -> TimerId {
        self.next_timer = self.next_timer.wrapping_add(1);
        TimerId(self.next_timer)
    }
}

// Redact debug output because the message is user-provided free text.
impl fmt::Debug for EmergencySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmergencySession")
            .field("status", &self.status)
            .field("emergency_type", &self.emergency_type)
            .field("message_present", &self.message.as_ref().map(|_| true))
            .field("location_present", &self.location.is_some())
            .field("countdown", &self.countdown)
            .field("incident", &self.incident)
            .field("timer", &self.timer)
            .finish()
    }
}
