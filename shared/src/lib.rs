// lib.rs - Emergency SOS shared core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod event;
pub mod model;
pub mod session;
pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use catalog::{EmergencyContact, EmergencyType};
pub use config::{ConfigError, SosConfig};
pub use event::Event;
pub use model::{LocationStatus, Model, Position, ShareStatus};
pub use session::{
    EmergencySession, SessionError, SessionSnapshot, SessionStatus, COUNTDOWN_SECS, TICK_PERIOD,
};
pub use view::ViewModel;

pub const CLIPBOARD_TOAST: &str = "Location copied to clipboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidState,
    Validation,
    Configuration,
    ShareUnavailable,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidState => "INVALID_STATE",
            Self::Validation => "VALIDATION_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::ShareUnavailable => "SHARE_UNAVAILABLE",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::ShareUnavailable => ErrorSeverity::Transient,
            Self::InvalidState | Self::Validation => ErrorSeverity::Permanent,
            Self::Configuration => ErrorSeverity::Fatal,
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::ShareUnavailable)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable() && !matches!(self.severity, ErrorSeverity::Fatal)
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::InvalidState | ErrorKind::Validation => self.message.clone(),
            ErrorKind::Configuration => {
                "The emergency screen is misconfigured. Please contact support.".into()
            }
            ErrorKind::ShareUnavailable => {
                "Unable to share your location. Please read it out or share it manually.".into()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        use session::Violation;

        let message = match e.violation() {
            Violation::NoEmergencyType => "Please select an emergency type",
            Violation::NoLocation => "Your location is not available yet",
            Violation::Status(_) => "That action is not available right now",
        };
        AppError::new(ErrorKind::InvalidState, message)
            .with_internal(e.to_string())
            .with_context("command", format!("{:?}", e.command()))
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::Configuration, e.to_string())
    }
}

impl From<capabilities::DialError> for AppError {
    fn from(e: capabilities::DialError) -> Self {
        AppError::new(ErrorKind::Validation, format!("Cannot call this number: {e}"))
    }
}

impl From<capabilities::ShareError> for AppError {
    fn from(e: capabilities::ShareError) -> Self {
        AppError::new(ErrorKind::ShareUnavailable, "Unable to share location")
            .with_internal(e.to_string())
    }
}

pub mod app {
    use tracing::{debug, info, instrument, warn};

    use super::*;
    use crate::capabilities::{DialNumber, GeolocationError, SharePayload, TimerId};
    use crate::session::{Command, Tick, Violation};

    #[derive(Default)]
    pub struct App;

    impl App {
        fn fail(model: &mut Model, error: impl Into<AppError>) {
            let error = error.into();
            warn!(code = error.code(), %error, "command rejected");
            model.set_error(error);
        }

        fn schedule_tick(caps: &Capabilities, timer: TimerId) {
            caps.timer.notify_after(timer, TICK_PERIOD, Event::TimerElapsed);
        }

        fn request_location(model: &mut Model, caps: &Capabilities) {
            model.location_status = LocationStatus::Requesting;
            caps.geolocation
                .current_position(|result| Event::LocationResolved(Box::new(result)));
        }

        fn configure(model: &mut Model, config: SosConfig) {
            let status = model.session.status();
            if status != SessionStatus::Idle {
                return Self::fail(
                    model,
                    SessionError::InvalidState {
                        command: Command::Configure,
                        violation: Violation::Status(status),
                    },
                );
            }
            match config.validate() {
                Ok(()) => {
                    debug!(directory = config.directory.len(), "configuration applied");
                    model.config = config;
                }
                Err(e) => Self::fail(model, e),
            }
        }

        fn on_tick(model: &mut Model, caps: &Capabilities, id: TimerId) {
            match model.session.tick(id) {
                Tick::Stale => debug!(timer = %id, "ignoring stale tick"),
                Tick::Counting { remaining } => {
                    debug!(timer = %id, remaining, "countdown tick");
                    Self::schedule_tick(caps, id);
                }
                Tick::Dispatched { timer } => {
                    caps.timer.clear(timer);
                    info!(
                        incident = ?model.session.incident(),
                        kind = ?model.session.emergency_type(),
                        "countdown elapsed, emergency dispatched"
                    );
                }
            }
        }

        fn on_location(model: &mut Model, result: Result<crate::capabilities::GeoFix, GeolocationError>) {
            let fix = match result {
                Ok(fix) => fix,
                Err(e) => {
                    warn!(error = %e, "location unavailable");
                    model.location_status = LocationStatus::Unavailable(e);
                    return;
                }
            };

            match Position::new(fix.latitude, fix.longitude) {
                Ok(position) => {
                    model.session.record_location(position);
                    model.location_status = LocationStatus::Acquired;
                    info!(accuracy_m = ?fix.accuracy_m, "location acquired");
                }
                Err(e) => {
                    warn!(error = %e, "discarding invalid fix");
                    model.location_status =
                        LocationStatus::Unavailable(GeolocationError::unavailable(e.to_string()));
                }
            }
        }

        fn share_location(model: &mut Model, caps: &Capabilities) {
            let position = match model.session.shareable_location() {
                Ok(position) => position,
                Err(e) => return Self::fail(model, e),
            };
            let base = match model.config.map_base() {
                Ok(base) => base,
                Err(e) => return Self::fail(model, e),
            };

            let url = position.map_url(&base).to_string();
            let payload = SharePayload {
                title: model.config.share_title.clone(),
                text: model.config.share_text.clone(),
                url: url.clone(),
            };
            caps.share
                .native(payload, |result| Event::NativeShareFinished(Box::new(result)));
            model.share_status = ShareStatus::Sharing { url };
        }

        fn on_native_share(
            model: &mut Model,
            caps: &Capabilities,
            result: capabilities::ShareResult,
        ) {
            match result {
                Ok(_) => model.share_status = ShareStatus::Shared,
                Err(e) if e.wants_clipboard_fallback() => {
                    let Some(url) = model.share_status.pending_url().map(str::to_string) else {
                        debug!("native share reported unsupported with nothing pending");
                        return;
                    };
                    debug!("native share unsupported, copying to clipboard");
                    caps.share.copy_to_clipboard(url.clone(), |result| {
                        Event::ClipboardCopyFinished(Box::new(result))
                    });
                    model.share_status = ShareStatus::Copying { url };
                }
                Err(capabilities::ShareError::Dismissed) => model.share_status = ShareStatus::Idle,
                Err(e) => {
                    model.share_status = ShareStatus::Failed;
                    Self::fail(model, e);
                }
            }
        }

        fn on_clipboard(model: &mut Model, result: capabilities::ShareResult) {
            match result {
                Ok(_) => {
                    model.share_status = ShareStatus::Copied;
                    model.active_toast = Some(CLIPBOARD_TOAST.into());
                }
                Err(e) => {
                    model.share_status = ShareStatus::Failed;
                    Self::fail(model, e);
                }
            }
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        #[instrument(skip_all, fields(event = event.name()))]
        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            if event.is_user_initiated() && !matches!(event, Event::DismissToast) {
                model.clear_error();
            }

            match event {
                Event::Opened => Self::request_location(model, caps),

                Event::Configure(config) => Self::configure(model, *config),

                Event::SelectType(kind) => {
                    if let Err(e) = model.session.select_type(kind) {
                        Self::fail(model, e);
                    }
                }

                Event::SetMessage(text) => {
                    if let Err(e) = model.session.set_message(text) {
                        Self::fail(model, e);
                    }
                }

                Event::Arm => match model.session.arm() {
                    Ok(armed) => {
                        info!(
                            incident = %armed.incident,
                            timer = %armed.timer,
                            kind = ?model.session.emergency_type(),
                            located = model.session.location().is_some(),
                            "emergency armed"
                        );
                        Self::schedule_tick(caps, armed.timer);
                    }
                    Err(e) => Self::fail(model, e),
                },

                Event::Cancel => match model.session.cancel() {
                    Ok(timer) => {
                        caps.timer.clear(timer);
                        info!(
                            incident = ?model.session.incident(),
                            remaining = model.session.countdown_seconds_remaining(),
                            "emergency cancelled"
                        );
                    }
                    Err(e) => Self::fail(model, e),
                },

                Event::Reset => match model.session.reset() {
                    Ok(()) => {
                        model.active_toast = None;
                        debug!("session reset");
                    }
                    Err(e) => Self::fail(model, e),
                },

                Event::TimerElapsed(output) => Self::on_tick(model, caps, output.id()),

                Event::RequestLocation => Self::request_location(model, caps),

                Event::LocationResolved(result) => Self::on_location(model, *result),

                Event::ShareLocation => Self::share_location(model, caps),

                Event::NativeShareFinished(result) => Self::on_native_share(model, caps, *result),

                Event::ClipboardCopyFinished(result) => Self::on_clipboard(model, *result),

                Event::Dial { number } => match DialNumber::new(&number) {
                    Ok(number) => {
                        info!(%number, "dialing");
                        caps.dialer.call(number);
                    }
                    Err(e) => Self::fail(model, e),
                },

                Event::DismissError => {}

                Event::DismissToast => model.active_toast = None,
            }

            caps.render.render();
        }

        fn view(&self, model: &Model) -> ViewModel {
            ViewModel::build(model)
        }
    }
}
