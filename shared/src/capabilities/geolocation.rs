use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum GeolocationOperation {
    CurrentPosition { high_accuracy: bool, timeout_ms: u64 },
}

impl Operation for GeolocationOperation {
    type Output = GeolocationResult;
}

/// Raw fix as reported by the platform. Not yet range-checked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("location request timed out")]
    Timeout,
}

impl GeolocationError {
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }
}

pub type GeolocationResult = Result<GeoFix, GeolocationError>;

pub struct Geolocation<E> {
    context: CapabilityContext<GeolocationOperation, E>,
}

impl<Ev> Capability<Ev> for Geolocation<Ev> {
    type Operation = GeolocationOperation;
    type MappedSelf<MappedEv> = Geolocation<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Geolocation::new(self.context.map_event(f))
    }
}

impl<E> Geolocation<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<GeolocationOperation, E>) -> Self {
        Self { context }
    }

    /// One-shot position request. Not cancellable once issued.
    pub fn current_position<F>(&self, callback: F)
    where
        F: FnOnce(GeolocationResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(GeolocationOperation::CurrentPosition {
                    high_accuracy: true,
                    timeout_ms: DEFAULT_TIMEOUT_MS,
                })
                .await;
            ctx.update_app(callback(result));
        });
    }
}
