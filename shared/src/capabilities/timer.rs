use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Handle for one scheduled notification stream. The core allocates handles
/// and the shell echoes them back, so a notification for a released handle
/// can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum TimerOperation {
    /// Resolve once with `TimerOutput::Elapsed` after `millis`.
    NotifyAfter { id: TimerId, millis: u64 },
    /// Drop any pending notification for `id`. Never resolved.
    Clear { id: TimerId },
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum TimerOutput {
    Elapsed { id: TimerId },
}

impl TimerOutput {
    #[must_use]
    pub const fn id(self) -> TimerId {
        match self {
            Self::Elapsed { id } => id,
        }
    }
}

pub struct Timer<E> {
    context: CapabilityContext<TimerOperation, E>,
}

impl<Ev> Capability<Ev> for Timer<Ev> {
    type Operation = TimerOperation;
    type MappedSelf<MappedEv> = Timer<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Timer::new(self.context.map_event(f))
    }
}

impl<E> Timer<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<TimerOperation, E>) -> Self {
        Self { context }
    }

    pub fn notify_after<F>(&self, id: TimerId, after: Duration, callback: F)
    where
        F: FnOnce(TimerOutput) -> E + Send + 'static,
    {
        let millis = u64::try_from(after.as_millis()).unwrap_or(u64::MAX);
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(TimerOperation::NotifyAfter { id, millis })
                .await;
            ctx.update_app(callback(output));
        });
    }

    pub fn clear(&self, id: TimerId) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(TimerOperation::Clear { id }).await;
        });
    }
}
