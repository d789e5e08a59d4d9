//! Test shell: collects effects the core emits and plays the platform's
//! part. Timer requests are resolved on demand, which is how the tests move
//! simulated time forward.

#![allow(dead_code)]

use crux_core::testing::{AppTester, Update};
use crux_core::{App as _, Request};
use sos_shared::capabilities::{
    DialerOperation, GeoFix, GeolocationError, GeolocationOperation, ShareOperation, ShareResult,
    TimerId, TimerOperation, TimerOutput,
};
use sos_shared::{App, Effect, Event, Model, ViewModel};

pub struct Shell {
    app: AppTester<App, Effect>,
    pub model: Model,
    pending_timer: Option<Request<TimerOperation>>,
    pub cleared_timers: Vec<TimerId>,
    pub location_requests: Vec<Request<GeolocationOperation>>,
    pub share_requests: Vec<Request<ShareOperation>>,
    pub dials: Vec<DialerOperation>,
    pub renders: usize,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            app: AppTester::<App, Effect>::default(),
            model: Model::default(),
            pending_timer: None,
            cleared_timers: Vec::new(),
            location_requests: Vec::new(),
            share_requests: Vec::new(),
            dials: Vec::new(),
            renders: 0,
        }
    }

    pub fn send(&mut self, event: Event) {
        let update = self.app.update(event, &mut self.model);
        self.absorb(update);
    }

    pub fn view(&self) -> ViewModel {
        App.view(&self.model)
    }

    pub fn pending_timer_id(&self) -> Option<TimerId> {
        self.pending_timer.as_ref().map(|request| match &request.operation {
            TimerOperation::NotifyAfter { id, .. } | TimerOperation::Clear { id } => *id,
        })
    }

    /// Lets one second of simulated time pass. Returns false when nothing
    /// was scheduled.
    pub fn tick(&mut self) -> bool {
        match self.pending_timer.take() {
            Some(request) => {
                self.fire(request);
                true
            }
            None => false,
        }
    }

    pub fn advance(&mut self, secs: u32) -> u32 {
        let mut fired = 0;
        for _ in 0..secs {
            if !self.tick() {
                break;
            }
            fired += 1;
        }
        fired
    }

    /// Detach the pending notification, as a shell would hold on to a
    /// platform timer that races a clear request.
    pub fn take_pending_timer(&mut self) -> Option<Request<TimerOperation>> {
        self.pending_timer.take()
    }

    pub fn fire(&mut self, mut request: Request<TimerOperation>) {
        let id = match &request.operation {
            TimerOperation::NotifyAfter { id, .. } => *id,
            TimerOperation::Clear { .. } => panic!("clear requests are never resolved"),
        };
        let update = self
            .app
            .resolve(&mut request, TimerOutput::Elapsed { id })
            .expect("timer request should resolve");
        self.absorb(update);
    }

    pub fn resolve_location(&mut self, result: Result<GeoFix, GeolocationError>) {
        let mut request = self
            .location_requests
            .pop()
            .expect("a location request should be pending");
        let update = self
            .app
            .resolve(&mut request, result)
            .expect("location request should resolve");
        self.absorb(update);
    }

    pub fn locate_at(&mut self, latitude: f64, longitude: f64) {
        self.send(Event::RequestLocation);
        self.resolve_location(Ok(GeoFix {
            latitude,
            longitude,
            accuracy_m: Some(8.0),
        }));
    }

    pub fn last_share_operation(&self) -> Option<&ShareOperation> {
        self.share_requests.last().map(|request| &request.operation)
    }

    pub fn resolve_share(&mut self, result: ShareResult) {
        let mut request = self
            .share_requests
            .pop()
            .expect("a share request should be pending");
        let update = self
            .app
            .resolve(&mut request, result)
            .expect("share request should resolve");
        self.absorb(update);
    }

    fn absorb(&mut self, update: Update<Effect, Event>) {
        for effect in update.effects {
            match effect {
                Effect::Render(_) => self.renders += 1,
                Effect::Timer(request) => {
                    let cleared = match request.operation {
                        TimerOperation::Clear { id } => Some(id),
                        TimerOperation::NotifyAfter { .. } => None,
                    };
                    match cleared {
                        Some(id) => {
                            if self.pending_timer_id() == Some(id) {
                                self.pending_timer = None;
                            }
                            self.cleared_timers.push(id);
                        }
                        None => {
                            assert!(
                                self.pending_timer.is_none(),
                                "core scheduled a second notification while one is pending"
                            );
                            self.pending_timer = Some(request);
                        }
                    }
                }
                Effect::Geolocation(request) => self.location_requests.push(request),
                Effect::Share(request) => self.share_requests.push(request),
                Effect::Dialer(request) => self.dials.push(request.operation),
            }
        }

        for event in update.events {
            self.send(event);
        }
    }
}
