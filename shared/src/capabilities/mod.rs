mod dialer;
mod geolocation;
mod share;
mod timer;

pub use self::dialer::{DialError, DialNumber, Dialer, DialerOperation};
pub use self::geolocation::{
    GeoFix, Geolocation, GeolocationError, GeolocationOperation, GeolocationResult,
};
pub use self::share::{Share, ShareError, ShareOperation, ShareOutput, SharePayload, ShareResult};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput};

// Crux's built-in Render capability covers view updates as-is.
pub use crux_core::render::Render;

use crate::event::Event;
#[allow(unused_imports)]
use crate::App;

/// Every port the core talks to. The derive generates the `Effect` enum the
/// shell matches on, one variant per field.
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub timer: Timer<Event>,
    pub geolocation: Geolocation<Event>,
    pub share: Share<Event>,
    pub dialer: Dialer<Event>,
}
