//! Effects - side effects declared by the reducer
//!
//! Effects are data: the reducer stays pure and the main loop's effect
//! handler turns them into tasks on the fetch coordinator.

pub use crate::action::FetchTag;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch weather for the position without delay, cancelling any pending
    /// debounced fetch first.
    FetchWeather {
        latitude: f64,
        longitude: f64,
        label: Option<String>,
        tag: FetchTag,
    },
    /// Arm (or re-arm) the debounced hover fetch for the position.
    ScheduleHoverFetch {
        latitude: f64,
        longitude: f64,
        label: Option<String>,
    },
    /// Query the geocoding provider. Type-ahead queries are debounced;
    /// submits run immediately.
    SearchPlaces { query: String, immediate: bool },
}
