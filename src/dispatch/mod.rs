//! App runtime plumbing: store, effects, tasks, subscriptions, events.
//!
//! The shape is Redux/Elm for terminals: components emit actions, a pure
//! reducer owns every state mutation and declares effects, and the runtime
//! turns effects into cancellable async tasks whose results come back as
//! actions on the same queue.

pub mod component;
pub mod event;
pub mod runtime;
pub mod store;
pub mod subscriptions;
pub mod tasks;
pub mod testing;

pub use component::Component;
pub use event::{process_raw_event, spawn_event_poller, EventKind, PollerConfig, RawEvent};
pub use runtime::{EffectContext, EventOutcome, Runtime};
pub use store::{DispatchResult, Reducer, Store};
pub use subscriptions::Subscriptions;
pub use tasks::{FetchCoordinator, SEARCH_TASK, WEATHER_TASK};
