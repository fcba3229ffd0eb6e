//! Terminal map and weather explorer
//!
//! A canvas map of regional towns with a weather side panel. Hovering the
//! cursor over the map arms a debounced weather fetch for the position under
//! it; clicking or confirming a search result selects a location and fetches
//! immediately. Provider failures never surface as errors: the panel falls
//! back to a fixed plausible reading.
//!
//! The architecture is Redux/Elm for terminals:
//! 1. Event (keyboard/mouse) -> component `handle_event` -> actions
//! 2. Actions dispatched to the store's pure reducer
//! 3. Reducer mutates state and declares effects
//! 4. Effects become cancellable tasks on the fetch coordinator
//! 5. Completed tasks send result actions back into the queue
//! 6. If state changed, re-render

pub mod action;
pub mod api;
pub mod components;
pub mod dispatch;
pub mod effect;
pub mod locations;
pub mod reducer;
pub mod state;

pub use dispatch::testing;
