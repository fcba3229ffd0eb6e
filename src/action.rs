//! Actions - every state change enters the reducer as one of these
//!
//! Naming follows the intent/result convention: `WeatherRefresh` is an
//! intent that triggers an async task, `WeatherDidLoad` carries the result
//! back. Result actions are the only way async work reaches the state.

use crate::state::{Location, WeatherSnapshot};

/// Whether a completed fetch was armed by a hover or by an explicit
/// selection (click / search). Selection fetches update the marker label;
/// hover fetches only update the weather panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FetchTag {
    Hover,
    Selection,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // ===== Map =====
    /// Cursor rests over a position; arms the debounced weather fetch.
    MapHover { latitude: f64, longitude: f64 },
    /// Explicit selection at a position; fetches immediately.
    MapClick { latitude: f64, longitude: f64 },
    /// Move the hover cursor by one step (keyboard navigation).
    CursorMove { dlat: f64, dlon: f64 },
    /// Select at the current cursor position (keyboard Enter).
    CursorSelect,
    /// Manual camera pan.
    MapPan { dlat: f64, dlon: f64 },
    /// Scale the visible span (< 1 zooms in).
    MapZoom { factor: f64 },
    /// Cycle the map render palette.
    MapCycleLayer,

    // ===== Search =====
    SearchOpen,
    SearchClose,
    SearchQueryChange(String),
    SearchQuerySubmit(String),
    /// Highlight a result in the dropdown.
    SearchSelect(usize),
    /// Confirm the highlighted result.
    SearchConfirm,
    /// Result: geocoding results arrived.
    SearchDidLoad(Vec<Location>),

    // ===== Weather =====
    /// Intent: re-fetch weather for the current selection.
    WeatherRefresh,
    /// Result: a weather fetch completed (successfully or via fallback).
    WeatherDidLoad {
        snapshot: WeatherSnapshot,
        place_name: Option<String>,
        label: Option<String>,
        tag: FetchTag,
        latitude: f64,
        longitude: f64,
    },

    // ===== UI =====
    UiToggleUnits,
    UiTerminalResize(u16, u16),

    // ===== Global =====
    /// Periodic tick driving the spinner and the pan animation.
    Tick,
    Quit,
}

impl Action {
    /// Action name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::MapHover { .. } => "MapHover",
            Action::MapClick { .. } => "MapClick",
            Action::CursorMove { .. } => "CursorMove",
            Action::CursorSelect => "CursorSelect",
            Action::MapPan { .. } => "MapPan",
            Action::MapZoom { .. } => "MapZoom",
            Action::MapCycleLayer => "MapCycleLayer",
            Action::SearchOpen => "SearchOpen",
            Action::SearchClose => "SearchClose",
            Action::SearchQueryChange(_) => "SearchQueryChange",
            Action::SearchQuerySubmit(_) => "SearchQuerySubmit",
            Action::SearchSelect(_) => "SearchSelect",
            Action::SearchConfirm => "SearchConfirm",
            Action::SearchDidLoad(_) => "SearchDidLoad",
            Action::WeatherRefresh => "WeatherRefresh",
            Action::WeatherDidLoad { .. } => "WeatherDidLoad",
            Action::UiToggleUnits => "UiToggleUnits",
            Action::UiTerminalResize(_, _) => "UiTerminalResize",
            Action::Tick => "Tick",
            Action::Quit => "Quit",
        }
    }
}
