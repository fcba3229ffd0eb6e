//! Application state - single source of truth
//!
//! Components receive `&AppState` as props; only the reducer mutates it.
//! Each mutable slot has exactly one writer path through the reducer, so no
//! locking is needed on the single event-processing task.

use crate::locations;

/// Debounce delay for hover-triggered weather fetches.
pub const HOVER_DEBOUNCE_MS: u64 = 1000;

/// Debounce delay for search-as-you-type geocoding queries.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Tick interval driving the loading spinner and camera pan animation.
pub const TICK_MS: u64 = 120;

/// Default camera center over the region (same view the town list covers).
pub const DEFAULT_CENTER: (f64, f64) = (7.9465, -1.0232);

/// Default visible latitude span in degrees.
pub const DEFAULT_SPAN: f64 = 8.0;

/// A named geographic position. Immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(label: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            label: label.into(),
            latitude,
            longitude,
        }
    }
}

/// Current weather reading. Replaced wholesale on every completed fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed: f64,
}

impl WeatherSnapshot {
    /// Placeholder reading shown when the provider call fails, so the panel
    /// never shows an error state.
    pub fn fallback() -> Self {
        Self {
            temperature_c: 28.0,
            condition: "Sunny".into(),
            humidity_pct: 50,
            wind_speed: 12.0,
        }
    }
}

/// Temperature unit preference (display only; fetches stay metric).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn toggle(self) -> Self {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }

    pub fn format(self, celsius: f64) -> String {
        match self {
            TempUnit::Celsius => format!("{:.1}°C", celsius),
            TempUnit::Fahrenheit => format!("{:.1}°F", celsius * 9.0 / 5.0 + 32.0),
        }
    }
}

/// Swappable map render palette, the terminal analogue of a tile-layer
/// switcher.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum MapLayer {
    #[default]
    Street,
    Satellite,
    Topographic,
    Dark,
}

impl MapLayer {
    pub fn cycle(self) -> Self {
        match self {
            MapLayer::Street => MapLayer::Satellite,
            MapLayer::Satellite => MapLayer::Topographic,
            MapLayer::Topographic => MapLayer::Dark,
            MapLayer::Dark => MapLayer::Street,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            MapLayer::Street => "Street",
            MapLayer::Satellite => "Satellite",
            MapLayer::Topographic => "Topographic",
            MapLayer::Dark => "Dark",
        }
    }
}

/// Where search queries are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum LocationSource {
    /// Case-insensitive substring filtering over the fixed town list.
    #[default]
    Fixed,
    /// Free-text geocoding against the remote search provider.
    Live,
}

/// The single selected position plus its display label. Last write wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub position: Option<(f64, f64)>,
    pub label: Option<String>,
}

/// Camera over the map: current center, visible span, and an optional pan
/// target the tick animation moves toward.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    pub center: (f64, f64),
    pub span_lat: f64,
    pub target: Option<(f64, f64)>,
}

/// Fraction of the remaining distance covered per animation tick.
const PAN_STEP: f64 = 0.25;

/// Distance in degrees below which a pan snaps to its target.
const PAN_EPSILON: f64 = 0.02;

const MIN_SPAN: f64 = 0.5;
const MAX_SPAN: f64 = 160.0;

impl Viewport {
    pub fn new() -> Self {
        Self {
            center: DEFAULT_CENTER,
            span_lat: DEFAULT_SPAN,
            target: None,
        }
    }

    /// Start an animated pan toward the given position.
    pub fn fly_to(&mut self, latitude: f64, longitude: f64) {
        self.target = Some((latitude, longitude));
    }

    pub fn is_panning(&self) -> bool {
        self.target.is_some()
    }

    /// Advance an active pan by one tick. Returns `true` on the tick the
    /// camera arrives at its target.
    pub fn advance(&mut self) -> bool {
        let Some((tlat, tlon)) = self.target else {
            return false;
        };
        let (clat, clon) = self.center;
        let (dlat, dlon) = (tlat - clat, tlon - clon);
        if dlat.abs().max(dlon.abs()) < PAN_EPSILON {
            self.center = (tlat, tlon);
            self.target = None;
            return true;
        }
        self.center = (clat + dlat * PAN_STEP, clon + dlon * PAN_STEP);
        false
    }

    /// Manual pan. Cancels any animated pan in progress.
    pub fn nudge(&mut self, dlat: f64, dlon: f64) {
        self.target = None;
        let (lat, lon) = self.center;
        self.center = (
            (lat + dlat).clamp(-85.0, 85.0),
            (lon + dlon).clamp(-180.0, 180.0),
        );
    }

    /// Scale the visible span by `factor` (< 1 zooms in).
    pub fn zoom(&mut self, factor: f64) {
        self.span_lat = (self.span_lat * factor).clamp(MIN_SPAN, MAX_SPAN);
    }

    /// Step size for cursor movement and keyboard panning at this zoom.
    pub fn step(&self) -> f64 {
        self.span_lat * 0.05
    }

    /// Radius in degrees within which a hover snaps to the nearest town.
    pub fn snap_radius(&self) -> f64 {
        self.span_lat / 20.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Ephemeral search overlay state, cleared when the overlay closes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    pub open: bool,
    pub query: String,
    pub results: Vec<Location>,
    pub selected: usize,
}

/// Application state - everything the UI needs to render.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Fixed list of regional towns shown as map markers.
    pub towns: Vec<Location>,

    /// How search queries are resolved (fixed list vs. remote geocoding).
    pub source: LocationSource,

    /// The selected position and its marker label.
    pub selection: Selection,

    /// Selection waiting for an animated pan to finish before it is applied.
    pub pending_selection: Option<Selection>,

    /// Latest weather reading (None = nothing fetched yet).
    pub weather: Option<WeatherSnapshot>,

    /// Label shown in the weather panel ("Loading..." while a fetch is armed).
    pub panel_label: Option<String>,

    /// True from the moment a fetch is armed until its result lands.
    pub is_loading: bool,

    /// Geographic position of the hover cursor, if any.
    pub hover: Option<(f64, f64)>,

    pub viewport: Viewport,
    pub layer: MapLayer,
    pub unit: TempUnit,
    pub search: SearchState,

    /// Animation frame counter for the loading spinner.
    pub tick_count: u32,

    /// Terminal dimensions, updated on resize.
    pub terminal_size: (u16, u16),
}

impl AppState {
    pub fn new(source: LocationSource) -> Self {
        Self {
            towns: locations::regional_capitals(),
            source,
            selection: Selection::default(),
            pending_selection: None,
            weather: None,
            panel_label: None,
            is_loading: false,
            hover: None,
            viewport: Viewport::new(),
            layer: MapLayer::default(),
            unit: TempUnit::default(),
            search: SearchState::default(),
            tick_count: 0,
            terminal_size: (80, 24),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LocationSource::Fixed)
    }
}
