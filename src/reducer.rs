//! Reducer - pure function: (state, action) -> state change + effects
//!
//! This is the single owner of every mutable slot: the selection, the
//! pending (pan-gated) selection, the weather panel label, and the camera.
//! No side effects happen here; async work is declared as [`Effect`]s.

use crate::action::{Action, FetchTag};
use crate::dispatch::store::DispatchResult;
use crate::effect::Effect;
use crate::locations;
use crate::state::{AppState, LocationSource, SearchState, Selection};

/// Provisional marker label for click selections, shown until the fetch
/// resolves a better one.
pub const CLICK_LABEL: &str = "Selected Location";

/// Provisional marker label for search selections.
pub const SEARCH_LABEL: &str = "Searched Location";

/// Panel label while a hover fetch is armed.
pub const LOADING_LABEL: &str = "Loading...";

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult {
    match action {
        // ===== Map =====
        Action::MapHover {
            latitude,
            longitude,
        } => hover_at(state, latitude, longitude),

        Action::MapClick {
            latitude,
            longitude,
        } => select_at(state, latitude, longitude),

        Action::CursorMove { dlat, dlon } => {
            let (lat, lon) = state.hover.unwrap_or(state.viewport.center);
            let lat = (lat + dlat).clamp(-85.0, 85.0);
            let lon = (lon + dlon).clamp(-180.0, 180.0);

            // Camera follows once the cursor nears the edge of the view
            let (clat, clon) = state.viewport.center;
            if (lat - clat).abs() > state.viewport.span_lat * 0.4
                || (lon - clon).abs() > state.viewport.span_lat * 0.8
            {
                state.viewport.nudge(dlat, dlon);
            }

            hover_at(state, lat, lon)
        }

        Action::CursorSelect => match state.hover {
            Some((lat, lon)) => select_at(state, lat, lon),
            None => DispatchResult::unchanged(),
        },

        Action::MapPan { dlat, dlon } => {
            state.viewport.nudge(dlat, dlon);
            DispatchResult::changed()
        }

        Action::MapZoom { factor } => {
            state.viewport.zoom(factor);
            DispatchResult::changed()
        }

        Action::MapCycleLayer => {
            state.layer = state.layer.cycle();
            DispatchResult::changed()
        }

        // ===== Search =====
        Action::SearchOpen => {
            state.search = SearchState {
                open: true,
                ..SearchState::default()
            };
            DispatchResult::changed()
        }

        Action::SearchClose => {
            state.search = SearchState::default();
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            state.search.query = query.clone();
            state.search.selected = 0;
            match state.source {
                LocationSource::Fixed => {
                    state.search.results = locations::filter_towns(&state.towns, &query);
                    DispatchResult::changed()
                }
                LocationSource::Live => {
                    if query.trim().is_empty() {
                        state.search.results.clear();
                        DispatchResult::changed()
                    } else {
                        DispatchResult::changed_with(Effect::SearchPlaces {
                            query,
                            immediate: false,
                        })
                    }
                }
            }
        }

        Action::SearchQuerySubmit(query) => match state.source {
            LocationSource::Live if !query.trim().is_empty() => {
                DispatchResult::changed_with(Effect::SearchPlaces {
                    query,
                    immediate: true,
                })
            }
            _ => DispatchResult::unchanged(),
        },

        Action::SearchSelect(index) => {
            if index < state.search.results.len() && index != state.search.selected {
                state.search.selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SearchConfirm => {
            let Some(location) = state.search.results.get(state.search.selected).cloned() else {
                return DispatchResult::unchanged();
            };
            state.search = SearchState::default();

            // Camera pans first; the marker lands when the pan completes.
            // The fetch is not gated on the pan.
            state.viewport.fly_to(location.latitude, location.longitude);
            state.pending_selection = Some(Selection {
                position: Some((location.latitude, location.longitude)),
                label: Some(SEARCH_LABEL.into()),
            });
            state.panel_label = Some(SEARCH_LABEL.into());
            state.is_loading = true;

            DispatchResult::changed_with(Effect::FetchWeather {
                latitude: location.latitude,
                longitude: location.longitude,
                label: Some(SEARCH_LABEL.into()),
                tag: FetchTag::Selection,
            })
        }

        Action::SearchDidLoad(results) => {
            if state.search.open {
                state.search.results = results;
                state.search.selected = 0;
                DispatchResult::changed()
            } else {
                // Overlay closed while the query was in flight
                DispatchResult::unchanged()
            }
        }

        // ===== Weather =====
        Action::WeatherRefresh => match state.selection.position {
            Some((lat, lon)) => {
                state.is_loading = true;
                DispatchResult::changed_with(Effect::FetchWeather {
                    latitude: lat,
                    longitude: lon,
                    label: state.selection.label.clone(),
                    tag: FetchTag::Selection,
                })
            }
            None => DispatchResult::unchanged(),
        },

        Action::WeatherDidLoad {
            snapshot,
            place_name,
            label,
            tag,
            latitude,
            longitude,
        } => {
            let resolved = resolve_label(place_name, label, latitude, longitude);
            state.weather = Some(snapshot);
            state.is_loading = false;
            state.panel_label = Some(resolved.clone());
            if tag == FetchTag::Selection {
                // A selection still waiting on its pan keeps the resolved
                // label so the pan's arrival does not revert it.
                match state.pending_selection.as_mut() {
                    Some(pending) => pending.label = Some(resolved),
                    None => state.selection.label = Some(resolved),
                }
            }
            DispatchResult::changed()
        }

        // ===== UI =====
        Action::UiToggleUnits => {
            state.unit = state.unit.toggle();
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Global =====
        Action::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            let arrived = state.viewport.advance();
            if arrived {
                if let Some(pending) = state.pending_selection.take() {
                    state.selection = pending;
                }
            }
            // Re-render only while something animates
            if arrived || state.is_loading || state.viewport.is_panning() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Arm the debounced weather fetch for a hover position. Never touches the
/// selection or the marker. Hovering within snap range of a town targets
/// the town itself.
fn hover_at(state: &mut AppState, latitude: f64, longitude: f64) -> DispatchResult {
    state.hover = Some((latitude, longitude));
    state.panel_label = Some(LOADING_LABEL.into());
    state.is_loading = true;

    let snapped = locations::nearest_town(
        &state.towns,
        latitude,
        longitude,
        state.viewport.snap_radius(),
    );
    let (fetch_lat, fetch_lon, label) = match snapped {
        Some(town) => (town.latitude, town.longitude, Some(town.label.clone())),
        None => (latitude, longitude, None),
    };

    DispatchResult::changed_with(Effect::ScheduleHoverFetch {
        latitude: fetch_lat,
        longitude: fetch_lon,
        label,
    })
}

/// Explicit selection: the marker moves immediately, before the weather
/// resolves, and the fetch bypasses the debounce.
fn select_at(state: &mut AppState, latitude: f64, longitude: f64) -> DispatchResult {
    state.selection = Selection {
        position: Some((latitude, longitude)),
        label: Some(CLICK_LABEL.into()),
    };
    state.pending_selection = None;
    state.viewport.target = None;
    state.panel_label = Some(CLICK_LABEL.into());
    state.is_loading = true;

    DispatchResult::changed_with(Effect::FetchWeather {
        latitude,
        longitude,
        label: Some(CLICK_LABEL.into()),
        tag: FetchTag::Selection,
    })
}

/// Display-label precedence: provider-supplied place name, else the
/// caller's label, else formatted coordinates.
fn resolve_label(
    place_name: Option<String>,
    label: Option<String>,
    latitude: f64,
    longitude: f64,
) -> String {
    place_name
        .filter(|name| !name.is_empty())
        .or(label)
        .unwrap_or_else(|| format!("Lat: {:.2}, Lng: {:.2}", latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WeatherSnapshot;

    fn loaded(
        place_name: Option<&str>,
        label: Option<&str>,
        tag: FetchTag,
        latitude: f64,
        longitude: f64,
    ) -> Action {
        Action::WeatherDidLoad {
            snapshot: WeatherSnapshot::fallback(),
            place_name: place_name.map(Into::into),
            label: label.map(Into::into),
            tag,
            latitude,
            longitude,
        }
    }

    /// Run ticks until the active pan arrives; panics if it never does.
    fn run_pan_to_completion(state: &mut AppState) {
        for _ in 0..200 {
            reducer(state, Action::Tick);
            if !state.viewport.is_panning() {
                return;
            }
        }
        panic!("pan did not complete");
    }

    #[test]
    fn test_hover_arms_debounced_fetch_without_touching_selection() {
        let mut state = AppState::default();

        let result = reducer(
            &mut state,
            Action::MapHover {
                latitude: 1.0,
                longitude: 1.0,
            },
        );

        assert!(result.changed);
        assert_eq!(
            result.effects,
            vec![Effect::ScheduleHoverFetch {
                latitude: 1.0,
                longitude: 1.0,
                label: None,
            }]
        );
        assert_eq!(state.selection, Selection::default());
        assert_eq!(state.panel_label.as_deref(), Some(LOADING_LABEL));
        assert!(state.is_loading);
    }

    #[test]
    fn test_hover_snaps_to_nearby_town() {
        let mut state = AppState::default();

        // Just off Accra (5.6145, -0.2056), within the snap radius
        let result = reducer(
            &mut state,
            Action::MapHover {
                latitude: 5.62,
                longitude: -0.21,
            },
        );

        assert_eq!(
            result.effects,
            vec![Effect::ScheduleHoverFetch {
                latitude: 5.6145,
                longitude: -0.2056,
                label: Some("Accra".into()),
            }]
        );
    }

    #[test]
    fn test_click_selects_immediately_with_provisional_label() {
        let mut state = AppState::default();

        let result = reducer(
            &mut state,
            Action::MapClick {
                latitude: 6.0,
                longitude: -1.0,
            },
        );

        // Marker shows at the click point before the weather resolves
        assert_eq!(state.selection.position, Some((6.0, -1.0)));
        assert_eq!(state.selection.label.as_deref(), Some(CLICK_LABEL));
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather {
                latitude: 6.0,
                longitude: -1.0,
                label: Some(CLICK_LABEL.into()),
                tag: FetchTag::Selection,
            }]
        );
    }

    #[test]
    fn test_click_cancels_pending_pan_selection() {
        let mut state = AppState::default();
        state.search.open = true;
        state.search.results = vec![crate::state::Location::new("Wa", 10.0607, -2.5019)];
        reducer(&mut state, Action::SearchConfirm);
        assert!(state.pending_selection.is_some());

        reducer(
            &mut state,
            Action::MapClick {
                latitude: 6.0,
                longitude: -1.0,
            },
        );

        assert!(state.pending_selection.is_none());
        assert!(!state.viewport.is_panning());
        assert_eq!(state.selection.position, Some((6.0, -1.0)));
    }

    #[test]
    fn test_search_confirm_pans_before_marker_and_fetches_concurrently() {
        let mut state = AppState::default();
        state.search.open = true;
        state.search.results = vec![crate::state::Location::new("Tamale", 9.4, -0.84)];

        let result = reducer(&mut state, Action::SearchConfirm);

        // Fetch starts immediately, not gated on the pan
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather {
                latitude: 9.4,
                longitude: -0.84,
                label: Some(SEARCH_LABEL.into()),
                tag: FetchTag::Selection,
            }]
        );
        // Camera pans, but the marker has not moved yet
        assert!(state.viewport.is_panning());
        assert_eq!(state.selection.position, None);
        assert_eq!(
            state.pending_selection.as_ref().and_then(|p| p.position),
            Some((9.4, -0.84))
        );
        // Overlay state is ephemeral and cleared on selection
        assert_eq!(state.search, SearchState::default());

        // Marker lands only once the pan completes
        run_pan_to_completion(&mut state);
        assert_eq!(state.selection.position, Some((9.4, -0.84)));
        assert!(state.pending_selection.is_none());
    }

    #[test]
    fn test_label_resolution_prefers_provider_place_name() {
        let mut state = AppState::default();
        reducer(
            &mut state,
            Action::MapClick {
                latitude: 5.6145,
                longitude: -0.2056,
            },
        );

        reducer(
            &mut state,
            loaded(
                Some("Accra"),
                Some(CLICK_LABEL),
                FetchTag::Selection,
                5.6145,
                -0.2056,
            ),
        );

        assert_eq!(state.panel_label.as_deref(), Some("Accra"));
        assert_eq!(state.selection.label.as_deref(), Some("Accra"));
    }

    #[test]
    fn test_label_resolution_falls_back_to_caller_label() {
        let mut state = AppState::default();

        reducer(
            &mut state,
            loaded(
                Some(""),
                Some(CLICK_LABEL),
                FetchTag::Selection,
                5.6,
                -0.2,
            ),
        );

        assert_eq!(state.panel_label.as_deref(), Some(CLICK_LABEL));
    }

    #[test]
    fn test_label_resolution_falls_back_to_coordinates() {
        let mut state = AppState::default();

        reducer(&mut state, loaded(Some(""), None, FetchTag::Hover, 5.6, -0.2));

        assert_eq!(state.panel_label.as_deref(), Some("Lat: 5.60, Lng: -0.20"));
    }

    #[test]
    fn test_fallback_fetch_updates_snapshot_and_keeps_caller_label() {
        let mut state = AppState::default();

        reducer(
            &mut state,
            loaded(None, Some(CLICK_LABEL), FetchTag::Selection, 6.0, -1.0),
        );

        let weather = state.weather.as_ref().expect("snapshot set");
        assert_eq!(weather.temperature_c, 28.0);
        assert_eq!(weather.condition, "Sunny");
        assert_eq!(weather.humidity_pct, 50);
        assert_eq!(weather.wind_speed, 12.0);
        assert_eq!(state.panel_label.as_deref(), Some(CLICK_LABEL));
        assert!(!state.is_loading);
    }

    #[test]
    fn test_hover_fetch_never_touches_marker_label() {
        let mut state = AppState::default();
        state.selection = Selection {
            position: Some((6.0, -1.0)),
            label: Some("Kumasi".into()),
        };

        reducer(&mut state, loaded(Some("Accra"), None, FetchTag::Hover, 5.6, -0.2));

        assert_eq!(state.selection.label.as_deref(), Some("Kumasi"));
        assert_eq!(state.panel_label.as_deref(), Some("Accra"));
    }

    #[test]
    fn test_resolved_label_survives_pan_arrival() {
        let mut state = AppState::default();
        state.search.open = true;
        state.search.results = vec![crate::state::Location::new("Tamale", 9.4, -0.84)];
        reducer(&mut state, Action::SearchConfirm);

        // Fetch resolves while the camera is still panning
        reducer(
            &mut state,
            loaded(
                Some("Tamale"),
                Some(SEARCH_LABEL),
                FetchTag::Selection,
                9.4,
                -0.84,
            ),
        );

        run_pan_to_completion(&mut state);
        assert_eq!(state.selection.label.as_deref(), Some("Tamale"));
    }

    #[test]
    fn test_fixed_search_filters_locally_without_effects() {
        let mut state = AppState::default();
        state.search.open = true;

        let result = reducer(&mut state, Action::SearchQueryChange("accra".into()));

        assert!(result.effects.is_empty());
        assert_eq!(state.search.results.len(), 1);
        assert_eq!(state.search.results[0].label, "Accra");
    }

    #[test]
    fn test_fixed_search_empty_query_clears_results() {
        let mut state = AppState::default();
        state.search.open = true;
        reducer(&mut state, Action::SearchQueryChange("accra".into()));

        reducer(&mut state, Action::SearchQueryChange(String::new()));

        assert!(state.search.results.is_empty());
    }

    #[test]
    fn test_live_search_emits_debounced_query() {
        let mut state = AppState::new(LocationSource::Live);
        state.search.open = true;

        let result = reducer(&mut state, Action::SearchQueryChange("kum".into()));

        assert_eq!(
            result.effects,
            vec![Effect::SearchPlaces {
                query: "kum".into(),
                immediate: false,
            }]
        );

        let result = reducer(&mut state, Action::SearchQuerySubmit("kum".into()));
        assert_eq!(
            result.effects,
            vec![Effect::SearchPlaces {
                query: "kum".into(),
                immediate: true,
            }]
        );
    }

    #[test]
    fn test_search_results_ignored_after_overlay_closes() {
        let mut state = AppState::new(LocationSource::Live);
        state.search.open = true;
        reducer(&mut state, Action::SearchClose);

        let result = reducer(
            &mut state,
            Action::SearchDidLoad(vec![crate::state::Location::new("Accra", 5.6, -0.2)]),
        );

        assert!(!result.changed);
        assert!(state.search.results.is_empty());
    }

    #[test]
    fn test_refresh_refetches_current_selection() {
        let mut state = AppState::default();
        state.selection = Selection {
            position: Some((5.6145, -0.2056)),
            label: Some("Accra".into()),
        };

        let result = reducer(&mut state, Action::WeatherRefresh);

        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather {
                latitude: 5.6145,
                longitude: -0.2056,
                label: Some("Accra".into()),
                tag: FetchTag::Selection,
            }]
        );
    }

    #[test]
    fn test_refresh_without_selection_is_noop() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::WeatherRefresh);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_resize_dedupes() {
        let mut state = AppState::default();

        assert!(reducer(&mut state, Action::UiTerminalResize(100, 40)).changed);
        assert!(!reducer(&mut state, Action::UiTerminalResize(100, 40)).changed);
    }

    #[test]
    fn test_tick_renders_only_while_animating() {
        let mut state = AppState::default();

        assert!(!reducer(&mut state, Action::Tick).changed);

        state.is_loading = true;
        assert!(reducer(&mut state, Action::Tick).changed);
    }
}
