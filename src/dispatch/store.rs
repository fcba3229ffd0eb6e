//! Centralized state store with an effect-emitting reducer

use crate::action::Action;
use crate::effect::Effect;
use crate::state::AppState;

/// Result of dispatching an action: whether the state changed (and the UI
/// should re-render) plus any effects to process.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub changed: bool,
    pub effects: Vec<Effect>,
}

impl DispatchResult {
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    #[inline]
    pub fn changed_with(effect: Effect) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    #[inline]
    pub fn changed_with_many(effects: Vec<Effect>) -> Self {
        Self {
            changed: true,
            effects,
        }
    }

    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

impl Default for DispatchResult {
    fn default() -> Self {
        Self::unchanged()
    }
}

/// A pure reducer: mutates state for an action and declares follow-up
/// effects. All state mutation goes through here.
pub type Reducer = fn(&mut AppState, Action) -> DispatchResult;

/// Holds the application state and the single dispatch entry point.
pub struct Store {
    state: AppState,
    reducer: Reducer,
}

impl Store {
    pub fn new(state: AppState, reducer: Reducer) -> Self {
        Self { state, reducer }
    }

    #[inline]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Mutable access for initialization only; runtime changes go through
    /// `dispatch`.
    #[inline]
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        tracing::debug!(action = action.name(), "dispatch");
        (self.reducer)(&mut self.state, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::FetchTag;

    fn counting_reducer(state: &mut AppState, action: Action) -> DispatchResult {
        match action {
            Action::Tick => {
                state.tick_count += 1;
                DispatchResult::changed()
            }
            Action::WeatherRefresh => DispatchResult::changed_with(Effect::FetchWeather {
                latitude: 0.0,
                longitude: 0.0,
                label: None,
                tag: FetchTag::Selection,
            }),
            _ => DispatchResult::unchanged(),
        }
    }

    #[test]
    fn test_dispatch_runs_reducer() {
        let mut store = Store::new(AppState::default(), counting_reducer);

        let result = store.dispatch(Action::Tick);
        assert!(result.changed);
        assert_eq!(store.state().tick_count, 1);
    }

    #[test]
    fn test_dispatch_surfaces_effects() {
        let mut store = Store::new(AppState::default(), counting_reducer);

        let result = store.dispatch(Action::WeatherRefresh);
        assert!(result.has_effects());
        assert_eq!(result.effects.len(), 1);
    }

    #[test]
    fn test_unhandled_action_is_unchanged() {
        let mut store = Store::new(AppState::default(), counting_reducer);

        let result = store.dispatch(Action::Quit);
        assert!(!result.changed);
        assert!(!result.has_effects());
    }
}
