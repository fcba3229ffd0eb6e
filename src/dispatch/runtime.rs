//! The event/action/render loop
//!
//! Wires together the store, the fetch coordinator, subscriptions, and the
//! crossterm event poller:
//!
//! 1. Event (keyboard/mouse) -> `map_event` -> actions
//! 2. Actions dispatched to the store's reducer
//! 3. Reducer mutates state and returns effects
//! 4. `handle_effect` turns effects into coordinator tasks
//! 5. Completed tasks send result actions back into the same queue
//! 6. If state changed, re-render

use std::io;

use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::dispatch::event::{process_raw_event, spawn_event_poller, EventKind, PollerConfig, RawEvent};
use crate::dispatch::store::{Reducer, Store};
use crate::dispatch::subscriptions::Subscriptions;
use crate::dispatch::tasks::FetchCoordinator;
use crate::effect::Effect;
use crate::state::AppState;

/// Result of mapping an event into actions plus an optional render hint.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    pub actions: Vec<Action>,
    pub needs_render: bool,
}

impl EventOutcome {
    pub fn ignored() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: false,
        }
    }

    pub fn action(action: Action) -> Self {
        Self {
            actions: vec![action],
            needs_render: false,
        }
    }

    pub fn from_actions(iter: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: iter.into_iter().collect(),
            needs_render: false,
        }
    }

    pub fn with_render(mut self) -> Self {
        self.needs_render = true;
        self
    }
}

impl Default for EventOutcome {
    fn default() -> Self {
        Self::ignored()
    }
}

/// Context handed to the effect handler: emit actions directly or put tasks
/// on the coordinator.
pub struct EffectContext<'a> {
    action_tx: &'a mpsc::UnboundedSender<Action>,
    tasks: &'a mut FetchCoordinator,
}

impl<'a> EffectContext<'a> {
    pub fn emit(&self, action: Action) {
        let _ = self.action_tx.send(action);
    }

    pub fn tasks(&mut self) -> &mut FetchCoordinator {
        self.tasks
    }
}

/// Owns the store and the loop. One per application run.
pub struct Runtime {
    store: Store,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    poller_config: PollerConfig,
    should_render: bool,
    tasks: FetchCoordinator,
    subscriptions: Subscriptions,
}

impl Runtime {
    pub fn new(state: AppState, reducer: Reducer) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let tasks = FetchCoordinator::new(action_tx.clone());
        let subscriptions = Subscriptions::new(action_tx.clone());
        Self {
            store: Store::new(state, reducer),
            action_tx,
            action_rx,
            poller_config: PollerConfig::default(),
            should_render: true,
            tasks,
            subscriptions,
        }
    }

    pub fn with_event_poller(mut self, config: PollerConfig) -> Self {
        self.poller_config = config;
        self
    }

    /// Send an action into the runtime queue.
    pub fn enqueue(&self, action: Action) {
        let _ = self.action_tx.send(action);
    }

    pub fn action_tx(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn subscriptions(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    pub fn tasks(&mut self) -> &mut FetchCoordinator {
        &mut self.tasks
    }

    /// Run the event/action loop until `should_quit` matches an action.
    pub async fn run<B, FRender, FEvent, FQuit, FEffect>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut render: FRender,
        mut map_event: FEvent,
        mut should_quit: FQuit,
        mut handle_effect: FEffect,
    ) -> io::Result<()>
    where
        B: Backend,
        FRender: FnMut(&mut Frame, Rect, &AppState),
        FEvent: FnMut(&EventKind, &AppState) -> EventOutcome,
        FQuit: FnMut(&Action) -> bool,
        FEffect: FnMut(Effect, &mut EffectContext),
    {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
        let cancel_token = CancellationToken::new();
        let _poller = spawn_event_poller(event_tx, self.poller_config, cancel_token.clone());

        loop {
            if self.should_render {
                let state = self.store.state();
                terminal.draw(|frame| {
                    render(frame, frame.area(), state);
                })?;
                self.should_render = false;
            }

            tokio::select! {
                Some(raw_event) = event_rx.recv() => {
                    let event = process_raw_event(raw_event);
                    let outcome = map_event(&event, self.store.state());
                    if outcome.needs_render {
                        self.should_render = true;
                    }
                    for action in outcome.actions {
                        let _ = self.action_tx.send(action);
                    }
                }

                Some(action) = self.action_rx.recv() => {
                    if should_quit(&action) {
                        break;
                    }

                    let result = self.store.dispatch(action);
                    if result.has_effects() {
                        let mut ctx = EffectContext {
                            action_tx: &self.action_tx,
                            tasks: &mut self.tasks,
                        };
                        for effect in result.effects {
                            handle_effect(effect, &mut ctx);
                        }
                    }
                    if result.changed {
                        self.should_render = true;
                    }
                }

                else => {
                    break;
                }
            }
        }

        // Teardown: nothing may fire after the UI is gone.
        cancel_token.cancel();
        self.subscriptions.cancel_all();
        self.tasks.cancel_all();

        Ok(())
    }
}
