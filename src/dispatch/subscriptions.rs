//! Declarative interval subscriptions
//!
//! Subscriptions are long-lived action sources, unlike the coordinator's
//! one-shot tasks: the tick timer for animations and the auto-refresh timer
//! both live here. Re-registering a key replaces the previous timer.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::action::Action;

pub struct Subscriptions {
    handles: HashMap<&'static str, JoinHandle<()>>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Subscriptions {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            handles: HashMap::new(),
            action_tx,
        }
    }

    /// Emit an action at a fixed interval, starting one interval from now.
    pub fn interval<F>(&mut self, key: &'static str, duration: Duration, action_fn: F)
    where
        F: Fn() -> Action + Send + 'static,
    {
        self.cancel(key);

        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(duration);
            // Skip the immediate first tick
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(action_fn()).is_err() {
                    break;
                }
            }
        });
        self.handles.insert(key, handle);
    }

    pub fn cancel(&mut self, key: &str) {
        if let Some(handle) = self.handles.remove(key) {
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
