//! Fetch coordinator - keyed async tasks with debounce
//!
//! Each key names a single-slot resource: spawning or debouncing under a key
//! aborts whatever that key currently owns, so at most one scheduled fetch
//! exists per key at any instant. An immediate spawn therefore always
//! preempts a pending debounced fetch on the same key. Dropping the
//! coordinator aborts everything outstanding, so no completion action can
//! land after the owning runtime is gone.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};

use crate::action::Action;

/// Task slot for weather fetches. Debounced hover fetches and immediate
/// click/search fetches share this slot, which is what makes an immediate
/// fetch cancel a pending hover fetch.
pub const WEATHER_TASK: &str = "weather";

/// Task slot for geocoding queries.
pub const SEARCH_TASK: &str = "search";

/// Owns the lifecycle of the app's async tasks. Completed tasks send their
/// result action back over the action channel; aborted tasks send nothing.
pub struct FetchCoordinator {
    slots: HashMap<&'static str, AbortHandle>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl FetchCoordinator {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            slots: HashMap::new(),
            action_tx,
        }
    }

    /// Run a task without delay, aborting whatever currently owns `key`
    /// (including a pending debounced task).
    pub fn spawn<F>(&mut self, key: &'static str, future: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        self.cancel(key);

        let tx = self.action_tx.clone();
        let handle: JoinHandle<()> = tokio::spawn(async move {
            let action = future.await;
            let _ = tx.send(action);
        });
        self.slots.insert(key, handle.abort_handle());
    }

    /// Arm a delayed task under `key`. Re-arming before the delay expires
    /// aborts the previous timer and starts over, so a burst of calls
    /// coalesces into one execution of the last-given future.
    pub fn debounce<F>(&mut self, key: &'static str, delay: Duration, future: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        self.cancel(key);

        let tx = self.action_tx.clone();
        let handle: JoinHandle<()> = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let action = future.await;
            let _ = tx.send(action);
        });
        self.slots.insert(key, handle.abort_handle());
    }

    /// Abort the task under `key`, if any. Idempotent.
    pub fn cancel(&mut self, key: &str) {
        if let Some(handle) = self.slots.remove(key) {
            handle.abort();
        }
    }

    /// Abort every outstanding task. Idempotent; also runs on drop.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.slots.drain() {
            handle.abort();
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Drop for FetchCoordinator {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WeatherSnapshot;
    use crate::action::FetchTag;

    fn loaded(latitude: f64, longitude: f64) -> Action {
        Action::WeatherDidLoad {
            snapshot: WeatherSnapshot::fallback(),
            place_name: None,
            label: None,
            tag: FetchTag::Hover,
            latitude,
            longitude,
        }
    }

    async fn recv_within(
        rx: &mut mpsc::UnboundedReceiver<Action>,
        millis: u64,
    ) -> Option<Action> {
        tokio::time::timeout(Duration::from_millis(millis), rx.recv())
            .await
            .ok()
            .flatten()
    }

    #[tokio::test]
    async fn test_spawn_sends_action() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = FetchCoordinator::new(tx);

        coordinator.spawn(WEATHER_TASK, async { loaded(1.0, 1.0) });

        let action = recv_within(&mut rx, 100).await.expect("action");
        assert!(matches!(action, Action::WeatherDidLoad { latitude, .. } if latitude == 1.0));
    }

    #[tokio::test]
    async fn test_debounce_waits_before_running() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = FetchCoordinator::new(tx);

        coordinator.debounce(WEATHER_TASK, Duration::from_millis(50), async {
            loaded(1.0, 1.0)
        });

        assert!(recv_within(&mut rx, 30).await.is_none());
        assert!(recv_within(&mut rx, 100).await.is_some());
    }

    #[tokio::test]
    async fn test_rapid_rearms_coalesce_to_last() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = FetchCoordinator::new(tx);

        // Burst of hover fetches within the debounce window; only the last
        // location may execute.
        for i in 1..=4 {
            coordinator.debounce(WEATHER_TASK, Duration::from_millis(50), async move {
                loaded(f64::from(i), 0.0)
            });
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let action = recv_within(&mut rx, 200).await.expect("one action");
        assert!(matches!(action, Action::WeatherDidLoad { latitude, .. } if latitude == 4.0));
        assert!(recv_within(&mut rx, 80).await.is_none(), "exactly one fetch");
    }

    #[tokio::test]
    async fn test_immediate_spawn_preempts_pending_debounce() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = FetchCoordinator::new(tx);

        coordinator.debounce(WEATHER_TASK, Duration::from_millis(50), async {
            loaded(1.0, 0.0)
        });
        coordinator.spawn(WEATHER_TASK, async { loaded(2.0, 0.0) });

        let action = recv_within(&mut rx, 100).await.expect("action");
        assert!(matches!(action, Action::WeatherDidLoad { latitude, .. } if latitude == 2.0));
        assert!(
            recv_within(&mut rx, 100).await.is_none(),
            "debounced fetch must never fire"
        );
    }

    #[tokio::test]
    async fn test_cancel_prevents_pending_fetch() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = FetchCoordinator::new(tx);

        coordinator.debounce(WEATHER_TASK, Duration::from_millis(30), async {
            loaded(1.0, 0.0)
        });
        assert!(coordinator.is_pending(WEATHER_TASK));

        coordinator.cancel(WEATHER_TASK);
        assert!(!coordinator.is_pending(WEATHER_TASK));
        assert!(recv_within(&mut rx, 80).await.is_none());

        // Cancelling again is a no-op.
        coordinator.cancel(WEATHER_TASK);
    }

    #[tokio::test]
    async fn test_drop_aborts_pending_fetch() {
        let (tx, mut rx) = mpsc::unbounded_channel();

        {
            let mut coordinator = FetchCoordinator::new(tx);
            coordinator.debounce(WEATHER_TASK, Duration::from_millis(30), async {
                loaded(1.0, 0.0)
            });
        }

        assert!(recv_within(&mut rx, 80).await.is_none());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = FetchCoordinator::new(tx);

        coordinator.debounce(SEARCH_TASK, Duration::from_millis(30), async {
            Action::SearchDidLoad(Vec::new())
        });
        coordinator.spawn(WEATHER_TASK, async { loaded(1.0, 0.0) });
        assert_eq!(coordinator.len(), 2);

        let first = recv_within(&mut rx, 100).await.expect("weather");
        let second = recv_within(&mut rx, 100).await.expect("search");
        assert!(matches!(first, Action::WeatherDidLoad { .. }));
        assert!(matches!(second, Action::SearchDidLoad(_)));
    }

    #[tokio::test]
    async fn test_cancel_all_clears_every_slot() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut coordinator = FetchCoordinator::new(tx);

        coordinator.debounce(WEATHER_TASK, Duration::from_secs(10), async {
            loaded(1.0, 0.0)
        });
        coordinator.debounce(SEARCH_TASK, Duration::from_secs(10), async {
            Action::SearchDidLoad(Vec::new())
        });

        coordinator.cancel_all();
        assert!(coordinator.is_empty());
    }
}
