//! Category-keyed publish/subscribe with immediate and deferred delivery.
//!
//! `fire` dispatches synchronously. `queue` stores the event until the next
//! `flush`, which dispatches everything in enqueue order and empties the
//! queue. A subscriber that returns an error or panics is logged and skipped;
//! the remaining subscribers still receive the event.

use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};

use tracing::{error, warn};

use rampart_core::enums::EventCategory;
use rampart_core::events::GameEvent;

/// Callback registered for one event category.
pub type Subscriber = Box<dyn FnMut(&GameEvent) -> anyhow::Result<()> + Send>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<EventCategory, Vec<(SubscriptionId, Subscriber)>>,
    queue: VecDeque<GameEvent>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `category`. Callbacks for one category run in
    /// registration order.
    pub fn subscribe<F>(&mut self, category: EventCategory, callback: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> anyhow::Result<()> + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers
            .entry(category)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in self.subscribers.values_mut() {
            if let Some(pos) = list.iter().position(|(sub_id, _)| *sub_id == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Deliver `event` to its subscribers now.
    pub fn fire(&mut self, event: &GameEvent) {
        let category = event.category();
        let Some(list) = self.subscribers.get_mut(&category) else {
            return;
        };

        for (id, callback) in list.iter_mut() {
            match panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!("Subscriber {:?} failed on {:?}: {:#}", id, category, e);
                }
                Err(_) => {
                    error!("Subscriber {:?} panicked on {:?}", id, category);
                }
            }
        }
    }

    /// Hold `event` until the next [`flush`](Self::flush).
    pub fn queue(&mut self, event: GameEvent) {
        self.queue.push_back(event);
    }

    /// Deliver all queued events in enqueue order. Returns how many were
    /// delivered.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.queue.pop_front() {
            self.fire(&event);
            delivered += 1;
        }
        delivered
    }

    /// Number of queued, not yet delivered events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn subscriber_count(&self, category: EventCategory) -> usize {
        self.subscribers.get(&category).map_or(0, Vec::len)
    }
}
