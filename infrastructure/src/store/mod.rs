//! Store adapters
//!
//! In-memory implementations of the application's agent, thought and
//! collaboration stores. Each keeps one `watch` channel per project so
//! subscribers always observe the latest snapshot.

mod agents;
mod collaborations;
mod thoughts;

pub use agents::InMemoryAgentStore;
pub use collaborations::InMemoryCollaborationStore;
pub use thoughts::InMemoryThoughtStore;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thinktank_application::{Snapshot, StoreError, Subscription};
use thinktank_domain::ProjectId;
use tokio::sync::watch;

fn lock<'a, T>(mutex: &'a Mutex<T>, store: &str) -> Result<MutexGuard<'a, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable(format!("{} lock poisoned", store)))
}

/// Per-project snapshot channels.
struct Channels<T> {
    senders: HashMap<ProjectId, watch::Sender<Snapshot<T>>>,
}

impl<T> Default for Channels<T> {
    fn default() -> Self {
        Self {
            senders: HashMap::new(),
        }
    }
}

impl<T: Clone> Channels<T> {
    fn subscribe(&mut self, project_id: &ProjectId, current: impl FnOnce() -> Vec<T>) -> Subscription<T> {
        self.senders
            .entry(project_id.clone())
            .or_insert_with(|| watch::channel(Snapshot::initial().next(current())).0)
            .subscribe()
    }

    /// Publish `items` to the project's subscribers, if any channel exists.
    fn publish(&self, project_id: &ProjectId, items: Vec<T>) {
        if let Some(sender) = self.senders.get(project_id) {
            sender.send_modify(|snapshot| *snapshot = snapshot.next(items));
        }
    }
}
