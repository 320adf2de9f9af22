use crate::graph::StateSnapshot;

use bevy::prelude::Resource;
use std::sync::{Arc, Mutex};

/// Shared mailbox between the automaton's listener and the ECS.
/// The listener pushes, a system drains once per frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct SnapshotInbox(Arc<Mutex<Vec<StateSnapshot>>>);

impl SnapshotInbox {
    pub fn push(&self, snapshot: StateSnapshot) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(snapshot);
        }
    }

    /// Take every snapshot received since the last drain, oldest first
    pub fn drain(&self) -> Vec<StateSnapshot> {
        match self.0.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        }
    }

    /// Listener that forwards into this inbox
    pub fn listener(&self) -> impl FnMut(&StateSnapshot) + Send + Sync + 'static {
        let inbox = self.clone();
        move |snapshot: &StateSnapshot| inbox.push(snapshot.clone())
    }
}
