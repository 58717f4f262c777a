//! Session events and the listener registry
//!
//! Listeners are keyed by opaque subscription ids. Notification works on a
//! snapshot of the registry, so a listener removed while an event is being
//! delivered still gets that one event and nothing after it.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::media::Track;

/// Events fanned out by the session to every subscribed screen
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    TrackChanged { track: Track, index: usize },
    PlaylistChanged(Vec<Track>),
    PlayingStateChanged(bool),
    /// The device could not open the current track. Playback does not skip.
    TrackUnavailable { track: Option<Track>, message: String },
}

pub trait SessionListener: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

impl<F> SessionListener for F
where
    F: Fn(&SessionEvent) + Send + Sync,
{
    fn on_event(&self, event: &SessionEvent) {
        self(event)
    }
}

/// Forwards events onto a channel drained by the owning screen
#[derive(Clone, Debug)]
pub struct ChannelListener(pub UnboundedSender<SessionEvent>);

impl SessionListener for ChannelListener {
    fn on_event(&self, event: &SessionEvent) {
        if self.0.send(event.clone()).is_err() {
            tracing::trace!("Session event dropped, receiver closed");
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: HashMap<SubscriptionId, Arc<dyn SessionListener>>,
}

impl ListenerRegistry {
    pub fn subscribe(&mut self, listener: Arc<dyn SessionListener>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.insert(id, listener);
        id
    }

    /// Returns false if `id` was not (or no longer) subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn notify(&self, event: &SessionEvent) {
        let snapshot: Vec<Arc<dyn SessionListener>> = self.listeners.values().cloned().collect();
        for listener in snapshot {
            listener.on_event(event);
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
