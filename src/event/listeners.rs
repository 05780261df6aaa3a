use super::{EventKind, EventTarget};

/// Tracks which event kinds the controller currently listens for.
///
/// Events of an unregistered kind are dropped before reaching any handler.
#[derive(Debug, Default, Clone)]
pub struct ListenerRegistry {
    listeners: Vec<EventKind>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a kind twice keeps a single listener.
    pub fn register(&mut self, kind: EventKind) {
        if !self.listeners.contains(&kind) {
            self.listeners.push(kind);
        }
    }

    pub fn remove_all(&mut self) {
        self.listeners.clear();
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.contains(&kind)
    }

    pub fn count_for(&self, target: EventTarget) -> usize {
        self.listeners.iter().filter(|kind| kind.target() == target).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
