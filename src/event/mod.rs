mod events;
mod listeners;

pub use events::{EventKind, EventTarget, SurfaceEvent};
pub use listeners::ListenerRegistry;
