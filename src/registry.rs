// EventHandlerRegistry - per-kind handler slots, filled once at startup
//
// Slots are written while the bridge initializes and only read afterwards,
// from whichever engine thread fires an event. `OnceCell` gives lock-free
// reads and makes a second write an error instead of a silent replacement.

use once_cell::sync::OnceCell;

use crate::error::BridgeError;
use crate::events::EventKind;

pub struct EventHandlerRegistry<H> {
    slots: [OnceCell<H>; EventKind::COUNT],
}

impl<H> Default for EventHandlerRegistry<H> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| OnceCell::new()),
        }
    }
}

impl<H> EventHandlerRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the handler for `kind`.
    ///
    /// # Errors
    /// `AlreadyInitialized` if `kind` already has a handler; the existing
    /// handler is kept.
    pub fn register(&self, kind: EventKind, handler: H) -> Result<(), BridgeError> {
        self.slots[kind.index()]
            .set(handler)
            .map_err(|_| BridgeError::AlreadyInitialized {
                component: format!("{} handler", kind),
            })
    }

    pub fn lookup(&self, kind: EventKind) -> Option<&H> {
        self.slots[kind.index()].get()
    }

    pub fn is_registered(&self, kind: EventKind) -> bool {
        self.lookup(kind).is_some()
    }

    /// Kinds that have a handler, in declaration order.
    pub fn registered_kinds(&self) -> Vec<EventKind> {
        EventKind::ALL
            .into_iter()
            .filter(|kind| self.is_registered(*kind))
            .collect()
    }
}
