// EventBridge - forwards engine events to managed handlers
//
// Engine callbacks arrive on engine-owned threads that the managed runtime
// has never seen. Each delivery attaches the thread for its own duration,
// hands the event to the registered handler and detaches again. Failures are
// logged and the event is dropped; nothing propagates back into the engine.

use crate::config::EventConfig;
use crate::error::{log_bridge_error, BridgeError};
use crate::events::{ClientEvent, ClientEventCallbacks, EventKind};
use crate::registry::EventHandlerRegistry;
use crate::runtime::{AttachGuard, ManagedRuntime};

pub struct EventBridge<R: ManagedRuntime> {
    runtime: R,
    registry: EventHandlerRegistry<R::Handler>,
}

impl<R: ManagedRuntime> EventBridge<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            registry: EventHandlerRegistry::new(),
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn registry(&self) -> &EventHandlerRegistry<R::Handler> {
        &self.registry
    }

    /// Resolve and register a handler for every event kind.
    ///
    /// A kind whose handler cannot be resolved is logged and left empty;
    /// its events are dropped later. Returns how many kinds were registered.
    pub fn register_handlers(&self, events: &EventConfig) -> Result<usize, BridgeError> {
        let _attached = AttachGuard::acquire(&self.runtime)?;

        let mut registered = 0;
        for kind in EventKind::ALL {
            let class_path = events.class_path(kind);
            let result = self
                .runtime
                .resolve_handler(kind, &class_path, &events.dispatch_method)
                .and_then(|handler| self.registry.register(kind, handler));
            match result {
                Ok(()) => {
                    tracing::debug!(%kind, class_path = %class_path, "registered event handler");
                    registered += 1;
                }
                Err(err) => log_bridge_error(&err, &class_path),
            }
        }

        tracing::info!(
            registered,
            total = EventKind::COUNT,
            "event handlers initialized"
        );
        Ok(registered)
    }

    /// Deliver `event` to its handler on the calling thread.
    ///
    /// The thread is attached for the duration of the call if it was not
    /// already, and detached on every exit path.
    pub fn deliver_event(&self, event: &ClientEvent) -> Result<(), BridgeError> {
        let kind = event.kind();
        let _attached = AttachGuard::acquire(&self.runtime)?;

        let handler = self
            .registry
            .lookup(kind)
            .ok_or(BridgeError::HandlerNotRegistered { kind })?;
        self.runtime.dispatch(handler, event)
    }
}

impl<R: ManagedRuntime> ClientEventCallbacks for EventBridge<R> {
    fn deliver(&self, event: ClientEvent) {
        if let Err(err) = self.deliver_event(&event) {
            log_bridge_error(&err, &format!("dispatching {}", event.kind()));
        }
    }
}
