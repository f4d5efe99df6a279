//! Managed runtime abstraction.
//!
//! The bridge needs little from the host runtime: to know whether
//! the calling thread can already talk to it, to attach and detach threads,
//! and to build-and-post an event object through a resolved handler. The JNI
//! implementation lives in `crate::jni_bridge`; tests supply recording fakes.

mod attach;

pub use attach::AttachGuard;

use crate::error::BridgeError;
use crate::events::{ClientEvent, EventKind};

/// Host runtime reachable from arbitrary native threads.
pub trait ManagedRuntime: Send + Sync {
    /// Resolved dispatch target for one event kind.
    type Handler: Send + Sync;

    /// Whether the current thread already holds a runtime handle.
    fn is_current_thread_attached(&self) -> bool;

    /// Attach the current thread.
    fn attach_current_thread(&self) -> Result<(), BridgeError>;

    /// Detach the current thread. Only called after a successful
    /// [`attach_current_thread`](ManagedRuntime::attach_current_thread) on
    /// the same thread.
    fn detach_current_thread(&self);

    /// Look up the managed class at `class_path`, instantiate a handler
    /// object and resolve its `dispatch_method` entry point. Called once per
    /// kind while the bridge initializes, on an attached thread.
    fn resolve_handler(
        &self,
        kind: EventKind,
        class_path: &str,
        dispatch_method: &str,
    ) -> Result<Self::Handler, BridgeError>;

    /// Build the managed event object for `event` and invoke the handler's
    /// dispatch entry point on it. The thread is attached for the duration.
    fn dispatch(&self, handler: &Self::Handler, event: &ClientEvent) -> Result<(), BridgeError>;
}
