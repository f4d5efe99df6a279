//! Recording stand-in for the managed runtime.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread::{self, ThreadId};

use super::{lock, Outcome};
use crate::error::BridgeError;
use crate::events::{ClientEvent, EventKind, FieldValue};
use crate::runtime::ManagedRuntime;

/// Constructor argument captured by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedField {
    Long(i64),
    Int(i32),
    Str(String),
}

impl From<FieldValue<'_>> for OwnedField {
    fn from(value: FieldValue<'_>) -> Self {
        match value {
            FieldValue::Long(v) => OwnedField::Long(v),
            FieldValue::Int(v) => OwnedField::Int(v),
            FieldValue::Str(v) => OwnedField::Str(v.to_string()),
        }
    }
}

/// What [`RecordingRuntime::resolve_handler`] hands out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingHandler {
    pub kind: EventKind,
    pub class_path: String,
    pub dispatch_method: String,
}

/// One event that reached a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord {
    pub kind: EventKind,
    pub class_path: String,
    pub fields: Vec<OwnedField>,
    pub thread: ThreadId,
    /// Whether the dispatching thread was attached while the handler ran
    pub attached: bool,
}

/// Fake runtime that tracks attachment per OS thread.
#[derive(Debug, Default)]
pub struct RecordingRuntime {
    attached: Mutex<HashSet<ThreadId>>,
    preattached: AtomicBool,
    attach_outcome: Mutex<Outcome>,
    dispatch_outcome: Mutex<Outcome>,
    unresolvable: Mutex<HashSet<EventKind>>,
    attaches: AtomicUsize,
    detaches: AtomicUsize,
    dispatched: Mutex<Vec<DispatchRecord>>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat every thread as attached before the bridge sees it.
    pub fn set_preattached(&self, preattached: bool) {
        self.preattached.store(preattached, Ordering::SeqCst);
    }

    pub fn set_attach_outcome(&self, outcome: Outcome) {
        *lock(&self.attach_outcome) = outcome;
    }

    /// Make the handler's dispatch entry point raise.
    pub fn set_dispatch_outcome(&self, outcome: Outcome) {
        *lock(&self.dispatch_outcome) = outcome;
    }

    /// Make handler resolution fail for `kind`, as if its class were missing.
    pub fn fail_resolution(&self, kind: EventKind) {
        lock(&self.unresolvable).insert(kind);
    }

    pub fn attaches(&self) -> usize {
        self.attaches.load(Ordering::SeqCst)
    }

    pub fn detaches(&self) -> usize {
        self.detaches.load(Ordering::SeqCst)
    }

    /// Threads attached right now.
    pub fn attached_threads(&self) -> usize {
        lock(&self.attached).len()
    }

    pub fn dispatched(&self) -> Vec<DispatchRecord> {
        lock(&self.dispatched).clone()
    }
}

impl ManagedRuntime for RecordingRuntime {
    type Handler = RecordingHandler;

    fn is_current_thread_attached(&self) -> bool {
        self.preattached.load(Ordering::SeqCst)
            || lock(&self.attached).contains(&thread::current().id())
    }

    fn attach_current_thread(&self) -> Result<(), BridgeError> {
        if *lock(&self.attach_outcome) == Outcome::Fail {
            return Err(BridgeError::AttachFailed {
                reason: "attach refused by test runtime".to_string(),
            });
        }
        lock(&self.attached).insert(thread::current().id());
        self.attaches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn detach_current_thread(&self) {
        lock(&self.attached).remove(&thread::current().id());
        self.detaches.fetch_add(1, Ordering::SeqCst);
    }

    fn resolve_handler(
        &self,
        kind: EventKind,
        class_path: &str,
        dispatch_method: &str,
    ) -> Result<Self::Handler, BridgeError> {
        if lock(&self.unresolvable).contains(&kind) {
            return Err(BridgeError::Runtime {
                reason: format!("class {} not found", class_path),
            });
        }
        Ok(RecordingHandler {
            kind,
            class_path: class_path.to_string(),
            dispatch_method: dispatch_method.to_string(),
        })
    }

    fn dispatch(&self, handler: &Self::Handler, event: &ClientEvent) -> Result<(), BridgeError> {
        let kind = event.kind();
        let fields = event.fields();
        let layout: Vec<_> = fields.iter().map(FieldValue::field_type).collect();
        if handler.kind != kind || layout.as_slice() != kind.schema() {
            return Err(BridgeError::Marshal {
                kind,
                reason: format!("arguments do not match {}", handler.class_path),
            });
        }

        let record = DispatchRecord {
            kind,
            class_path: handler.class_path.clone(),
            fields: fields.into_iter().map(OwnedField::from).collect(),
            thread: thread::current().id(),
            attached: self.is_current_thread_attached(),
        };
        lock(&self.dispatched).push(record);

        if *lock(&self.dispatch_outcome) == Outcome::Fail {
            return Err(BridgeError::HandlerFailed {
                kind,
                reason: "java.lang.IllegalStateException".to_string(),
            });
        }
        Ok(())
    }
}
