//! Test doubles for the two external seams of the bridge.
//!
//! Neither a JVM nor the client library is available off-device, so unit and
//! integration tests drive the bridge through [`RecordingRuntime`] and
//! [`MockEngine`] instead. Both record every call they receive and can be told
//! to fail on demand.

mod engine;
mod runtime;

pub use engine::{EngineCall, MockEngine};
pub use runtime::{DispatchRecord, OwnedField, RecordingHandler, RecordingRuntime};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Scripted result of a faked operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Succeed,
    Fail,
}

// A panicking test thread must not hide what the fake recorded so far.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
