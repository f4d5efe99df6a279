// Bridge error types

use std::fmt;

use crate::audio::Direction;
use crate::error::{EngineErrorCodes, ErrorCode};
use crate::events::EventKind;

/// Log a bridge error with structured context
///
/// Logs the error code, the component where the error surfaced and the
/// human-readable message. Never panics.
pub fn log_bridge_error(err: &BridgeError, context: &str) {
    tracing::error!(
        code = err.code(),
        "Bridge error in {}: {}",
        context,
        err.message()
    );
}

/// Errors raised by the bridge itself
///
/// Validation variants map onto the engine's parameter codes; engine
/// failures carry the engine's raw code; everything else collapses to
/// `EngineErrorCodes::UNDEFINED` when it has to cross the JNI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// No region cached for this device in this direction
    UnknownDevice {
        device_id: String,
        direction: Direction,
    },

    /// Request would run past the end of the cached region
    BufferTooSmall {
        device_id: String,
        direction: Direction,
        requested_bytes: usize,
        capacity_bytes: usize,
    },

    /// Region base address is not aligned for 16-bit samples
    MisalignedRegion { direction: Direction },

    /// Calling thread could not obtain a runtime handle
    AttachFailed { reason: String },

    /// Event kind has no resolved handler
    HandlerNotRegistered { kind: EventKind },

    /// Event object could not be built
    Marshal { kind: EventKind, reason: String },

    /// Managed dispatch entry point raised
    HandlerFailed { kind: EventKind, reason: String },

    /// Mutex was poisoned by a panicking holder
    LockPoisoned { component: String },

    /// Engine call returned a non-zero code
    Engine { code: u32, message: Option<String> },

    /// Write-once state was set a second time
    AlreadyInitialized { component: String },

    /// Managed runtime call failed outside event dispatch
    Runtime { reason: String },
}

impl ErrorCode for BridgeError {
    fn code(&self) -> u32 {
        match self {
            BridgeError::UnknownDevice { .. } => EngineErrorCodes::PARAMETER_INVALID,
            BridgeError::BufferTooSmall { .. } => EngineErrorCodes::PARAMETER_INVALID_COUNT,
            BridgeError::MisalignedRegion { .. } => EngineErrorCodes::PARAMETER_INVALID,
            BridgeError::Engine { code, .. } => *code,
            BridgeError::AttachFailed { .. }
            | BridgeError::HandlerNotRegistered { .. }
            | BridgeError::Marshal { .. }
            | BridgeError::HandlerFailed { .. }
            | BridgeError::LockPoisoned { .. }
            | BridgeError::AlreadyInitialized { .. }
            | BridgeError::Runtime { .. } => EngineErrorCodes::UNDEFINED,
        }
    }

    fn message(&self) -> String {
        match self {
            BridgeError::UnknownDevice {
                device_id,
                direction,
            } => {
                format!("No {} buffer registered for device '{}'", direction, device_id)
            }
            BridgeError::BufferTooSmall {
                device_id,
                direction,
                requested_bytes,
                capacity_bytes,
            } => format!(
                "Requested {} bytes from {} buffer of device '{}' (capacity {})",
                requested_bytes, direction, device_id, capacity_bytes
            ),
            BridgeError::MisalignedRegion { direction } => {
                format!("{} buffer is not aligned for 16-bit samples", direction)
            }
            BridgeError::AttachFailed { reason } => {
                format!("Failed to attach current thread: {}", reason)
            }
            BridgeError::HandlerNotRegistered { kind } => {
                format!("No handler registered for {}", kind)
            }
            BridgeError::Marshal { kind, reason } => {
                format!("Failed to build {} event: {}", kind, reason)
            }
            BridgeError::HandlerFailed { kind, reason } => {
                format!("{} handler raised: {}", kind, reason)
            }
            BridgeError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
            BridgeError::Engine {
                code,
                message: Some(message),
            } => format!("Engine error {:#06x}: {}", code, message),
            BridgeError::Engine {
                code,
                message: None,
            } => format!("Engine error {:#06x}", code),
            BridgeError::AlreadyInitialized { component } => {
                format!("{} already initialized", component)
            }
            BridgeError::Runtime { reason } => format!("Managed runtime error: {}", reason),
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BridgeError (code {:#06x}): {}", self.code(), self.message())
    }
}

impl std::error::Error for BridgeError {}
