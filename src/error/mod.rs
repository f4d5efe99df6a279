// Error types for the client library bridge
//
// This module defines the bridge's own error type plus the engine's integer
// error codes, providing structured error handling with codes suitable for
// returning across the JNI boundary.

mod bridge;
mod engine;

pub use bridge::{log_bridge_error, BridgeError};
pub use engine::{report_engine_error, EngineErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the FFI boundary.
pub trait ErrorCode {
    /// Get the numeric error code, in the engine's code space
    fn code(&self) -> u32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
