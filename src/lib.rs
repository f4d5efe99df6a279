// sdkclient bridge - native voice engine <-> managed runtime glue
// Event dispatch from engine threads and zero-copy custom device audio

// Module declarations
pub mod audio;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod events;
pub mod ffi;
pub mod logging;
pub mod registry;
pub mod runtime;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(target_os = "android")]
pub mod jni_bridge;

// Re-exports for convenience
pub use audio::{CustomDeviceManager, DeviceStream, Direction};
pub use config::BridgeConfig;
pub use context::BridgeContext;
pub use dispatch::EventBridge;
pub use engine::{StreamFormat, VoiceEngine};
pub use error::{BridgeError, EngineErrorCodes, ErrorCode};
pub use events::{ClientEvent, ClientEventCallbacks, EventKind};
pub use runtime::ManagedRuntime;
