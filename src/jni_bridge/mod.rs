//! Android entry points: library load, client library lifecycle and the
//! `Native.ts3client_*` methods of the managed SDK wrapper.

mod exports;
mod runtime;

pub use runtime::{JniHandler, JniRuntime};

use std::ffi::c_void;

use jni::objects::{JByteBuffer, JObject, JString};
use jni::sys::{jint, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM};
use once_cell::sync::{Lazy, OnceCell};

use crate::audio::BufferRegion;
use crate::config::BridgeConfig;
use crate::context::BridgeContext;
use crate::error::{log_bridge_error, BridgeError, EngineErrorCodes, ErrorCode};
use crate::ffi::guard::ffi_guard_code;
use crate::ffi::{install_callback_sink, ClientLib, ClientUiFunctions};
use crate::logging::init_logging;

pub(crate) type AndroidContext = BridgeContext<JniRuntime, ClientLib>;

static CONTEXT: OnceCell<AndroidContext> = OnceCell::new();

static CALLBACKS: Lazy<ClientUiFunctions> = Lazy::new(ClientUiFunctions::with_bridge_callbacks);

pub(crate) fn context() -> Result<&'static AndroidContext, BridgeError> {
    CONTEXT.get().ok_or_else(|| BridgeError::Runtime {
        reason: "bridge not loaded".to_string(),
    })
}

pub(crate) fn callbacks() -> &'static ClientUiFunctions {
    &CALLBACKS
}

/// Log a failed entry point and turn it into its engine code.
pub(crate) fn into_code(result: Result<u32, BridgeError>, entry: &str) -> u32 {
    result.unwrap_or_else(|err| {
        log_bridge_error(&err, entry);
        err.code()
    })
}

/// Copy a Java string; a null reference reads as empty.
pub(crate) fn java_string(env: &mut JNIEnv, value: &JString) -> Result<String, BridgeError> {
    if value.is_null() {
        return Ok(String::new());
    }
    Ok(env.get_string(value)?.into())
}

/// Address and capacity of a direct `ByteBuffer`; `None` for a null buffer.
pub(crate) fn direct_region(
    env: &mut JNIEnv,
    buffer: JObject,
) -> Result<Option<BufferRegion>, BridgeError> {
    if buffer.is_null() {
        return Ok(None);
    }
    let buffer = JByteBuffer::from(buffer);
    let address = env.get_direct_buffer_address(&buffer)?;
    let capacity = env.get_direct_buffer_capacity(&buffer)?;
    // SAFETY: the host keeps direct buffers alive and pinned until the device
    // is unregistered.
    Ok(unsafe { BufferRegion::from_raw(address, capacity) })
}

fn load(vm: JavaVM) -> Result<(), BridgeError> {
    let config = BridgeConfig::load_android();
    init_logging(&config.logging);
    tracing::info!("JNI_OnLoad called - initializing bridge");

    let bridge = BridgeContext::initialize(config, JniRuntime::new(vm), ClientLib)?;
    if CONTEXT.set(bridge).is_err() {
        return Err(BridgeError::AlreadyInitialized {
            component: "bridge context".to_string(),
        });
    }
    install_callback_sink(context()?.events())?;

    tracing::info!("bridge initialized");
    Ok(())
}

/// Called by the VM when the library is loaded. Event classes are resolved
/// here, on a thread that sees the application's class loader.
#[no_mangle]
pub extern "system" fn JNI_OnLoad(vm: JavaVM, _reserved: *mut c_void) -> jint {
    let code = ffi_guard_code! {
        into_code(load(vm).map(|()| EngineErrorCodes::OK), "JNI_OnLoad")
    };
    if code != EngineErrorCodes::OK {
        tracing::error!(code, "bridge failed to load; events will be dropped");
    }
    JNI_VERSION_1_6
}
