//! Bindings to the client library (`libts3client.so`).
//!
//! Linked by `build.rs` on Android only.

use std::ffi::{c_char, c_int, c_short, c_uint, c_void, CString};

use jni::sys::{jobject, JavaVM};

use super::types::{ClientUiFunctions, EngineString};
use crate::engine::{StreamFormat, VoiceEngine};
use crate::error::{report_engine_error, EngineErrorCodes};

/// Engine log destinations: deliver entries through the user logging
/// callback only.
const LOG_TYPE_USERLOGGING: c_int = 0x0004;

extern "C" {
    fn ts3client_android_initJni(vm: *mut JavaVM, context: jobject) -> c_uint;
    fn ts3client_initClientLib(
        function_pointers: *const ClientUiFunctions,
        function_rare_pointers: *const c_void,
        used_log_types: c_int,
        log_file_folder: *const c_char,
        resources_folder: *const c_char,
    ) -> c_uint;
    fn ts3client_destroyClientLib() -> c_uint;
    fn ts3client_getErrorMessage(error_code: c_uint, error: *mut *mut c_char) -> c_uint;
    fn ts3client_freeMemory(pointer: *mut c_void) -> c_uint;

    fn ts3client_registerCustomDevice(
        device_id: *const c_char,
        device_display_name: *const c_char,
        cap_frequency: c_int,
        cap_channels: c_int,
        play_frequency: c_int,
        play_channels: c_int,
    ) -> c_uint;
    fn ts3client_unregisterCustomDevice(device_id: *const c_char) -> c_uint;
    fn ts3client_processCustomCaptureData(
        device_name: *const c_char,
        buffer: *const c_short,
        samples: c_int,
    ) -> c_uint;
    fn ts3client_acquireCustomPlaybackData(
        device_name: *const c_char,
        buffer: *mut c_short,
        samples: c_int,
    ) -> c_uint;

    fn ts3client_openCaptureDevice(
        connection_id: u64,
        mode_id: *const c_char,
        capture_device: *const c_char,
    ) -> c_uint;
    fn ts3client_openPlaybackDevice(
        connection_id: u64,
        mode_id: *const c_char,
        playback_device: *const c_char,
    ) -> c_uint;
    fn ts3client_closeCaptureDevice(connection_id: u64) -> c_uint;
    fn ts3client_closePlaybackDevice(connection_id: u64) -> c_uint;
    fn ts3client_activateCaptureDevice(connection_id: u64) -> c_uint;
}

unsafe extern "C" fn free_memory(pointer: *mut c_void) -> c_uint {
    ts3client_freeMemory(pointer)
}

fn c_string(value: &str, what: &str) -> Result<CString, u32> {
    CString::new(value).map_err(|_| {
        tracing::error!("{} contains an interior NUL byte", what);
        EngineErrorCodes::PARAMETER_INVALID
    })
}

macro_rules! c_args {
    ($($name:ident),+) => {
        $(
            let $name = match c_string($name, stringify!($name)) {
                Ok(value) => value,
                Err(code) => return code,
            };
        )+
    };
}

/// The linked client library.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientLib;

impl ClientLib {
    /// Hand the JVM and application context to the library's own JNI glue.
    ///
    /// # Safety
    /// `vm` and `context` must be valid for the current thread.
    pub unsafe fn init_jni(&self, vm: *mut JavaVM, context: jobject) {
        let code = ts3client_android_initJni(vm, context);
        report_engine_error(self, code, "initializing client library JNI");
    }

    /// Initialize the library with `callbacks`, loading sound backends from
    /// `resources_folder`.
    pub fn init(&self, callbacks: &'static ClientUiFunctions, resources_folder: &str) -> u32 {
        c_args!(resources_folder);
        // SAFETY: the table is 'static and the folder outlives the call.
        let code = unsafe {
            ts3client_initClientLib(
                callbacks,
                std::ptr::null(),
                LOG_TYPE_USERLOGGING,
                std::ptr::null(),
                resources_folder.as_ptr(),
            )
        };
        report_engine_error(self, code, "initializing client library")
    }

    pub fn destroy(&self) -> u32 {
        // SAFETY: no arguments; the library tolerates repeated calls.
        let code = unsafe { ts3client_destroyClientLib() };
        report_engine_error(self, code, "destroying client library")
    }
}

impl VoiceEngine for ClientLib {
    fn register_custom_device(
        &self,
        device_id: &str,
        display_name: &str,
        capture: StreamFormat,
        playback: StreamFormat,
    ) -> u32 {
        c_args!(device_id, display_name);
        // SAFETY: both strings outlive the call.
        unsafe {
            ts3client_registerCustomDevice(
                device_id.as_ptr(),
                display_name.as_ptr(),
                capture.frequency,
                capture.channels,
                playback.frequency,
                playback.channels,
            )
        }
    }

    fn unregister_custom_device(&self, device_id: &str) -> u32 {
        c_args!(device_id);
        // SAFETY: the string outlives the call.
        unsafe { ts3client_unregisterCustomDevice(device_id.as_ptr()) }
    }

    fn acquire_custom_playback_data(
        &self,
        device_id: &str,
        buffer: &mut [i16],
        samples: i32,
    ) -> u32 {
        c_args!(device_id);
        // SAFETY: `buffer` holds exactly the interleaved values for
        // `samples` frames.
        unsafe {
            ts3client_acquireCustomPlaybackData(device_id.as_ptr(), buffer.as_mut_ptr(), samples)
        }
    }

    fn process_custom_capture_data(&self, device_id: &str, buffer: &[i16], samples: i32) -> u32 {
        c_args!(device_id);
        // SAFETY: as for playback; the engine only reads.
        unsafe { ts3client_processCustomCaptureData(device_id.as_ptr(), buffer.as_ptr(), samples) }
    }

    fn open_capture_device(&self, connection_id: u64, mode_id: &str, device: &str) -> u32 {
        c_args!(mode_id, device);
        // SAFETY: both strings outlive the call.
        unsafe { ts3client_openCaptureDevice(connection_id, mode_id.as_ptr(), device.as_ptr()) }
    }

    fn open_playback_device(&self, connection_id: u64, mode_id: &str, device: &str) -> u32 {
        c_args!(mode_id, device);
        // SAFETY: both strings outlive the call.
        unsafe { ts3client_openPlaybackDevice(connection_id, mode_id.as_ptr(), device.as_ptr()) }
    }

    fn close_capture_device(&self, connection_id: u64) -> u32 {
        // SAFETY: plain value arguments.
        unsafe { ts3client_closeCaptureDevice(connection_id) }
    }

    fn close_playback_device(&self, connection_id: u64) -> u32 {
        // SAFETY: plain value arguments.
        unsafe { ts3client_closePlaybackDevice(connection_id) }
    }

    fn activate_capture_device(&self, connection_id: u64) -> u32 {
        // SAFETY: plain value arguments.
        unsafe { ts3client_activateCaptureDevice(connection_id) }
    }

    fn error_message(&self, code: u32) -> Option<String> {
        let mut raw: *mut c_char = std::ptr::null_mut();
        // SAFETY: on success the engine stores a string it allocated in `raw`.
        if unsafe { ts3client_getErrorMessage(code, &mut raw) } != EngineErrorCodes::OK {
            return None;
        }
        // SAFETY: the string is engine-allocated and released by EngineString.
        unsafe { EngineString::from_raw(raw, free_memory) }.map(|message| message.to_string_lossy())
    }
}
