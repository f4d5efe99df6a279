// Native methods of com.teamspeak.ts3sdkclient.ts3sdk.Native
//
// Every export returns the engine's code (or the bridge's own code in the
// engine's code space) as a jint.

#![allow(non_snake_case)]

use jni::objects::{JObject, JString};
use jni::sys::{jint, jlong};
use jni::JNIEnv;

use super::runtime::clear_exception;
use super::{callbacks, context, direct_region, into_code, java_string};
use crate::audio::DeviceStream;
use crate::engine::StreamFormat;
use crate::error::BridgeError;
use crate::ffi::guard::ffi_guard_code;

fn native_library_dir(
    env: &mut JNIEnv,
    application_context: &JObject,
) -> Result<String, BridgeError> {
    let lookup = |env: &mut JNIEnv| -> jni::errors::Result<String> {
        let info = env
            .call_method(
                application_context,
                "getApplicationInfo",
                "()Landroid/content/pm/ApplicationInfo;",
                &[],
            )?
            .l()?;
        let dir = JString::from(
            env.get_field(&info, "nativeLibraryDir", "Ljava/lang/String;")?
                .l()?,
        );
        Ok(env.get_string(&dir)?.into())
    };
    lookup(env).map_err(|err| BridgeError::Runtime {
        reason: format!("native library dir: {}", clear_exception(env, &err)),
    })
}

fn start_init(env: &mut JNIEnv, application_context: &JObject) -> Result<u32, BridgeError> {
    let context = context()?;
    let engine = context.devices().engine();

    // SAFETY: the VM pointer is valid for the life of the process and the
    // application context is a live local reference of this call.
    unsafe {
        engine.init_jni(
            context.events().runtime().vm().get_java_vm_pointer(),
            application_context.as_raw(),
        )
    };

    let lib_dir = native_library_dir(env, application_context)?;
    tracing::trace!("Sound backend path: {}", lib_dir);
    let code = engine.init(callbacks(), &lib_dir);
    tracing::debug!("init() returned: {}", code);
    Ok(code)
}

#[no_mangle]
pub extern "system" fn Java_com_teamspeak_ts3sdkclient_ts3sdk_Native_ts3client_1startInit(
    mut env: JNIEnv,
    _obj: JObject,
    application_context: JObject,
) -> jint {
    let code = ffi_guard_code! {
        into_code(start_init(&mut env, &application_context), "startInit")
    };
    code as jint
}

#[no_mangle]
pub extern "system" fn Java_com_teamspeak_ts3sdkclient_ts3sdk_Native_ts3client_1destroyClientLib(
    _env: JNIEnv,
    _obj: JObject,
) -> jint {
    let code = ffi_guard_code! {
        into_code(
            context().map(|context| {
                let code = context.devices().engine().destroy();
                context.teardown();
                code
            }),
            "destroyClientLib",
        )
    };
    code as jint
}

#[allow(clippy::too_many_arguments)]
fn register_custom_device(
    env: &mut JNIEnv,
    device_id: &JString,
    display_name: &JString,
    cap_frequency: jint,
    cap_channels: jint,
    cap_buffer: JObject,
    play_frequency: jint,
    play_channels: jint,
    play_buffer: JObject,
) -> Result<u32, BridgeError> {
    let devices = context()?.devices();
    let device_id = java_string(env, device_id)?;
    let display_name = java_string(env, display_name)?;
    let capture = DeviceStream::new(
        StreamFormat::new(cap_frequency, cap_channels),
        direct_region(env, cap_buffer)?,
    );
    let playback = DeviceStream::new(
        StreamFormat::new(play_frequency, play_channels),
        direct_region(env, play_buffer)?,
    );
    Ok(devices.register_custom_device(&device_id, &display_name, capture, playback))
}

#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub extern "system" fn Java_com_teamspeak_ts3sdkclient_ts3sdk_Native_ts3client_1registerCustomDevice(
    mut env: JNIEnv,
    _obj: JObject,
    device_id: JString,
    display_name: JString,
    cap_frequency: jint,
    cap_channels: jint,
    cap_buffer: JObject,
    play_frequency: jint,
    play_channels: jint,
    play_buffer: JObject,
) -> jint {
    let code = ffi_guard_code! {
        into_code(
            register_custom_device(
                &mut env,
                &device_id,
                &display_name,
                cap_frequency,
                cap_channels,
                cap_buffer,
                play_frequency,
                play_channels,
                play_buffer,
            ),
            "registerCustomDevice",
        )
    };
    code as jint
}

#[no_mangle]
pub extern "system" fn Java_com_teamspeak_ts3sdkclient_ts3sdk_Native_ts3client_1unregisterCustomDevice(
    mut env: JNIEnv,
    _obj: JObject,
    device_id: JString,
) -> jint {
    let code = ffi_guard_code! {
        let result = context().and_then(|context| {
            let device_id = java_string(&mut env, &device_id)?;
            Ok(context.devices().unregister_custom_device(&device_id))
        });
        into_code(result, "unregisterCustomDevice")
    };
    code as jint
}

#[no_mangle]
pub extern "system" fn Java_com_teamspeak_ts3sdkclient_ts3sdk_Native_ts3client_1acquireCustomPlaybackData(
    mut env: JNIEnv,
    _obj: JObject,
    device_id: JString,
    samples: jint,
) -> jint {
    let code = ffi_guard_code! {
        let result = context().and_then(|context| {
            let device_id = java_string(&mut env, &device_id)?;
            Ok(context.devices().acquire_playback_data(&device_id, samples))
        });
        into_code(result, "acquireCustomPlaybackData")
    };
    code as jint
}

#[no_mangle]
pub extern "system" fn Java_com_teamspeak_ts3sdkclient_ts3sdk_Native_ts3client_1processCustomCaptureData(
    mut env: JNIEnv,
    _obj: JObject,
    device_id: JString,
    samples: jint,
) -> jint {
    let code = ffi_guard_code! {
        let result = context().and_then(|context| {
            let device_id = java_string(&mut env, &device_id)?;
            Ok(context.devices().process_capture_data(&device_id, samples))
        });
        into_code(result, "processCustomCaptureData")
    };
    code as jint
}

#[no_mangle]
pub extern "system" fn Java_com_teamspeak_ts3sdkclient_ts3sdk_Native_ts3client_1openCaptureDevice(
    mut env: JNIEnv,
    _obj: JObject,
    connection_id: jlong,
    mode_id: JString,
    capture_device: JString,
) -> jint {
    let code = ffi_guard_code! {
        let result = context().and_then(|context| {
            let mode_id = java_string(&mut env, &mode_id)?;
            let device = java_string(&mut env, &capture_device)?;
            Ok(context.sound_devices().open_capture(connection_id as u64, &mode_id, &device))
        });
        into_code(result, "openCaptureDevice")
    };
    code as jint
}

#[no_mangle]
pub extern "system" fn Java_com_teamspeak_ts3sdkclient_ts3sdk_Native_ts3client_1openPlaybackDevice(
    mut env: JNIEnv,
    _obj: JObject,
    connection_id: jlong,
    mode_id: JString,
    playback_device: JString,
) -> jint {
    let code = ffi_guard_code! {
        let result = context().and_then(|context| {
            let mode_id = java_string(&mut env, &mode_id)?;
            let device = java_string(&mut env, &playback_device)?;
            Ok(context.sound_devices().open_playback(connection_id as u64, &mode_id, &device))
        });
        into_code(result, "openPlaybackDevice")
    };
    code as jint
}

#[no_mangle]
pub extern "system" fn Java_com_teamspeak_ts3sdkclient_ts3sdk_Native_ts3client_1closeCaptureDevice(
    _env: JNIEnv,
    _obj: JObject,
    connection_id: jlong,
) -> jint {
    let code = ffi_guard_code! {
        let result = context()
            .map(|context| context.sound_devices().close_capture(connection_id as u64));
        into_code(result, "closeCaptureDevice")
    };
    code as jint
}

#[no_mangle]
pub extern "system" fn Java_com_teamspeak_ts3sdkclient_ts3sdk_Native_ts3client_1closePlaybackDevice(
    _env: JNIEnv,
    _obj: JObject,
    connection_id: jlong,
) -> jint {
    let code = ffi_guard_code! {
        let result = context()
            .map(|context| context.sound_devices().close_playback(connection_id as u64));
        into_code(result, "closePlaybackDevice")
    };
    code as jint
}

#[no_mangle]
pub extern "system" fn Java_com_teamspeak_ts3sdkclient_ts3sdk_Native_ts3client_1activateCaptureDevice(
    _env: JNIEnv,
    _obj: JObject,
    connection_id: jlong,
) -> jint {
    let code = ffi_guard_code! {
        let result = context()
            .map(|context| context.sound_devices().activate_capture(connection_id as u64));
        into_code(result, "activateCaptureDevice")
    };
    code as jint
}
