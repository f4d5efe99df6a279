//! `extern "C"` trampolines installed into the engine's callback table.
//!
//! The engine calls these on its own threads. Each converts the native
//! arguments and forwards them to the process-wide [`ClientEventCallbacks`]
//! sink. Events that arrive before a sink is installed are dropped.

use std::ffi::{c_char, c_int, c_uint};

use once_cell::sync::OnceCell;

use super::guard::ffi_guard_void;
use super::types::{string_arg, AnyId, ClientUiFunctions};
use crate::error::BridgeError;
use crate::events::ClientEventCallbacks;

static CALLBACK_SINK: OnceCell<&'static dyn ClientEventCallbacks> = OnceCell::new();

/// Route all engine callbacks to `sink` for the rest of the process.
///
/// # Errors
/// `AlreadyInitialized` if a sink is already installed.
pub fn install_callback_sink(sink: &'static dyn ClientEventCallbacks) -> Result<(), BridgeError> {
    CALLBACK_SINK
        .set(sink)
        .map_err(|_| BridgeError::AlreadyInitialized {
            component: "callback sink".to_string(),
        })
}

fn with_sink(event: &str, forward: impl FnOnce(&dyn ClientEventCallbacks)) {
    match CALLBACK_SINK.get() {
        Some(sink) => forward(*sink),
        None => tracing::warn!(event, "no callback sink installed, dropping event"),
    }
}

impl ClientUiFunctions {
    /// Table with the bridge's trampoline in every forwarded slot.
    pub fn with_bridge_callbacks() -> Self {
        Self {
            on_connect_status_change_event: Some(on_connect_status_change_event),
            on_new_channel_event: Some(on_new_channel_event),
            on_new_channel_created_event: Some(on_new_channel_created_event),
            on_del_channel_event: Some(on_del_channel_event),
            on_client_move_event: Some(on_client_move_event),
            on_client_move_subscription_event: Some(on_client_move_subscription_event),
            on_client_move_timeout_event: Some(on_client_move_timeout_event),
            on_client_move_moved_event: Some(on_client_move_moved_event),
            on_talk_status_change_event: Some(on_talk_status_change_event),
            on_server_error_event: Some(on_server_error_event),
            on_user_logging_message_event: Some(on_user_logging_message_event),
            ..Self::default()
        }
    }
}

unsafe extern "C" fn on_connect_status_change_event(
    connection_id: u64,
    new_status: c_int,
    error_number: c_uint,
) {
    ffi_guard_void! {
        tracing::debug!(connection_id, new_status, error_number, "connect status change");
        with_sink("ConnectStatusChange", |sink| {
            sink.on_connect_status_change(connection_id, new_status, error_number)
        });
    }
}

unsafe extern "C" fn on_new_channel_event(
    connection_id: u64,
    channel_id: u64,
    channel_parent_id: u64,
) {
    ffi_guard_void! {
        with_sink("NewChannel", |sink| {
            sink.on_new_channel(connection_id, channel_id, channel_parent_id)
        });
    }
}

unsafe extern "C" fn on_new_channel_created_event(
    connection_id: u64,
    channel_id: u64,
    channel_parent_id: u64,
    invoker_id: AnyId,
    invoker_name: *const c_char,
    invoker_unique_identifier: *const c_char,
) {
    ffi_guard_void! {
        let invoker_name = string_arg(invoker_name);
        let invoker_unique_identifier = string_arg(invoker_unique_identifier);
        with_sink("NewChannelCreated", |sink| {
            sink.on_new_channel_created(
                connection_id,
                channel_id,
                channel_parent_id,
                invoker_id,
                invoker_name,
                invoker_unique_identifier,
            )
        });
    }
}

unsafe extern "C" fn on_del_channel_event(
    connection_id: u64,
    channel_id: u64,
    invoker_id: AnyId,
    invoker_name: *const c_char,
    invoker_unique_identifier: *const c_char,
) {
    ffi_guard_void! {
        let invoker_name = string_arg(invoker_name);
        let invoker_unique_identifier = string_arg(invoker_unique_identifier);
        with_sink("DelChannel", |sink| {
            sink.on_del_channel(
                connection_id,
                channel_id,
                invoker_id,
                invoker_name,
                invoker_unique_identifier,
            )
        });
    }
}

unsafe extern "C" fn on_client_move_event(
    connection_id: u64,
    client_id: AnyId,
    old_channel_id: u64,
    new_channel_id: u64,
    visibility: c_int,
    move_message: *const c_char,
) {
    ffi_guard_void! {
        let move_message = string_arg(move_message);
        with_sink("ClientMove", |sink| {
            sink.on_client_move(
                connection_id,
                client_id,
                old_channel_id,
                new_channel_id,
                visibility,
                move_message,
            )
        });
    }
}

unsafe extern "C" fn on_client_move_subscription_event(
    connection_id: u64,
    client_id: AnyId,
    old_channel_id: u64,
    new_channel_id: u64,
    visibility: c_int,
) {
    ffi_guard_void! {
        with_sink("ClientMoveSubscription", |sink| {
            sink.on_client_move_subscription(
                connection_id,
                client_id,
                old_channel_id,
                new_channel_id,
                visibility,
            )
        });
    }
}

unsafe extern "C" fn on_client_move_timeout_event(
    connection_id: u64,
    client_id: AnyId,
    old_channel_id: u64,
    new_channel_id: u64,
    visibility: c_int,
    timeout_message: *const c_char,
) {
    ffi_guard_void! {
        let timeout_message = string_arg(timeout_message);
        with_sink("ClientMoveTimeout", |sink| {
            sink.on_client_move_timeout(
                connection_id,
                client_id,
                old_channel_id,
                new_channel_id,
                visibility,
                timeout_message,
            )
        });
    }
}

#[allow(clippy::too_many_arguments)]
unsafe extern "C" fn on_client_move_moved_event(
    connection_id: u64,
    client_id: AnyId,
    old_channel_id: u64,
    new_channel_id: u64,
    visibility: c_int,
    mover_id: AnyId,
    mover_name: *const c_char,
    mover_unique_identifier: *const c_char,
    move_message: *const c_char,
) {
    ffi_guard_void! {
        let mover_name = string_arg(mover_name);
        let mover_unique_identifier = string_arg(mover_unique_identifier);
        let move_message = string_arg(move_message);
        with_sink("ClientMoveMoved", |sink| {
            sink.on_client_move_moved(
                connection_id,
                client_id,
                old_channel_id,
                new_channel_id,
                visibility,
                mover_id,
                mover_name,
                mover_unique_identifier,
                move_message,
            )
        });
    }
}

unsafe extern "C" fn on_talk_status_change_event(
    connection_id: u64,
    status: c_int,
    is_received_whisper: c_int,
    client_id: AnyId,
) {
    ffi_guard_void! {
        with_sink("TalkStatusChange", |sink| {
            sink.on_talk_status_change(connection_id, status, is_received_whisper, client_id)
        });
    }
}

unsafe extern "C" fn on_server_error_event(
    connection_id: u64,
    error_message: *const c_char,
    error: c_uint,
    return_code: *const c_char,
    extra_message: *const c_char,
) {
    ffi_guard_void! {
        let error_message = string_arg(error_message);
        let return_code = string_arg(return_code);
        let extra_message = string_arg(extra_message);
        tracing::debug!(connection_id, error, "server error: {}", error_message);
        with_sink("ServerError", |sink| {
            sink.on_server_error(connection_id, error_message, error, return_code, extra_message)
        });
    }
}

unsafe extern "C" fn on_user_logging_message_event(
    log_message: *const c_char,
    log_level: c_int,
    log_channel: *const c_char,
    log_id: u64,
    log_time: *const c_char,
    complete_log_string: *const c_char,
) {
    ffi_guard_void! {
        let log_message = string_arg(log_message);
        let log_channel = string_arg(log_channel);
        let log_time = string_arg(log_time);
        let complete_log_string = string_arg(complete_log_string);
        with_sink("UserLoggingMessage", |sink| {
            sink.on_user_logging_message(
                log_message,
                log_level,
                log_channel,
                log_id,
                log_time,
                complete_log_string,
            )
        });
    }
}
