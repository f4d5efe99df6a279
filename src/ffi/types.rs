//! C-compatible types shared with the client library.

use std::ffi::{c_char, c_int, c_uint, c_void, CStr};
use std::fmt;
use std::ptr::NonNull;

/// Client identifier type of the engine (`anyID`).
pub type AnyId = u16;

/// Callback slot the bridge leaves empty.
pub type UnusedCallback = Option<unsafe extern "C" fn()>;

/// Engine call that releases memory it allocated (`freeMemory`).
pub type FreeMemoryFn = unsafe extern "C" fn(*mut c_void) -> c_uint;

/// Callback table passed to the engine at initialization.
///
/// Field order and count mirror the engine's `ClientUIFunctions` struct;
/// the engine skips null slots. Only the eleven forwarded events carry
/// typed signatures.
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct ClientUiFunctions {
    pub on_connect_status_change_event: Option<unsafe extern "C" fn(u64, c_int, c_uint)>,
    pub on_server_protocol_version_event: UnusedCallback,
    pub on_new_channel_event: Option<unsafe extern "C" fn(u64, u64, u64)>,
    pub on_new_channel_created_event:
        Option<unsafe extern "C" fn(u64, u64, u64, AnyId, *const c_char, *const c_char)>,
    pub on_del_channel_event:
        Option<unsafe extern "C" fn(u64, u64, AnyId, *const c_char, *const c_char)>,
    pub on_channel_move_event: UnusedCallback,
    pub on_update_channel_event: UnusedCallback,
    pub on_update_channel_edited_event: UnusedCallback,
    pub on_update_client_event: UnusedCallback,
    pub on_client_move_event:
        Option<unsafe extern "C" fn(u64, AnyId, u64, u64, c_int, *const c_char)>,
    pub on_client_move_subscription_event:
        Option<unsafe extern "C" fn(u64, AnyId, u64, u64, c_int)>,
    pub on_client_move_timeout_event:
        Option<unsafe extern "C" fn(u64, AnyId, u64, u64, c_int, *const c_char)>,
    pub on_client_move_moved_event: Option<
        unsafe extern "C" fn(
            u64,
            AnyId,
            u64,
            u64,
            c_int,
            AnyId,
            *const c_char,
            *const c_char,
            *const c_char,
        ),
    >,
    pub on_client_kick_from_channel_event: UnusedCallback,
    pub on_client_kick_from_server_event: UnusedCallback,
    pub on_client_ids_event: UnusedCallback,
    pub on_client_ids_finished_event: UnusedCallback,
    pub on_server_edited_event: UnusedCallback,
    pub on_server_updated_event: UnusedCallback,
    pub on_server_error_event:
        Option<unsafe extern "C" fn(u64, *const c_char, c_uint, *const c_char, *const c_char)>,
    pub on_server_stop_event: UnusedCallback,
    pub on_text_message_event: UnusedCallback,
    pub on_talk_status_change_event: Option<unsafe extern "C" fn(u64, c_int, c_int, AnyId)>,
    pub on_ignored_whisper_event: UnusedCallback,
    pub on_connection_info_event: UnusedCallback,
    pub on_server_connection_info_event: UnusedCallback,
    pub on_channel_subscribe_event: UnusedCallback,
    pub on_channel_subscribe_finished_event: UnusedCallback,
    pub on_channel_unsubscribe_event: UnusedCallback,
    pub on_channel_unsubscribe_finished_event: UnusedCallback,
    pub on_channel_description_update_event: UnusedCallback,
    pub on_channel_password_changed_event: UnusedCallback,
    pub on_playback_shutdown_complete_event: UnusedCallback,
    pub on_sound_device_list_changed_event: UnusedCallback,
    pub on_edit_playback_voice_data_event: UnusedCallback,
    pub on_edit_post_process_voice_data_event: UnusedCallback,
    pub on_edit_mixed_playback_voice_data_event: UnusedCallback,
    pub on_edit_captured_voice_data_event: UnusedCallback,
    pub on_custom_3d_rolloff_calculation_client_event: UnusedCallback,
    pub on_custom_3d_rolloff_calculation_wave_event: UnusedCallback,
    pub on_user_logging_message_event: Option<
        unsafe extern "C" fn(
            *const c_char,
            c_int,
            *const c_char,
            u64,
            *const c_char,
            *const c_char,
        ),
    >,
    pub on_custom_packet_encrypt_event: UnusedCallback,
    pub on_custom_packet_decrypt_event: UnusedCallback,
    pub on_provisioning_slot_request_result_event: UnusedCallback,
    pub on_check_server_unique_identifier_event: UnusedCallback,
    pub on_client_password_encrypt: UnusedCallback,
    pub on_file_transfer_status_event: UnusedCallback,
    pub on_file_list_event: UnusedCallback,
    pub on_file_list_finished_event: UnusedCallback,
    pub on_file_info_event: UnusedCallback,
}

impl fmt::Debug for ClientUiFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientUiFunctions")
            .field("forwarded_events", &self.installed_count())
            .finish_non_exhaustive()
    }
}

impl ClientUiFunctions {
    /// Number of forwarded-event slots that are populated.
    pub fn installed_count(&self) -> usize {
        [
            self.on_connect_status_change_event.is_some(),
            self.on_new_channel_event.is_some(),
            self.on_new_channel_created_event.is_some(),
            self.on_del_channel_event.is_some(),
            self.on_client_move_event.is_some(),
            self.on_client_move_subscription_event.is_some(),
            self.on_client_move_timeout_event.is_some(),
            self.on_client_move_moved_event.is_some(),
            self.on_talk_status_change_event.is_some(),
            self.on_server_error_event.is_some(),
            self.on_user_logging_message_event.is_some(),
        ]
        .into_iter()
        .filter(|installed| *installed)
        .count()
    }
}

/// Owned copy of a C string argument; null reads as empty.
///
/// # Safety
/// A non-null `ptr` must point to a NUL-terminated string that stays valid
/// for the duration of the call.
pub unsafe fn string_arg(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

/// String allocated by the engine, released through the engine's allocator
/// exactly once when dropped.
pub struct EngineString {
    ptr: NonNull<c_char>,
    free: FreeMemoryFn,
}

impl EngineString {
    /// Take ownership of an engine-allocated string. Returns `None` for null.
    ///
    /// # Safety
    /// `ptr` must be a NUL-terminated string allocated by the engine and not
    /// freed elsewhere; `free` must be the engine's matching release call.
    pub unsafe fn from_raw(ptr: *mut c_char, free: FreeMemoryFn) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, free })
    }

    pub fn to_string_lossy(&self) -> String {
        // SAFETY: the pointer is non-null, NUL-terminated and owned by self.
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }
}

impl Drop for EngineString {
    fn drop(&mut self) {
        // SAFETY: the string came from the engine allocator and is released
        // only here.
        let code = unsafe { (self.free)(self.ptr.as_ptr().cast()) };
        if code != 0 {
            tracing::warn!(code, "engine failed to free string");
        }
    }
}

impl fmt::Debug for EngineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EngineString")
            .field(&self.to_string_lossy())
            .finish()
    }
}
