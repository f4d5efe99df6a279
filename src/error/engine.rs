// Engine error codes and reporting

use crate::engine::VoiceEngine;

/// Integer error codes of the voice engine that the bridge produces or
/// inspects.
///
/// The bridge's own validation errors reuse the engine's parameter codes so
/// the host sees a single code space.
pub struct EngineErrorCodes {}

impl EngineErrorCodes {
    /// Success
    pub const OK: u32 = 0x0000;

    /// Unspecified failure
    pub const UNDEFINED: u32 = 0x0001;

    /// Success, nothing changed
    pub const OK_NO_UPDATE: u32 = 0x0003;

    /// Requested sample count does not fit the registered region
    pub const PARAMETER_INVALID_COUNT: u32 = 0x0601;

    /// Unknown device or otherwise unusable parameter
    pub const PARAMETER_INVALID: u32 = 0x0602;

    /// Playback had nothing to deliver
    pub const SOUND_NO_DATA: u32 = 0x0917;

    /// Whether `code` means the call went through.
    pub fn is_success(code: u32) -> bool {
        code == Self::OK || code == Self::OK_NO_UPDATE
    }
}

/// Log a non-zero engine code with the engine's own description.
///
/// Returns `code` unchanged so call sites can forward it:
/// `return report_engine_error(engine, engine.do_thing(), "do_thing")`.
pub fn report_engine_error<E: VoiceEngine + ?Sized>(engine: &E, code: u32, context: &str) -> u32 {
    if code == EngineErrorCodes::OK {
        return code;
    }

    match engine.error_message(code) {
        Some(message) => {
            tracing::error!(code, "Error {}: {}", context, message);
        }
        None => {
            tracing::error!(code, "Error {}.", context);
        }
    }
    code
}
