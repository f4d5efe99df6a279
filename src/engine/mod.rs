//! The voice engine as seen by the bridge.
//!
//! [`VoiceEngine`] is the slice of the client library's C API the bridge
//! calls into: custom device registration, the zero-copy sample exchange and
//! the sound device lifecycle. Every call follows the engine's convention of
//! returning an integer code, `EngineErrorCodes::OK` on success.
//!
//! On Android the implementation is `crate::ffi::ClientLib`; tests use
//! `crate::testing::MockEngine`.

pub mod session;

pub use session::SoundDevices;

/// Sample rate and interleaved channel count of one direction of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    pub frequency: i32,
    pub channels: i32,
}

impl StreamFormat {
    pub fn new(frequency: i32, channels: i32) -> Self {
        Self {
            frequency,
            channels,
        }
    }
}

pub trait VoiceEngine: Send + Sync {
    fn register_custom_device(
        &self,
        device_id: &str,
        display_name: &str,
        capture: StreamFormat,
        playback: StreamFormat,
    ) -> u32;

    fn unregister_custom_device(&self, device_id: &str) -> u32;

    /// Fill `buffer` with `samples` frames of mixed playback audio.
    ///
    /// `buffer` holds exactly `samples * channels` interleaved values.
    fn acquire_custom_playback_data(&self, device_id: &str, buffer: &mut [i16], samples: i32)
        -> u32;

    /// Hand `samples` frames of captured audio to the engine.
    fn process_custom_capture_data(&self, device_id: &str, buffer: &[i16], samples: i32) -> u32;

    fn open_capture_device(&self, connection_id: u64, mode_id: &str, device: &str) -> u32;

    fn open_playback_device(&self, connection_id: u64, mode_id: &str, device: &str) -> u32;

    fn close_capture_device(&self, connection_id: u64) -> u32;

    fn close_playback_device(&self, connection_id: u64) -> u32;

    fn activate_capture_device(&self, connection_id: u64) -> u32;

    /// Engine description of `code`, if the engine can produce one.
    fn error_message(&self, code: u32) -> Option<String>;
}
