// Sound device lifecycle for a server connection

use super::VoiceEngine;
use crate::error::report_engine_error;

/// Opens, closes and activates the sound devices of a server connection.
///
/// Every call logs a failing code with the engine's message and returns the
/// engine's code unchanged, so hosts can tell a device that failed to open
/// from one that opened.
pub struct SoundDevices<'e, E: VoiceEngine + ?Sized> {
    engine: &'e E,
}

impl<'e, E: VoiceEngine + ?Sized> SoundDevices<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self { engine }
    }

    pub fn open_capture(&self, connection_id: u64, mode_id: &str, device: &str) -> u32 {
        let code = self.engine.open_capture_device(connection_id, mode_id, device);
        report_engine_error(self.engine, code, "opening capture device")
    }

    pub fn open_playback(&self, connection_id: u64, mode_id: &str, device: &str) -> u32 {
        let code = self
            .engine
            .open_playback_device(connection_id, mode_id, device);
        report_engine_error(self.engine, code, "opening playback device")
    }

    pub fn close_capture(&self, connection_id: u64) -> u32 {
        let code = self.engine.close_capture_device(connection_id);
        report_engine_error(self.engine, code, "closing capture device")
    }

    pub fn close_playback(&self, connection_id: u64) -> u32 {
        let code = self.engine.close_playback_device(connection_id);
        report_engine_error(self.engine, code, "closing playback device")
    }

    pub fn activate_capture(&self, connection_id: u64) -> u32 {
        let code = self.engine.activate_capture_device(connection_id);
        report_engine_error(self.engine, code, "activating capture device")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EngineCall, MockEngine};

    #[test]
    fn test_open_failure_is_propagated() {
        let engine = MockEngine::default();
        engine.fail_next(0x0a00);

        let devices = SoundDevices::new(&engine);
        assert_eq!(devices.open_capture(1, "custom", "Java"), 0x0a00);
        assert_eq!(engine.message_lookups(), vec![0x0a00]);
    }

    #[test]
    fn test_success_is_ok() {
        let engine = MockEngine::default();
        let devices = SoundDevices::new(&engine);

        assert_eq!(devices.open_playback(1, "custom", "Java"), 0);
        assert_eq!(devices.activate_capture(1), 0);
        assert_eq!(devices.close_capture(1), 0);
        assert_eq!(devices.close_playback(1), 0);
        assert!(engine.message_lookups().is_empty());
        assert_eq!(
            engine.calls(),
            vec![
                EngineCall::OpenPlayback {
                    connection_id: 1,
                    mode_id: "custom".to_string(),
                    device: "Java".to_string(),
                },
                EngineCall::ActivateCapture { connection_id: 1 },
                EngineCall::CloseCapture { connection_id: 1 },
                EngineCall::ClosePlayback { connection_id: 1 },
            ]
        );
    }
}
