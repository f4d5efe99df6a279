//! Mock voice engine.

use std::sync::Mutex;

use super::lock;
use crate::engine::{StreamFormat, VoiceEngine};
use crate::error::EngineErrorCodes;

/// A call received by [`MockEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    RegisterDevice {
        device_id: String,
        display_name: String,
        capture: StreamFormat,
        playback: StreamFormat,
    },
    UnregisterDevice {
        device_id: String,
    },
    AcquirePlayback {
        device_id: String,
        frames: i32,
        len: usize,
    },
    ProcessCapture {
        device_id: String,
        samples: Vec<i16>,
        frames: i32,
    },
    OpenCapture {
        connection_id: u64,
        mode_id: String,
        device: String,
    },
    OpenPlayback {
        connection_id: u64,
        mode_id: String,
        device: String,
    },
    CloseCapture {
        connection_id: u64,
    },
    ClosePlayback {
        connection_id: u64,
    },
    ActivateCapture {
        connection_id: u64,
    },
}

/// Engine fake that records calls and writes a constant into playback
/// buffers. A failing playback call leaves the buffer untouched.
#[derive(Debug, Default)]
pub struct MockEngine {
    fill: i16,
    calls: Mutex<Vec<EngineCall>>,
    next_failure: Mutex<Option<u32>>,
    message_lookups: Mutex<Vec<u32>>,
}

impl MockEngine {
    /// Engine whose playback writes `fill` into every requested sample.
    pub fn with_fill(fill: i16) -> Self {
        Self {
            fill,
            ..Self::default()
        }
    }

    /// Make the next engine call return `code`.
    pub fn fail_next(&self, code: u32) {
        *lock(&self.next_failure) = Some(code);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        lock(&self.calls).clone()
    }

    /// Codes passed to [`VoiceEngine::error_message`], in order.
    pub fn message_lookups(&self) -> Vec<u32> {
        lock(&self.message_lookups).clone()
    }

    fn record(&self, call: EngineCall) -> u32 {
        lock(&self.calls).push(call);
        lock(&self.next_failure)
            .take()
            .unwrap_or(EngineErrorCodes::OK)
    }
}

impl VoiceEngine for MockEngine {
    fn register_custom_device(
        &self,
        device_id: &str,
        display_name: &str,
        capture: StreamFormat,
        playback: StreamFormat,
    ) -> u32 {
        self.record(EngineCall::RegisterDevice {
            device_id: device_id.to_string(),
            display_name: display_name.to_string(),
            capture,
            playback,
        })
    }

    fn unregister_custom_device(&self, device_id: &str) -> u32 {
        self.record(EngineCall::UnregisterDevice {
            device_id: device_id.to_string(),
        })
    }

    fn acquire_custom_playback_data(
        &self,
        device_id: &str,
        buffer: &mut [i16],
        samples: i32,
    ) -> u32 {
        let code = self.record(EngineCall::AcquirePlayback {
            device_id: device_id.to_string(),
            frames: samples,
            len: buffer.len(),
        });
        if code == EngineErrorCodes::OK {
            buffer.fill(self.fill);
        }
        code
    }

    fn process_custom_capture_data(&self, device_id: &str, buffer: &[i16], samples: i32) -> u32 {
        self.record(EngineCall::ProcessCapture {
            device_id: device_id.to_string(),
            samples: buffer.to_vec(),
            frames: samples,
        })
    }

    fn open_capture_device(&self, connection_id: u64, mode_id: &str, device: &str) -> u32 {
        self.record(EngineCall::OpenCapture {
            connection_id,
            mode_id: mode_id.to_string(),
            device: device.to_string(),
        })
    }

    fn open_playback_device(&self, connection_id: u64, mode_id: &str, device: &str) -> u32 {
        self.record(EngineCall::OpenPlayback {
            connection_id,
            mode_id: mode_id.to_string(),
            device: device.to_string(),
        })
    }

    fn close_capture_device(&self, connection_id: u64) -> u32 {
        self.record(EngineCall::CloseCapture { connection_id })
    }

    fn close_playback_device(&self, connection_id: u64) -> u32 {
        self.record(EngineCall::ClosePlayback { connection_id })
    }

    fn activate_capture_device(&self, connection_id: u64) -> u32 {
        self.record(EngineCall::ActivateCapture { connection_id })
    }

    fn error_message(&self, code: u32) -> Option<String> {
        lock(&self.message_lookups).push(code);
        Some(format!("mock engine error {:#06x}", code))
    }
}
