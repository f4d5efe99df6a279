// CustomDeviceManager - custom sound device registration and sample exchange
//
// Single Responsibility: keep the engine's view of a custom device and the
// bridge's buffer cache in step, and make sure no sample request reaches the
// engine without passing the validator.

use super::cache::{AudioBufferCache, Direction, SampleRegion};
use super::region::{BufferRegion, SAMPLE_WIDTH_BYTES};
use super::validator::{DeviceBufferValidator, ValidatedRequest};
use crate::engine::{StreamFormat, VoiceEngine};
use crate::error::{
    log_bridge_error, report_engine_error, BridgeError, EngineErrorCodes, ErrorCode,
};

/// Format and optional shared region for one direction of a custom device.
#[derive(Debug, Clone, Copy)]
pub struct DeviceStream {
    pub format: StreamFormat,
    pub region: Option<BufferRegion>,
}

impl DeviceStream {
    pub fn new(format: StreamFormat, region: Option<BufferRegion>) -> Self {
        Self { format, region }
    }

    fn sample_region(&self, direction: Direction) -> Result<Option<SampleRegion>, BridgeError> {
        let Some(region) = self.region else {
            return Ok(None);
        };
        if !region.is_sample_aligned() {
            return Err(BridgeError::MisalignedRegion { direction });
        }
        let channels = usize::try_from(self.format.channels)
            .ok()
            .filter(|channels| *channels > 0)
            .ok_or_else(|| BridgeError::Engine {
                code: EngineErrorCodes::PARAMETER_INVALID,
                message: Some(format!(
                    "{} channel count must be positive (got {})",
                    direction, self.format.channels
                )),
            })?;
        Ok(Some(SampleRegion {
            region,
            frame_bytes: channels * SAMPLE_WIDTH_BYTES,
        }))
    }
}

/// Owns the engine handle and the buffer cache for custom devices.
///
/// # Example
/// ```ignore
/// let devices = CustomDeviceManager::new(engine);
/// devices.register_custom_device("Java", "Java", capture, playback);
/// // audio thread:
/// let code = devices.acquire_playback_data("Java", frames);
/// ```
pub struct CustomDeviceManager<E: VoiceEngine> {
    engine: E,
    cache: AudioBufferCache,
}

impl<E: VoiceEngine> CustomDeviceManager<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            cache: AudioBufferCache::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn cache(&self) -> &AudioBufferCache {
        &self.cache
    }

    /// Register a custom device with the engine, then cache its regions.
    ///
    /// Regions are only cached once the engine has accepted the device; a
    /// previous registration under the same identifier is replaced.
    pub fn register_custom_device(
        &self,
        device_id: &str,
        display_name: &str,
        capture: DeviceStream,
        playback: DeviceStream,
    ) -> u32 {
        let regions = capture
            .sample_region(Direction::Capture)
            .and_then(|cap| Ok((cap, playback.sample_region(Direction::Playback)?)));
        let (capture_region, playback_region) = match regions {
            Ok(regions) => regions,
            Err(err) => {
                log_bridge_error(&err, "register_custom_device");
                return err.code();
            }
        };

        let code = self.engine.register_custom_device(
            device_id,
            display_name,
            capture.format,
            playback.format,
        );
        if code != EngineErrorCodes::OK {
            return report_engine_error(&self.engine, code, "registering custom sound device");
        }

        if let Err(err) = self
            .cache
            .register(device_id, playback_region, capture_region)
        {
            log_bridge_error(&err, "register_custom_device");
            return err.code();
        }

        tracing::info!(
            device_id,
            capture_hz = capture.format.frequency,
            capture_channels = capture.format.channels,
            playback_hz = playback.format.frequency,
            playback_channels = playback.format.channels,
            "registered custom sound device"
        );
        code
    }

    /// Unregister a custom device. The cached regions are dropped even when
    /// the engine reports an error, since the host is about to release them.
    pub fn unregister_custom_device(&self, device_id: &str) -> u32 {
        tracing::debug!(device_id, "unregistering custom sound device");
        let code = self.engine.unregister_custom_device(device_id);
        report_engine_error(&self.engine, code, "unregistering custom sound device");

        if let Err(err) = self.cache.unregister(device_id) {
            log_bridge_error(&err, "unregister_custom_device");
        }
        code
    }

    fn validate(
        &self,
        device_id: &str,
        direction: Direction,
        frames: i32,
    ) -> Result<ValidatedRequest, u32> {
        DeviceBufferValidator::new(&self.cache)
            .validate(device_id, direction, frames)
            .map_err(|err| {
                tracing::warn!(code = err.code(), "{}", err.message());
                err.code()
            })
    }

    /// Let the engine write `frames` frames of playback audio into the
    /// device's playback region.
    ///
    /// When the engine has nothing to play the requested samples are zeroed,
    /// so the host always reads silence rather than the previous period.
    pub fn acquire_playback_data(&self, device_id: &str, frames: i32) -> u32 {
        let request = match self.validate(device_id, Direction::Playback, frames) {
            Ok(request) => request,
            Err(code) => return code,
        };

        // SAFETY: the validator bounded the length by the region capacity;
        // alignment was checked at registration; the region stays valid until
        // the device is unregistered, which the host only does after the
        // engine stopped driving this device.
        let samples = unsafe { request.entry.region.samples_mut(request.sample_len) };
        let code = self
            .engine
            .acquire_custom_playback_data(device_id, samples, request.frames);
        if code == EngineErrorCodes::SOUND_NO_DATA {
            samples.fill(0);
        }
        code
    }

    /// Hand `frames` frames from the device's capture region to the engine.
    pub fn process_capture_data(&self, device_id: &str, frames: i32) -> u32 {
        let request = match self.validate(device_id, Direction::Capture, frames) {
            Ok(request) => request,
            Err(code) => return code,
        };

        // SAFETY: as for playback.
        let samples: &[i16] = unsafe { request.entry.region.samples_mut(request.sample_len) };
        let code = self
            .engine
            .process_custom_capture_data(device_id, samples, request.frames);
        report_engine_error(&self.engine, code, "processing capture data")
    }

    /// Forget every cached region.
    pub fn teardown(&self) {
        if let Err(err) = self.cache.clear() {
            log_bridge_error(&err, "teardown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EngineCall, MockEngine};

    fn stream(backing: &mut [i16], channels: i32) -> DeviceStream {
        let bytes = std::mem::size_of_val(backing);
        DeviceStream::new(
            StreamFormat::new(48000, channels),
            unsafe { BufferRegion::from_raw(backing.as_mut_ptr().cast(), bytes) },
        )
    }

    #[test]
    fn test_engine_rejection_leaves_cache_empty() {
        let mut play = vec![0i16; 64];
        let mut cap = vec![0i16; 64];
        let devices = CustomDeviceManager::new(MockEngine::default());
        devices.engine().fail_next(0x0300);

        let code = devices.register_custom_device(
            "Java",
            "Java",
            stream(&mut cap, 1),
            stream(&mut play, 1),
        );
        assert_eq!(code, 0x0300);
        assert!(devices.cache().is_empty().unwrap());
        assert_eq!(
            devices.acquire_playback_data("Java", 1),
            EngineErrorCodes::PARAMETER_INVALID
        );
    }

    #[test]
    fn test_acquire_fills_region() {
        let mut play = vec![0i16; 64];
        let mut cap = vec![0i16; 64];
        let devices = CustomDeviceManager::new(MockEngine::with_fill(3));
        devices.register_custom_device("Java", "Java", stream(&mut cap, 1), stream(&mut play, 1));

        assert_eq!(devices.acquire_playback_data("Java", 16), 0);
        drop(devices);
        assert!(play[..16].iter().all(|s| *s == 3));
        assert!(play[16..].iter().all(|s| *s == 0));
    }

    #[test]
    fn test_no_data_zeroes_requested_samples() {
        let mut play = vec![7i16; 32];
        let devices = CustomDeviceManager::new(MockEngine::with_fill(3));
        devices.register_custom_device(
            "Java",
            "Java",
            DeviceStream::new(StreamFormat::new(48000, 1), None),
            stream(&mut play, 1),
        );
        devices.engine().fail_next(EngineErrorCodes::SOUND_NO_DATA);

        assert_eq!(
            devices.acquire_playback_data("Java", 16),
            EngineErrorCodes::SOUND_NO_DATA
        );
        drop(devices);
        assert!(play[..16].iter().all(|s| *s == 0));
        assert!(play[16..].iter().all(|s| *s == 7));
    }

    #[test]
    fn test_other_playback_errors_leave_region_alone() {
        let mut play = vec![7i16; 32];
        let devices = CustomDeviceManager::new(MockEngine::with_fill(3));
        devices.register_custom_device(
            "Java",
            "Java",
            DeviceStream::new(StreamFormat::new(48000, 1), None),
            stream(&mut play, 1),
        );
        devices.engine().fail_next(EngineErrorCodes::UNDEFINED);

        assert_eq!(
            devices.acquire_playback_data("Java", 16),
            EngineErrorCodes::UNDEFINED
        );
        drop(devices);
        assert!(play.iter().all(|s| *s == 7));
    }

    #[test]
    fn test_oversized_acquire_never_reaches_engine() {
        let mut play = vec![0i16; 64];
        let mut cap = vec![0i16; 64];
        let devices = CustomDeviceManager::new(MockEngine::with_fill(3));
        devices.register_custom_device("Java", "Java", stream(&mut cap, 1), stream(&mut play, 1));

        assert_eq!(
            devices.acquire_playback_data("Java", 65),
            EngineErrorCodes::PARAMETER_INVALID_COUNT
        );
        assert!(!devices
            .engine()
            .calls()
            .iter()
            .any(|call| matches!(call, EngineCall::AcquirePlayback { .. })));
        drop(devices);
        assert!(play.iter().all(|s| *s == 0));
    }

    #[test]
    fn test_capture_hands_samples_to_engine() {
        let mut play = vec![0i16; 8];
        let mut cap: Vec<i16> = (1..=8).collect();
        let devices = CustomDeviceManager::new(MockEngine::default());
        devices.register_custom_device("Java", "Java", stream(&mut cap, 2), stream(&mut play, 2));

        assert_eq!(devices.process_capture_data("Java", 2), 0);
        assert_eq!(
            devices.engine().calls().last(),
            Some(&EngineCall::ProcessCapture {
                device_id: "Java".to_string(),
                samples: vec![1, 2, 3, 4],
                frames: 2,
            })
        );
    }

    #[test]
    fn test_capture_engine_error_reported() {
        let mut cap = vec![0i16; 8];
        let devices = CustomDeviceManager::new(MockEngine::default());
        devices.register_custom_device(
            "Java",
            "Java",
            stream(&mut cap, 1),
            DeviceStream::new(StreamFormat::new(48000, 1), None),
        );
        devices.engine().fail_next(0x0a01);

        assert_eq!(devices.process_capture_data("Java", 4), 0x0a01);
        assert_eq!(devices.engine().message_lookups(), vec![0x0a01]);
    }

    #[test]
    fn test_unregister_clears_even_on_engine_error() {
        let mut play = vec![0i16; 8];
        let devices = CustomDeviceManager::new(MockEngine::default());
        devices.register_custom_device(
            "Java",
            "Java",
            DeviceStream::new(StreamFormat::new(48000, 1), None),
            stream(&mut play, 1),
        );
        devices.engine().fail_next(0x0602);

        assert_eq!(devices.unregister_custom_device("Java"), 0x0602);
        assert_eq!(
            devices.acquire_playback_data("Java", 1),
            EngineErrorCodes::PARAMETER_INVALID
        );
    }

    #[test]
    fn test_misaligned_region_rejected_before_engine() {
        let mut backing = vec![0i16; 8];
        let odd = unsafe { BufferRegion::from_raw(backing.as_mut_ptr().cast::<u8>().add(1), 15) };
        let devices = CustomDeviceManager::new(MockEngine::default());

        let code = devices.register_custom_device(
            "Java",
            "Java",
            DeviceStream::new(StreamFormat::new(48000, 1), odd),
            DeviceStream::new(StreamFormat::new(48000, 1), None),
        );
        assert_eq!(code, EngineErrorCodes::PARAMETER_INVALID);
        assert!(devices.engine().calls().is_empty());
    }

    #[test]
    fn test_zero_channels_with_region_rejected() {
        let mut play = vec![0i16; 8];
        let devices = CustomDeviceManager::new(MockEngine::default());

        let code = devices.register_custom_device(
            "Java",
            "Java",
            DeviceStream::new(StreamFormat::new(48000, 1), None),
            stream(&mut play, 0),
        );
        assert_eq!(code, EngineErrorCodes::PARAMETER_INVALID);
        assert!(devices.engine().calls().is_empty());
    }
}
