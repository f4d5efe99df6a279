// DeviceBufferValidator - bounds check in front of every sample exchange
//
// The engine reads from and writes into host memory through the raw address
// cached at registration. Nothing on the engine side knows how big that
// memory is, so every acquire/submit request is checked here first.

use super::cache::{AudioBufferCache, AudioBufferEntry, Direction};
use super::region::SAMPLE_WIDTH_BYTES;
use crate::error::BridgeError;

/// A request that fits its region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub entry: AudioBufferEntry,
    /// Frames requested, as passed to the engine
    pub frames: i32,
    /// Interleaved 16-bit values covered by the request
    pub sample_len: usize,
}

pub struct DeviceBufferValidator<'c> {
    cache: &'c AudioBufferCache,
}

impl<'c> DeviceBufferValidator<'c> {
    pub fn new(cache: &'c AudioBufferCache) -> Self {
        Self { cache }
    }

    /// Confirm `frames` frames of `device_id` fit the region cached for
    /// `direction`.
    ///
    /// # Errors
    /// - `UnknownDevice` (`ERROR_parameter_invalid`) when nothing is cached
    /// - `BufferTooSmall` (`ERROR_parameter_invalid_count`) when the request
    ///   exceeds the region, including negative and overflowing counts
    pub fn validate(
        &self,
        device_id: &str,
        direction: Direction,
        frames: i32,
    ) -> Result<ValidatedRequest, BridgeError> {
        let entry = self
            .cache
            .lookup(device_id, direction)?
            .ok_or_else(|| BridgeError::UnknownDevice {
                device_id: device_id.to_string(),
                direction,
            })?;

        let too_small = |requested_bytes| BridgeError::BufferTooSmall {
            device_id: device_id.to_string(),
            direction,
            requested_bytes,
            capacity_bytes: entry.capacity_bytes(),
        };

        let Ok(frame_count) = usize::try_from(frames) else {
            return Err(too_small(usize::MAX));
        };
        let requested_bytes = frame_count
            .checked_mul(entry.frame_bytes)
            .ok_or_else(|| too_small(usize::MAX))?;
        if requested_bytes > entry.capacity_bytes() {
            return Err(too_small(requested_bytes));
        }

        Ok(ValidatedRequest {
            sample_len: requested_bytes / SAMPLE_WIDTH_BYTES,
            frames,
            entry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::cache::SampleRegion;
    use crate::audio::region::BufferRegion;
    use crate::error::{EngineErrorCodes, ErrorCode};

    fn cache_with(backing: &mut [i16], channels: usize) -> AudioBufferCache {
        let cache = AudioBufferCache::new();
        let bytes = std::mem::size_of_val(backing);
        let sample_region = SampleRegion {
            region: unsafe { BufferRegion::from_raw(backing.as_mut_ptr().cast(), bytes) }
                .unwrap(),
            frame_bytes: channels * SAMPLE_WIDTH_BYTES,
        };
        cache.register("Java", Some(sample_region), Some(sample_region)).unwrap();
        cache
    }

    #[test]
    fn test_unknown_device() {
        let cache = AudioBufferCache::new();
        let err = DeviceBufferValidator::new(&cache)
            .validate("Java", Direction::Playback, 1)
            .unwrap_err();
        assert_eq!(err.code(), EngineErrorCodes::PARAMETER_INVALID);
    }

    #[test]
    fn test_exact_fit_accepted() {
        let mut backing = vec![0i16; 480];
        let cache = cache_with(&mut backing, 1);
        let request = DeviceBufferValidator::new(&cache)
            .validate("Java", Direction::Capture, 480)
            .unwrap();
        assert_eq!(request.sample_len, 480);
        assert_eq!(request.frames, 480);
    }

    #[test]
    fn test_one_past_rejected() {
        let mut backing = vec![0i16; 480];
        let cache = cache_with(&mut backing, 1);
        let err = DeviceBufferValidator::new(&cache)
            .validate("Java", Direction::Playback, 481)
            .unwrap_err();
        assert_eq!(err.code(), EngineErrorCodes::PARAMETER_INVALID_COUNT);
        assert_eq!(
            err,
            BridgeError::BufferTooSmall {
                device_id: "Java".to_string(),
                direction: Direction::Playback,
                requested_bytes: 962,
                capacity_bytes: 960,
            }
        );
    }

    #[test]
    fn test_stereo_frames_count_both_channels() {
        let mut backing = vec![0i16; 480];
        let cache = cache_with(&mut backing, 2);
        let validator = DeviceBufferValidator::new(&cache);

        let request = validator.validate("Java", Direction::Playback, 240).unwrap();
        assert_eq!(request.sample_len, 480);
        assert!(validator.validate("Java", Direction::Playback, 241).is_err());
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut backing = vec![0i16; 16];
        let cache = cache_with(&mut backing, 1);
        let err = DeviceBufferValidator::new(&cache)
            .validate("Java", Direction::Capture, -1)
            .unwrap_err();
        assert_eq!(err.code(), EngineErrorCodes::PARAMETER_INVALID_COUNT);
    }

    #[test]
    fn test_zero_frames_accepted() {
        let mut backing = vec![0i16; 16];
        let cache = cache_with(&mut backing, 1);
        let request = DeviceBufferValidator::new(&cache)
            .validate("Java", Direction::Capture, 0)
            .unwrap();
        assert_eq!(request.sample_len, 0);
    }
}
