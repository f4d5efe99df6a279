// AudioBufferCache - device identifier to shared sample regions
//
// Registration happens on a host thread while acquire/submit run on the
// engine's audio threads, so every map access goes through one mutex.
// Lookups copy the entry out; the copy stays usable after the lock is
// released because regions live until their device is unregistered.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use super::region::BufferRegion;
use crate::error::BridgeError;

/// Transfer direction of a custom device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Engine writes mixed audio for the host to play
    Playback,
    /// Host writes recorded audio for the engine to consume
    Capture,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Playback => f.write_str("playback"),
            Direction::Capture => f.write_str("capture"),
        }
    }
}

/// A region plus the size of one interleaved frame stored in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRegion {
    pub region: BufferRegion,
    pub frame_bytes: usize,
}

/// Snapshot of one cached region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBufferEntry {
    pub device_id: Arc<str>,
    pub direction: Direction,
    pub region: BufferRegion,
    pub frame_bytes: usize,
}

impl AudioBufferEntry {
    pub fn capacity_bytes(&self) -> usize {
        self.region.capacity_bytes()
    }
}

#[derive(Debug, Default)]
struct DeviceBuffers {
    playback: Option<AudioBufferEntry>,
    capture: Option<AudioBufferEntry>,
}

impl DeviceBuffers {
    fn get(&self, direction: Direction) -> Option<&AudioBufferEntry> {
        match direction {
            Direction::Playback => self.playback.as_ref(),
            Direction::Capture => self.capture.as_ref(),
        }
    }
}

#[derive(Debug, Default)]
pub struct AudioBufferCache {
    devices: Mutex<HashMap<String, DeviceBuffers>>,
}

impl AudioBufferCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, DeviceBuffers>>, BridgeError> {
        self.devices.lock().map_err(|_| BridgeError::LockPoisoned {
            component: "audio_buffer_cache".to_string(),
        })
    }

    /// Store the regions of `device_id`, replacing everything previously
    /// cached for it. A direction passed as `None` ends up uncached.
    pub fn register(
        &self,
        device_id: &str,
        playback: Option<SampleRegion>,
        capture: Option<SampleRegion>,
    ) -> Result<(), BridgeError> {
        let key: Arc<str> = Arc::from(device_id);
        let entry = |direction, sample_region: SampleRegion| AudioBufferEntry {
            device_id: Arc::clone(&key),
            direction,
            region: sample_region.region,
            frame_bytes: sample_region.frame_bytes,
        };
        let buffers = DeviceBuffers {
            playback: playback.map(|sample_region| entry(Direction::Playback, sample_region)),
            capture: capture.map(|sample_region| entry(Direction::Capture, sample_region)),
        };

        let replaced = self.lock()?.insert(device_id.to_string(), buffers).is_some();
        tracing::debug!(device_id, replaced, "cached device buffers");
        Ok(())
    }

    /// Drop both directions of `device_id`. Returns whether anything was
    /// cached.
    pub fn unregister(&self, device_id: &str) -> Result<bool, BridgeError> {
        let removed = self.lock()?.remove(device_id).is_some();
        tracing::debug!(device_id, removed, "released device buffers");
        Ok(removed)
    }

    pub fn lookup(
        &self,
        device_id: &str,
        direction: Direction,
    ) -> Result<Option<AudioBufferEntry>, BridgeError> {
        Ok(self
            .lock()?
            .get(device_id)
            .and_then(|buffers| buffers.get(direction))
            .cloned())
    }

    pub fn len(&self) -> Result<usize, BridgeError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, BridgeError> {
        Ok(self.lock()?.is_empty())
    }

    /// Forget every device. Used when the client library is torn down.
    pub fn clear(&self) -> Result<(), BridgeError> {
        self.lock()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(backing: &mut [i16]) -> SampleRegion {
        let bytes = std::mem::size_of_val(backing);
        SampleRegion {
            region: unsafe { BufferRegion::from_raw(backing.as_mut_ptr().cast(), bytes) }
                .unwrap(),
            frame_bytes: 2,
        }
    }

    #[test]
    fn test_register_and_lookup_each_direction() {
        let mut play = vec![0i16; 16];
        let mut cap = vec![0i16; 8];
        let cache = AudioBufferCache::new();

        cache
            .register("Java", Some(region(&mut play)), Some(region(&mut cap)))
            .unwrap();

        let playback = cache.lookup("Java", Direction::Playback).unwrap().unwrap();
        assert_eq!(playback.capacity_bytes(), 32);
        assert_eq!(playback.direction, Direction::Playback);
        assert_eq!(&*playback.device_id, "Java");

        let capture = cache.lookup("Java", Direction::Capture).unwrap().unwrap();
        assert_eq!(capture.capacity_bytes(), 16);
    }

    #[test]
    fn test_missing_direction_not_found() {
        let mut play = vec![0i16; 16];
        let cache = AudioBufferCache::new();
        cache.register("Java", Some(region(&mut play)), None).unwrap();

        assert!(cache.lookup("Java", Direction::Capture).unwrap().is_none());
        assert!(cache.lookup("Other", Direction::Playback).unwrap().is_none());
    }

    #[test]
    fn test_reregister_replaces() {
        let mut first_play = vec![0i16; 16];
        let mut first_cap = vec![0i16; 16];
        let mut second_play = vec![0i16; 4];
        let cache = AudioBufferCache::new();

        cache
            .register(
                "Java",
                Some(region(&mut first_play)),
                Some(region(&mut first_cap)),
            )
            .unwrap();
        cache
            .register("Java", Some(region(&mut second_play)), None)
            .unwrap();

        let playback = cache.lookup("Java", Direction::Playback).unwrap().unwrap();
        assert_eq!(
            playback.region.base_address(),
            second_play.as_mut_ptr().cast::<u8>()
        );
        assert_eq!(playback.capacity_bytes(), 8);
        assert!(cache.lookup("Java", Direction::Capture).unwrap().is_none());
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut play = vec![0i16; 16];
        let cache = AudioBufferCache::new();
        cache.register("Java", Some(region(&mut play)), None).unwrap();

        assert!(cache.unregister("Java").unwrap());
        assert!(!cache.unregister("Java").unwrap());
        assert!(cache.lookup("Java", Direction::Playback).unwrap().is_none());
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_clear() {
        let mut play = vec![0i16; 16];
        let cache = AudioBufferCache::new();
        cache.register("a", Some(region(&mut play)), None).unwrap();
        cache.register("b", None, None).unwrap();

        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
    }
}
