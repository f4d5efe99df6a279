//! Custom device registration and sample exchange against a mock engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use proptest::prelude::*;

use sdkclient_bridge::audio::BufferRegion;
use sdkclient_bridge::testing::{EngineCall, MockEngine};
use sdkclient_bridge::{CustomDeviceManager, DeviceStream, EngineErrorCodes, StreamFormat};

const SENTINEL: i16 = 0x5a5a;

fn stream(region: &mut [i16], channels: i32) -> DeviceStream {
    let bytes = std::mem::size_of_val(region);
    DeviceStream::new(StreamFormat::new(48_000, channels), unsafe {
        BufferRegion::from_raw(region.as_mut_ptr().cast(), bytes)
    })
}

fn no_region() -> DeviceStream {
    DeviceStream::new(StreamFormat::new(48_000, 1), None)
}

#[test]
fn register_exchange_unregister() {
    let mut playback = vec![0i16; 960];
    let mut capture: Vec<i16> = (0..960).map(|i| i as i16).collect();
    let devices = CustomDeviceManager::new(MockEngine::with_fill(-3));

    assert_eq!(
        devices.register_custom_device(
            "Java",
            "Java",
            stream(&mut capture, 2),
            stream(&mut playback, 2),
        ),
        EngineErrorCodes::OK
    );
    assert_eq!(devices.acquire_playback_data("Java", 480), EngineErrorCodes::OK);
    assert_eq!(devices.process_capture_data("Java", 2), EngineErrorCodes::OK);
    assert_eq!(
        devices.process_capture_data("Java", 481),
        EngineErrorCodes::PARAMETER_INVALID_COUNT
    );
    assert_eq!(devices.unregister_custom_device("Java"), EngineErrorCodes::OK);
    assert_eq!(
        devices.acquire_playback_data("Java", 1),
        EngineErrorCodes::PARAMETER_INVALID
    );

    let calls = devices.engine().calls();
    assert_eq!(
        calls[0],
        EngineCall::RegisterDevice {
            device_id: "Java".to_string(),
            display_name: "Java".to_string(),
            capture: StreamFormat::new(48_000, 2),
            playback: StreamFormat::new(48_000, 2),
        }
    );
    assert_eq!(
        calls[1],
        EngineCall::AcquirePlayback {
            device_id: "Java".to_string(),
            frames: 480,
            len: 960,
        }
    );
    assert_eq!(
        calls[2],
        EngineCall::ProcessCapture {
            device_id: "Java".to_string(),
            samples: vec![0, 1, 2, 3],
            frames: 2,
        }
    );
    assert_eq!(calls.len(), 4);
    drop(devices);
    assert!(playback.iter().all(|sample| *sample == -3));
}

#[test]
fn devices_are_independent() {
    let mut first = vec![0i16; 16];
    let mut second = vec![0i16; 64];
    let devices = CustomDeviceManager::new(MockEngine::with_fill(1));
    devices.register_custom_device("first", "First", no_region(), stream(&mut first, 1));
    devices.register_custom_device("second", "Second", no_region(), stream(&mut second, 1));

    assert_eq!(
        devices.acquire_playback_data("first", 32),
        EngineErrorCodes::PARAMETER_INVALID_COUNT
    );
    assert_eq!(devices.acquire_playback_data("second", 32), EngineErrorCodes::OK);
    assert_eq!(
        devices.process_capture_data("second", 1),
        EngineErrorCodes::PARAMETER_INVALID
    );
}

#[test]
fn no_data_zeroes_requested_samples() {
    let mut playback = vec![9i16; 32];
    let devices = CustomDeviceManager::new(MockEngine::with_fill(4));
    devices.register_custom_device("Java", "Java", no_region(), stream(&mut playback, 1));
    devices.engine().fail_next(EngineErrorCodes::SOUND_NO_DATA);

    assert_eq!(
        devices.acquire_playback_data("Java", 16),
        EngineErrorCodes::SOUND_NO_DATA
    );
    drop(devices);
    assert!(playback[..16].iter().all(|sample| *sample == 0));
    assert!(playback[16..].iter().all(|sample| *sample == 9));
}

#[test]
fn unregister_races_audio_thread() {
    let mut playback = vec![0i16; 4096];
    let devices = CustomDeviceManager::new(MockEngine::with_fill(2));
    let region = stream(&mut playback, 1);
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        let audio = scope.spawn(|| {
            let mut delivered = 0usize;
            while !stop.load(Ordering::SeqCst) {
                let code = devices.acquire_playback_data("Java", 256);
                assert!(
                    code == EngineErrorCodes::OK || code == EngineErrorCodes::PARAMETER_INVALID,
                    "unexpected code {code:#06x}"
                );
                if code == EngineErrorCodes::OK {
                    delivered += 1;
                }
            }
            delivered
        });

        for _ in 0..200 {
            devices.register_custom_device("Java", "Java", no_region(), region);
            devices.unregister_custom_device("Java");
        }
        stop.store(true, Ordering::SeqCst);
        audio.join().expect("audio thread");
    });

    assert!(devices.cache().is_empty().unwrap());
}

proptest! {
    #[test]
    fn requests_never_exceed_region(
        capacity in 0usize..512,
        channels in 1i32..=2,
        frames in -4i32..600,
    ) {
        let mut backing = vec![SENTINEL; capacity + 8];
        let devices = CustomDeviceManager::new(MockEngine::with_fill(1));
        devices.register_custom_device(
            "Java",
            "Java",
            no_region(),
            stream(&mut backing[..capacity], channels),
        );

        let code = devices.acquire_playback_data("Java", frames);
        let fits = frames >= 0 && frames as usize * channels as usize <= capacity;
        if fits {
            prop_assert_eq!(code, EngineErrorCodes::OK);
        } else {
            prop_assert_eq!(code, EngineErrorCodes::PARAMETER_INVALID_COUNT);
            let acquired = devices
                .engine()
                .calls()
                .iter()
                .any(|call| matches!(call, EngineCall::AcquirePlayback { .. }));
            prop_assert!(!acquired);
        }

        drop(devices);
        prop_assert!(backing[capacity..].iter().all(|sample| *sample == SENTINEL));
    }
}
