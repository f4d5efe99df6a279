// BridgeContext: process-wide bridge state
// Owns the event bridge and the custom device manager so components receive
// them by reference instead of reaching for globals.

use crate::audio::CustomDeviceManager;
use crate::config::BridgeConfig;
use crate::dispatch::EventBridge;
use crate::engine::{SoundDevices, VoiceEngine};
use crate::error::BridgeError;
use crate::runtime::ManagedRuntime;

/// BridgeContext: everything the native entry points need
///
/// Consolidates the bridge's process-wide state:
/// - Managed runtime handle and the event handler registry
/// - Voice engine handle and the custom device buffer cache
/// - The configuration both were built from
///
/// Lifecycle: [`initialize`](Self::initialize) once when the library is
/// loaded; [`teardown`](Self::teardown) when the client library is destroyed.
/// Handlers are registered for the lifetime of the process.
pub struct BridgeContext<R: ManagedRuntime, E: VoiceEngine> {
    config: BridgeConfig,
    events: EventBridge<R>,
    devices: CustomDeviceManager<E>,
}

impl<R: ManagedRuntime, E: VoiceEngine> BridgeContext<R, E> {
    /// Build the context and resolve a handler for every event kind.
    ///
    /// Kinds that fail to resolve are logged and skipped.
    ///
    /// # Errors
    /// `AttachFailed` if the initializing thread cannot be attached.
    pub fn initialize(config: BridgeConfig, runtime: R, engine: E) -> Result<Self, BridgeError> {
        let events = EventBridge::new(runtime);
        events.register_handlers(&config.events)?;

        Ok(Self {
            config,
            events,
            devices: CustomDeviceManager::new(engine),
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBridge<R> {
        &self.events
    }

    pub fn devices(&self) -> &CustomDeviceManager<E> {
        &self.devices
    }

    pub fn sound_devices(&self) -> SoundDevices<'_, E> {
        SoundDevices::new(self.devices.engine())
    }

    /// Forget all cached device buffers. Event handlers stay registered.
    pub fn teardown(&self) {
        self.devices.teardown();
        tracing::info!("bridge context torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{BufferRegion, DeviceStream};
    use crate::engine::StreamFormat;
    use crate::error::EngineErrorCodes;
    use crate::events::EventKind;
    use crate::testing::{MockEngine, Outcome, RecordingRuntime};

    #[test]
    fn test_initialize_registers_handlers() {
        let context = BridgeContext::initialize(
            BridgeConfig::default(),
            RecordingRuntime::new(),
            MockEngine::default(),
        )
        .unwrap();

        assert_eq!(
            context.events().registry().registered_kinds().len(),
            EventKind::COUNT
        );
        assert_eq!(context.config().logging.tag, "TS3 LIB");
    }

    #[test]
    fn test_initialize_fails_without_attach() {
        let runtime = RecordingRuntime::new();
        runtime.set_attach_outcome(Outcome::Fail);

        let result =
            BridgeContext::initialize(BridgeConfig::default(), runtime, MockEngine::default());
        assert!(matches!(result, Err(BridgeError::AttachFailed { .. })));
    }

    #[test]
    fn test_teardown_clears_buffers() {
        let mut play = vec![0i16; 32];
        let context = BridgeContext::initialize(
            BridgeConfig::default(),
            RecordingRuntime::new(),
            MockEngine::default(),
        )
        .unwrap();
        let region = unsafe { BufferRegion::from_raw(play.as_mut_ptr().cast(), 64) };
        context.devices().register_custom_device(
            "Java",
            "Java",
            DeviceStream::new(StreamFormat::new(48000, 1), None),
            DeviceStream::new(StreamFormat::new(48000, 1), region),
        );
        assert_eq!(context.devices().acquire_playback_data("Java", 32), 0);

        context.teardown();
        assert_eq!(
            context.devices().acquire_playback_data("Java", 32),
            EngineErrorCodes::PARAMETER_INVALID
        );
    }

    #[test]
    fn test_sound_devices_share_engine() {
        let context = BridgeContext::initialize(
            BridgeConfig::default(),
            RecordingRuntime::new(),
            MockEngine::default(),
        )
        .unwrap();
        context.devices().engine().fail_next(0x0a01);
        assert_eq!(context.sound_devices().activate_capture(1), 0x0a01);
    }
}
