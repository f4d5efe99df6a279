// Audio module - zero-copy sample exchange between host buffers and the engine

pub mod cache;
pub mod device;
pub mod region;
pub mod validator;

// Re-export commonly used types for convenience
pub use cache::{AudioBufferCache, AudioBufferEntry, Direction, SampleRegion};
pub use device::{CustomDeviceManager, DeviceStream};
pub use region::{BufferRegion, SAMPLE_WIDTH_BYTES};
pub use validator::{DeviceBufferValidator, ValidatedRequest};
