//! Borrowed host memory shared with the engine for zero-copy sample transfer.

use std::ptr::NonNull;

/// Width of one PCM sample exchanged with the engine (16-bit signed).
pub const SAMPLE_WIDTH_BYTES: usize = std::mem::size_of::<i16>();

/// A fixed-capacity block of memory owned by the managed runtime.
///
/// The bridge never allocates or frees the memory. A region is valid from the
/// moment the host hands it over at device registration until the device is
/// unregistered; the host guarantees it is neither moved nor resized in
/// between, and that unregistration only happens once the engine has stopped
/// driving the device's audio thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRegion {
    base: NonNull<u8>,
    capacity_bytes: usize,
}

// SAFETY: the region is plain memory with no thread affinity; exclusive use
// per direction is guaranteed by the engine driving one audio thread per
// device direction.
unsafe impl Send for BufferRegion {}
unsafe impl Sync for BufferRegion {}

impl BufferRegion {
    /// Wrap host memory. Returns `None` for a null base address.
    ///
    /// # Safety
    /// `base` must point to at least `capacity_bytes` writable bytes that stay
    /// valid for as long as the region is cached.
    pub unsafe fn from_raw(base: *mut u8, capacity_bytes: usize) -> Option<Self> {
        NonNull::new(base).map(|base| Self {
            base,
            capacity_bytes,
        })
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    pub fn base_address(&self) -> *mut u8 {
        self.base.as_ptr()
    }

    /// Whether the base address can be read as 16-bit samples.
    pub fn is_sample_aligned(&self) -> bool {
        self.base.as_ptr().align_offset(std::mem::align_of::<i16>()) == 0
    }

    /// View the first `len` samples of the region.
    ///
    /// # Safety
    /// The region must still be valid, sample-aligned, hold at least
    /// `len * SAMPLE_WIDTH_BYTES` bytes, and not be aliased for the lifetime
    /// of the returned slice.
    pub unsafe fn samples_mut<'a>(&self, len: usize) -> &'a mut [i16] {
        debug_assert!(len * SAMPLE_WIDTH_BYTES <= self.capacity_bytes);
        debug_assert!(self.is_sample_aligned());
        std::slice::from_raw_parts_mut(self.base.as_ptr().cast::<i16>(), len)
    }
}
