//! Native boundary with the client library: the callback table handed to the
//! engine, its trampolines, engine-owned strings and, on Android, the linked
//! library itself.

pub(crate) mod guard;

mod callbacks;
mod types;

pub use callbacks::install_callback_sink;
pub use types::{string_arg, AnyId, ClientUiFunctions, EngineString, FreeMemoryFn};

cfg_if::cfg_if! {
    if #[cfg(target_os = "android")] {
        mod clientlib;
        pub use clientlib::ClientLib;
    }
}
