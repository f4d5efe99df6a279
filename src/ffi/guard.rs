//! Panic guard macros for the native boundary.
//!
//! Engine callbacks and JNI exports are entered from foreign frames; a panic
//! unwinding out of them is undefined behaviour, so every entry point body
//! runs inside one of these guards.

/// Wrap a body that returns an engine code (`u32`).
///
/// On panic the macro logs and returns `EngineErrorCodes::UNDEFINED`.
///
/// # Example
///
/// ```ignore
/// extern "C" fn entry(...) -> u32 {
///     ffi_guard_code! {
///         // ... body ...
///         EngineErrorCodes::OK
///     }
/// }
/// ```
macro_rules! ffi_guard_code {
    ($($body:tt)*) => {{
        use std::panic;
        use std::panic::AssertUnwindSafe;

        match panic::catch_unwind(AssertUnwindSafe(move || -> u32 { $($body)* })) {
            Ok(code) => code,
            Err(payload) => {
                tracing::error!(
                    "panic at native boundary: {}",
                    $crate::ffi::guard::panic_message(payload.as_ref())
                );
                $crate::error::EngineErrorCodes::UNDEFINED
            }
        }
    }};
}

/// Wrap a body with no result, such as an engine event callback.
///
/// On panic the macro logs and returns.
macro_rules! ffi_guard_void {
    ($($body:tt)*) => {{
        use std::panic;
        use std::panic::AssertUnwindSafe;

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(move || { $($body)* })) {
            tracing::error!(
                "panic at native boundary: {}",
                $crate::ffi::guard::panic_message(payload.as_ref())
            );
        }
    }};
}

pub(crate) use ffi_guard_code;
pub(crate) use ffi_guard_void;

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use crate::error::EngineErrorCodes;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn ffi_guard_code_returns_value_on_success() {
        let code = ffi_guard_code! { 0x0601 };
        assert_eq!(code, EngineErrorCodes::PARAMETER_INVALID_COUNT);
    }

    #[test]
    fn ffi_guard_code_returns_undefined_on_panic() {
        let code = ffi_guard_code! {
            panic!("test panic");
        };
        assert_eq!(code, EngineErrorCodes::UNDEFINED);
    }

    #[test]
    fn ffi_guard_void_runs_body() {
        let ran = AtomicBool::new(false);
        let flag = &ran;
        ffi_guard_void! { flag.store(true, Ordering::SeqCst) }
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn ffi_guard_void_swallows_panic() {
        ffi_guard_void! {
            panic!("test panic {}", 7);
        }
    }

    #[test]
    fn panic_message_reads_payloads() {
        let payload = std::panic::catch_unwind(|| panic!("formatted {}", 1)).unwrap_err();
        assert_eq!(super::panic_message(payload.as_ref()), "formatted 1");

        let payload = std::panic::catch_unwind(|| std::panic::panic_any(5u8)).unwrap_err();
        assert_eq!(super::panic_message(payload.as_ref()), "non-string panic payload");
    }
}
