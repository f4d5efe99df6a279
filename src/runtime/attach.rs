// Scoped thread attachment

use super::ManagedRuntime;
use crate::error::BridgeError;

/// Keeps the current thread attached to the managed runtime for its lifetime.
///
/// If the thread was already attached when the guard was acquired the guard
/// leaves it alone on drop; otherwise it detaches, on every exit path.
///
/// ```ignore
/// let _guard = AttachGuard::acquire(&runtime)?;
/// runtime.dispatch(handler, &event)?; // early return still detaches
/// ```
#[must_use = "the thread is detached as soon as the guard is dropped"]
pub struct AttachGuard<'r, R: ManagedRuntime + ?Sized> {
    runtime: &'r R,
    owned: bool,
}

impl<'r, R: ManagedRuntime + ?Sized> AttachGuard<'r, R> {
    pub fn acquire(runtime: &'r R) -> Result<Self, BridgeError> {
        if runtime.is_current_thread_attached() {
            return Ok(Self {
                runtime,
                owned: false,
            });
        }

        runtime.attach_current_thread()?;
        tracing::trace!("attached native thread {:?}", std::thread::current().id());
        Ok(Self {
            runtime,
            owned: true,
        })
    }

    /// Whether this guard performed the attach and will detach.
    pub fn owns_attachment(&self) -> bool {
        self.owned
    }
}

impl<R: ManagedRuntime + ?Sized> Drop for AttachGuard<'_, R> {
    fn drop(&mut self) {
        if self.owned {
            self.runtime.detach_current_thread();
            tracing::trace!("detached native thread {:?}", std::thread::current().id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Outcome, RecordingRuntime};

    #[test]
    fn test_attaches_and_detaches_unattached_thread() {
        let runtime = RecordingRuntime::new();
        {
            let guard = AttachGuard::acquire(&runtime).unwrap();
            assert!(guard.owns_attachment());
            assert_eq!(runtime.attaches(), 1);
            assert_eq!(runtime.detaches(), 0);
        }
        assert_eq!(runtime.detaches(), 1);
    }

    #[test]
    fn test_leaves_preattached_thread_alone() {
        let runtime = RecordingRuntime::new();
        runtime.set_preattached(true);
        {
            let guard = AttachGuard::acquire(&runtime).unwrap();
            assert!(!guard.owns_attachment());
        }
        assert_eq!(runtime.attaches(), 0);
        assert_eq!(runtime.detaches(), 0);
    }

    #[test]
    fn test_failed_attach_never_detaches() {
        let runtime = RecordingRuntime::new();
        runtime.set_attach_outcome(Outcome::Fail);
        let result = AttachGuard::acquire(&runtime);
        assert!(matches!(result, Err(BridgeError::AttachFailed { .. })));
        assert_eq!(runtime.detaches(), 0);
    }

    #[test]
    fn test_detaches_on_early_return() {
        fn work(runtime: &RecordingRuntime) -> Result<(), BridgeError> {
            let _guard = AttachGuard::acquire(runtime)?;
            Err(BridgeError::Marshal {
                kind: crate::events::EventKind::NewChannel,
                reason: "boom".to_string(),
            })
        }

        let runtime = RecordingRuntime::new();
        assert!(work(&runtime).is_err());
        assert_eq!(runtime.attaches(), 1);
        assert_eq!(runtime.detaches(), 1);
    }
}
