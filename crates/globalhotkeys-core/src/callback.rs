// Globalhotkeys Callback
// Async action attached to a binding

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by a hotkey callback
pub type CallbackFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Async action run when a binding fires.
///
/// Cheap to clone. A callback is always present: there is no "empty"
/// callback, so registration cannot be handed a missing action.
#[derive(Clone)]
pub struct HotkeyCallback {
    inner: Arc<dyn Fn() -> CallbackFuture + Send + Sync>,
}

impl HotkeyCallback {
    /// Wrap an async closure
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            inner: Arc::new(move || Box::pin(f()) as CallbackFuture),
        }
    }

    /// Wrap a plain closure; it runs on a worker when the binding fires
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::new(move || {
            let f = Arc::clone(&f);
            async move { f() }
        })
    }

    /// Create the future for one invocation
    pub fn invoke(&self) -> CallbackFuture {
        (self.inner)()
    }

    /// True if both handles refer to the same closure
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HotkeyCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyCallback").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll, Waker};

    #[test]
    fn test_from_fn_runs_on_poll() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let callback = HotkeyCallback::from_fn(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let mut fut = callback.invoke();
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        let mut cx = Context::from_waker(Waker::noop());
        assert!(matches!(fut.as_mut().poll(&mut cx), Poll::Ready(())));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clone_shares_closure() {
        let callback = HotkeyCallback::from_fn(|| {});
        let other = callback.clone();
        assert!(callback.ptr_eq(&other));
        assert!(!callback.ptr_eq(&HotkeyCallback::from_fn(|| {})));
    }
}
