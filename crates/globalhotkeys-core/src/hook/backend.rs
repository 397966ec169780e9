// Globalhotkeys Hook Backend
// Narrow platform boundary: install/uninstall hooks, pump messages

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{HookKind, InstallError, Stroke};

/// Hook procedure: receives every key/button transition as a Down or Up
/// stroke, in delivery order. Runs on the platform's hook thread and must
/// return quickly.
pub type HookProc = Arc<dyn Fn(Stroke) + Send + Sync>;

/// Request for a message loop to exit.
///
/// One signal is created per dedicated loop thread and handed to both
/// [`HookBackend::run_message_loop_until_quit`] and
/// [`HookBackend::post_quit`].
#[derive(Debug, Clone, Default)]
pub struct QuitSignal {
    raised: Arc<AtomicBool>,
}

impl QuitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

/// Platform hook surface consumed by the lifecycle.
///
/// Implementations wrap whatever the OS offers for global input capture.
pub trait HookBackend: Send + Sync + 'static {
    /// Token identifying one installed hook
    type Handle: Send + 'static;

    /// Install a system-wide hook of the given kind
    fn install_hook(&self, kind: HookKind, hook: HookProc) -> Result<Self::Handle, InstallError>;

    /// Remove a previously installed hook
    fn uninstall_hook(&self, handle: Self::Handle);

    /// Pump platform messages on the calling thread until `quit` is observed
    fn run_message_loop_until_quit(&self, quit: &QuitSignal);

    /// Ask a loop started with the same signal to exit. Must not block.
    fn post_quit(&self, quit: &QuitSignal) {
        quit.raise();
    }
}
