// Globalhotkeys Hook Lifecycle
// Installs both hooks, optionally on a dedicated message-loop thread

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use super::backend::{HookBackend, HookProc, QuitSignal};
use crate::{HookKind, HotkeyError, InstallError};

/// Default bounded wait for the dedicated loop thread on stop
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_millis(5000);

const LOOP_THREAD_NAME: &str = "hotkey-message-loop";

/// Observable lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Stopped = 0,
    Starting = 1,
    Running = 2,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => LifecycleState::Starting,
            2 => LifecycleState::Running,
            _ => LifecycleState::Stopped,
        }
    }
}

struct InstalledHooks<H> {
    keyboard: H,
    mouse: H,
}

struct MessageLoop {
    quit: QuitSignal,
    thread: JoinHandle<()>,
    exited: mpsc::Receiver<()>,
}

enum Active<H> {
    /// Hooks installed on the caller's thread; the host pumps messages
    Direct(InstalledHooks<H>),
    /// Hooks owned by our own message-loop thread
    Dedicated(MessageLoop),
}

struct Inner<H> {
    active: Option<Active<H>>,
    disposed: bool,
}

/// Install keyboard then mouse; roll the keyboard hook back if the mouse
/// hook is refused so nothing is left half-installed.
fn install_both<B: HookBackend>(
    backend: &B,
    keyboard: &HookProc,
    mouse: &HookProc,
) -> Result<InstalledHooks<B::Handle>, InstallError> {
    let keyboard_handle = backend.install_hook(HookKind::Keyboard, Arc::clone(keyboard))?;
    match backend.install_hook(HookKind::Mouse, Arc::clone(mouse)) {
        Ok(mouse_handle) => {
            log::info!("keyboard and mouse hooks installed");
            Ok(InstalledHooks {
                keyboard: keyboard_handle,
                mouse: mouse_handle,
            })
        }
        Err(e) => {
            backend.uninstall_hook(keyboard_handle);
            log::warn!("{}; keyboard hook rolled back", e);
            Err(e)
        }
    }
}

fn uninstall_both<B: HookBackend>(backend: &B, hooks: InstalledHooks<B::Handle>) {
    backend.uninstall_hook(hooks.keyboard);
    backend.uninstall_hook(hooks.mouse);
    log::info!("keyboard and mouse hooks uninstalled");
}

/// Owns the two system-wide hooks.
///
/// `start`, `stop` and `dispose` are idempotent and serialized by one lock.
/// State reads are lock-free so `is_running` never waits behind a stop that
/// is joining the loop thread.
pub struct HookLifecycle<B: HookBackend> {
    backend: Arc<B>,
    keyboard: HookProc,
    mouse: HookProc,
    stop_timeout: Duration,
    state: AtomicU8,
    inner: Mutex<Inner<B::Handle>>,
}

impl<B: HookBackend> HookLifecycle<B> {
    pub fn new(backend: Arc<B>, keyboard: HookProc, mouse: HookProc) -> Self {
        Self {
            backend,
            keyboard,
            mouse,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            state: AtomicU8::new(LifecycleState::Stopped as u8),
            inner: Mutex::new(Inner {
                active: None,
                disposed: false,
            }),
        }
    }

    /// Bound the wait for the dedicated loop thread when stopping
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: LifecycleState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.lock().disposed
    }

    /// Install both hooks.
    ///
    /// With `run_own_message_loop`, a dedicated thread installs the hooks and
    /// pumps messages until stopped; this call returns once that thread has
    /// reported whether installation succeeded. Otherwise the hooks are
    /// installed here and the caller's message loop is expected to service
    /// them. On failure the lifecycle is back in `Stopped` with nothing held.
    pub fn start(&self, run_own_message_loop: bool) -> Result<(), HotkeyError> {
        let mut inner = self.inner.lock();
        if inner.disposed {
            return Err(HotkeyError::AlreadyDisposed);
        }
        if inner.active.is_some() {
            return Ok(());
        }

        self.set_state(LifecycleState::Starting);
        let result = if run_own_message_loop {
            self.spawn_message_loop().map(Active::Dedicated)
        } else {
            install_both(&*self.backend, &self.keyboard, &self.mouse)
                .map(Active::Direct)
                .map_err(HotkeyError::from)
        };

        match result {
            Ok(active) => {
                inner.active = Some(active);
                self.set_state(LifecycleState::Running);
                Ok(())
            }
            Err(e) => {
                self.set_state(LifecycleState::Stopped);
                Err(e)
            }
        }
    }

    fn spawn_message_loop(&self) -> Result<MessageLoop, HotkeyError> {
        let quit = QuitSignal::new();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), InstallError>>(1);
        let (exit_tx, exit_rx) = mpsc::channel::<()>();

        let backend = Arc::clone(&self.backend);
        let keyboard = Arc::clone(&self.keyboard);
        let mouse = Arc::clone(&self.mouse);
        let loop_quit = quit.clone();

        let thread = thread::Builder::new()
            .name(LOOP_THREAD_NAME.to_string())
            .spawn(move || {
                log::info!("message loop thread started");
                match install_both(&*backend, &keyboard, &mouse) {
                    Ok(hooks) => {
                        let _ = ready_tx.send(Ok(()));
                        backend.run_message_loop_until_quit(&loop_quit);
                        uninstall_both(&*backend, hooks);
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                    }
                }
                let _ = exit_tx.send(());
                log::info!("message loop thread exited");
            })
            .map_err(|e| HotkeyError::LoopThread(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(MessageLoop {
                quit,
                thread,
                exited: exit_rx,
            }),
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e.into())
            }
            Err(_) => {
                let _ = thread.join();
                Err(HotkeyError::LoopThread(
                    "thread exited before installing hooks".to_string(),
                ))
            }
        }
    }

    /// Uninstall both hooks. Events already handed off keep being processed.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        self.stop_locked(&mut inner);
    }

    fn stop_locked(&self, inner: &mut Inner<B::Handle>) {
        let Some(active) = inner.active.take() else {
            return;
        };

        match active {
            Active::Direct(hooks) => uninstall_both(&*self.backend, hooks),
            Active::Dedicated(message_loop) => self.shutdown_loop(message_loop),
        }
        self.set_state(LifecycleState::Stopped);
    }

    fn shutdown_loop(&self, message_loop: MessageLoop) {
        self.backend.post_quit(&message_loop.quit);
        match message_loop.exited.recv_timeout(self.stop_timeout) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                if message_loop.thread.join().is_err() {
                    log::warn!("message loop thread panicked");
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // Detached: the thread uninstalls its hooks whenever it exits
                log::warn!(
                    "message loop thread did not exit within {:?}",
                    self.stop_timeout
                );
            }
        }
    }

    /// Stop and refuse further starts
    pub fn dispose(&self) {
        let mut inner = self.inner.lock();
        if inner.disposed {
            return;
        }
        self.stop_locked(&mut inner);
        inner.disposed = true;
    }
}

impl<B: HookBackend> Drop for HookLifecycle<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
