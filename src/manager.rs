// Globalhotkeys Manager
// Hook events -> pressed-key tracker -> registry -> fire-and-forget callbacks

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use globalhotkeys_core::{
    HookBackend, HookLifecycle, HookProc, HotkeyBinding, HotkeyCallback, HotkeyError,
    HotkeyRegistry, HotkeyResult, InputTracker, IntoCombination, LifecycleState, PressedKeys,
    Stroke,
};
use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::mpsc;

use crate::settings::ManagerOptions;

const WORKER_THREAD_NAME: &str = "hotkey-worker";

/// Messages handed off to the worker, in hook order
#[derive(Debug)]
enum WorkerMessage {
    /// One hook event with the pressed set right after it
    Input { stroke: Stroke, pressed: PressedKeys },
    /// The hooks were stopped; forget armed bindings
    Reset,
}

/// Build the hook procedure shared by the keyboard and mouse hooks.
///
/// Runs on the hook thread: update the tracker, take a snapshot and enqueue.
/// The send happens under the tracker lock so the queue order is the
/// snapshot order. Never blocks on anything but that lock.
fn hook_proc(tracker: Arc<Mutex<InputTracker>>, events: mpsc::UnboundedSender<WorkerMessage>) -> HookProc {
    Arc::new(move |stroke: Stroke| {
        let mut tracker = tracker.lock();
        let pressed = tracker.apply(stroke);
        log::trace!("hook event {} ({} held)", stroke, pressed.len());
        if events.send(WorkerMessage::Input { stroke, pressed }).is_err() {
            log::warn!("hotkey worker is gone, dropping {}", stroke);
        }
    })
}

/// Match events in arrival order and spawn whatever fires.
///
/// Callbacks are spawned, not awaited: a slow or panicking callback never
/// holds up matching and is not supervised.
async fn run_worker(registry: Arc<HotkeyRegistry>, mut events: mpsc::UnboundedReceiver<WorkerMessage>) {
    while let Some(message) = events.recv().await {
        match message {
            WorkerMessage::Input { stroke, pressed } => {
                for dispatch in registry.process(stroke, &pressed) {
                    log::debug!("hotkey {} fired on {}", dispatch.id, stroke);
                    tokio::spawn(dispatch.callback.invoke());
                }
            }
            WorkerMessage::Reset => registry.reset_armed(),
        }
    }
    log::debug!("hotkey worker exited");
}

/// Global hotkey manager.
///
/// Owns the binding registry, the pressed-key tracker and the hook lifecycle
/// of one backend. Matching and callbacks run on a tokio runtime: either one
/// the manager builds for itself ([`HotkeyManager::new`]) or the host's
/// ([`HotkeyManager::with_handle`]).
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use globalhotkeys::{HotkeyCallback, HotkeyManager, ManualBackend};
///
/// let manager = HotkeyManager::new(Arc::new(ManualBackend::new())).unwrap();
/// let id = manager
///     .register(None, "Ctrl + Shift + A", HotkeyCallback::from_fn(|| println!("hit")))
///     .unwrap();
/// assert_eq!(id, "hk_1");
/// manager.start(false).unwrap();
/// assert!(manager.is_running());
/// ```
pub struct HotkeyManager<B: HookBackend> {
    registry: Arc<HotkeyRegistry>,
    tracker: Arc<Mutex<InputTracker>>,
    events: mpsc::UnboundedSender<WorkerMessage>,
    lifecycle: HookLifecycle<B>,
    runtime: Option<Runtime>,
    disposed: AtomicBool,
}

impl<B: HookBackend> HotkeyManager<B> {
    /// Create a manager with default options and its own worker runtime
    pub fn new(backend: Arc<B>) -> HotkeyResult<Self> {
        Self::with_options(backend, ManagerOptions::default())
    }

    /// Create a manager that builds its own multi-threaded worker runtime
    pub fn with_options(backend: Arc<B>, options: ManagerOptions) -> HotkeyResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(options.worker_threads.max(1))
            .thread_name(WORKER_THREAD_NAME)
            .enable_time()
            .build()
            .map_err(HotkeyError::Runtime)?;
        let handle = runtime.handle().clone();
        Ok(Self::build(backend, &handle, &options, Some(runtime)))
    }

    /// Create a manager whose matching and callbacks run on an existing runtime
    pub fn with_handle(backend: Arc<B>, handle: Handle, options: ManagerOptions) -> Self {
        Self::build(backend, &handle, &options, None)
    }

    fn build(
        backend: Arc<B>,
        handle: &Handle,
        options: &ManagerOptions,
        runtime: Option<Runtime>,
    ) -> Self {
        let registry = Arc::new(HotkeyRegistry::new());
        let tracker = Arc::new(Mutex::new(InputTracker::new()));
        let (tx, rx) = mpsc::unbounded_channel();

        handle.spawn(run_worker(Arc::clone(&registry), rx));

        let proc = hook_proc(Arc::clone(&tracker), tx.clone());
        let lifecycle = HookLifecycle::new(backend, Arc::clone(&proc), proc)
            .with_stop_timeout(options.stop_timeout);

        Self {
            registry,
            tracker,
            events: tx,
            lifecycle,
            runtime,
            disposed: AtomicBool::new(false),
        }
    }

    fn ensure_live(&self) -> HotkeyResult<()> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(HotkeyError::AlreadyDisposed);
        }
        Ok(())
    }

    /// Register a binding and return its id.
    ///
    /// The combination is fully validated here. Without an id one is
    /// generated (`"hk_1"`, `"hk_2"`, ...). An existing id is replaced.
    pub fn register(
        &self,
        id: Option<&str>,
        combination: impl IntoCombination,
        callback: HotkeyCallback,
    ) -> HotkeyResult<String> {
        self.ensure_live()?;
        let combination = combination.into_combination()?;
        Ok(self.registry.register(id, combination, callback))
    }

    /// Remove a binding. Unknown ids are a no-op; returns whether one existed.
    pub fn unregister(&self, id: &str) -> bool {
        self.registry.unregister(id)
    }

    /// Replace the combination of a binding. Unknown ids are a no-op.
    pub fn change_combination(&self, id: &str, combination: impl IntoCombination) -> HotkeyResult<bool> {
        self.ensure_live()?;
        let combination = combination.into_combination()?;
        Ok(self.registry.change_combination(id, combination))
    }

    /// Replace the callback of a binding. Unknown ids are a no-op.
    pub fn change_callback(&self, id: &str, callback: HotkeyCallback) -> HotkeyResult<bool> {
        self.ensure_live()?;
        Ok(self.registry.change_callback(id, callback))
    }

    /// All bindings in registration order
    pub fn list_bindings(&self) -> Vec<HotkeyBinding> {
        self.registry.bindings()
    }

    pub fn binding(&self, id: &str) -> Option<HotkeyBinding> {
        self.registry.get(id)
    }

    /// Install the keyboard and mouse hooks.
    ///
    /// Pass `true` when the host has no message loop of its own; a dedicated
    /// thread then pumps messages until [`HotkeyManager::stop`].
    pub fn start(&self, run_own_message_loop: bool) -> HotkeyResult<()> {
        self.ensure_live()?;
        self.lifecycle.start(run_own_message_loop)
    }

    /// Uninstall the hooks and forget held keys and armed bindings.
    ///
    /// Events already handed off are still matched; dispatched callbacks
    /// are not cancelled. Whatever they arm is dropped again once the worker
    /// reaches the stop, so the next run starts with nothing armed.
    pub fn stop(&self) {
        self.lifecycle.stop();
        self.reset_input_state();
    }

    fn reset_input_state(&self) {
        let mut tracker = self.tracker.lock();
        tracker.clear();
        self.registry.reset_armed();
        // Queued behind any events still in flight
        if self.events.send(WorkerMessage::Reset).is_err() {
            log::debug!("hotkey worker is gone, armed state already dropped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Keys currently held, as last reported by the hooks
    pub fn pressed_keys(&self) -> PressedKeys {
        self.tracker.lock().snapshot()
    }

    /// Whether a binding has fired and awaits release of its keys
    pub fn is_armed(&self, id: &str) -> bool {
        self.registry.is_armed(id)
    }

    pub fn backend(&self) -> &Arc<B> {
        self.lifecycle.backend()
    }

    /// Stop for good; later `start`/`register`/`change_*` fail with
    /// [`HotkeyError::AlreadyDisposed`]
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.lifecycle.dispose();
        self.reset_input_state();
        log::debug!("hotkey manager disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl<B: HookBackend> Drop for HotkeyManager<B> {
    fn drop(&mut self) {
        self.dispose();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(feature = "evdev")]
impl HotkeyManager<crate::backend::EvdevBackend> {
    /// Create an evdev-backed manager from loaded settings
    pub fn from_settings(settings: &crate::Settings) -> HotkeyResult<Self> {
        let backend = Arc::new(crate::backend::EvdevBackend::new(settings.evdev.clone()));
        Self::with_options(backend, settings.manager.clone())
    }
}
