// Globalhotkeys Manual Backend
// In-process backend: the host feeds strokes directly

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use super::backend::{HookBackend, HookProc, QuitSignal};
use crate::{HookKind, InstallError, Stroke};

const LOOP_TICK: Duration = Duration::from_millis(5);

/// Handle for a hook installed on a [`ManualBackend`]
#[derive(Debug, PartialEq, Eq)]
pub struct ManualHandle(u64);

struct Slot {
    id: u64,
    kind: HookKind,
    proc: HookProc,
}

#[derive(Default)]
struct ManualState {
    slots: Vec<Slot>,
    refused: HashSet<HookKind>,
    install_calls: usize,
    uninstall_calls: usize,
    looping: usize,
    quit_delay: Duration,
}

/// Backend with no OS hooks behind it.
///
/// Strokes passed to [`ManualBackend::emit`] reach whichever hook of the
/// matching kind is installed, exactly as a platform hook would deliver
/// them. Useful for headless hosts, replaying recorded input and tests.
#[derive(Default)]
pub struct ManualBackend {
    state: Mutex<ManualState>,
    next_handle: AtomicU64,
}

impl ManualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one stroke to the installed hook(s) of its kind.
    ///
    /// Mouse buttons go to the mouse hook, everything else to the keyboard
    /// hook. Returns false when no such hook is installed.
    pub fn emit(&self, stroke: Stroke) -> bool {
        let kind = if stroke.key.is_mouse_button() {
            HookKind::Mouse
        } else {
            HookKind::Keyboard
        };

        let procs: Vec<HookProc> = self
            .state
            .lock()
            .slots
            .iter()
            .filter(|slot| slot.kind == kind)
            .map(|slot| slot.proc.clone())
            .collect();

        for proc in &procs {
            proc(stroke);
        }
        !procs.is_empty()
    }

    /// Make installs of `kind` fail (or succeed again)
    pub fn fail_install(&self, kind: HookKind, refuse: bool) {
        let mut state = self.state.lock();
        if refuse {
            state.refused.insert(kind);
        } else {
            state.refused.remove(&kind);
        }
    }

    /// Keep a message loop running this long after quit is requested
    pub fn set_quit_delay(&self, delay: Duration) {
        self.state.lock().quit_delay = delay;
    }

    pub fn is_installed(&self, kind: HookKind) -> bool {
        self.state.lock().slots.iter().any(|slot| slot.kind == kind)
    }

    pub fn installed_count(&self) -> usize {
        self.state.lock().slots.len()
    }

    pub fn install_calls(&self) -> usize {
        self.state.lock().install_calls
    }

    pub fn uninstall_calls(&self) -> usize {
        self.state.lock().uninstall_calls
    }

    /// True while some thread is inside `run_message_loop_until_quit`
    pub fn is_looping(&self) -> bool {
        self.state.lock().looping > 0
    }
}

impl HookBackend for ManualBackend {
    type Handle = ManualHandle;

    fn install_hook(&self, kind: HookKind, hook: HookProc) -> Result<ManualHandle, InstallError> {
        let mut state = self.state.lock();
        state.install_calls += 1;
        if state.refused.contains(&kind) {
            return Err(InstallError::new(kind, "refused by manual backend"));
        }

        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        state.slots.push(Slot {
            id,
            kind,
            proc: hook,
        });
        log::debug!("manual {} hook {} installed", kind, id);
        Ok(ManualHandle(id))
    }

    fn uninstall_hook(&self, handle: ManualHandle) {
        let mut state = self.state.lock();
        state.uninstall_calls += 1;
        state.slots.retain(|slot| slot.id != handle.0);
    }

    fn run_message_loop_until_quit(&self, quit: &QuitSignal) {
        self.state.lock().looping += 1;
        while !quit.is_raised() {
            thread::sleep(LOOP_TICK);
        }

        let delay = self.state.lock().quit_delay;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.state.lock().looping -= 1;
    }
}
