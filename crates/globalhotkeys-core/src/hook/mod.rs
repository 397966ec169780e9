// Globalhotkeys Hook
// Platform boundary and hook lifecycle

mod backend;
mod lifecycle;
mod manual;

pub use backend::{HookBackend, HookProc, QuitSignal};
pub use lifecycle::{HookLifecycle, LifecycleState, DEFAULT_STOP_TIMEOUT};
pub use manual::{ManualBackend, ManualHandle};
