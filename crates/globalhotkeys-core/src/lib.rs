// Globalhotkeys Core Library
// Key model, combination matching and hook lifecycle

pub mod action;
pub mod callback;
pub mod combination;
pub mod error;
pub mod hook;
pub mod key;
pub mod modifier;
pub mod registry;
pub mod state;
pub mod stroke;

pub use action::KeyAction;
pub use callback::{CallbackFuture, HotkeyCallback};
pub use combination::{Combination, IntoCombination};
pub use error::{HookKind, HotkeyError, HotkeyResult, InstallError};
pub use hook::{
    HookBackend, HookLifecycle, HookProc, LifecycleState, ManualBackend, ManualHandle, QuitSignal,
    DEFAULT_STOP_TIMEOUT,
};
pub use key::{key_from_alias, key_from_char, key_from_name, VirtualKey};
pub use modifier::{is_generic_modifier, is_modifier, keys_match, Modifier};
pub use registry::{Dispatch, HotkeyBinding, HotkeyRegistry, AUTO_ID_PREFIX};
pub use state::{InputTracker, PressedKeys};
pub use stroke::Stroke;
