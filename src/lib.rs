// Globalhotkeys
// System-wide hotkeys with async callbacks

pub mod backend;
pub mod manager;
pub mod settings;

pub use globalhotkeys_core::{
    CallbackFuture, Combination, HookBackend, HookKind, HookProc, HotkeyBinding, HotkeyCallback,
    HotkeyError, HotkeyResult, InstallError, IntoCombination, KeyAction, LifecycleState,
    ManualBackend, Modifier, PressedKeys, QuitSignal, Stroke, VirtualKey,
};
pub use manager::HotkeyManager;
pub use settings::{EvdevOptions, ManagerOptions, Settings, SettingsError};

#[cfg(feature = "evdev")]
pub use backend::{EvdevBackend, EvdevHandle};
