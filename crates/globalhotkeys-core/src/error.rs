// Globalhotkeys Errors

use std::fmt;

/// Which system-wide hook a backend is asked to install
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Keyboard,
    Mouse,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Keyboard => write!(f, "keyboard"),
            HookKind::Mouse => write!(f, "mouse"),
        }
    }
}

/// The platform refused to install a hook
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to install {kind} hook: {reason}")]
pub struct InstallError {
    pub kind: HookKind,
    pub reason: String,
}

impl InstallError {
    pub fn new(kind: HookKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result type for hotkey operations
pub type HotkeyResult<T> = Result<T, HotkeyError>;

/// Errors surfaced by registration, parsing and the hook lifecycle
#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("invalid key token: '{0}'")]
    InvalidKeyToken(String),

    #[error("invalid combination syntax: {0}")]
    InvalidCombinationSyntax(String),

    #[error(transparent)]
    HookInstallFailed(#[from] InstallError),

    #[error("hotkey manager has already been disposed")]
    AlreadyDisposed,

    #[error("message loop thread failed: {0}")]
    LoopThread(String),

    #[error("failed to build worker runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_error_display() {
        let err = InstallError::new(HookKind::Mouse, "access denied");
        assert_eq!(err.to_string(), "failed to install mouse hook: access denied");
    }

    #[test]
    fn test_install_error_converts() {
        let err: HotkeyError = InstallError::new(HookKind::Keyboard, "x").into();
        assert!(matches!(err, HotkeyError::HookInstallFailed(_)));
    }
}
