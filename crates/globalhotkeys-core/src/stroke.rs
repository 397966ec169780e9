// Globalhotkeys Stroke
// One key at one action, plus the token parser ("A", "ctrl", "A Up")

use std::fmt;
use std::str::FromStr;

use crate::{HotkeyError, KeyAction, VirtualKey};

/// A single `(key, action)` unit of a hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Stroke {
    // Field order gives the canonical (key, action) ordering
    pub key: VirtualKey,
    pub action: KeyAction,
}

impl Stroke {
    pub fn new(key: VirtualKey, action: KeyAction) -> Self {
        Self { key, action }
    }

    /// Stroke with the default `Press` action
    pub fn press(key: VirtualKey) -> Self {
        Self::new(key, KeyAction::Press)
    }

    pub fn down(key: VirtualKey) -> Self {
        Self::new(key, KeyAction::Down)
    }

    pub fn up(key: VirtualKey) -> Self {
        Self::new(key, KeyAction::Up)
    }

    /// Parse one token: a key name optionally followed by an action word
    ///
    /// # Examples
    /// ```
    /// use globalhotkeys_core::{KeyAction, Stroke, VirtualKey};
    /// let stroke = Stroke::parse("a up").unwrap();
    /// assert_eq!(stroke, Stroke::new(VirtualKey::A, KeyAction::Up));
    /// ```
    pub fn parse(token: &str) -> Result<Self, HotkeyError> {
        let mut words = token.split_whitespace();
        let key_word = words.next().ok_or_else(|| {
            HotkeyError::InvalidCombinationSyntax("empty key token".to_string())
        })?;
        let action_word = words.next();
        if words.next().is_some() {
            return Err(HotkeyError::InvalidCombinationSyntax(format!(
                "too many words in '{}'",
                token.trim()
            )));
        }

        let key = VirtualKey::from_token(key_word)
            .ok_or_else(|| HotkeyError::InvalidKeyToken(key_word.to_string()))?;

        let action = match action_word {
            None => KeyAction::Press,
            Some(word) => KeyAction::from_word(word).ok_or_else(|| {
                HotkeyError::InvalidCombinationSyntax(format!("unknown action '{}'", word))
            })?,
        };

        Ok(Self { key, action })
    }
}

impl From<VirtualKey> for Stroke {
    fn from(key: VirtualKey) -> Self {
        Stroke::press(key)
    }
}

impl FromStr for Stroke {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stroke::parse(s)
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            KeyAction::Press => write!(f, "{}", self.key),
            action => write!(f, "{} {}", self.key, action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_only_defaults_to_press() {
        assert_eq!(Stroke::parse("a").unwrap(), Stroke::press(VirtualKey::A));
        assert_eq!(Stroke::parse("  Enter ").unwrap(), Stroke::press(VirtualKey::Enter));
    }

    #[test]
    fn test_parse_with_action() {
        assert_eq!(Stroke::parse("A Up").unwrap(), Stroke::up(VirtualKey::A));
        assert_eq!(Stroke::parse("d down").unwrap(), Stroke::down(VirtualKey::D));
        assert_eq!(Stroke::parse("LButton click").unwrap(), Stroke::press(VirtualKey::LButton));
    }

    #[test]
    fn test_parse_arrow_key_named_up() {
        // The first word is always the key
        assert_eq!(Stroke::parse("Up").unwrap(), Stroke::press(VirtualKey::ArrowUp));
        assert_eq!(Stroke::parse("Up Up").unwrap(), Stroke::up(VirtualKey::ArrowUp));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Stroke::parse(";").unwrap(), Stroke::press(VirtualKey::Semicolon));
        assert_eq!(Stroke::parse("0 down").unwrap(), Stroke::down(VirtualKey::D0));
    }

    #[test]
    fn test_parse_unknown_key() {
        assert!(matches!(
            Stroke::parse("Banana"),
            Err(HotkeyError::InvalidKeyToken(t)) if t == "Banana"
        ));
        assert!(matches!(Stroke::parse("None"), Err(HotkeyError::InvalidKeyToken(_))));
    }

    #[test]
    fn test_parse_syntax_errors() {
        assert!(matches!(Stroke::parse("   "), Err(HotkeyError::InvalidCombinationSyntax(_))));
        assert!(matches!(
            Stroke::parse("A Up Down"),
            Err(HotkeyError::InvalidCombinationSyntax(_))
        ));
        assert!(matches!(
            Stroke::parse("A hold"),
            Err(HotkeyError::InvalidCombinationSyntax(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Stroke::press(VirtualKey::A).to_string(), "A");
        assert_eq!(Stroke::up(VirtualKey::A).to_string(), "A Up");
        assert_eq!(Stroke::down(VirtualKey::Control).to_string(), "Control Down");
    }

    #[test]
    fn test_display_parses_back() {
        for stroke in [
            Stroke::press(VirtualKey::F12),
            Stroke::down(VirtualKey::NumPad3),
            Stroke::up(VirtualKey::ArrowUp),
        ] {
            assert_eq!(stroke.to_string().parse::<Stroke>().unwrap(), stroke);
        }
    }
}
