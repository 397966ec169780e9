use std::str::FromStr;

use strum_macros::{Display, EnumString};

/// Represents the key state a stroke refers to.
///
/// `Press` and `Down` both mean "held while the combination is evaluated";
/// `Up` makes the combination trigger on release. Declaration order is the
/// canonical sort order inside a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum KeyAction {
    #[default]
    Press = 0,
    Down = 1,
    Up = 2,
}

impl KeyAction {
    /// Returns true if this is a release
    pub fn is_up(self) -> bool {
        matches!(self, KeyAction::Up)
    }

    /// Resolve an action word.
    ///
    /// The alias table is consulted first (`click` and `press` both mean
    /// [`KeyAction::Press`]), then the action names themselves.
    pub fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("click") || word.eq_ignore_ascii_case("press") {
            return Some(KeyAction::Press);
        }
        KeyAction::from_str(word).ok()
    }
}
