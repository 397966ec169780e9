// Globalhotkeys Combination
// Canonical, deduplicated stroke set defining one hotkey

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::modifier::keys_match;
use crate::state::PressedKeys;
use crate::{HotkeyError, KeyAction, Stroke, VirtualKey};

/// A hotkey's full trigger condition.
///
/// Construction drops sentinel strokes, removes duplicate `(key, action)`
/// pairs and sorts by key code then action. Equality, hashing and display
/// all work on that canonical form, so `"a+Ctrl"` and `"CTRL + A"` are the
/// same combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Combination {
    strokes: SmallVec<[Stroke; 4]>,
    has_up_trigger: bool,
}

impl Combination {
    /// Build a combination from strokes in any order
    pub fn new(strokes: impl IntoIterator<Item = Stroke>) -> Self {
        let mut strokes: SmallVec<[Stroke; 4]> = strokes
            .into_iter()
            .filter(|stroke| !stroke.key.is_none())
            .collect();
        strokes.sort();
        strokes.dedup();

        let has_up_trigger = strokes.iter().any(|stroke| stroke.action.is_up());
        Self {
            strokes,
            has_up_trigger,
        }
    }

    /// Parse a `+`-separated combination string such as `"Ctrl + Shift + A Up"`
    ///
    /// # Examples
    /// ```
    /// use globalhotkeys_core::Combination;
    /// let combo = Combination::parse("a + ctrl").unwrap();
    /// assert_eq!(combo.to_string(), "Control + A");
    /// assert!(!combo.has_up_trigger());
    /// ```
    pub fn parse(exp: &str) -> Result<Self, HotkeyError> {
        let trimmed = exp.trim();
        if trimmed.is_empty() {
            return Err(HotkeyError::InvalidCombinationSyntax(
                "combination string cannot be empty".to_string(),
            ));
        }

        let mut strokes = SmallVec::<[Stroke; 4]>::new();
        for segment in trimmed.split('+') {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(HotkeyError::InvalidCombinationSyntax(format!(
                    "empty segment in '{}'",
                    trimmed
                )));
            }
            strokes.push(Stroke::parse(segment)?);
        }

        Ok(Self::new(strokes))
    }

    /// Canonical strokes
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// An empty combination is legal but never matches
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// True if any stroke triggers on release
    pub fn has_up_trigger(&self) -> bool {
        self.has_up_trigger
    }

    /// Distinct keys of this combination, in canonical order.
    ///
    /// This is what gets recorded as the armed set when the combination fires.
    pub fn keys(&self) -> SmallVec<[VirtualKey; 4]> {
        let mut keys: SmallVec<[VirtualKey; 4]> =
            self.strokes.iter().map(|stroke| stroke.key).collect();
        keys.dedup();
        keys
    }

    /// Check whether an incoming event satisfies this combination.
    ///
    /// Release events only concern combinations with an `Up` stroke; press
    /// events only concern combinations without one. An `Up` stroke requires
    /// the current event to be the release of that key; any other stroke
    /// requires its key to be held. Generic modifiers match their sided
    /// variants in both checks.
    ///
    /// Arming is not considered here; see the registry.
    pub fn matches(&self, current: Stroke, pressed: &PressedKeys) -> bool {
        if self.strokes.is_empty() {
            return false;
        }
        if current.action.is_up() != self.has_up_trigger {
            return false;
        }

        self.strokes.iter().all(|stroke| match stroke.action {
            KeyAction::Up => current.action.is_up() && keys_match(stroke.key, current.key),
            KeyAction::Down | KeyAction::Press => pressed.contains_equivalent(stroke.key),
        })
    }
}

impl FromStr for Combination {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Combination::parse(s)
    }
}

impl From<Stroke> for Combination {
    fn from(stroke: Stroke) -> Self {
        Combination::new([stroke])
    }
}

impl FromIterator<Stroke> for Combination {
    fn from_iter<I: IntoIterator<Item = Stroke>>(iter: I) -> Self {
        Combination::new(iter)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.strokes.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join(" + "))
    }
}

/// Anything a binding's trigger can be built from.
///
/// Strings are parsed; stroke lists and ready combinations are taken as is.
pub trait IntoCombination {
    fn into_combination(self) -> Result<Combination, HotkeyError>;
}

impl IntoCombination for Combination {
    fn into_combination(self) -> Result<Combination, HotkeyError> {
        Ok(self)
    }
}

impl IntoCombination for &str {
    fn into_combination(self) -> Result<Combination, HotkeyError> {
        Combination::parse(self)
    }
}

impl IntoCombination for String {
    fn into_combination(self) -> Result<Combination, HotkeyError> {
        Combination::parse(&self)
    }
}

impl IntoCombination for &String {
    fn into_combination(self) -> Result<Combination, HotkeyError> {
        Combination::parse(self)
    }
}

impl IntoCombination for Vec<Stroke> {
    fn into_combination(self) -> Result<Combination, HotkeyError> {
        Ok(Combination::new(self))
    }
}

impl IntoCombination for &[Stroke] {
    fn into_combination(self) -> Result<Combination, HotkeyError> {
        Ok(Combination::new(self.iter().copied()))
    }
}

impl<const N: usize> IntoCombination for [Stroke; N] {
    fn into_combination(self) -> Result<Combination, HotkeyError> {
        Ok(Combination::new(self))
    }
}
