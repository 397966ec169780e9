// Globalhotkeys Modifier Equivalence
// Generic modifiers (Ctrl, Shift, Alt, Win) and their left/right variants

use std::fmt;

use crate::VirtualKey;

/// A modifier family: one generic key plus its physical left/right keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Control,
    Shift,
    Alt,
    Win,
}

/// Static table of modifier families: (family, generic, left, right)
///
/// Lookups run on every hook event, so this stays a plain array scan
/// without locks or allocation.
const MODIFIER_GROUPS: &[(Modifier, VirtualKey, VirtualKey, VirtualKey)] = &[
    (
        Modifier::Control,
        VirtualKey::Control,
        VirtualKey::LControl,
        VirtualKey::RControl,
    ),
    (
        Modifier::Shift,
        VirtualKey::Shift,
        VirtualKey::LShift,
        VirtualKey::RShift,
    ),
    (Modifier::Alt, VirtualKey::Alt, VirtualKey::LAlt, VirtualKey::RAlt),
    (Modifier::Win, VirtualKey::Win, VirtualKey::LWin, VirtualKey::RWin),
];

impl Modifier {
    /// Get the modifier family a key belongs to, if any
    pub fn from_key(key: VirtualKey) -> Option<Modifier> {
        MODIFIER_GROUPS
            .iter()
            .find(|(_, generic, left, right)| key == *generic || key == *left || key == *right)
            .map(|(modifier, ..)| *modifier)
    }

    /// Generic key of this family
    pub fn generic(self) -> VirtualKey {
        self.group().1
    }

    /// Left physical key of this family
    pub fn left(self) -> VirtualKey {
        self.group().2
    }

    /// Right physical key of this family
    pub fn right(self) -> VirtualKey {
        self.group().3
    }

    // MODIFIER_GROUPS is laid out in declaration order
    fn group(self) -> (Modifier, VirtualKey, VirtualKey, VirtualKey) {
        MODIFIER_GROUPS[self as usize]
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generic())
    }
}

/// Check if a key is any modifier key (generic or sided)
pub fn is_modifier(key: VirtualKey) -> bool {
    Modifier::from_key(key).is_some()
}

/// Check if a key is one of the generic modifier keys
pub fn is_generic_modifier(key: VirtualKey) -> bool {
    Modifier::from_key(key).is_some_and(|m| m.generic() == key)
}

/// Check whether two keys are interchangeable for matching.
///
/// Identical keys always match. A generic modifier matches either of its
/// physical variants, in both directions. The two physical variants do not
/// match each other: a binding on `LControl` is not satisfied by `RControl`.
pub fn keys_match(a: VirtualKey, b: VirtualKey) -> bool {
    if a == b {
        return true;
    }
    match (Modifier::from_key(a), Modifier::from_key(b)) {
        (Some(ma), Some(mb)) if ma == mb => is_generic_modifier(a) || is_generic_modifier(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_from_key() {
        assert_eq!(Modifier::from_key(VirtualKey::LControl), Some(Modifier::Control));
        assert_eq!(Modifier::from_key(VirtualKey::Control), Some(Modifier::Control));
        assert_eq!(Modifier::from_key(VirtualKey::RWin), Some(Modifier::Win));
        assert_eq!(Modifier::from_key(VirtualKey::A), None);
    }

    #[test]
    fn test_modifier_variants() {
        assert_eq!(Modifier::Shift.generic(), VirtualKey::Shift);
        assert_eq!(Modifier::Shift.left(), VirtualKey::LShift);
        assert_eq!(Modifier::Shift.right(), VirtualKey::RShift);
        assert_eq!(Modifier::Alt.to_string(), "Alt");
    }

    #[test]
    fn test_generic_matches_sided_both_directions() {
        assert!(keys_match(VirtualKey::Control, VirtualKey::LControl));
        assert!(keys_match(VirtualKey::RControl, VirtualKey::Control));
        assert!(keys_match(VirtualKey::Win, VirtualKey::LWin));
        assert!(keys_match(VirtualKey::RAlt, VirtualKey::Alt));
    }

    #[test]
    fn test_sided_variants_do_not_match_each_other() {
        assert!(!keys_match(VirtualKey::LControl, VirtualKey::RControl));
        assert!(!keys_match(VirtualKey::LShift, VirtualKey::RShift));
    }

    #[test]
    fn test_cross_family_never_matches() {
        assert!(!keys_match(VirtualKey::Control, VirtualKey::LShift));
        assert!(!keys_match(VirtualKey::A, VirtualKey::B));
        assert!(keys_match(VirtualKey::A, VirtualKey::A));
    }

    #[test]
    fn test_is_modifier() {
        assert!(is_modifier(VirtualKey::LAlt));
        assert!(is_generic_modifier(VirtualKey::Alt));
        assert!(!is_generic_modifier(VirtualKey::LAlt));
        assert!(!is_modifier(VirtualKey::Space));
    }
}
