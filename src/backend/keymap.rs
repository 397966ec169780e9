// Globalhotkeys Linux Key Map
// Translates Linux input-event-codes.h key and button codes to virtual keys

use globalhotkeys_core::{KeyAction, Stroke, VirtualKey};

/// BTN_LEFT; a device reporting it is treated as a pointer
pub const BTN_LEFT: u16 = 0x110;
pub const BTN_RIGHT: u16 = 0x111;
pub const BTN_MIDDLE: u16 = 0x112;
pub const BTN_SIDE: u16 = 0x113;
pub const BTN_EXTRA: u16 = 0x114;

/// Map a Linux key/button code to a virtual key.
///
/// Codes without a counterpart in the virtual key space return `None`
/// and are ignored by the hooks.
pub fn virtual_key_from_linux(code: u16) -> Option<VirtualKey> {
    use VirtualKey as K;

    let key = match code {
        1 => K::Escape,
        2 => K::D1,
        3 => K::D2,
        4 => K::D3,
        5 => K::D4,
        6 => K::D5,
        7 => K::D6,
        8 => K::D7,
        9 => K::D8,
        10 => K::D9,
        11 => K::D0,
        12 => K::Minus,
        13 => K::Equal,
        14 => K::Backspace,
        15 => K::Tab,
        16 => K::Q,
        17 => K::W,
        18 => K::E,
        19 => K::R,
        20 => K::T,
        21 => K::Y,
        22 => K::U,
        23 => K::I,
        24 => K::O,
        25 => K::P,
        26 => K::OpenBracket,
        27 => K::CloseBracket,
        28 => K::Enter,
        29 => K::LControl,
        30 => K::A,
        31 => K::S,
        32 => K::D,
        33 => K::F,
        34 => K::G,
        35 => K::H,
        36 => K::J,
        37 => K::K,
        38 => K::L,
        39 => K::Semicolon,
        40 => K::Quote,
        41 => K::Backtick,
        42 => K::LShift,
        43 => K::Backslash,
        44 => K::Z,
        45 => K::X,
        46 => K::C,
        47 => K::V,
        48 => K::B,
        49 => K::N,
        50 => K::M,
        51 => K::Comma,
        52 => K::Period,
        53 => K::Slash,
        54 => K::RShift,
        55 => K::NumPadMultiply,
        56 => K::LAlt,
        57 => K::Space,
        58 => K::CapsLock,
        59 => K::F1,
        60 => K::F2,
        61 => K::F3,
        62 => K::F4,
        63 => K::F5,
        64 => K::F6,
        65 => K::F7,
        66 => K::F8,
        67 => K::F9,
        68 => K::F10,
        69 => K::NumLock,
        70 => K::ScrollLock,
        71 => K::NumPad7,
        72 => K::NumPad8,
        73 => K::NumPad9,
        74 => K::NumPadSubtract,
        75 => K::NumPad4,
        76 => K::NumPad5,
        77 => K::NumPad6,
        78 => K::NumPadAdd,
        79 => K::NumPad1,
        80 => K::NumPad2,
        81 => K::NumPad3,
        82 => K::NumPad0,
        83 => K::NumPadDecimal,
        87 => K::F11,
        88 => K::F12,
        // KP_ENTER reports as Enter, like the platform hook does
        96 => K::Enter,
        97 => K::RControl,
        98 => K::NumPadDivide,
        99 => K::PrintScreen,
        100 => K::RAlt,
        102 => K::Home,
        103 => K::ArrowUp,
        104 => K::PageUp,
        105 => K::ArrowLeft,
        106 => K::ArrowRight,
        107 => K::End,
        108 => K::ArrowDown,
        109 => K::PageDown,
        110 => K::Insert,
        111 => K::Delete,
        113 => K::VolumeMute,
        114 => K::VolumeDown,
        115 => K::VolumeUp,
        119 => K::Pause,
        121 => K::NumPadSeparator,
        125 => K::LWin,
        126 => K::RWin,
        127 => K::Apps,
        128 => K::BrowserStop,
        138 => K::Help,
        140 => K::LaunchApp2,
        155 => K::LaunchMail,
        156 => K::BrowserFavorites,
        157 => K::LaunchApp1,
        158 => K::BrowserBack,
        159 => K::BrowserForward,
        163 => K::MediaNext,
        164 => K::MediaPlayPause,
        165 => K::MediaPrev,
        166 => K::MediaStop,
        172 => K::BrowserHome,
        173 => K::BrowserRefresh,
        183 => K::F13,
        184 => K::F14,
        185 => K::F15,
        186 => K::F16,
        187 => K::F17,
        188 => K::F18,
        189 => K::F19,
        190 => K::F20,
        191 => K::F21,
        192 => K::F22,
        193 => K::F23,
        194 => K::F24,
        210 => K::Print,
        217 => K::BrowserSearch,
        223 => K::Cancel,
        226 => K::LaunchMediaSelect,
        0x161 => K::Select,
        0x163 => K::Clear,
        BTN_LEFT => K::LButton,
        BTN_RIGHT => K::RButton,
        BTN_MIDDLE => K::MButton,
        BTN_SIDE => K::XButton1,
        BTN_EXTRA => K::XButton2,
        _ => return None,
    };
    Some(key)
}

/// True for the pointer button codes the mouse hook reports
pub fn is_mouse_button_code(code: u16) -> bool {
    (BTN_LEFT..=BTN_EXTRA).contains(&code)
}

/// Translate an EV_KEY event into a hook stroke.
///
/// Value 1 (press) and 2 (autorepeat) are `Down`, 0 is `Up`.
pub fn stroke_from_key_event(code: u16, value: i32) -> Option<Stroke> {
    let key = virtual_key_from_linux(code)?;
    let action = match value {
        0 => KeyAction::Up,
        1 | 2 => KeyAction::Down,
        _ => return None,
    };
    Some(Stroke::new(key, action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_letters_and_modifiers() {
        assert_eq!(virtual_key_from_linux(30), Some(VirtualKey::A));
        assert_eq!(virtual_key_from_linux(44), Some(VirtualKey::Z));
        assert_eq!(virtual_key_from_linux(29), Some(VirtualKey::LControl));
        assert_eq!(virtual_key_from_linux(97), Some(VirtualKey::RControl));
        assert_eq!(virtual_key_from_linux(125), Some(VirtualKey::LWin));
    }

    #[test]
    fn test_digit_row() {
        assert_eq!(virtual_key_from_linux(2), Some(VirtualKey::D1));
        assert_eq!(virtual_key_from_linux(11), Some(VirtualKey::D0));
    }

    #[test]
    fn test_mouse_buttons() {
        assert_eq!(virtual_key_from_linux(BTN_LEFT), Some(VirtualKey::LButton));
        assert_eq!(virtual_key_from_linux(BTN_EXTRA), Some(VirtualKey::XButton2));
        assert!(is_mouse_button_code(BTN_SIDE));
        assert!(!is_mouse_button_code(30));
        for code in BTN_LEFT..=BTN_EXTRA {
            assert!(virtual_key_from_linux(code).map_or(false, |k| k.is_mouse_button()));
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(virtual_key_from_linux(0), None);
        assert_eq!(virtual_key_from_linux(0x2ff), None);
    }

    #[test]
    fn test_no_generic_modifiers_produced() {
        let produced: HashSet<VirtualKey> = (0..0x300).filter_map(virtual_key_from_linux).collect();
        for generic in [
            VirtualKey::Control,
            VirtualKey::Shift,
            VirtualKey::Alt,
            VirtualKey::Win,
        ] {
            assert!(!produced.contains(&generic));
        }
    }

    #[test]
    fn test_event_values() {
        assert_eq!(stroke_from_key_event(30, 1), Some(Stroke::down(VirtualKey::A)));
        assert_eq!(stroke_from_key_event(30, 2), Some(Stroke::down(VirtualKey::A)));
        assert_eq!(stroke_from_key_event(30, 0), Some(Stroke::up(VirtualKey::A)));
        assert_eq!(stroke_from_key_event(30, 7), None);
        assert_eq!(stroke_from_key_event(0, 1), None);
    }
}
