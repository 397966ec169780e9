// Globalhotkeys Virtual Key Space
// Closed set of keyboard keys and mouse buttons with stable numeric codes

use std::cmp::Ordering;
use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, FromRepr};

/// One physical or logical input source.
///
/// The numeric values follow the Windows virtual-key numbering; backends on
/// other platforms translate their native codes into it. Generic modifiers (`Shift`, `Control`, `Alt`, `Win`) sit next to
/// their left/right variants; see [`crate::modifier`] for how they relate.
///
/// Parsing is case-insensitive and accepts the listed aliases
/// (`"ctrl"`, `"esc"`, `"left"`, `"num5"`, ...). Display always produces the
/// canonical name, which parses back to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, FromRepr)]
#[strum(ascii_case_insensitive)]
#[repr(u16)]
pub enum VirtualKey {
    /// Sentinel for "no key". Never a valid binding key.
    None = 0x00,

    // Mouse buttons
    LButton = 0x01,
    RButton = 0x02,
    Cancel = 0x03,
    MButton = 0x04,
    XButton1 = 0x05,
    XButton2 = 0x06,

    /// Generic Windows/Super key. The platform only reports the left and
    /// right keys, so this code is not produced by any device.
    #[strum(to_string = "Win", serialize = "Super", serialize = "Meta")]
    Win = 0x07,

    Backspace = 0x08,
    Tab = 0x09,
    Clear = 0x0C,
    Enter = 0x0D,

    Shift = 0x10,
    #[strum(to_string = "Control", serialize = "Ctrl")]
    Control = 0x11,
    Alt = 0x12,

    Pause = 0x13,
    CapsLock = 0x14,
    #[strum(to_string = "Escape", serialize = "Esc")]
    Escape = 0x1B,
    Space = 0x20,
    PageUp = 0x21,
    PageDown = 0x22,
    End = 0x23,
    Home = 0x24,
    #[strum(to_string = "ArrowLeft", serialize = "Left")]
    ArrowLeft = 0x25,
    #[strum(to_string = "ArrowUp", serialize = "Up")]
    ArrowUp = 0x26,
    #[strum(to_string = "ArrowRight", serialize = "Right")]
    ArrowRight = 0x27,
    #[strum(to_string = "ArrowDown", serialize = "Down")]
    ArrowDown = 0x28,
    Select = 0x29,
    Print = 0x2A,
    Execute = 0x2B,
    PrintScreen = 0x2C,
    Insert = 0x2D,
    Delete = 0x2E,
    Help = 0x2F,

    // Top-row digits
    D0 = 0x30,
    D1 = 0x31,
    D2 = 0x32,
    D3 = 0x33,
    D4 = 0x34,
    D5 = 0x35,
    D6 = 0x36,
    D7 = 0x37,
    D8 = 0x38,
    D9 = 0x39,

    A = 0x41,
    B = 0x42,
    C = 0x43,
    D = 0x44,
    E = 0x45,
    F = 0x46,
    G = 0x47,
    H = 0x48,
    I = 0x49,
    J = 0x4A,
    K = 0x4B,
    L = 0x4C,
    M = 0x4D,
    N = 0x4E,
    O = 0x4F,
    P = 0x50,
    Q = 0x51,
    R = 0x52,
    S = 0x53,
    T = 0x54,
    U = 0x55,
    V = 0x56,
    W = 0x57,
    X = 0x58,
    Y = 0x59,
    Z = 0x5A,

    LWin = 0x5B,
    RWin = 0x5C,
    Apps = 0x5D,

    #[strum(to_string = "NumPad0", serialize = "Num0")]
    NumPad0 = 0x60,
    #[strum(to_string = "NumPad1", serialize = "Num1")]
    NumPad1 = 0x61,
    #[strum(to_string = "NumPad2", serialize = "Num2")]
    NumPad2 = 0x62,
    #[strum(to_string = "NumPad3", serialize = "Num3")]
    NumPad3 = 0x63,
    #[strum(to_string = "NumPad4", serialize = "Num4")]
    NumPad4 = 0x64,
    #[strum(to_string = "NumPad5", serialize = "Num5")]
    NumPad5 = 0x65,
    #[strum(to_string = "NumPad6", serialize = "Num6")]
    NumPad6 = 0x66,
    #[strum(to_string = "NumPad7", serialize = "Num7")]
    NumPad7 = 0x67,
    #[strum(to_string = "NumPad8", serialize = "Num8")]
    NumPad8 = 0x68,
    #[strum(to_string = "NumPad9", serialize = "Num9")]
    NumPad9 = 0x69,
    #[strum(to_string = "NumPadMultiply", serialize = "Multiply")]
    NumPadMultiply = 0x6A,
    #[strum(to_string = "NumPadAdd", serialize = "Add")]
    NumPadAdd = 0x6B,
    #[strum(to_string = "NumPadSeparator", serialize = "Separator")]
    NumPadSeparator = 0x6C,
    #[strum(to_string = "NumPadSubtract", serialize = "Subtract")]
    NumPadSubtract = 0x6D,
    #[strum(to_string = "NumPadDecimal", serialize = "Decimal")]
    NumPadDecimal = 0x6E,
    #[strum(to_string = "NumPadDivide", serialize = "Divide")]
    NumPadDivide = 0x6F,

    F1 = 0x70,
    F2 = 0x71,
    F3 = 0x72,
    F4 = 0x73,
    F5 = 0x74,
    F6 = 0x75,
    F7 = 0x76,
    F8 = 0x77,
    F9 = 0x78,
    F10 = 0x79,
    F11 = 0x7A,
    F12 = 0x7B,
    F13 = 0x7C,
    F14 = 0x7D,
    F15 = 0x7E,
    F16 = 0x7F,
    F17 = 0x80,
    F18 = 0x81,
    F19 = 0x82,
    F20 = 0x83,
    F21 = 0x84,
    F22 = 0x85,
    F23 = 0x86,
    F24 = 0x87,

    NumLock = 0x90,
    ScrollLock = 0x91,

    LShift = 0xA0,
    RShift = 0xA1,
    #[strum(to_string = "LControl", serialize = "LCtrl")]
    LControl = 0xA2,
    #[strum(to_string = "RControl", serialize = "RCtrl")]
    RControl = 0xA3,
    LAlt = 0xA4,
    RAlt = 0xA5,

    // Browser and media keys
    BrowserBack = 0xA6,
    BrowserForward = 0xA7,
    BrowserRefresh = 0xA8,
    BrowserStop = 0xA9,
    BrowserSearch = 0xAA,
    BrowserFavorites = 0xAB,
    BrowserHome = 0xAC,
    VolumeMute = 0xAD,
    VolumeDown = 0xAE,
    VolumeUp = 0xAF,
    MediaNext = 0xB0,
    MediaPrev = 0xB1,
    MediaStop = 0xB2,
    MediaPlayPause = 0xB3,
    LaunchMail = 0xB4,
    LaunchMediaSelect = 0xB5,
    LaunchApp1 = 0xB6,
    LaunchApp2 = 0xB7,

    // OEM punctuation
    Semicolon = 0xBA,
    Equal = 0xBB,
    Comma = 0xBC,
    Minus = 0xBD,
    Period = 0xBE,
    Slash = 0xBF,
    Backtick = 0xC0,
    OpenBracket = 0xDB,
    Backslash = 0xDC,
    CloseBracket = 0xDD,
    Quote = 0xDE,
}

impl VirtualKey {
    /// Get the raw numeric code value
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up a key by its numeric code
    pub fn from_code(code: u16) -> Option<Self> {
        Self::from_repr(code)
    }

    /// Returns true for the sentinel "no key" value
    pub fn is_none(self) -> bool {
        self == VirtualKey::None
    }

    /// Returns true if this key is a mouse button rather than a keyboard key
    pub fn is_mouse_button(self) -> bool {
        matches!(
            self,
            VirtualKey::LButton
                | VirtualKey::RButton
                | VirtualKey::MButton
                | VirtualKey::XButton1
                | VirtualKey::XButton2
        )
    }

    /// Resolve a user-supplied token to a key.
    ///
    /// Resolution order: symbolic name (case-insensitive, sentinel rejected),
    /// then the punctuation/digit alias table, then a single ASCII letter or
    /// digit.
    pub fn from_token(token: &str) -> Option<Self> {
        key_from_name(token)
            .or_else(|| key_from_alias(token))
            .or_else(|| {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => key_from_char(c),
                    _ => None,
                }
            })
    }

    /// Iterate over every key except the sentinel
    pub fn all() -> impl Iterator<Item = VirtualKey> {
        Self::iter().filter(|k| !k.is_none())
    }
}

impl PartialOrd for VirtualKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VirtualKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(&other.code())
    }
}

impl From<VirtualKey> for u16 {
    fn from(key: VirtualKey) -> Self {
        key.code()
    }
}

/// Try to parse a symbolic key name (case-insensitive)
///
/// The sentinel `None` is rejected so it can never end up in a binding.
pub fn key_from_name(name: &str) -> Option<VirtualKey> {
    match VirtualKey::from_str(name) {
        Ok(VirtualKey::None) | Err(_) => None,
        Ok(key) => Some(key),
    }
}

/// Punctuation and digit alias table
pub fn key_from_alias(token: &str) -> Option<VirtualKey> {
    let key = match token {
        "0" => VirtualKey::D0,
        "1" => VirtualKey::D1,
        "2" => VirtualKey::D2,
        "3" => VirtualKey::D3,
        "4" => VirtualKey::D4,
        "5" => VirtualKey::D5,
        "6" => VirtualKey::D6,
        "7" => VirtualKey::D7,
        "8" => VirtualKey::D8,
        "9" => VirtualKey::D9,
        ";" => VirtualKey::Semicolon,
        "=" => VirtualKey::Equal,
        "," => VirtualKey::Comma,
        "-" => VirtualKey::Minus,
        "." => VirtualKey::Period,
        "/" => VirtualKey::Slash,
        "`" => VirtualKey::Backtick,
        "[" => VirtualKey::OpenBracket,
        "\\" => VirtualKey::Backslash,
        "]" => VirtualKey::CloseBracket,
        "'" => VirtualKey::Quote,
        _ => return None,
    };
    Some(key)
}

/// Single ASCII character to key: digits to the top-row digit keys, letters
/// to the letter keys.
pub fn key_from_char(c: char) -> Option<VirtualKey> {
    if c.is_ascii_digit() {
        VirtualKey::from_code(VirtualKey::D0.code() + (c as u16 - '0' as u16))
    } else if c.is_ascii_alphabetic() {
        VirtualKey::from_code(c.to_ascii_uppercase() as u16)
    } else {
        None
    }
}
