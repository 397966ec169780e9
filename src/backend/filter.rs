// Globalhotkeys Device Filtering
// Which input devices the keyboard and mouse hooks read

use std::collections::HashSet;

use globalhotkeys_core::HookKind;

use super::keymap::BTN_LEFT;

// QWERTY row key codes: Q, W, E, R, T, Y
const QWERTY_CODES: &[u16] = &[16, 17, 18, 19, 20, 21];

// Representative A-Z and SPACE codes for keyboard detection
const A_Z_SPACE_CODES: &[u16] = &[57, 30, 44]; // SPACE, A, Z

/// BUS_VIRTUAL from input.h, reported by most uinput devices
pub const BUS_VIRTUAL: u16 = 0x06;

/// Key capabilities of one evdev device
#[derive(Debug, Clone, Default)]
pub struct DeviceCapabilities {
    /// Whether the device supports EV_KEY events
    pub has_ev_key: bool,
    /// Supported EV_KEY codes
    pub supported_keys: HashSet<u16>,
}

impl DeviceCapabilities {
    pub fn new(has_ev_key: bool, supported_keys: impl IntoIterator<Item = u16>) -> Self {
        Self {
            has_ev_key,
            supported_keys: supported_keys.into_iter().collect(),
        }
    }

    pub fn supports_key(&self, code: u16) -> bool {
        self.supported_keys.contains(&code)
    }
}

/// A device is a keyboard when it reports the QWERTY row plus A, Z and
/// SPACE.
pub fn is_keyboard(caps: &DeviceCapabilities) -> bool {
    if !caps.has_ev_key {
        return false;
    }
    let qwerty_present = QWERTY_CODES.iter().all(|code| caps.supports_key(*code));
    let az_present = A_Z_SPACE_CODES.iter().all(|code| caps.supports_key(*code));
    qwerty_present && az_present
}

/// A device is a pointer when it reports BTN_LEFT
pub fn is_pointer(caps: &DeviceCapabilities) -> bool {
    caps.has_ev_key && caps.supports_key(BTN_LEFT)
}

/// A device is virtual when it sits on the virtual bus or names itself so.
///
/// Remappers re-emit physical input through such devices; reading both
/// would deliver every key twice.
pub fn is_virtual_device(bus_type: u16, name: &str) -> bool {
    bus_type == BUS_VIRTUAL || name.to_ascii_lowercase().contains("(virtual)")
}

/// Decide whether a device feeds the hook of `kind`.
///
/// With explicit `filter_names`, a device is used if its path or name is
/// listed and it has the capability the hook needs, virtual or not.
/// Without, every non-virtual device with that capability is used.
pub fn matches_device_filter(
    kind: HookKind,
    device_name: &str,
    device_path: &str,
    filter_names: &[String],
    is_virtual: bool,
    caps: &DeviceCapabilities,
) -> bool {
    let capable = match kind {
        HookKind::Keyboard => is_keyboard(caps),
        HookKind::Mouse => is_pointer(caps),
    };
    if !capable {
        return false;
    }

    if filter_names.is_empty() {
        return !is_virtual;
    }
    filter_names
        .iter()
        .any(|name| device_path == name || device_name == name)
}
