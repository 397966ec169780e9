// Globalhotkeys Backends
// Linux input translation and the evdev hook backend

pub mod filter;
pub mod keymap;

#[cfg(feature = "evdev")]
mod evdev;

pub use filter::{
    is_keyboard, is_pointer, is_virtual_device, matches_device_filter, DeviceCapabilities,
    BUS_VIRTUAL,
};
pub use keymap::{stroke_from_key_event, virtual_key_from_linux};

#[cfg(feature = "evdev")]
pub use evdev::{EvdevBackend, EvdevHandle};
