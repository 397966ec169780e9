// Globalhotkeys Evdev Backend
// Linux hook backend reading /dev/input event devices

use std::io;
use std::os::unix::io::AsRawFd;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use evdev::{Device, EventType};
use globalhotkeys_core::{HookBackend, HookKind, HookProc, InstallError, QuitSignal, Stroke};
use parking_lot::Mutex;

use super::filter::{is_virtual_device, matches_device_filter, DeviceCapabilities};
use super::keymap::{is_mouse_button_code, stroke_from_key_event};
use crate::settings::EvdevOptions;

/// Handle for a hook installed on an [`EvdevBackend`]
#[derive(Debug, PartialEq, Eq)]
pub struct EvdevHandle(u64);

struct DeviceHook {
    id: u64,
    kind: HookKind,
    devices: Vec<Device>,
    proc: HookProc,
}

/// Hook backend over evdev.
///
/// Each installed hook opens its own set of devices: autodetected keyboards
/// for the keyboard hook, devices with BTN_LEFT for the mouse hook, or the
/// devices listed in [`EvdevOptions::devices`]. Devices are only read, never
/// grabbed, so other applications keep receiving input.
///
/// Hosts that pump their own loop call [`EvdevBackend::dispatch_pending`];
/// otherwise the manager's dedicated loop does.
pub struct EvdevBackend {
    options: EvdevOptions,
    hooks: Mutex<Vec<DeviceHook>>,
    next_handle: AtomicU64,
}

impl EvdevBackend {
    pub fn new(options: EvdevOptions) -> Self {
        Self {
            options,
            hooks: Mutex::new(Vec::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    pub fn options(&self) -> &EvdevOptions {
        &self.options
    }

    /// Open every device that should feed a hook of `kind`
    fn find_devices(&self, kind: HookKind) -> Vec<Device> {
        let mut found = Vec::new();
        for (path, device) in evdev::enumerate() {
            let device_name = device.name().unwrap_or("Unknown").to_string();
            let device_path = path.to_str().unwrap_or_default();

            if matches_device_filter(
                kind,
                &device_name,
                device_path,
                &self.options.devices,
                is_virtual_device(device.input_id().bus_type().0, &device_name),
                &capabilities(&device),
            ) {
                log::debug!("{} hook reads {} ({})", kind, device_name, device_path);
                found.push(device);
            }
        }
        found
    }

    /// Number of devices currently read by installed hooks
    pub fn device_count(&self) -> usize {
        self.hooks.lock().iter().map(|hook| hook.devices.len()).sum()
    }

    /// Wait up to `timeout_ms` for input and deliver it to the hooks.
    ///
    /// Returns the number of strokes delivered. EINTR counts as a timeout.
    /// Hook procedures run after the device lock is released.
    pub fn dispatch_pending(&self, timeout_ms: i32) -> io::Result<usize> {
        let mut pending: Vec<(HookProc, Stroke)> = Vec::new();
        {
            let mut hooks = self.hooks.lock();
            let mut poll_fds: Vec<libc::pollfd> = hooks
                .iter()
                .flat_map(|hook| hook.devices.iter())
                .map(|device| libc::pollfd {
                    fd: device.as_raw_fd(),
                    events: libc::POLLIN,
                    revents: 0,
                })
                .collect();

            if poll_fds.is_empty() {
                drop(hooks);
                thread::sleep(Duration::from_millis(timeout_ms.max(0) as u64));
                return Ok(0);
            }

            let poll_result = unsafe {
                libc::poll(
                    poll_fds.as_mut_ptr(),
                    poll_fds.len() as libc::nfds_t,
                    timeout_ms,
                )
            };
            if poll_result < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    return Ok(0);
                }
                return Err(err);
            }
            if poll_result == 0 {
                return Ok(0);
            }

            let mut ready = poll_fds.iter();
            for hook in hooks.iter_mut() {
                for device in hook.devices.iter_mut() {
                    let Some(fd) = ready.next() else {
                        break;
                    };
                    if fd.revents & libc::POLLIN == 0 {
                        continue;
                    }
                    let name = device.name().unwrap_or("Unknown").to_owned();
                    match device.fetch_events() {
                        Ok(events) => {
                            for event in events {
                                if event.event_type() != EventType::KEY {
                                    continue;
                                }
                                // Each hook only reports its own kind of input
                                let is_button = is_mouse_button_code(event.code());
                                if is_button != (hook.kind == HookKind::Mouse) {
                                    continue;
                                }
                                if let Some(stroke) = stroke_from_key_event(event.code(), event.value()) {
                                    pending.push((hook.proc.clone(), stroke));
                                }
                            }
                        }
                        Err(e) => {
                            log::warn!("failed to read {}: {}", name, e);
                        }
                    }
                }
            }
        }

        for (proc, stroke) in &pending {
            proc(*stroke);
        }
        Ok(pending.len())
    }
}

fn capabilities(device: &Device) -> DeviceCapabilities {
    let has_ev_key = device.supported_events().contains(EventType::KEY);
    let keys = device
        .supported_keys()
        .map(|keys| keys.iter().map(|key| key.code()).collect::<Vec<u16>>())
        .unwrap_or_default();
    DeviceCapabilities::new(has_ev_key, keys)
}

impl HookBackend for EvdevBackend {
    type Handle = EvdevHandle;

    fn install_hook(&self, kind: HookKind, hook: HookProc) -> Result<EvdevHandle, InstallError> {
        let devices = if kind == HookKind::Mouse && !self.options.include_mice {
            log::info!("mouse input disabled, mouse hook reads no devices");
            Vec::new()
        } else {
            let devices = self.find_devices(kind);
            if devices.is_empty() {
                return Err(InstallError::new(
                    kind,
                    "no matching input devices (check read access to /dev/input)",
                ));
            }
            devices
        };

        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        log::info!("{} hook {} installed over {} device(s)", kind, id, devices.len());
        self.hooks.lock().push(DeviceHook {
            id,
            kind,
            devices,
            proc: hook,
        });
        Ok(EvdevHandle(id))
    }

    fn uninstall_hook(&self, handle: EvdevHandle) {
        self.hooks.lock().retain(|hook| hook.id != handle.0);
    }

    fn run_message_loop_until_quit(&self, quit: &QuitSignal) {
        let timeout_ms = self.options.poll_timeout_ms;
        while !quit.is_raised() {
            if let Err(e) = self.dispatch_pending(timeout_ms) {
                log::warn!("evdev poll failed: {}", e);
                thread::sleep(Duration::from_millis(timeout_ms.max(1) as u64));
            }
        }
    }
}
