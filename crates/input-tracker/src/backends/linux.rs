//! Linux input backend: `/dev/input/mice` for the pointer, evdev keyboards
//! for key edges.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::fs::{MetadataExt, OpenOptionsExt};
use std::os::unix::io::{AsRawFd, RawFd};

use evdev::{Device, EventType, Key};
use lenscast_common::error::{LenscastError, LenscastResult};
use lenscast_frame_model::event::{InputEvent, TimestampNs};
use lenscast_frame_model::geometry::{Point2D, Rect};

use super::NullBackend;
use crate::{InputBackend, InputCapabilities};

const MICE_DEVICE: &str = "/dev/input/mice";

/// Key codes at or above this are buttons, already covered by the pointer.
const FIRST_BUTTON_CODE: u16 = 0x100;

pub struct EvdevBackend {
    mice: File,
    keyboards: Vec<Device>,
    pending: VecDeque<InputEvent>,
    position: Point2D,
    bounds: Rect,
    left_down: bool,
    right_down: bool,
}

impl EvdevBackend {
    /// Open the pointer device and every readable keyboard.
    ///
    /// Missing keyboards are not an error; the backend then reports no key
    /// edges.
    pub fn new(bounds: Rect) -> LenscastResult<Self> {
        let mice = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(MICE_DEVICE)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::PermissionDenied {
                    LenscastError::permission_denied(format!("{MICE_DEVICE}: {e}"))
                } else {
                    LenscastError::input(format!("Failed to open {MICE_DEVICE}: {e}"))
                }
            })?;

        let keyboards = open_keyboards();
        tracing::debug!(keyboards = keyboards.len(), "Evdev keyboards opened");

        Ok(Self {
            mice,
            keyboards,
            pending: VecDeque::new(),
            position: bounds.center(),
            bounds,
            left_down: false,
            right_down: false,
        })
    }

    pub fn is_supported() -> bool {
        OpenOptions::new().read(true).open(MICE_DEVICE).is_ok()
    }

    fn ingest_pointer(&mut self, now_ns: TimestampNs) -> LenscastResult<()> {
        loop {
            let mut packet = [0u8; 3];
            match self.mice.read(&mut packet) {
                Ok(3) => self.process_packet(packet, now_ns),
                Ok(_) => break,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => {
                    return Err(LenscastError::input(format!(
                        "Failed reading {MICE_DEVICE}: {err}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn process_packet(&mut self, packet: [u8; 3], now_ns: TimestampNs) {
        let dx = packet[1] as i8 as f64;
        let dy = packet[2] as i8 as f64;

        if dx != 0.0 || dy != 0.0 {
            // PS/2 reports y growing upwards.
            self.position = Point2D::new(
                (self.position.x + dx).clamp(self.bounds.x, self.bounds.right()),
                (self.position.y - dy).clamp(self.bounds.y, self.bounds.bottom()),
            );
            self.pending.push_back(InputEvent::moved(
                now_ns,
                self.position.x,
                self.position.y,
            ));
        }

        let left = packet[0] & 0b001 != 0;
        let right = packet[0] & 0b010 != 0;
        if left != self.left_down {
            self.left_down = left;
            self.pending.push_back(if left {
                InputEvent::left_down(now_ns)
            } else {
                InputEvent::left_up(now_ns)
            });
        }
        if right != self.right_down {
            self.right_down = right;
            self.pending.push_back(if right {
                InputEvent::right_down(now_ns)
            } else {
                InputEvent::right_up(now_ns)
            });
        }
    }

    fn ingest_keys(&mut self, now_ns: TimestampNs) {
        for device in &mut self.keyboards {
            let events = match device.fetch_events() {
                Ok(events) => events,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => continue,
                Err(err) => {
                    tracing::warn!(error = %err, "Keyboard read failed");
                    continue;
                }
            };
            for event in events {
                if event.event_type() != EventType::KEY || event.code() >= FIRST_BUTTON_CODE {
                    continue;
                }
                let code = u32::from(event.code());
                match event.value() {
                    1 => self.pending.push_back(InputEvent::key_down(now_ns, code)),
                    0 => self.pending.push_back(InputEvent::key_up(now_ns, code)),
                    // Autorepeat.
                    _ => {}
                }
            }
        }
    }
}

impl InputBackend for EvdevBackend {
    fn poll(&mut self, now_ns: TimestampNs) -> LenscastResult<Option<InputEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        self.ingest_pointer(now_ns)?;
        self.ingest_keys(now_ns);
        Ok(self.pending.pop_front())
    }

    fn pointer_position(&self) -> Option<Point2D> {
        Some(self.position)
    }

    fn capabilities(&self) -> InputCapabilities {
        InputCapabilities {
            move_samples: true,
            button_edges: true,
            key_edges: !self.keyboards.is_empty(),
        }
    }

    fn name(&self) -> &str {
        "evdev"
    }

    fn shutdown(&mut self) {
        self.keyboards.clear();
        self.pending.clear();
    }
}

fn open_keyboards() -> Vec<Device> {
    evdev::enumerate()
        .filter(|(_, device)| {
            device
                .supported_keys()
                .is_some_and(|keys| keys.contains(Key::KEY_SPACE))
        })
        .filter_map(|(path, device)| match set_nonblocking(device.as_raw_fd()) {
            Ok(()) => Some(device),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Skipping keyboard");
                None
            }
        })
        .collect()
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    // SAFETY: `fd` belongs to a device we own for the duration of the call.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: as above; only the status flags are changed.
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub fn detect_best_backend(bounds: Rect) -> Box<dyn InputBackend> {
    if EvdevBackend::is_supported() {
        match EvdevBackend::new(bounds) {
            Ok(backend) => {
                tracing::info!(
                    key_edges = backend.capabilities().key_edges,
                    "Using evdev backend"
                );
                return Box::new(backend);
            }
            Err(e) if e.is_permission_denied() => {
                tracing::warn!(
                    error = %e,
                    "Evdev backend denied; add the user to the 'input' group"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to initialize evdev backend");
            }
        }
    }

    let details = mice_device_diagnostic();
    tracing::warn!(
        details = %details,
        "Input hook unavailable, zoom triggers disabled"
    );
    Box::new(NullBackend::new(details))
}

fn mice_device_diagnostic() -> String {
    // SAFETY: both calls only read the process credentials.
    let uid = unsafe { libc::geteuid() };
    let gid = unsafe { libc::getegid() };

    match std::fs::metadata(MICE_DEVICE) {
        Ok(meta) => format!(
            "device={MICE_DEVICE} mode={:o} owner_uid={} owner_gid={} process_uid={uid} process_gid={gid}; \
             likely missing 'input' group membership",
            meta.mode() & 0o777,
            meta.uid(),
            meta.gid(),
        ),
        Err(err) => format!("device={MICE_DEVICE} unavailable ({err})"),
    }
}
