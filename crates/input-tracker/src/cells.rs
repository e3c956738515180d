//! Single-slot handoff cells between the input task and the frame context.
//!
//! These are deliberately not queues: the frame loop only ever cares about
//! the newest cursor sample and the newest pending trigger.

use std::sync::atomic::{AtomicU64, Ordering};

use lenscast_frame_model::event::ZoomTrigger;
use parking_lot::Mutex;

/// Last-write-wins slot. Reading does not consume the value.
#[derive(Debug)]
pub struct LatestCell<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Default for LatestCell<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone> LatestCell<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, value: T) {
        *self.slot.lock() = Some(value);
    }

    pub fn latest(&self) -> Option<T> {
        self.slot.lock().clone()
    }
}

/// Pending-trigger slot: overwritten by newer triggers, consumed once.
#[derive(Debug, Default)]
pub struct TriggerCell {
    slot: Mutex<Option<ZoomTrigger>>,
    published: AtomicU64,
    overwritten: AtomicU64,
}

impl TriggerCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `trigger`, replacing any unconsumed one.
    ///
    /// Returns `true` if an unconsumed trigger was replaced.
    pub fn publish(&self, trigger: ZoomTrigger) -> bool {
        let replaced = self.slot.lock().replace(trigger).is_some();
        self.published.fetch_add(1, Ordering::Relaxed);
        if replaced {
            self.overwritten.fetch_add(1, Ordering::Relaxed);
        }
        replaced
    }

    /// Read and clear the pending trigger.
    pub fn take(&self) -> Option<ZoomTrigger> {
        self.slot.lock().take()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().is_some()
    }

    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    pub fn overwritten(&self) -> u64 {
        self.overwritten.load(Ordering::Relaxed)
    }
}
