//! Shared armed/stop flags.

use std::sync::atomic::{AtomicBool, Ordering};

/// Thread-safe flag pair shared between the signal listener and the
/// capture loop. Exposes only atomic get/set; relaxed ordering is
/// sufficient for the one-writer-per-flag, read-once-per-tick protocol.
#[derive(Debug, Default)]
pub struct ControlFlags {
    armed: AtomicBool,
    stop: AtomicBool,
}

impl ControlFlags {
    /// Creates flags with everything lowered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the loop should attempt detection this tick.
    #[inline]
    pub fn armed(&self) -> bool {
        self.armed.load(Ordering::Relaxed)
    }

    /// Sets the armed flag.
    #[inline]
    pub fn set_armed(&self, value: bool) {
        self.armed.store(value, Ordering::Relaxed);
    }

    /// Flips the armed flag and returns the new value.
    pub fn toggle_armed(&self) -> bool {
        !self.armed.fetch_xor(true, Ordering::Relaxed)
    }

    /// Whether shutdown has been requested.
    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Raises the stop flag. There is no way to lower it.
    #[inline]
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_returns_new_state() {
        let flags = ControlFlags::new();
        assert!(!flags.armed());
        assert!(flags.toggle_armed());
        assert!(flags.armed());
        assert!(!flags.toggle_armed());
        assert!(!flags.armed());
    }

    #[test]
    fn test_stop_is_one_way() {
        let flags = ControlFlags::new();
        assert!(!flags.stop_requested());
        flags.request_stop();
        assert!(flags.stop_requested());
    }
}
