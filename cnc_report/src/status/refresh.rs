//! Adaptive refresh counters for the throttled WCO and override fields.

use std::sync::atomic::{AtomicU8, Ordering};

use cnc_common::config::RefreshConfig;

/// Countdown that forces a field into the status line every `interval`
/// reports, with a longer interval while the machine is busy.
#[derive(Debug)]
pub struct RefreshCounter {
    remaining: AtomicU8,
    busy_interval: u8,
    idle_interval: u8,
}

impl RefreshCounter {
    /// Counter starting at zero, so the first tick fires.
    pub const fn new(busy_interval: u8, idle_interval: u8) -> Self {
        Self {
            remaining: AtomicU8::new(0),
            busy_interval,
            idle_interval,
        }
    }

    /// Advance one report. Returns true when the field must be included:
    /// the counter reached zero or the field was already flagged. Firing
    /// reloads the counter with `interval - 1`.
    pub fn tick(&self, flagged: bool, busy: bool) -> bool {
        let remaining = self.remaining.load(Ordering::Relaxed);
        if remaining > 0 && !flagged {
            self.remaining.store(remaining - 1, Ordering::Relaxed);
            false
        } else {
            let interval = if busy {
                self.busy_interval
            } else {
                self.idle_interval
            };
            self.remaining
                .store(interval.saturating_sub(1), Ordering::Relaxed);
            true
        }
    }

    /// True when the next tick fires on its own.
    #[inline]
    pub fn is_due(&self) -> bool {
        self.remaining.load(Ordering::Relaxed) == 0
    }

    #[inline]
    pub fn remaining(&self) -> u8 {
        self.remaining.load(Ordering::Relaxed)
    }

    /// Force the next tick to fire.
    #[inline]
    pub fn reset(&self) {
        self.remaining.store(0, Ordering::Relaxed);
    }

    pub const fn busy_interval(&self) -> u8 {
        self.busy_interval
    }

    pub const fn idle_interval(&self) -> u8 {
        self.idle_interval
    }
}

/// The WCO and override counter pair.
#[derive(Debug)]
pub struct RefreshCounters {
    pub wco: RefreshCounter,
    pub overrides: RefreshCounter,
}

impl RefreshCounters {
    pub const fn new(config: &RefreshConfig) -> Self {
        Self {
            wco: RefreshCounter::new(config.wco_busy, config.wco_idle),
            overrides: RefreshCounter::new(config.override_busy, config.override_idle),
        }
    }

    /// Reset both counters so the next report carries both fields.
    pub fn reset(&self) {
        self.wco.reset();
        self.overrides.reset();
    }
}

impl Default for RefreshCounters {
    fn default() -> Self {
        Self::new(&RefreshConfig::default())
    }
}
