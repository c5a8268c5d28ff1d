//! Streak counters and the full/not-full hysteresis.
//!
//! A level flip needs a run of consecutive agreeing cycles: WET readings to
//! become FULL, DRY readings to become not-full.  An ambiguous cycle (neither
//! wet nor dry) breaks both runs without touching the stored level.

/// Consecutive-cycle counter that clamps at `ceiling` instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedCounter {
    count: u8,
    ceiling: u8,
}

impl BoundedCounter {
    pub const fn new(ceiling: u8) -> Self {
        Self { count: 0, ceiling }
    }

    /// Counter starting at its ceiling.
    pub const fn saturated(ceiling: u8) -> Self {
        Self { count: ceiling, ceiling }
    }

    /// Add one, clamped at the ceiling.  Returns the new count.
    pub fn increment(&mut self) -> u8 {
        self.count = self.count.saturating_add(1).min(self.ceiling);
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub const fn count(&self) -> u8 {
        self.count
    }

    pub const fn reached(&self, threshold: u8) -> bool {
        self.count >= threshold
    }
}

/// Debounced full/not-full state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDebouncer {
    wet: BoundedCounter,
    dry: BoundedCounter,
    wet_confirm: u8,
    dry_confirm: u8,
    is_full: bool,
}

impl LevelDebouncer {
    /// Start as confirmed not-full: the dry streak is pre-seeded at its
    /// threshold so one stray WET cycle cannot flip the level.
    pub fn new(wet_confirm: u8, dry_confirm: u8) -> Self {
        Self {
            wet: BoundedCounter::new(wet_confirm),
            dry: BoundedCounter::saturated(dry_confirm),
            wet_confirm,
            dry_confirm,
            is_full: false,
        }
    }

    /// Feed one cycle.  Returns `Some(new_level)` when the level flips.
    pub fn update(&mut self, any_water: bool, all_dry: bool) -> Option<bool> {
        if any_water {
            self.wet.increment();
            self.dry.reset();
        } else if all_dry {
            self.dry.increment();
            self.wet.reset();
        } else {
            self.wet.reset();
            self.dry.reset();
        }

        let before = self.is_full;
        if self.wet.reached(self.wet_confirm) {
            self.is_full = true;
        }
        if self.dry.reached(self.dry_confirm) {
            self.is_full = false;
        }
        (self.is_full != before).then_some(self.is_full)
    }

    pub fn is_full(&self) -> bool {
        self.is_full
    }

    pub fn wet_streak(&self) -> u8 {
        self.wet.count()
    }

    pub fn dry_streak(&self) -> u8 {
        self.dry.count()
    }
}
