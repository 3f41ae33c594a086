use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

/// Daily call allowance that resets at the UTC day boundary
pub struct ApiCallBudget {
    daily_limit: u32,
    calls_today: AtomicU32,
    current_day: AtomicI64,
}

impl ApiCallBudget {
    pub fn new(daily_limit: u32) -> Self {
        Self {
            daily_limit,
            calls_today: AtomicU32::new(0),
            current_day: AtomicI64::new(Self::utc_day_now()),
        }
    }

    /// Claim one call. Returns `false` (and claims nothing) once the limit is reached.
    pub fn try_acquire(&self) -> bool {
        self.maybe_reset();
        self.calls_today
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |used| {
                (used < self.daily_limit).then_some(used + 1)
            })
            .is_ok()
    }

    pub fn remaining(&self) -> u32 {
        self.maybe_reset();
        self.daily_limit
            .saturating_sub(self.calls_today.load(Ordering::Relaxed))
    }

    pub fn used_today(&self) -> u32 {
        self.maybe_reset();
        self.calls_today.load(Ordering::Relaxed)
    }

    /// Reset counter if the UTC day has changed (compare-and-swap).
    fn maybe_reset(&self) {
        let today = Self::utc_day_now();
        let stored = self.current_day.load(Ordering::Relaxed);
        if today != stored
            && self
                .current_day
                .compare_exchange(stored, today, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
        {
            // only the winner resets
            self.calls_today.store(0, Ordering::Relaxed);
        }
    }

    fn utc_day_now() -> i64 {
        chrono::Utc::now().timestamp() / 86400
    }
}
