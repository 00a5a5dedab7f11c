//! Single-shot session expiry countdown.

use serde::{Deserialize, Serialize};

/// Default session length in ticks (one tick = one time unit).
pub const DEFAULT_SESSION_TICKS: u32 = 120;

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Still counting down; `remaining` ticks left.
    Running { remaining: u32 },
    /// The countdown just reached zero. Reported exactly once.
    Expired,
}

/// A cooperative countdown.
///
/// The timer does nothing on its own; the owner drives it by calling
/// [`CountdownTimer::tick`] once per time unit. After it reports
/// [`TimerTick::Expired`] it goes inert (further ticks return `None`) until
/// it is rearmed with [`CountdownTimer::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownTimer {
    remaining: u32,
    full: u32,
    expired: bool,
}

impl CountdownTimer {
    pub fn new(ticks: u32) -> Self {
        Self {
            remaining: ticks,
            full: ticks,
            expired: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Rearm to the full duration.
    pub fn reset(&mut self) {
        self.remaining = self.full;
        self.expired = false;
    }

    /// Advance by one time unit.
    pub fn tick(&mut self) -> Option<TimerTick> {
        if self.expired {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expired = true;
            Some(TimerTick::Expired)
        } else {
            Some(TimerTick::Running {
                remaining: self.remaining,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_expires_exactly_once() {
        let mut timer = CountdownTimer::new(3);

        assert_eq!(timer.tick(), Some(TimerTick::Running { remaining: 2 }));
        assert_eq!(timer.tick(), Some(TimerTick::Running { remaining: 1 }));
        assert_eq!(timer.tick(), Some(TimerTick::Expired));

        // Inert after expiry: no second expiry signal.
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), None);
        assert!(timer.is_expired());
    }

    #[test]
    fn reset_rearms_to_full() {
        let mut timer = CountdownTimer::new(2);
        timer.tick();
        timer.tick();
        assert!(timer.is_expired());

        timer.reset();
        assert!(!timer.is_expired());
        assert_eq!(timer.remaining(), 2);
        assert_eq!(timer.tick(), Some(TimerTick::Running { remaining: 1 }));
    }

    #[test]
    fn zero_length_timer_expires_on_first_tick() {
        let mut timer = CountdownTimer::new(0);
        assert_eq!(timer.tick(), Some(TimerTick::Expired));
        assert_eq!(timer.tick(), None);
    }
}
