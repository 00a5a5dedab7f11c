//! Authenticated session state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ginko_core::{AccountId, SessionId};

use crate::timer::{CountdownTimer, TimerTick};

/// The period between a successful login and either explicit account close
/// or timer-driven expiry.
///
/// The session owns its countdown as a plain field: there is exactly one
/// timer per session, and replacing the session (a single `Option` slot at
/// the application level) replaces the timer with it. No detached timer can
/// outlive the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    account_id: AccountId,
    started_at: DateTime<Utc>,
    timer: CountdownTimer,
}

impl Session {
    pub fn start(account_id: AccountId, ticks: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            account_id,
            started_at,
            timer: CountdownTimer::new(ticks),
        }
    }

    pub fn id_typed(&self) -> SessionId {
        self.id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.timer.remaining()
    }

    /// Register an authenticated action: rearms the countdown to full.
    pub fn touch(&mut self) {
        self.timer.reset();
    }

    /// Advance the session countdown by one time unit.
    pub fn tick(&mut self) -> Option<TimerTick> {
        self.timer.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_rearms_the_countdown() {
        let mut session = Session::start(AccountId::new(), 5, Utc::now());
        session.tick();
        session.tick();
        assert_eq!(session.remaining_ticks(), 3);

        session.touch();
        assert_eq!(session.remaining_ticks(), 5);
    }

    #[test]
    fn session_expires_through_its_timer() {
        let mut session = Session::start(AccountId::new(), 2, Utc::now());
        assert_eq!(session.tick(), Some(TimerTick::Running { remaining: 1 }));
        assert_eq!(session.tick(), Some(TimerTick::Expired));
        assert_eq!(session.tick(), None);
    }
}
