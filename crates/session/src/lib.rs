//! `ginko-session` — authenticated session with a single expiry countdown.

pub mod session;
pub mod timer;

pub use session::Session;
pub use timer::{CountdownTimer, TimerTick, DEFAULT_SESSION_TICKS};
