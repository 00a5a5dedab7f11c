//! `ginko-app` — application facade for the bank dashboard.
//!
//! Owns the ledger context and the (at most one) authenticated session, and
//! exposes the operations the presentation layer calls. The presentation
//! layer itself (rendering, formatting, input capture) stays outside and
//! talks to this crate through the [`Presenter`] callback trait.

pub mod config;
pub mod dashboard;
pub mod seed;
pub mod snapshot;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, Presenter, SessionEnd};
pub use snapshot::AccountSnapshot;
