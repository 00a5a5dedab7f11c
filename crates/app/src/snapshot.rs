//! Account snapshot handed to the presentation layer after each state change.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ginko_ledger::{Account, AccountSummary, Movement};

/// Raw values the presenter needs to draw one account.
///
/// Formatting (currency symbols, "Today"/"N days ago" phrasing, locale
/// dates) is a presentation concern; the snapshot only carries the numbers,
/// timestamps, and the currency/locale tags to format them with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSnapshot {
    pub owner: String,
    pub username: String,
    pub currency: String,
    pub locale: String,
    pub interest_rate: f64,
    /// Movements in insertion order.
    pub movements: Vec<Movement>,
    pub summary: AccountSummary,
    pub captured_at: DateTime<Utc>,
}

impl AccountSnapshot {
    pub fn of(account: &Account, captured_at: DateTime<Utc>) -> Self {
        Self {
            owner: account.owner().to_string(),
            username: account.username().to_string(),
            currency: account.currency().to_string(),
            locale: account.locale().to_string(),
            interest_rate: account.interest_rate(),
            movements: account.movements().to_vec(),
            summary: account.summary(),
            captured_at,
        }
    }
}
