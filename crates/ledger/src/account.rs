use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use ginko_core::{AccountId, DomainError, DomainResult, Entity};

// ─────────────────────────────────────────────────────────────────────────────
// Username
// ─────────────────────────────────────────────────────────────────────────────

/// Account username: the lowercase initials of the owner name.
///
/// The username is the lookup key for transfers and login. Lookups are
/// case-insensitive; the stored form is always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Derive a username from an owner name ("Gary Wintle" → "gw").
    pub fn derive(owner: &str) -> DomainResult<Self> {
        let initials: String = owner
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(|c| c.to_lowercase())
            .collect();

        if initials.is_empty() {
            return Err(DomainError::validation("owner name has no initials"));
        }
        Ok(Self(initials))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive match against raw user input.
    pub fn matches_input(&self, input: &str) -> bool {
        self.0 == input.trim().to_lowercase()
    }
}

impl core::fmt::Display for Username {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pin
// ─────────────────────────────────────────────────────────────────────────────

/// Numeric account PIN.
///
/// This is a cleartext, exact-equality credential: a placeholder, **not**
/// production authentication. Hardening (hashing, lockout, etc.) is
/// explicitly out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin(u32);

impl Pin {
    pub fn new(pin: u32) -> Self {
        Self(pin)
    }

    pub fn matches(&self, entered: Pin) -> bool {
        *self == entered
    }
}

impl FromStr for Pin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Pin)
            .map_err(|_| DomainError::validation("pin must be numeric"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Movement
// ─────────────────────────────────────────────────────────────────────────────

/// One signed ledger movement: positive = deposit, negative = withdrawal.
///
/// Amount is in whole currency units (the demo data is yen). Amount and
/// timestamp travel together so the two can never fall out of alignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
}

impl Movement {
    pub fn new(amount: i64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            amount,
            occurred_at,
        }
    }

    pub fn is_deposit(&self) -> bool {
        self.amount > 0
    }

    pub fn is_withdrawal(&self) -> bool {
        self.amount < 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Summary
// ─────────────────────────────────────────────────────────────────────────────

/// Derived account figures. Never stored; always recomputed from movements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    /// Sum of all movement amounts.
    pub balance: i64,
    /// Sum of deposits.
    pub total_in: i64,
    /// Absolute sum of withdrawals.
    pub total_out: i64,
    /// Interest earned on deposits, after the per-deposit floor filter.
    pub interest: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Account
// ─────────────────────────────────────────────────────────────────────────────

/// A bank account: owner identity, credentials, and an append-only movement
/// list. Balance and summary figures are derived, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    owner: String,
    username: Username,
    pin: Pin,
    /// Annual interest rate in percent (e.g. 1.2), non-negative.
    interest_rate: f64,
    /// ISO 4217 currency code, for the presentation layer.
    currency: String,
    /// BCP-47 locale tag, for the presentation layer.
    locale: String,
    movements: Vec<Movement>,
}

impl Account {
    /// Assemble an account from already-validated `AccountOpened` fields.
    ///
    /// Validation (owner name, rate, username uniqueness) happens when the
    /// open command is handled; event application must not fail.
    #[allow(clippy::too_many_arguments)]
    pub fn from_opened(
        id: AccountId,
        owner: String,
        username: Username,
        pin: Pin,
        interest_rate: f64,
        currency: String,
        locale: String,
        movements: Vec<Movement>,
    ) -> Self {
        Self {
            id,
            owner,
            username,
            pin,
            interest_rate,
            currency,
            locale,
            movements,
        }
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn pin_matches(&self, entered: Pin) -> bool {
        self.pin.matches(entered)
    }

    /// Append a movement. Movements are append-only: never edited or removed.
    pub fn append(&mut self, movement: Movement) {
        self.movements.push(movement);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived values
    // ─────────────────────────────────────────────────────────────────────────

    /// Current balance: the sum of all movements.
    pub fn balance(&self) -> i64 {
        self.movements.iter().map(|m| m.amount).sum()
    }

    /// Sum of all deposits.
    pub fn total_in(&self) -> i64 {
        self.movements
            .iter()
            .filter(|m| m.is_deposit())
            .map(|m| m.amount)
            .sum()
    }

    /// Absolute sum of all withdrawals.
    pub fn total_out(&self) -> i64 {
        self.movements
            .iter()
            .filter(|m| m.is_withdrawal())
            .map(|m| m.amount)
            .sum::<i64>()
            .abs()
    }

    /// Interest earned across deposits.
    ///
    /// Each deposit contributes `amount * rate / 100`, but only contributions
    /// of at least 1 currency unit count: small deposits earn nothing at
    /// all, rather than a truncated amount.
    pub fn interest(&self) -> f64 {
        self.movements
            .iter()
            .filter(|m| m.is_deposit())
            .map(|m| m.amount as f64 * self.interest_rate / 100.0)
            .filter(|contribution| *contribution >= 1.0)
            .sum()
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            balance: self.balance(),
            total_in: self.total_in(),
            total_out: self.total_out(),
            interest: self.interest(),
        }
    }

    /// Movement view for display: insertion order by default, or sorted by
    /// amount ascending. Pure transform; stored order is never touched.
    pub fn movements_view(&self, sort_ascending: bool) -> Vec<Movement> {
        let mut view = self.movements.clone();
        if sort_ascending {
            view.sort_by_key(|m| m.amount);
        }
        view
    }

    /// Whether this account qualifies for a loan of `amount`: some existing
    /// movement must cover at least 10% of the requested amount.
    pub fn qualifies_for_loan(&self, amount: i64) -> bool {
        self.movements
            .iter()
            .any(|m| m.amount as f64 >= amount as f64 * 0.1)
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
