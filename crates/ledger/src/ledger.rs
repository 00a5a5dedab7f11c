use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ginko_core::{AccountId, Aggregate, AggregateRoot, DomainError, Event, LedgerId};

use crate::account::{Account, Movement, Pin, Username};

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

/// Ledger operation error.
///
/// All variants are recoverable-by-user: the caller reports them and the
/// session stays usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Unknown username or wrong PIN, collapsed into one message on purpose:
    /// login failure does not reveal which part was wrong.
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid transfer: {0}")]
    InvalidTransfer(String),

    #[error("invalid loan: {0}")]
    InvalidLoan(String),

    /// Close credentials did not match the account being closed.
    #[error("close denied")]
    CloseDenied,

    /// The targeted account is not (or no longer) in the ledger.
    #[error("account not found")]
    AccountNotFound,

    #[error("{0}")]
    Domain(#[from] DomainError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Command: open a new account.
///
/// Seeded demo accounts go through this path too, so username uniqueness and
/// owner validation apply to them as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAccount {
    pub account_id: AccountId,
    pub owner: String,
    pub pin: Pin,
    /// Annual interest rate in percent, non-negative.
    pub interest_rate: f64,
    pub currency: String,
    pub locale: String,
    /// Pre-existing movement history (seed data); empty for fresh accounts.
    pub opening_movements: Vec<Movement>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: move money between two accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    /// The authenticated sender.
    pub from: Username,
    /// Recipient username as entered (matched case-insensitively).
    pub to: String,
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: apply an approved loan to an account.
///
/// Qualification is checked at request time via [`Ledger::check_loan`]; by
/// the time the grant arrives (after the simulated approval delay) the only
/// remaining requirement is that the account still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantLoan {
    pub username: Username,
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: permanently remove an account.
///
/// The entered credentials must match the account being closed exactly
/// (case-sensitive username, exact PIN).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseAccount {
    /// The account under closure (the session's account).
    pub account: Username,
    pub entered_username: String,
    pub entered_pin: Pin,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerCommand {
    OpenAccount(OpenAccount),
    Transfer(Transfer),
    GrantLoan(GrantLoan),
    CloseAccount(CloseAccount),
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Event: an account joined the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountOpened {
    pub account_id: AccountId,
    pub owner: String,
    pub username: Username,
    pub pin: Pin,
    pub interest_rate: f64,
    pub currency: String,
    pub locale: String,
    pub opening_movements: Vec<Movement>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: money moved from one account to another.
///
/// Applying this single event appends to both sides, so a transfer is
/// all-or-nothing: no partial application is possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferMade {
    pub from: Username,
    pub to: Username,
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: an approved loan was credited to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanGranted {
    pub username: Username,
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: an account was removed from the ledger. There is no recovery path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountClosed {
    pub username: Username,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    AccountOpened(AccountOpened),
    TransferMade(TransferMade),
    LoanGranted(LoanGranted),
    AccountClosed(AccountClosed),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::AccountOpened(_) => "bank.ledger.account_opened",
            LedgerEvent::TransferMade(_) => "bank.ledger.transfer_made",
            LedgerEvent::LoanGranted(_) => "bank.ledger.loan_granted",
            LedgerEvent::AccountClosed(_) => "bank.ledger.account_closed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::AccountOpened(e) => e.occurred_at,
            LedgerEvent::TransferMade(e) => e.occurred_at,
            LedgerEvent::LoanGranted(e) => e.occurred_at,
            LedgerEvent::AccountClosed(e) => e.occurred_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ledger aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate root: the active account collection.
///
/// The ledger is an explicit context object owned by the application and
/// passed by reference to every operation; no ambient singleton. Balances
/// are never stored on it; they are derived from movements on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    id: LedgerId,
    accounts: Vec<Account>,
    version: u64,
}

impl Ledger {
    pub fn new(id: LedgerId) -> Self {
        Self {
            id,
            accounts: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> LedgerId {
        self.id
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Case-insensitive lookup by entered username.
    pub fn find(&self, entered: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username().matches_input(entered))
    }

    /// Exact lookup by derived username.
    pub fn get(&self, username: &Username) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username() == username)
    }

    pub fn account_by_id(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id_typed() == id)
    }

    fn get_mut(&mut self, username: &Username) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.username() == username)
    }

    /// Authenticate by username (case-insensitive) and exact PIN.
    ///
    /// Unknown username and wrong PIN both surface as the single collapsed
    /// [`LedgerError::AuthenticationFailed`].
    pub fn authenticate(&self, username: &str, pin: Pin) -> Result<&Account, LedgerError> {
        match self.find(username) {
            Some(account) if account.pin_matches(pin) => Ok(account),
            _ => Err(LedgerError::AuthenticationFailed),
        }
    }

    /// Validate a loan request without granting it.
    ///
    /// The grant itself happens later, after the approval delay, via
    /// [`GrantLoan`].
    pub fn check_loan(&self, username: &Username, amount: i64) -> Result<(), LedgerError> {
        let account = self.get(username).ok_or(LedgerError::AccountNotFound)?;
        if amount <= 0 {
            return Err(LedgerError::InvalidLoan("amount must be positive".into()));
        }
        if !account.qualifies_for_loan(amount) {
            return Err(LedgerError::InvalidLoan(
                "no deposit covers 10% of the requested amount".into(),
            ));
        }
        Ok(())
    }

    /// Handle a command and immediately apply the resulting events.
    pub fn execute(&mut self, command: &LedgerCommand) -> Result<Vec<LedgerEvent>, LedgerError> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }
}

impl AggregateRoot for Ledger {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Ledger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = LedgerError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::AccountOpened(e) => self.apply_opened(e),
            LedgerEvent::TransferMade(e) => self.apply_transfer(e),
            LedgerEvent::LoanGranted(e) => self.apply_loan(e),
            LedgerEvent::AccountClosed(e) => self.apply_closed(e),
        }
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::OpenAccount(cmd) => self.handle_open(cmd),
            LedgerCommand::Transfer(cmd) => self.handle_transfer(cmd),
            LedgerCommand::GrantLoan(cmd) => self.handle_grant_loan(cmd),
            LedgerCommand::CloseAccount(cmd) => self.handle_close(cmd),
        }
    }
}

impl Ledger {
    // ─────────────────────────────────────────────────────────────────────────
    // Command handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_open(&self, cmd: &OpenAccount) -> Result<Vec<LedgerEvent>, LedgerError> {
        let owner = cmd.owner.trim();
        if owner.is_empty() {
            return Err(DomainError::validation("owner name cannot be empty").into());
        }
        if !cmd.interest_rate.is_finite() || cmd.interest_rate < 0.0 {
            return Err(DomainError::validation("interest rate must be non-negative").into());
        }

        let username = Username::derive(owner)?;
        if self.get(&username).is_some() {
            return Err(DomainError::invariant("username already taken").into());
        }

        Ok(vec![LedgerEvent::AccountOpened(AccountOpened {
            account_id: cmd.account_id,
            owner: owner.to_string(),
            username,
            pin: cmd.pin,
            interest_rate: cmd.interest_rate,
            currency: cmd.currency.clone(),
            locale: cmd.locale.clone(),
            opening_movements: cmd.opening_movements.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_transfer(&self, cmd: &Transfer) -> Result<Vec<LedgerEvent>, LedgerError> {
        if cmd.amount <= 0 {
            return Err(LedgerError::InvalidTransfer("amount must be positive".into()));
        }

        let sender = self.get(&cmd.from).ok_or(LedgerError::AccountNotFound)?;
        let recipient = self
            .find(&cmd.to)
            .ok_or_else(|| LedgerError::InvalidTransfer("unknown recipient".into()))?;

        if recipient.username() == sender.username() {
            return Err(LedgerError::InvalidTransfer(
                "cannot transfer to the sending account".into(),
            ));
        }
        if sender.balance() < cmd.amount {
            return Err(LedgerError::InvalidTransfer("insufficient balance".into()));
        }

        Ok(vec![LedgerEvent::TransferMade(TransferMade {
            from: sender.username().clone(),
            to: recipient.username().clone(),
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_grant_loan(&self, cmd: &GrantLoan) -> Result<Vec<LedgerEvent>, LedgerError> {
        if cmd.amount <= 0 {
            return Err(LedgerError::InvalidLoan("amount must be positive".into()));
        }
        if self.get(&cmd.username).is_none() {
            return Err(LedgerError::AccountNotFound);
        }

        Ok(vec![LedgerEvent::LoanGranted(LoanGranted {
            username: cmd.username.clone(),
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_close(&self, cmd: &CloseAccount) -> Result<Vec<LedgerEvent>, LedgerError> {
        let account = self.get(&cmd.account).ok_or(LedgerError::AccountNotFound)?;

        // Close requires an exact, case-sensitive username match plus the PIN.
        if cmd.entered_username.trim() != account.username().as_str()
            || !account.pin_matches(cmd.entered_pin)
        {
            return Err(LedgerError::CloseDenied);
        }

        Ok(vec![LedgerEvent::AccountClosed(AccountClosed {
            username: account.username().clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event appliers
    // ─────────────────────────────────────────────────────────────────────────

    fn apply_opened(&mut self, e: &AccountOpened) {
        self.accounts.push(Account::from_opened(
            e.account_id,
            e.owner.clone(),
            e.username.clone(),
            e.pin,
            e.interest_rate,
            e.currency.clone(),
            e.locale.clone(),
            e.opening_movements.clone(),
        ));
    }

    fn apply_transfer(&mut self, e: &TransferMade) {
        if let Some(sender) = self.get_mut(&e.from) {
            sender.append(Movement::new(-e.amount, e.occurred_at));
        }
        if let Some(recipient) = self.get_mut(&e.to) {
            recipient.append(Movement::new(e.amount, e.occurred_at));
        }
    }

    fn apply_loan(&mut self, e: &LoanGranted) {
        if let Some(account) = self.get_mut(&e.username) {
            account.append(Movement::new(e.amount, e.occurred_at));
        }
    }

    fn apply_closed(&mut self, e: &AccountClosed) {
        self.accounts.retain(|a| a.username() != &e.username);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
