//! `ginko-ledger` — bank account ledger (accounts, movements, derived values).

pub mod account;
pub mod ledger;

pub use account::{Account, AccountSummary, Movement, Pin, Username};
pub use ledger::{
    AccountClosed, AccountOpened, CloseAccount, GrantLoan, Ledger, LedgerCommand, LedgerError,
    LedgerEvent, LoanGranted, OpenAccount, Transfer, TransferMade,
};
