//! Demo seed data.
//!
//! In a real deployment accounts would come from a store; here they are
//! seeded in memory on every run. Seeding goes through the normal
//! `OpenAccount` path so validation and username uniqueness apply.

use chrono::{Duration, Utc};

use ginko_core::{AccountId, LedgerId};
use ginko_ledger::{Ledger, LedgerCommand, LedgerError, Movement, OpenAccount, Pin};

struct Seed {
    owner: &'static str,
    pin: u32,
    interest_rate: f64,
    locale: &'static str,
    movements: &'static [i64],
}

const SEEDS: [Seed; 4] = [
    Seed {
        owner: "Gary Wintle",
        pin: 114,
        interest_rate: 1.2,
        locale: "en-GB",
        movements: &[200, 450, -400, 3000, -650, -130, 70, 1300],
    },
    Seed {
        owner: "Michiyo Arakawa",
        pin: 910,
        interest_rate: 1.5,
        locale: "ja-JP",
        movements: &[5000, 3400, -150, -790, -3210, -1000, 8500, -30],
    },
    Seed {
        owner: "Casey Sota",
        pin: 316,
        interest_rate: 0.7,
        locale: "en-US",
        movements: &[200, -200, 340, -300, -20, 50, 400, -460],
    },
    Seed {
        owner: "Yasuo Arakawa",
        pin: 119,
        interest_rate: 1.0,
        locale: "ja-JP",
        movements: &[430, 1000, 700, 50, 90],
    },
];

/// Build a ledger holding the four demo accounts.
pub fn demo_ledger() -> Result<Ledger, LedgerError> {
    let mut ledger = Ledger::new(LedgerId::new());
    let now = Utc::now();

    for seed in SEEDS {
        // Spread the movement history over the preceding days, one per day.
        let movements = seed
            .movements
            .iter()
            .enumerate()
            .map(|(i, amount)| {
                let age = Duration::days((seed.movements.len() - i) as i64);
                Movement::new(*amount, now - age)
            })
            .collect();

        ledger.execute(&LedgerCommand::OpenAccount(OpenAccount {
            account_id: AccountId::new(),
            owner: seed.owner.to_string(),
            pin: Pin::new(seed.pin),
            interest_rate: seed.interest_rate,
            currency: "JPY".to_string(),
            locale: seed.locale.to_string(),
            opening_movements: movements,
            occurred_at: now,
        }))?;
    }

    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_ledger_seeds_four_accounts() {
        let ledger = demo_ledger().unwrap();
        assert_eq!(ledger.accounts().len(), 4);

        let gw = ledger.find("gw").unwrap();
        assert_eq!(gw.owner(), "Gary Wintle");
        assert_eq!(gw.balance(), 3840);
        assert_eq!(ledger.find("ma").unwrap().balance(), 11720);
        assert_eq!(ledger.find("cs").unwrap().balance(), 10);
        assert_eq!(ledger.find("ya").unwrap().balance(), 2270);
    }

    #[test]
    fn seed_timestamps_are_non_decreasing() {
        let ledger = demo_ledger().unwrap();
        for account in ledger.accounts() {
            let timestamps: Vec<_> = account.movements().iter().map(|m| m.occurred_at).collect();
            assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }
}
