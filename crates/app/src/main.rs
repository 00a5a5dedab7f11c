use anyhow::Result;

use ginko_app::{AccountSnapshot, Dashboard, DashboardConfig, Presenter, SessionEnd, seed};

/// Minimal terminal presenter for the demo run. Formatting decisions
/// (symbols, date phrasing) live here, not in the core.
struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn render(&mut self, snapshot: &AccountSnapshot) {
        println!(
            "── {} ({}) ──────────────────────────",
            snapshot.owner, snapshot.username
        );
        for (i, movement) in snapshot.movements.iter().enumerate() {
            let kind = if movement.is_deposit() {
                "deposit"
            } else {
                "withdrawal"
            };
            println!(
                "  {:>2} {:<10} {:>8} {}  {}",
                i + 1,
                kind,
                movement.amount,
                snapshot.currency,
                movement.occurred_at.format("%Y-%m-%d")
            );
        }
        let s = &snapshot.summary;
        println!(
            "  balance {}  in {}  out {}  interest {:.2}",
            s.balance, s.total_in, s.total_out, s.interest
        );
    }

    fn loan_pending(&mut self, amount: i64) {
        println!("  loan of {amount} approved, crediting shortly...");
    }

    fn timer_tick(&mut self, remaining: u32) {
        tracing::debug!(remaining, "session countdown");
    }

    fn session_ended(&mut self, reason: SessionEnd) {
        match reason {
            SessionEnd::Expired => println!("  session expired, logged out"),
            SessionEnd::AccountClosed => println!("  account closed, goodbye"),
        }
    }
}

fn main() -> Result<()> {
    ginko_observability::init();

    let config = DashboardConfig::from_env();
    let ledger = seed::demo_ledger()?;
    let mut dashboard = Dashboard::new(ledger, config, ConsolePresenter);

    dashboard.login("gw", "114")?;
    dashboard.transfer("ma", "500")?;
    dashboard.request_loan("1000")?;

    // Drive the cooperative clock until the pending grant lands and the
    // session eventually expires.
    while dashboard.has_session() {
        dashboard.tick();
    }

    Ok(())
}
