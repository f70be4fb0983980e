//! Settling a match-day hedging pool.
//!
//! Four friends split their stakes across different outcomes. One bet
//! came in; the rest did not. The engine works out who pays whom so that
//! everyone ends up as if they had shared stakes and winnings equally.

use pool_settlement::core::currency::DisplayCurrency;
use pool_settlement::core::roster::ParticipantRoster;
use pool_settlement::engine::settlement::SettlementEngine;
use pool_settlement::engine::summary::SettlementSummary;
use rust_decimal_macros::dec;

fn main() {
    println!("╔═════════════════════════════════════════╗");
    println!("║  pool-settlement: Hedging Pool Example  ║");
    println!("╚═════════════════════════════════════════╝\n");

    let mut roster = ParticipantRoster::new();
    let entries = [
        ("Asha", dec!(1000), dec!(3400)),
        ("Ravi", dec!(800), dec!(0)),
        ("Meera", dec!(1200), dec!(0)),
        ("Dev", dec!(1000), dec!(600)),
    ];
    for (name, invested, won) in entries {
        if let Err(e) = roster.add(name, invested, won) {
            eprintln!("Skipping {}: {}", name, e);
        }
    }

    let plan = match SettlementEngine::settle(roster.participants()) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Cannot settle: {}", e);
            return;
        }
    };

    let currency = DisplayCurrency::default();
    println!("{}", plan.render(&currency));
    println!("{}", SettlementSummary::from_plan(&plan).render(&currency));

    println!("━━━ Check ━━━\n");
    println!("  Positions balance: {}", plan.is_balanced());
    println!("  Transfers close:   {}", plan.is_closed());
}
