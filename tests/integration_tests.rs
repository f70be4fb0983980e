use pool_settlement::core::currency::DisplayCurrency;
use pool_settlement::core::error::{AmountField, SettlementError};
use pool_settlement::core::participant::{validate_all, Participant, ParticipantId};
use pool_settlement::core::roster::ParticipantRoster;
use pool_settlement::engine::settlement::{PositionStatus, SettlementEngine};
use pool_settlement::engine::summary::SettlementSummary;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Full pipeline: roster edits → validation → settlement → summary.
#[test]
fn full_pipeline_hedging_pool() {
    let mut roster = ParticipantRoster::with_placeholders(2);
    let user1 = roster.participants()[0].id();
    let user2 = roster.participants()[1].id();

    roster.rename(user1, "Asha").unwrap();
    roster.set_amounts(user1, dec!(500), dec!(1200)).unwrap();
    roster.rename(user2, "Ravi").unwrap();
    roster.set_amounts(user2, dec!(500), dec!(0)).unwrap();
    let meera = roster.add("Meera", dec!(500), dec!(300)).unwrap();
    let dev = roster.add("Dev", dec!(500), dec!(500)).unwrap();

    assert!(validate_all(roster.participants()).is_ok());

    // Totals: invested 2000, won 2000. Fair result is zero for everyone.
    let plan = SettlementEngine::settle(roster.participants()).unwrap();
    assert_eq!(plan.totals().total_invested, dec!(2000));
    assert_eq!(plan.totals().total_won, dec!(2000));
    assert_eq!(plan.fair_investment(), dec!(500));
    assert_eq!(plan.fair_winnings(), dec!(500));

    // Net: Asha +700, Ravi -500, Meera -200, Dev 0.
    assert_eq!(plan.position(user1).unwrap().net_position, dec!(700));
    assert_eq!(plan.position(meera).unwrap().net_position, dec!(-200));
    assert_eq!(plan.position(dev).unwrap().status(), PositionStatus::Even);

    let lines: Vec<String> = plan.transfers().iter().map(|t| t.to_string()).collect();
    assert_eq!(
        lines,
        vec!["Asha should pay Ravi 500.00", "Asha should pay Meera 200.00"]
    );
    assert!(plan.is_balanced());
    assert!(plan.is_closed());

    let summary = SettlementSummary::from_plan(&plan);
    assert_eq!(summary.total_transferred, dec!(700));
    assert_eq!(summary.outgoing[&user1], dec!(700));
    assert_eq!(summary.incoming[&user2], dec!(500));
}

/// A pool that made a profit overall still settles to an equal split.
#[test]
fn profitable_pool_shares_profit_equally() {
    let pool = vec![
        Participant::new(1, "A", dec!(100), dec!(600)),
        Participant::new(2, "B", dec!(300), dec!(0)),
    ];
    let plan = SettlementEngine::settle(&pool).unwrap();
    assert_eq!(plan.totals().net_result(), dec!(200));

    // Fair: invest 200, win 300, result +100. A: 500 - 100 = +400, B: -300 - 100 = -400.
    assert_eq!(plan.transfers().len(), 1);
    assert_eq!(plan.transfers()[0].amount(), dec!(400));

    // After settlement both end on the pool's per-head result.
    let a_final = pool[0].actual_result() - plan.transfers()[0].amount();
    let b_final = pool[1].actual_result() + plan.transfers()[0].amount();
    assert_eq!(a_final, b_final);
    assert_eq!(a_final, plan.totals().net_result() / Decimal::from(2));
}

/// Removing a participant changes the fair share on the next run.
#[test]
fn recompute_after_removal() {
    let mut roster = ParticipantRoster::new();
    let a = roster.add("A", dec!(100), dec!(300)).unwrap();
    roster.add("B", dec!(100), dec!(0)).unwrap();
    let c = roster.add("C", dec!(100), dec!(0)).unwrap();

    let before = SettlementEngine::settle(roster.participants()).unwrap();
    assert_eq!(before.fair_winnings(), dec!(100));
    assert_eq!(before.transfers().len(), 2);

    roster.remove(c).unwrap();
    let after = SettlementEngine::settle(roster.participants()).unwrap();
    assert_eq!(after.fair_winnings(), dec!(150));
    assert_eq!(after.transfers().len(), 1);
    assert_eq!(after.transfers()[0].from().id, a);
    assert_eq!(after.transfers()[0].amount(), dec!(150));
}

/// Removing everyone leaves nothing to settle.
#[test]
fn empty_roster_is_an_error() {
    let mut roster = ParticipantRoster::new();
    let a = roster.add("A", dec!(10), dec!(0)).unwrap();
    roster.remove(a).unwrap();

    assert_eq!(
        SettlementEngine::settle(roster.participants()).unwrap_err(),
        SettlementError::EmptyPool
    );
}

/// Test JSON serialization of settlement plans.
#[test]
fn settlement_plan_serializes() {
    let pool = vec![
        Participant::new(1, "A", dec!(100), dec!(200)),
        Participant::new(2, "B", dec!(100), dec!(0)),
    ];
    let plan = SettlementEngine::settle(&pool).unwrap();
    let json = serde_json::to_string_pretty(&plan).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed.get("totals").is_some());
    assert!(parsed.get("positions").is_some());
    assert_eq!(parsed["transfers"][0]["from"]["name"], "A");
    assert_eq!(parsed["transfers"][0]["to"]["id"], 2);
    let amount: Decimal = parsed["transfers"][0]["amount"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(amount, dec!(100));
}

/// Participants round-trip through JSON with ids and amounts intact.
#[test]
fn participant_json_round_trip() {
    let p = Participant::new(7, "Meera", dec!(250.75), dec!(0));
    let json = serde_json::to_string(&p).unwrap();
    let back: Participant = serde_json::from_str(&json).unwrap();
    assert_eq!(back, p);
}

/// Rendering uses the configured currency.
#[test]
fn render_with_custom_currency() {
    let pool = vec![
        Participant::new(1, "A", dec!(0), dec!(100)),
        Participant::new(2, "B", dec!(0), dec!(0)),
        Participant::new(3, "C", dec!(0), dec!(0)),
    ];
    let plan = SettlementEngine::settle(&pool).unwrap();
    let text = plan.render(&DisplayCurrency::new("€", 2));

    assert!(text.contains("A should pay B €33.33"));
    assert!(text.contains("A should pay C €33.33"));
    assert!(text.contains("Fair Winnings Per User:    €33.33"));
}

/// Participants sharing an id are rejected at every entry point instead of settling.
#[test]
fn shared_ids_are_rejected() {
    let pool = vec![
        Participant::new(1, "A", dec!(100), dec!(200)),
        Participant::new(1, "B", dec!(100), dec!(0)),
    ];
    let expected = SettlementError::DuplicateParticipant(ParticipantId::new(1));

    assert_eq!(validate_all(&pool).unwrap_err(), expected);
    assert_eq!(
        ParticipantRoster::try_from_participants(pool.clone()).unwrap_err(),
        expected
    );
    assert_eq!(SettlementEngine::settle(&pool).unwrap_err(), expected);
}

/// Pool totals past the supported limit are an error, not a panic.
#[test]
fn oversized_pool_is_an_error() {
    let mut roster = ParticipantRoster::new();
    roster.add("A", Decimal::MAX, dec!(0)).unwrap();
    roster.add("B", Decimal::MAX, dec!(0)).unwrap();

    assert!(validate_all(roster.participants()).is_ok());
    assert!(matches!(
        SettlementEngine::settle(roster.participants()),
        Err(SettlementError::AmountOverflow {
            field: AmountField::Invested,
            ..
        })
    ));
}
