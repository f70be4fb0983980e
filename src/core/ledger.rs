use crate::core::participant::ParticipantId;
use crate::core::transfer::Transfer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tolerance used when checking that positions sum or settle to zero.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// Tracks each participant's outstanding net position.
///
/// A positive balance means the participant was over-compensated and owes
/// the pool. A negative balance means they are owed.
///
/// The ledger starts from the engine's net positions and absorbs transfers:
/// paying reduces the payer's balance, receiving raises the payee's.
/// After a complete settlement every balance is zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionLedger {
    positions: HashMap<ParticipantId, Decimal>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from `(participant, net position)` pairs.
    pub fn from_positions(positions: impl IntoIterator<Item = (ParticipantId, Decimal)>) -> Self {
        let mut ledger = Self::new();
        for (id, amount) in positions {
            *ledger.positions.entry(id).or_insert(Decimal::ZERO) += amount;
        }
        ledger
    }

    /// Apply a transfer: payer's balance goes down, payee's goes up.
    pub fn apply_transfer(&mut self, transfer: &Transfer) {
        *self
            .positions
            .entry(transfer.from().id)
            .or_insert(Decimal::ZERO) -= transfer.amount();
        *self
            .positions
            .entry(transfer.to().id)
            .or_insert(Decimal::ZERO) += transfer.amount();
    }

    /// Outstanding balance for a participant; zero if unknown.
    pub fn position(&self, id: ParticipantId) -> Decimal {
        self.positions.get(&id).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn all_positions(&self) -> &HashMap<ParticipantId, Decimal> {
        &self.positions
    }

    /// Sum of all balances is zero, within `tolerance`.
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        let total: Decimal = self.positions.values().sum();
        total.abs() <= tolerance
    }

    /// Every individual balance is zero, within `tolerance`.
    pub fn is_settled(&self, tolerance: Decimal) -> bool {
        self.positions.values().all(|v| v.abs() <= tolerance)
    }

    /// Total still owed by over-compensated participants (sum of positive balances).
    pub fn total_outstanding(&self) -> Decimal {
        self.positions
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .sum()
    }
}
