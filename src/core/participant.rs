use crate::core::error::{AmountField, SettlementError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identifier for a participant in a pool.
///
/// Ids are handed out by [`ParticipantRoster`](crate::core::roster::ParticipantRoster)
/// and stay attached to a participant across renames and amount edits.
///
/// # Examples
///
/// ```
/// use pool_settlement::core::participant::ParticipantId;
///
/// let a = ParticipantId::new(1);
/// let b = ParticipantId::new(2);
/// assert_ne!(a, b);
/// assert!(a < b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u64);

impl ParticipantId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ParticipantId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// One member of a shared pool: what they put in and what came back to them.
///
/// # Examples
///
/// ```
/// use pool_settlement::core::participant::Participant;
/// use rust_decimal_macros::dec;
///
/// let p = Participant::new(1, "Asha", dec!(100), dec!(250));
/// assert_eq!(p.actual_result(), dec!(150));
/// assert!(p.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    name: String,
    amount_invested: Decimal,
    amount_won: Decimal,
}

impl Participant {
    /// Create a participant. No validation is performed; see [`Participant::validate`].
    pub fn new(
        id: u64,
        name: impl Into<String>,
        amount_invested: Decimal,
        amount_won: Decimal,
    ) -> Self {
        Self {
            id: ParticipantId::new(id),
            name: name.into(),
            amount_invested,
            amount_won,
        }
    }

    /// Check the invariants the settlement engine assumes but does not enforce:
    /// a non-blank name and non-negative amounts.
    pub fn validate(&self) -> Result<(), SettlementError> {
        if self.name.trim().is_empty() {
            return Err(SettlementError::EmptyName {
                participant: self.id,
            });
        }
        check_amount(&self.name, AmountField::Invested, self.amount_invested)?;
        check_amount(&self.name, AmountField::Won, self.amount_won)?;
        Ok(())
    }

    // --- Accessors ---

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount_invested(&self) -> Decimal {
        self.amount_invested
    }

    pub fn amount_won(&self) -> Decimal {
        self.amount_won
    }

    /// Profit or loss actually realised: won minus invested.
    pub fn actual_result(&self) -> Decimal {
        self.amount_won - self.amount_invested
    }

    // --- Mutators used by the roster ---

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_amounts(&mut self, amount_invested: Decimal, amount_won: Decimal) {
        self.amount_invested = amount_invested;
        self.amount_won = amount_won;
    }
}

fn check_amount(name: &str, field: AmountField, value: Decimal) -> Result<(), SettlementError> {
    if value < Decimal::ZERO {
        return Err(SettlementError::InvalidAmount {
            participant: name.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

/// Validate every participant and check that ids are unique, stopping at
/// the first failure.
pub fn validate_all(participants: &[Participant]) -> Result<(), SettlementError> {
    participants.iter().try_for_each(Participant::validate)?;
    check_unique_ids(participants)
}

/// Fail with [`SettlementError::DuplicateParticipant`] on the first id seen twice.
pub fn check_unique_ids(participants: &[Participant]) -> Result<(), SettlementError> {
    let mut seen = HashSet::with_capacity(participants.len());
    for p in participants {
        if !seen.insert(p.id()) {
            return Err(SettlementError::DuplicateParticipant(p.id()));
        }
    }
    Ok(())
}
