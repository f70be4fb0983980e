use crate::core::currency::round_for_display;
use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of a transfer: who pays or who receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferParty {
    pub id: ParticipantId,
    pub name: String,
}

impl TransferParty {
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A directed payment from an over-compensated participant to an
/// under-compensated one.
///
/// `amount` is kept at full precision so that applying every transfer of a
/// plan brings all net positions back to zero. Use
/// [`Transfer::display_amount`] for the two-decimal figure shown to people.
///
/// # Examples
///
/// ```
/// use pool_settlement::core::participant::ParticipantId;
/// use pool_settlement::core::transfer::{Transfer, TransferParty};
/// use rust_decimal_macros::dec;
///
/// let t = Transfer::new(
///     TransferParty::new(ParticipantId::new(1), "Asha"),
///     TransferParty::new(ParticipantId::new(2), "Ravi"),
///     dec!(33.3333333),
/// );
/// assert_eq!(t.display_amount(), dec!(33.33));
/// assert_eq!(t.to_string(), "Asha should pay Ravi 33.33");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    from: TransferParty,
    to: TransferParty,
    amount: Decimal,
}

impl Transfer {
    /// Create a transfer.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive. Payer and payee are kept apart by
    /// the engine, which never pairs a position with itself.
    pub fn new(from: TransferParty, to: TransferParty, amount: Decimal) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Transfer amount must be positive, got {}",
            amount
        );
        Self { from, to, amount }
    }

    // --- Accessors ---

    pub fn from(&self) -> &TransferParty {
        &self.from
    }

    pub fn to(&self) -> &TransferParty {
        &self.to
    }

    /// Exact amount, unrounded.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Amount rounded to two decimal places.
    pub fn display_amount(&self) -> Decimal {
        round_for_display(self.amount, 2)
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} should pay {} {:.2}",
            self.from.name,
            self.to.name,
            self.display_amount()
        )
    }
}
