use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors arising from settlement and participant validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Fair shares are undefined for a pool with no participants.
    #[error("cannot settle an empty pool: at least one participant is required")]
    EmptyPool,
    #[error("{field} for participant {participant} must be non-negative, got {value}")]
    InvalidAmount {
        participant: String,
        field: AmountField,
        value: Decimal,
    },
    #[error("participant {participant} must have a non-empty name")]
    EmptyName { participant: ParticipantId },
    #[error("no participant with id {0}")]
    UnknownParticipant(ParticipantId),
    #[error("participant id {0} appears more than once")]
    DuplicateParticipant(ParticipantId),
    /// A pool total grew past what the engine can settle exactly.
    #[error("total {field} exceeds the supported limit of {limit}")]
    AmountOverflow { field: AmountField, limit: Decimal },
}

/// Which of a participant's two amounts failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    Invested,
    Won,
}

impl std::fmt::Display for AmountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmountField::Invested => write!(f, "amount invested"),
            AmountField::Won => write!(f, "amount won"),
        }
    }
}
