use crate::core::error::SettlementError;
use crate::core::participant::{validate_all, Participant, ParticipantId};
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

/// The caller-owned list of participants in a pool.
///
/// The roster is the collaborator side of the settlement contract: it holds
/// participants in insertion order, validates edits, and hands out ids.
/// Ids are monotonic and never reused, even after removal.
///
/// # Examples
///
/// ```
/// use pool_settlement::core::roster::ParticipantRoster;
/// use rust_decimal_macros::dec;
///
/// let mut roster = ParticipantRoster::new();
/// let a = roster.add("Asha", dec!(100), dec!(200)).unwrap();
/// let b = roster.add("Ravi", dec!(100), dec!(0)).unwrap();
/// roster.remove(a).unwrap();
/// let c = roster.add("Meera", dec!(50), dec!(0)).unwrap();
///
/// assert_ne!(c, a);
/// assert_ne!(c, b);
/// assert_eq!(roster.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParticipantRoster {
    participants: Vec<Participant>,
    next_id: u64,
}

impl ParticipantRoster {
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
            next_id: 1,
        }
    }

    /// A roster of `count` blank entries named "User 1" through "User n".
    pub fn with_placeholders(count: usize) -> Self {
        let mut roster = Self::new();
        for i in 1..=count {
            roster.push_unchecked(format!("User {}", i), Decimal::ZERO, Decimal::ZERO);
        }
        roster
    }

    /// Validate and append a new participant, returning its id.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        amount_invested: Decimal,
        amount_won: Decimal,
    ) -> Result<ParticipantId, SettlementError> {
        let id = self.peek_id();
        let candidate = Participant::new(id.value(), name, amount_invested, amount_won);
        candidate.validate()?;
        self.next_id = id.value() + 1;
        debug!("added participant {} ({})", id, candidate.name());
        self.participants.push(candidate);
        Ok(id)
    }

    /// Remove a participant. Its id is retired.
    pub fn remove(&mut self, id: ParticipantId) -> Result<Participant, SettlementError> {
        let idx = self.index_of(id)?;
        debug!("removed participant {}", id);
        Ok(self.participants.remove(idx))
    }

    pub fn rename(
        &mut self,
        id: ParticipantId,
        name: impl Into<String>,
    ) -> Result<(), SettlementError> {
        let idx = self.index_of(id)?;
        let mut updated = self.participants[idx].clone();
        updated.set_name(name.into());
        updated.validate()?;
        self.participants[idx] = updated;
        Ok(())
    }

    pub fn set_amounts(
        &mut self,
        id: ParticipantId,
        amount_invested: Decimal,
        amount_won: Decimal,
    ) -> Result<(), SettlementError> {
        let idx = self.index_of(id)?;
        let mut updated = self.participants[idx].clone();
        updated.set_amounts(amount_invested, amount_won);
        updated.validate()?;
        self.participants[idx] = updated;
        Ok(())
    }

    /// Build a roster from existing participants, keeping their ids.
    ///
    /// Every participant is validated and ids must be unique. New ids
    /// continue after the largest one.
    pub fn try_from_participants(
        participants: impl IntoIterator<Item = Participant>,
    ) -> Result<Self, SettlementError> {
        let participants: Vec<Participant> = participants.into_iter().collect();
        validate_all(&participants)?;
        let next_id = participants
            .iter()
            .map(|p| p.id().value() + 1)
            .max()
            .unwrap_or(1);
        Ok(Self {
            participants,
            next_id,
        })
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id() == id)
    }

    /// Participants in insertion order; this is the slice the engine borrows.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn peek_id(&self) -> ParticipantId {
        ParticipantId::new(self.next_id.max(1))
    }

    fn push_unchecked(&mut self, name: String, amount_invested: Decimal, amount_won: Decimal) {
        let id = self.peek_id();
        self.next_id = id.value() + 1;
        self.participants
            .push(Participant::new(id.value(), name, amount_invested, amount_won));
    }

    fn index_of(&self, id: ParticipantId) -> Result<usize, SettlementError> {
        self.participants
            .iter()
            .position(|p| p.id() == id)
            .ok_or(SettlementError::UnknownParticipant(id))
    }
}
