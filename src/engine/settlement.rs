use crate::core::currency::DisplayCurrency;
use crate::core::error::{AmountField, SettlementError};
use crate::core::ledger::{PositionLedger, BALANCE_TOLERANCE};
use crate::core::participant::{check_unique_ids, Participant, ParticipantId};
use crate::core::transfer::{Transfer, TransferParty};
use log::{debug, trace};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balances smaller than this are treated as settled.
///
/// Dividing pool totals by the participant count is the one inexact step,
/// and it leaves residues around the 28th significant digit. Without a
/// threshold those residues would surface as sub-cent transfers.
pub const DUST_THRESHOLD: Decimal = Decimal::from_parts(1, 0, 0, false, 18);

/// Largest pool total the engine accepts for either invested or won (10^27).
///
/// Keeps every derived sum, including the sum of all transfers, inside
/// `Decimal`'s range.
pub const MAX_POOL_TOTAL: Decimal =
    Decimal::from_parts(3_892_314_112, 2_681_241_660, 54_210_108, false, 0);

/// Pool-wide sums of what went in and what came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolTotals {
    pub total_invested: Decimal,
    pub total_won: Decimal,
}

impl PoolTotals {
    /// Pool profit (positive) or loss (negative).
    pub fn net_result(&self) -> Decimal {
        self.total_won - self.total_invested
    }
}

/// Which way a participant's money moves at settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    /// Over-compensated: pays others.
    Pays,
    /// Under-compensated: receives from others.
    Receives,
    Even,
}

/// A participant's outcome compared to an equal split of the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPosition {
    pub participant: ParticipantId,
    pub name: String,
    pub amount_invested: Decimal,
    pub amount_won: Decimal,
    pub fair_investment: Decimal,
    pub fair_winnings: Decimal,
    /// `amount_won - amount_invested`
    pub actual_result: Decimal,
    /// `fair_winnings - fair_investment`
    pub fair_result: Decimal,
    /// `actual_result - fair_result`. Positive means over-compensated.
    pub net_position: Decimal,
}

impl NetPosition {
    pub fn status(&self) -> PositionStatus {
        if self.net_position > DUST_THRESHOLD {
            PositionStatus::Pays
        } else if self.net_position < -DUST_THRESHOLD {
            PositionStatus::Receives
        } else {
            PositionStatus::Even
        }
    }

    fn party(&self) -> TransferParty {
        TransferParty::new(self.participant, self.name.clone())
    }
}

/// Everything derived from one settlement run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    totals: PoolTotals,
    participant_count: usize,
    fair_investment: Decimal,
    fair_winnings: Decimal,
    positions: Vec<NetPosition>,
    transfers: Vec<Transfer>,
}

impl SettlementPlan {
    pub fn totals(&self) -> PoolTotals {
        self.totals
    }

    pub fn participant_count(&self) -> usize {
        self.participant_count
    }

    /// What each participant would have invested under an equal split.
    pub fn fair_investment(&self) -> Decimal {
        self.fair_investment
    }

    /// What each participant would have won under an equal split.
    pub fn fair_winnings(&self) -> Decimal {
        self.fair_winnings
    }

    /// Net positions in input order.
    pub fn positions(&self) -> &[NetPosition] {
        &self.positions
    }

    pub fn position(&self, id: ParticipantId) -> Option<&NetPosition> {
        self.positions.iter().find(|p| p.participant == id)
    }

    /// Transfers in emission order.
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Ledger of net positions before any transfer is applied.
    pub fn opening_ledger(&self) -> PositionLedger {
        PositionLedger::from_positions(
            self.positions
                .iter()
                .map(|p| (p.participant, p.net_position)),
        )
    }

    /// Ledger after applying every transfer.
    pub fn closing_ledger(&self) -> PositionLedger {
        let mut ledger = self.opening_ledger();
        for transfer in &self.transfers {
            ledger.apply_transfer(transfer);
        }
        ledger
    }

    /// Net positions sum to zero.
    pub fn is_balanced(&self) -> bool {
        self.opening_ledger().is_balanced(BALANCE_TOLERANCE)
    }

    /// Applying every transfer leaves every participant at zero.
    pub fn is_closed(&self) -> bool {
        self.closing_ledger().is_settled(BALANCE_TOLERANCE)
    }

    /// Render the plan with a given currency.
    pub fn render(&self, currency: &DisplayCurrency) -> String {
        let mut out = String::new();
        out.push_str("=== Pool Summary ===\n");
        out.push_str(&format!(
            "Total Invested:            {}\n",
            currency.display(self.totals.total_invested)
        ));
        out.push_str(&format!(
            "Total Won:                 {}\n",
            currency.display(self.totals.total_won)
        ));
        out.push_str(&format!(
            "Net Result:                {}\n",
            currency.display(self.totals.net_result())
        ));
        out.push_str(&format!(
            "Fair Investment Per User:  {}\n",
            currency.display(self.fair_investment)
        ));
        out.push_str(&format!(
            "Fair Winnings Per User:    {}\n",
            currency.display(self.fair_winnings)
        ));

        out.push_str("\n=== Settlements ===\n");
        if self.transfers.is_empty() {
            out.push_str("No settlements needed.\n");
        }
        for t in &self.transfers {
            out.push_str(&format!(
                "{} should pay {} {}\n",
                t.from().name,
                t.to().name,
                currency.display(t.amount())
            ));
        }

        out.push_str("\n=== Individual Analysis ===\n");
        out.push_str(&format!(
            "{:<16} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
            "Name", "Invested", "Fair Invest.", "Won", "Fair Winnings", "Net Position"
        ));
        for p in &self.positions {
            out.push_str(&format!(
                "{:<16} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
                p.name,
                currency.format(p.amount_invested),
                currency.format(p.fair_investment),
                currency.format(p.amount_won),
                currency.format(p.fair_winnings),
                currency.format(p.net_position),
            ));
        }
        out
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(&DisplayCurrency::default()))
    }
}

/// The settlement engine.
///
/// Stateless: every call derives totals, positions and transfers from the
/// participant slice it is given. The engine assumes inputs are already
/// validated (non-blank names, non-negative amounts); see
/// [`validate_all`](crate::core::participant::validate_all).
pub struct SettlementEngine;

impl SettlementEngine {
    /// Sum invested and won amounts. `(0, 0)` for an empty slice.
    ///
    /// Fails with [`SettlementError::AmountOverflow`] when either total
    /// exceeds [`MAX_POOL_TOTAL`].
    pub fn compute_totals(participants: &[Participant]) -> Result<PoolTotals, SettlementError> {
        participants
            .iter()
            .try_fold(PoolTotals::default(), |totals, p| -> Result<_, SettlementError> {
                Ok(PoolTotals {
                    total_invested: add_bounded(
                        totals.total_invested,
                        p.amount_invested(),
                        AmountField::Invested,
                    )?,
                    total_won: add_bounded(totals.total_won, p.amount_won(), AmountField::Won)?,
                })
            })
    }

    /// Compare each participant's result against an equal split of `totals`.
    ///
    /// Fails with [`SettlementError::EmptyPool`] when there are no participants
    /// and with [`SettlementError::DuplicateParticipant`] when two share an id.
    pub fn compute_net_positions(
        participants: &[Participant],
        totals: &PoolTotals,
    ) -> Result<Vec<NetPosition>, SettlementError> {
        if participants.is_empty() {
            return Err(SettlementError::EmptyPool);
        }
        check_unique_ids(participants)?;

        let n = Decimal::from(participants.len());
        let fair_investment = totals.total_invested / n;
        let fair_winnings = totals.total_won / n;
        let fair_result = fair_winnings - fair_investment;

        Ok(participants
            .iter()
            .map(|p| {
                let actual_result = p.actual_result();
                NetPosition {
                    participant: p.id(),
                    name: p.name().to_string(),
                    amount_invested: p.amount_invested(),
                    amount_won: p.amount_won(),
                    fair_investment,
                    fair_winnings,
                    actual_result,
                    fair_result,
                    net_position: actual_result - fair_result,
                }
            })
            .collect())
    }

    /// Greedily match over-compensated participants with under-compensated ones.
    ///
    /// # Algorithm
    ///
    /// 1. Split positions into payers (net > 0) and receivers (net < 0),
    ///    each keeping input order.
    /// 2. For each payer in order, walk the receivers in order and pay each
    ///    one `min(remaining, owed)` until the payer is exhausted.
    /// 3. Receivers' outstanding balances carry over from one payer to the
    ///    next, so a receiver settled by an earlier payer is skipped.
    ///
    /// Transfers come out in traversal order, so equal balances are settled
    /// by whichever receiver appears first in the input. At most
    /// `payers + receivers - 1` transfers are produced.
    ///
    /// Positions whose magnitude is at most [`DUST_THRESHOLD`] count as even:
    /// they are neither payers nor receivers and never appear in a transfer.
    /// Likewise no transfer of [`DUST_THRESHOLD`] or less is emitted.
    pub fn compute_settlements(positions: &[NetPosition]) -> Vec<Transfer> {
        let mut balances: Vec<Decimal> = positions.iter().map(|p| p.net_position).collect();
        let payers: Vec<usize> = (0..positions.len())
            .filter(|&i| balances[i] > DUST_THRESHOLD)
            .collect();
        let receivers: Vec<usize> = (0..positions.len())
            .filter(|&i| balances[i] < -DUST_THRESHOLD)
            .collect();
        debug!(
            "settling {} payers against {} receivers",
            payers.len(),
            receivers.len()
        );

        let mut transfers = Vec::new();
        for &payer in &payers {
            let mut remaining = balances[payer];

            for &receiver in &receivers {
                if remaining <= DUST_THRESHOLD {
                    break;
                }
                if balances[receiver] >= -DUST_THRESHOLD {
                    continue;
                }

                debug_assert_ne!(payer, receiver);
                let amount = remaining.min(-balances[receiver]);
                if amount <= DUST_THRESHOLD {
                    continue;
                }

                trace!(
                    "{} -> {}: {} (payer remaining {})",
                    positions[payer].name,
                    positions[receiver].name,
                    amount,
                    remaining - amount
                );
                transfers.push(Transfer::new(
                    positions[payer].party(),
                    positions[receiver].party(),
                    amount,
                ));
                remaining -= amount;
                balances[receiver] += amount;
            }

            balances[payer] = remaining;
        }

        debug!("emitted {} transfers", transfers.len());
        transfers
    }

    /// Compute the full settlement plan for a pool.
    ///
    /// # Examples
    ///
    /// ```
    /// use pool_settlement::core::participant::Participant;
    /// use pool_settlement::engine::settlement::SettlementEngine;
    /// use rust_decimal_macros::dec;
    ///
    /// let pool = vec![
    ///     Participant::new(1, "A", dec!(100), dec!(200)),
    ///     Participant::new(2, "B", dec!(100), dec!(0)),
    /// ];
    /// let plan = SettlementEngine::settle(&pool).unwrap();
    ///
    /// assert_eq!(plan.transfers().len(), 1);
    /// assert_eq!(plan.transfers()[0].to_string(), "A should pay B 100.00");
    /// assert!(plan.is_closed());
    /// ```
    pub fn settle(participants: &[Participant]) -> Result<SettlementPlan, SettlementError> {
        let totals = Self::compute_totals(participants)?;
        let positions = Self::compute_net_positions(participants, &totals)?;
        debug!(
            "pool of {}: invested {}, won {}",
            participants.len(),
            totals.total_invested,
            totals.total_won
        );
        let transfers = Self::compute_settlements(&positions);

        // Every position carries the same fair shares.
        let (fair_investment, fair_winnings) = positions
            .first()
            .map(|p| (p.fair_investment, p.fair_winnings))
            .unwrap_or_default();

        Ok(SettlementPlan {
            totals,
            participant_count: participants.len(),
            fair_investment,
            fair_winnings,
            positions,
            transfers,
        })
    }
}

fn add_bounded(
    total: Decimal,
    amount: Decimal,
    field: AmountField,
) -> Result<Decimal, SettlementError> {
    total
        .checked_add(amount)
        .filter(|sum| *sum <= MAX_POOL_TOTAL)
        .ok_or(SettlementError::AmountOverflow {
            field,
            limit: MAX_POOL_TOTAL,
        })
}
