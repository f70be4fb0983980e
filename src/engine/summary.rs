use crate::core::currency::DisplayCurrency;
use crate::core::participant::ParticipantId;
use crate::engine::settlement::SettlementPlan;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pool-level report of a settlement plan: who pays how much in total,
/// who receives how much, and how the pool did overall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub participant_count: usize,
    pub total_invested: Decimal,
    pub total_won: Decimal,
    /// `total_won - total_invested`
    pub net_result: Decimal,
    pub fair_investment: Decimal,
    pub fair_winnings: Decimal,
    /// Total each payer sends across all of their transfers.
    pub outgoing: HashMap<ParticipantId, Decimal>,
    /// Total each receiver gets across all of their transfers.
    pub incoming: HashMap<ParticipantId, Decimal>,
    /// Display names of everyone who pays or receives.
    pub names: HashMap<ParticipantId, String>,
    pub total_transferred: Decimal,
    pub transfer_count: usize,
}

impl SettlementSummary {
    pub fn from_plan(plan: &SettlementPlan) -> Self {
        let mut outgoing: HashMap<ParticipantId, Decimal> = HashMap::new();
        let mut incoming: HashMap<ParticipantId, Decimal> = HashMap::new();
        let mut names: HashMap<ParticipantId, String> = HashMap::new();
        let mut total_transferred = Decimal::ZERO;

        for t in plan.transfers() {
            *outgoing.entry(t.from().id).or_insert(Decimal::ZERO) += t.amount();
            *incoming.entry(t.to().id).or_insert(Decimal::ZERO) += t.amount();
            total_transferred += t.amount();
            for id in [t.from().id, t.to().id] {
                if let Some(position) = plan.position(id) {
                    names.entry(id).or_insert_with(|| position.name.clone());
                }
            }
        }

        let totals = plan.totals();
        SettlementSummary {
            participant_count: plan.participant_count(),
            total_invested: totals.total_invested,
            total_won: totals.total_won,
            net_result: totals.net_result(),
            fair_investment: plan.fair_investment(),
            fair_winnings: plan.fair_winnings(),
            outgoing,
            incoming,
            names,
            total_transferred,
            transfer_count: plan.transfers().len(),
        }
    }

    /// Pool return on investment, in percent. Zero when nothing was invested.
    pub fn return_percent(&self) -> f64 {
        if self.total_invested == Decimal::ZERO {
            return 0.0;
        }
        self.net_result
            .checked_div(self.total_invested)
            .and_then(|ratio| ratio.to_f64())
            .map_or(0.0, |ratio| ratio * 100.0)
    }

    /// `name (#id)`, or `#id` alone for an id not in the plan.
    fn label(&self, id: ParticipantId) -> String {
        match self.names.get(&id) {
            Some(name) => format!("{} (#{})", name, id),
            None => format!("#{}", id),
        }
    }

    pub fn render(&self, currency: &DisplayCurrency) -> String {
        let mut out = String::new();
        out.push_str("=== Settlement Summary ===\n");
        out.push_str(&format!("Participants:      {}\n", self.participant_count));
        out.push_str(&format!(
            "Net Result:        {}\n",
            currency.display(self.net_result)
        ));
        out.push_str(&format!("Pool Return:       {:.1}%\n", self.return_percent()));
        out.push_str(&format!("Transfers:         {}\n", self.transfer_count));
        out.push_str(&format!(
            "Total Transferred: {}\n",
            currency.display(self.total_transferred)
        ));

        let mut payers: Vec<_> = self.outgoing.iter().collect();
        payers.sort_by_key(|(id, _)| **id);
        if !payers.is_empty() {
            out.push_str("\nPayers:\n");
        }
        for (id, amount) in payers {
            out.push_str(&format!(
                "  {} pays {}\n",
                self.label(*id),
                currency.display(*amount)
            ));
        }

        let mut receivers: Vec<_> = self.incoming.iter().collect();
        receivers.sort_by_key(|(id, _)| **id);
        if !receivers.is_empty() {
            out.push_str("\nReceivers:\n");
        }
        for (id, amount) in receivers {
            out.push_str(&format!(
                "  {} receives {}\n",
                self.label(*id),
                currency.display(*amount)
            ));
        }
        out
    }
}

impl std::fmt::Display for SettlementSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(&DisplayCurrency::default()))
    }
}
