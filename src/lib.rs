//! # pool-settlement
//!
//! Fair-share settlement for shared betting and investment pools.
//!
//! Given what each participant put into a pool and what came back to them,
//! this engine works out what everyone would have had under an equal split
//! and produces the peer-to-peer transfers that get everyone there.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, roster, transfers, ledger, display currency
//! - **engine** — Net position calculation, greedy settlement, pool summary
//! - **simulation** — Random pool generation for benchmarks and testing

pub mod core;
pub mod engine;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::DisplayCurrency;
    pub use crate::core::error::SettlementError;
    pub use crate::core::ledger::PositionLedger;
    pub use crate::core::participant::{Participant, ParticipantId};
    pub use crate::core::roster::ParticipantRoster;
    pub use crate::core::transfer::Transfer;
    pub use crate::engine::settlement::{
        NetPosition, PoolTotals, SettlementEngine, SettlementPlan,
    };
    pub use crate::engine::summary::SettlementSummary;
}
