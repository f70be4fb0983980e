pub mod currency;
pub mod error;
pub mod ledger;
pub mod participant;
pub mod roster;
pub mod transfer;
