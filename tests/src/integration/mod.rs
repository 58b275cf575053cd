//! # Integration Flows
//!
//! Every flow drives a relay core over an in-memory host with a deployed
//! ERC20 ledger, signing requests exactly as a wallet would.

pub mod fixtures;

mod batches;
mod ledger;
mod replay;
mod service;
