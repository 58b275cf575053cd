//! # Adapters Layer (Outer Hexagon)
//!
//! In-process implementations of the outbound ports.

pub mod erc20;
pub mod memory_host;

pub use erc20::*;
pub use memory_host::*;
