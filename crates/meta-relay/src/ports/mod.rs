//! # Ports Layer (Hexagonal Architecture)
//!
//! - `inbound`: API the relay core exposes
//! - `outbound`: execution substrate the relay core depends on

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
