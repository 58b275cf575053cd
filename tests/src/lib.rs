//! # Meta-Relay Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks (signature recovery, forwarding)
//! └── src/integration/  # End-to-end flows with real secp256k1 keys
//!     ├── fixtures.rs   # Deployed ledger, funded core, signing wallets
//!     ├── scenarios.rs  # Token and native fee paths
//!     ├── replay.rs     # Nonce and signature binding
//!     ├── whitelist.rs  # Signer and relayer gates
//!     ├── batches.rs    # Independent-but-sequential batches
//!     ├── ledger.rs     # ERC20 and native ledger behaviour
//!     └── service.rs    # Async service surface
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p relay-tests
//! cargo test -p relay-tests integration::batches::
//! cargo bench -p relay-tests
//! ```

pub mod integration;
