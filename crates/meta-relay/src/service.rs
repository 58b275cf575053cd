//! # Relay Service
//!
//! Async front of a relay core. A single `tokio::sync::Mutex` around the
//! orchestrator is the serialization point: forwards, batches and
//! administrative calls never interleave.

use crate::adapters::InMemoryHost;
use crate::config::{ConfigError, RelayConfig};
use crate::domain::entities::{ForwardBatch, ForwardOutcome, ForwardReceipt, ForwardRequest};
use crate::domain::value_objects::{Address, FeeAsset, U256};
use crate::errors::{RejectKind, RelayError};
use crate::orchestrator::RelayOrchestrator;
use crate::ports::inbound::MetaRelayApi;
use crate::ports::outbound::ExecutionHost;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{info, instrument};

/// Statistics for the relay service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Settled forwards, single or batched.
    pub forwards_settled: u64,
    /// Rejected forwards, single or batched.
    pub forwards_rejected: u64,
    /// Rejections broken down by kind.
    pub rejections: HashMap<RejectKind, u64>,
    /// Batches accepted for processing.
    pub batches_processed: u64,
    /// Batches rejected as a whole.
    pub batches_rejected: u64,
    /// Fees paid to relayers, per asset.
    pub fees_paid: HashMap<FeeAsset, U256>,
}

impl ServiceStats {
    fn record(&mut self, outcome: &Result<ForwardReceipt, RelayError>) {
        match outcome {
            Ok(receipt) => {
                self.forwards_settled += 1;
                let paid = self.fees_paid.entry(receipt.fee_asset).or_default();
                *paid = paid.saturating_add(receipt.fee_amount);
            }
            Err(e) => {
                self.forwards_rejected += 1;
                *self.rejections.entry(e.kind()).or_default() += 1;
            }
        }
    }

    /// Rejections of one kind.
    #[must_use]
    pub fn rejected(&self, kind: RejectKind) -> u64 {
        self.rejections.get(&kind).copied().unwrap_or(0)
    }
}

/// The relay service.
pub struct RelayService<H: ExecutionHost> {
    core: Arc<Mutex<RelayOrchestrator<H>>>,
    stats: Arc<RwLock<ServiceStats>>,
}

impl<H: ExecutionHost> Clone for RelayService<H> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<H: ExecutionHost> RelayService<H> {
    /// Create a service over `host`.
    ///
    /// # Errors
    ///
    /// The configuration fails validation.
    pub fn new(config: RelayConfig, host: H) -> Result<Self, ConfigError> {
        let core = RelayOrchestrator::new(&config, host)?;
        info!(
            core = %config.core_address,
            max_batch_size = config.max_batch_size,
            signer_whitelist = config.signer_whitelist_enabled,
            relayer_whitelist = config.relayer_whitelist_enabled,
            "Relay core started"
        );
        Ok(Self {
            core: Arc::new(Mutex::new(core)),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        })
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Exclusive access to the core, e.g. for funding through the host.
    ///
    /// Holds the serialization lock until dropped.
    pub async fn lock(&self) -> MutexGuard<'_, RelayOrchestrator<H>> {
        self.core.lock().await
    }
}

/// Service over a fresh in-memory host (for testing).
///
/// # Errors
///
/// The configuration fails validation.
pub fn create_test_service(core: Address) -> Result<RelayService<InMemoryHost>, ConfigError> {
    RelayService::new(RelayConfig::for_core(core), InMemoryHost::new())
}

// =============================================================================
// MetaRelayApi Implementation
// =============================================================================

#[async_trait]
impl<H: ExecutionHost + 'static> MetaRelayApi for RelayService<H> {
    #[instrument(skip(self, request), fields(signer = %request.signer, nonce = %request.nonce))]
    async fn forward(
        &self,
        relayer: Address,
        request: ForwardRequest,
    ) -> Result<ForwardReceipt, RelayError> {
        let outcome = self.core.lock().await.forward(relayer, &request);
        self.stats.write().await.record(&outcome);
        outcome
    }

    #[instrument(skip(self, batch), fields(size = batch.len()))]
    async fn forward_batch(
        &self,
        relayer: Address,
        batch: ForwardBatch,
    ) -> Result<Vec<ForwardOutcome>, RelayError> {
        let result = self.core.lock().await.forward_batch(relayer, batch);

        let mut stats = self.stats.write().await;
        match &result {
            Ok(outcomes) => {
                stats.batches_processed += 1;
                for outcome in outcomes {
                    stats.record(outcome);
                }
            }
            Err(_) => stats.batches_rejected += 1,
        }
        result
    }

    async fn toggle_signer_whitelist(&self) -> bool {
        self.core.lock().await.toggle_signer_whitelist()
    }

    async fn toggle_relayer_whitelist(&self) -> bool {
        self.core.lock().await.toggle_relayer_whitelist()
    }

    async fn add_to_whitelist(&self, address: Address) -> bool {
        self.core.lock().await.add_to_whitelist(address)
    }

    async fn is_whitelisted(&self, address: Address) -> bool {
        self.core.lock().await.is_whitelisted(address)
    }

    async fn signer_whitelist_enabled(&self) -> bool {
        self.core.lock().await.signer_whitelist_enabled()
    }

    async fn relayer_whitelist_enabled(&self) -> bool {
        self.core.lock().await.relayer_whitelist_enabled()
    }

    async fn is_nonce_executed(&self, signer: Address, nonce: U256) -> bool {
        self.core.lock().await.is_nonce_executed(signer, nonce)
    }
}

// =============================================================================
// TESTS
// =============================================================================
