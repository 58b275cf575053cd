//! # Relay Orchestrator
//!
//! Composes the relay components per request:
//!
//! ```text
//! verify → check nonce → authorize → dispatch → settle fee
//! ```
//!
//! A forward is all-or-nothing. The nonce is only staged until the fee
//! settles, and every host side effect runs inside a checkpoint that is
//! reverted on any failure.

use crate::config::{ConfigError, RelayConfig};
use crate::domain::access::AccessGate;
use crate::domain::dispatch::ActionDispatcher;
use crate::domain::entities::{
    ForwardBatch, ForwardOutcome, ForwardReceipt, ForwardRequest, ForwardStage,
};
use crate::domain::fees::FeeSettlement;
use crate::domain::nonces::{NonceRegistry, StagedChanges};
use crate::domain::signature::SignatureVerifier;
use crate::domain::value_objects::{Address, Bytes, U256};
use crate::errors::RelayError;
use crate::ports::outbound::ExecutionHost;
use tracing::{debug, error, info, warn};

/// Owns all relay state and the host it acts on.
///
/// Methods take `&mut self`: callers serialize access.
#[derive(Debug)]
pub struct RelayOrchestrator<H: ExecutionHost> {
    core: Address,
    max_batch_size: usize,
    host: H,
    verifier: SignatureVerifier,
    nonces: NonceRegistry,
    access: AccessGate,
    dispatcher: ActionDispatcher,
    fees: FeeSettlement,
}

impl<H: ExecutionHost> RelayOrchestrator<H> {
    /// Build a core from `config` on top of `host`.
    ///
    /// # Errors
    ///
    /// The configuration fails [`RelayConfig::validate`].
    pub fn new(config: &RelayConfig, host: H) -> Result<Self, ConfigError> {
        config.validate()?;
        let core = config.core_address;
        Ok(Self {
            core,
            max_batch_size: config.max_batch_size,
            host,
            verifier: SignatureVerifier::new(),
            nonces: NonceRegistry::new(),
            access: AccessGate::with_state(
                config.signer_whitelist_enabled,
                config.relayer_whitelist_enabled,
                config.initial_whitelist.iter().copied(),
            ),
            dispatcher: ActionDispatcher::new(core),
            fees: FeeSettlement::new(core),
        })
    }

    // =========================================================================
    // FORWARDING
    // =========================================================================

    /// Run one request submitted by `relayer` to completion.
    ///
    /// # Errors
    ///
    /// The first failing stage's rejection. Nothing observable changes.
    pub fn forward(
        &mut self,
        relayer: Address,
        request: &ForwardRequest,
    ) -> Result<ForwardReceipt, RelayError> {
        let result = self.run(relayer, request);
        if let Err(e) = &result {
            warn!(
                kind = %e.kind(),
                stage = ?e.failed_stage(),
                signer = %request.signer,
                nonce = %request.nonce,
                reason = e.reason(),
                "Forward rejected"
            );
        }
        result
    }

    fn run(
        &mut self,
        relayer: Address,
        request: &ForwardRequest,
    ) -> Result<ForwardReceipt, RelayError> {
        let signer = request.signer;
        let mut stage = ForwardStage::Received;

        self.verifier.verify(request)?;
        stage = self.advance(stage, signer);

        let mut staged = StagedChanges::new();
        self.nonces.check_and_consume(signer, request.nonce, &mut staged)?;
        stage = self.advance(stage, signer);

        self.access.authorize(signer, relayer)?;
        stage = self.advance(stage, signer);

        let checkpoint = self.host.checkpoint();
        match self.execute(relayer, request, stage) {
            Ok(return_data) => {
                self.host.commit(checkpoint)?;
                self.nonces.commit(staged);
                info!(
                    signer = %signer,
                    relayer = %relayer,
                    target = %request.target,
                    nonce = %request.nonce,
                    fee_asset = %request.fee_asset,
                    fee_amount = %request.fee_amount,
                    "Forward settled"
                );
                Ok(ForwardReceipt {
                    signer,
                    relayer,
                    target: request.target,
                    nonce: request.nonce,
                    fee_asset: request.fee_asset,
                    fee_amount: request.fee_amount,
                    return_data,
                })
            }
            Err(e) => {
                // the rejection is what the caller needs, even if the host misbehaves
                if let Err(host_err) = self.host.revert_to(checkpoint) {
                    error!(
                        error = %host_err,
                        rejection = %e.kind(),
                        "Checkpoint revert failed"
                    );
                }
                Err(e)
            }
        }
    }

    /// Dispatch and settle inside an open checkpoint.
    fn execute(
        &mut self,
        relayer: Address,
        request: &ForwardRequest,
        stage: ForwardStage,
    ) -> Result<Bytes, RelayError> {
        let return_data = self.dispatcher.dispatch(
            &mut self.host,
            request.target,
            request.payload.as_slice(),
        )?;
        let stage = self.advance(stage, request.signer);

        self.fees
            .settle(&mut self.host, request.fee_asset, request.fee_amount, relayer)?;
        self.advance(stage, request.signer);

        Ok(return_data)
    }

    fn advance(&self, stage: ForwardStage, signer: Address) -> ForwardStage {
        let next = stage.next().unwrap_or(stage);
        debug!(signer = %signer, stage = ?next, "Forward advanced");
        next
    }

    /// Forward each element in index order as its own request.
    ///
    /// One element's failure never touches another's outcome; earlier
    /// successes stand even if later elements fail.
    ///
    /// # Errors
    ///
    /// `BatchTooLarge` or `BatchLengthMismatch`, before any element runs.
    pub fn forward_batch(
        &mut self,
        relayer: Address,
        batch: ForwardBatch,
    ) -> Result<Vec<ForwardOutcome>, RelayError> {
        let size = batch.len();
        if size > self.max_batch_size {
            warn!(size, max = self.max_batch_size, "Batch rejected");
            return Err(RelayError::BatchTooLarge {
                size,
                max: self.max_batch_size,
            });
        }
        let requests = batch.into_requests().inspect_err(|e| {
            warn!(error = %e, "Batch rejected");
        })?;

        let outcomes: Vec<ForwardOutcome> = requests
            .iter()
            .map(|request| self.forward(relayer, request))
            .collect();

        debug!(
            size,
            settled = outcomes.iter().filter(|o| o.is_ok()).count(),
            "Batch processed"
        );
        Ok(outcomes)
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    pub fn toggle_signer_whitelist(&mut self) -> bool {
        let enabled = self.access.toggle_signer_whitelist();
        info!(enabled, "Signer whitelist toggled");
        enabled
    }

    pub fn toggle_relayer_whitelist(&mut self) -> bool {
        let enabled = self.access.toggle_relayer_whitelist();
        info!(enabled, "Relayer whitelist toggled");
        enabled
    }

    pub fn add_to_whitelist(&mut self, address: Address) -> bool {
        let added = self.access.add_to_whitelist(address);
        info!(address = %address, added, "Whitelist entry added");
        added
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    #[must_use]
    pub fn is_whitelisted(&self, address: Address) -> bool {
        self.access.is_whitelisted(address)
    }

    #[must_use]
    pub fn signer_whitelist_enabled(&self) -> bool {
        self.access.signer_whitelist_enabled()
    }

    #[must_use]
    pub fn relayer_whitelist_enabled(&self) -> bool {
        self.access.relayer_whitelist_enabled()
    }

    #[must_use]
    pub fn is_nonce_executed(&self, signer: Address, nonce: U256) -> bool {
        self.nonces.is_executed(signer, nonce)
    }

    #[must_use]
    pub fn core_address(&self) -> Address {
        self.core
    }

    #[must_use]
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// The execution host, for reads.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The execution host, for external funding and setup.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

// =============================================================================
// TESTS
// =============================================================================
