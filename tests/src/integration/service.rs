//! # Service Surface
//!
//! The async `MetaRelayApi` over a shared core.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use meta_relay::prelude::*;

    #[tokio::test]
    async fn test_forward_through_api() {
        relay_telemetry::init_test_telemetry();
        let service = service();
        let signer = Wallet::random();

        let receipt = service
            .forward(RELAYER, signer.token_transfer(RECIPIENT, 5_000, TOKEN, 100, 1))
            .await
            .unwrap();

        assert_eq!(receipt.target, TOKEN);
        assert!(service.is_nonce_executed(signer.address, U256::from(1)).await);
        let core = service.lock().await;
        assert_eq!(token_balance(&core, RECIPIENT), U256::from(5_000));
        assert_eq!(token_balance(&core, RELAYER), U256::from(100));
    }

    #[tokio::test]
    async fn test_whitelist_flow_through_api() {
        relay_telemetry::init_test_telemetry();
        let service = service();
        let signer = Wallet::random();

        assert!(service.toggle_signer_whitelist().await);
        let err = service
            .forward(RELAYER, signer.token_transfer(RECIPIENT, 1, TOKEN, 0, 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), RejectKind::SignerNotAuthorized);

        assert!(service.add_to_whitelist(signer.address).await);
        assert!(service.is_whitelisted(signer.address).await);
        service
            .forward(RELAYER, signer.token_transfer(RECIPIENT, 1, TOKEN, 0, 2))
            .await
            .unwrap();

        let stats = service.stats().await;
        assert_eq!(stats.forwards_settled, 1);
        assert_eq!(stats.rejected(RejectKind::SignerNotAuthorized), 1);
    }

    #[tokio::test]
    async fn test_batch_stats() {
        relay_telemetry::init_test_telemetry();
        let service = service();
        let signer = Wallet::random();
        let ok = signer.token_transfer(RECIPIENT, 10, TOKEN, 3, 1);
        let replayed = ok.clone();
        let batch = ForwardBatch {
            targets: vec![ok.target, replayed.target],
            payloads: vec![ok.payload, replayed.payload],
            signatures: vec![ok.signature, replayed.signature],
            fee_asset: TOKEN,
            fee_amounts: vec![ok.fee_amount, replayed.fee_amount],
            nonces: vec![ok.nonce, replayed.nonce],
            signers: vec![ok.signer, replayed.signer],
        };

        let outcomes = service.forward_batch(RELAYER, batch).await.unwrap();
        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].is_err());

        let stats = service.stats().await;
        assert_eq!(stats.batches_processed, 1);
        assert_eq!(stats.forwards_settled, 1);
        assert_eq!(stats.rejected(RejectKind::NonceAlreadyExecuted), 1);
        assert_eq!(stats.fees_paid.get(&FeeAsset::Token(TOKEN)), Some(&U256::from(3)));
    }

    #[tokio::test]
    async fn test_concurrent_signers_all_settle() {
        relay_telemetry::init_test_telemetry();
        let service = service();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                let signer = Wallet::random();
                let request = signer.token_transfer(RECIPIENT, 10, TOKEN, 1, 1);
                tokio::spawn(async move { service.forward(RELAYER, request).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let core = service.lock().await;
        assert_eq!(token_balance(&core, RECIPIENT), U256::from(160));
        assert_eq!(token_balance(&core, RELAYER), U256::from(16));
        assert_eq!(core.host().checkpoint_depth(), 0);
    }
}
