//! # Batched Forwards
//!
//! Elements run in index order, each with its own atomicity. Only shape
//! errors reject the batch as a whole.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use meta_relay::prelude::*;

    fn batch_of(requests: &[ForwardRequest], fee_asset: Address) -> ForwardBatch {
        ForwardBatch {
            targets: requests.iter().map(|r| r.target).collect(),
            payloads: requests.iter().map(|r| r.payload.clone()).collect(),
            signatures: requests.iter().map(|r| r.signature.clone()).collect(),
            fee_asset,
            fee_amounts: requests.iter().map(|r| r.fee_amount).collect(),
            nonces: requests.iter().map(|r| r.nonce).collect(),
            signers: requests.iter().map(|r| r.signer).collect(),
        }
    }

    #[test]
    fn test_two_element_batch_settles_both() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();
        let requests = [
            signer.token_transfer(RECIPIENT, 1_000, TOKEN, 10, 1),
            signer.token_transfer(RECIPIENT, 2_000, TOKEN, 20, 2),
        ];

        let outcomes = relay
            .forward_batch(RELAYER, batch_of(&requests, TOKEN))
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(Result::is_ok));
        assert_eq!(token_balance(&relay, RECIPIENT), U256::from(3_000));
        assert_eq!(token_balance(&relay, RELAYER), U256::from(30));
        assert!(relay.is_nonce_executed(signer.address, U256::from(1)));
        assert!(relay.is_nonce_executed(signer.address, U256::from(2)));
    }

    #[test]
    fn test_failing_element_is_isolated() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();
        let requests = [
            signer.token_transfer(RECIPIENT, 100, TOKEN, 1, 1),
            // core cannot cover this transfer
            signer.token_transfer(RECIPIENT, 5_000_000, TOKEN, 1, 2),
            signer.token_transfer(RECIPIENT, 300, TOKEN, 1, 3),
        ];

        let outcomes = relay
            .forward_batch(RELAYER, batch_of(&requests, TOKEN))
            .unwrap();

        assert!(outcomes[0].is_ok());
        assert_eq!(
            outcomes[1].as_ref().unwrap_err().kind(),
            RejectKind::ExecutionReverted
        );
        assert!(outcomes[2].is_ok());
        assert_eq!(token_balance(&relay, RECIPIENT), U256::from(400));
        assert_eq!(token_balance(&relay, RELAYER), U256::from(2));
        assert!(!relay.is_nonce_executed(signer.address, U256::from(2)));
    }

    #[test]
    fn test_duplicate_nonce_within_batch() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();
        let request = signer.token_transfer(RECIPIENT, 100, TOKEN, 0, 1);

        let outcomes = relay
            .forward_batch(RELAYER, batch_of(&[request.clone(), request], TOKEN))
            .unwrap();

        assert!(outcomes[0].is_ok());
        assert_eq!(
            outcomes[1].as_ref().unwrap_err().kind(),
            RejectKind::NonceAlreadyExecuted
        );
        assert_eq!(token_balance(&relay, RECIPIENT), U256::from(100));
    }

    #[test]
    fn test_native_fee_exhaustion_mid_batch() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();
        // 5 native units cover the first two fees only
        let requests: Vec<_> = (1..=3)
            .map(|nonce| signer.token_transfer(RECIPIENT, 10, Address::ZERO, 2, nonce))
            .collect();

        let outcomes = relay
            .forward_batch(RELAYER, batch_of(&requests, Address::ZERO))
            .unwrap();

        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].is_ok());
        let err = outcomes[2].as_ref().unwrap_err();
        assert_eq!(err.kind(), RejectKind::InsufficientFunds);
        assert_eq!(err.reason(), "");
        assert_eq!(native_balance(&relay, RELAYER), U256::from(4));
        assert_eq!(token_balance(&relay, RECIPIENT), U256::from(20));
    }

    #[test]
    fn test_length_mismatch_rejects_whole_batch() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();
        let requests = [
            signer.token_transfer(RECIPIENT, 100, TOKEN, 0, 1),
            signer.token_transfer(RECIPIENT, 100, TOKEN, 0, 2),
        ];
        let mut batch = batch_of(&requests, TOKEN);
        batch.nonces.pop();
        let before = Snapshot::take(&relay);

        let err = relay.forward_batch(RELAYER, batch).unwrap_err();
        assert_eq!(
            err,
            RelayError::BatchLengthMismatch {
                field: "nonces",
                expected: 2,
                actual: 1,
            }
        );
        assert_eq!(Snapshot::take(&relay), before);
        assert!(!relay.is_nonce_executed(signer.address, U256::from(1)));
    }

    #[test]
    fn test_oversized_batch_rejected_before_any_element() {
        relay_telemetry::init_test_telemetry();
        let config = RelayConfig {
            max_batch_size: 2,
            ..RelayConfig::for_core(CORE)
        };
        let mut relay = relay_with(config);
        let signer = Wallet::random();
        let requests: Vec<_> = (1..=3)
            .map(|nonce| signer.token_transfer(RECIPIENT, 1, TOKEN, 0, nonce))
            .collect();

        let err = relay
            .forward_batch(RELAYER, batch_of(&requests, TOKEN))
            .unwrap_err();
        assert_eq!(err, RelayError::BatchTooLarge { size: 3, max: 2 });
        assert_eq!(token_balance(&relay, RECIPIENT), U256::zero());
    }

    #[test]
    fn test_empty_batch() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();

        let outcomes = relay
            .forward_batch(RELAYER, ForwardBatch::default())
            .unwrap();
        assert!(outcomes.is_empty());
    }
}
