//! # Replay and Signature Binding
//!
//! A signature authorizes one (target, payload) pair exactly once per nonce.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use meta_relay::domain::abi;
    use meta_relay::prelude::*;

    #[test]
    fn test_replay_rejected_without_state_change() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();
        let request = signer.token_transfer(RECIPIENT, 50, TOKEN, 5, 1);

        relay.forward(RELAYER, &request).unwrap();
        let settled = Snapshot::take(&relay);

        let err = relay.forward(RELAYER, &request).unwrap_err();
        assert_eq!(err.kind(), RejectKind::NonceAlreadyExecuted);
        assert_eq!(err.reason(), "NONCE_ALREADY_EXECUTED");
        assert_eq!(Snapshot::take(&relay), settled);
    }

    #[test]
    fn test_spent_nonce_rejects_different_payload() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();

        relay
            .forward(RELAYER, &signer.token_transfer(RECIPIENT, 50, TOKEN, 5, 1))
            .unwrap();
        let settled = Snapshot::take(&relay);

        // freshly signed, different amount and fee, same nonce
        let other = signer.token_transfer(RELAYER, 70, Address::ZERO, 1, 1);
        let err = relay.forward(RELAYER, &other).unwrap_err();
        assert_eq!(
            err,
            RelayError::NonceAlreadyExecuted {
                signer: signer.address,
                nonce: U256::one(),
            }
        );
        assert_eq!(Snapshot::take(&relay), settled);
    }

    #[test]
    fn test_nonces_are_scoped_per_signer() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let alice = Wallet::random();
        let bob = Wallet::random();

        relay
            .forward(RELAYER, &alice.token_transfer(RECIPIENT, 1, TOKEN, 0, 1))
            .unwrap();
        relay
            .forward(RELAYER, &bob.token_transfer(RECIPIENT, 1, TOKEN, 0, 1))
            .unwrap();

        assert!(relay.is_nonce_executed(alice.address, U256::from(1)));
        assert!(relay.is_nonce_executed(bob.address, U256::from(1)));
        assert!(!relay.is_nonce_executed(alice.address, U256::from(2)));
    }

    #[test]
    fn test_nonces_need_not_be_sequential() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();

        for nonce in [42u64, 7, u64::MAX] {
            relay
                .forward(RELAYER, &signer.token_transfer(RECIPIENT, 1, TOKEN, 0, nonce))
                .unwrap();
        }
        assert_eq!(token_balance(&relay, RECIPIENT), U256::from(3));
    }

    #[test]
    fn test_claimed_signer_mismatch() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();
        let impostor = Wallet::random();
        let before = Snapshot::take(&relay);

        let mut request = signer.token_transfer(RECIPIENT, 50, TOKEN, 5, 1);
        request.signer = impostor.address;

        let err = relay.forward(RELAYER, &request).unwrap_err();
        assert_eq!(
            err,
            RelayError::SignatureMismatch {
                claimed: impostor.address,
                recovered: Some(signer.address),
            }
        );
        assert_eq!(Snapshot::take(&relay), before);
        assert!(!relay.is_nonce_executed(impostor.address, U256::from(1)));
    }

    #[test]
    fn test_signature_bound_to_payload_and_target() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();
        let original = signer.token_transfer(RECIPIENT, 50, TOKEN, 0, 1);

        let mut inflated = original.clone();
        inflated.payload = abi::encode_transfer(RECIPIENT, U256::from(50_000));
        let err = relay.forward(RELAYER, &inflated).unwrap_err();
        assert_eq!(err.kind(), RejectKind::SignatureMismatch);

        let mut redirected = original.clone();
        redirected.target = Address::new([0x71; 20]);
        let err = relay.forward(RELAYER, &redirected).unwrap_err();
        assert_eq!(err.kind(), RejectKind::SignatureMismatch);

        // fee fields and nonce are outside the signed message
        let mut repriced = original;
        repriced.fee_amount = U256::from(9);
        repriced.nonce = U256::from(2);
        relay.forward(RELAYER, &repriced).unwrap();
        assert_eq!(token_balance(&relay, RELAYER), U256::from(9));
    }

    #[test]
    fn test_malformed_signature_rejected() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();

        let mut truncated = signer.token_transfer(RECIPIENT, 1, TOKEN, 0, 1);
        truncated.signature = Bytes::from(truncated.signature.as_slice()[..64].to_vec());
        let err = relay.forward(RELAYER, &truncated).unwrap_err();
        assert_eq!(
            err,
            RelayError::SignatureMismatch {
                claimed: signer.address,
                recovered: None,
            }
        );
        assert!(!relay.is_nonce_executed(signer.address, U256::from(1)));
    }
}
