//! # Ledger Behaviour
//!
//! The ERC20 and native ledgers as seen through forwarded calls.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use meta_relay::adapters::{DEFAULT_SUPPLY, ERR_EXCEEDS_BALANCE, ERR_INSUFFICIENT_ALLOWANCE};
    use meta_relay::domain::abi;
    use meta_relay::prelude::*;

    #[test]
    fn test_initial_supply_and_funding() {
        relay_telemetry::init_test_telemetry();
        let relay = relay();
        let token = ledger(relay.host());

        assert_eq!(token.total_supply(), U256::from(DEFAULT_SUPPLY));
        assert_eq!(
            token.balance_of(DEPLOYER),
            U256::from(DEFAULT_SUPPLY - CORE_TOKEN_FUNDING)
        );
        assert_eq!(token.balance_of(CORE), U256::from(CORE_TOKEN_FUNDING));
        assert_eq!(native_balance(&relay, CORE), U256::from(CORE_NATIVE_FUNDING));
    }

    #[test]
    fn test_forward_emits_transfer_events_from_core() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();

        relay
            .forward(RELAYER, &signer.token_transfer(RECIPIENT, 500, TOKEN, 25, 1))
            .unwrap();

        let events = ledger(relay.host()).events();
        let tail = &events[events.len() - 2..];
        assert_eq!(
            tail,
            &[
                Erc20Event::Transfer {
                    from: CORE,
                    to: RECIPIENT,
                    value: U256::from(500),
                },
                Erc20Event::Transfer {
                    from: CORE,
                    to: RELAYER,
                    value: U256::from(25),
                },
            ]
        );
    }

    #[test]
    fn test_rejected_forward_leaves_no_events() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();
        let event_count = ledger(relay.host()).event_count();

        relay
            .forward(RELAYER, &signer.token_transfer(RECIPIENT, 500, TOKEN, 2_000_000, 1))
            .unwrap_err();

        assert_eq!(ledger(relay.host()).event_count(), event_count);
        assert_eq!(relay.host().checkpoint_depth(), 0);
    }

    #[test]
    fn test_event_history_survives_rejections_between_settlements() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();

        relay
            .forward(RELAYER, &signer.token_transfer(RECIPIENT, 1, TOKEN, 0, 1))
            .unwrap();
        // dispatch succeeds, fee fails: the transfer event must vanish
        relay
            .forward(RELAYER, &signer.token_transfer(RECIPIENT, 2, TOKEN, 5_000_000, 2))
            .unwrap_err();
        relay
            .forward(RELAYER, &signer.token_transfer(RECIPIENT, 3, TOKEN, 0, 3))
            .unwrap();

        let to_recipient: Vec<U256> = ledger(relay.host())
            .events()
            .into_iter()
            .filter_map(|event| match event {
                Erc20Event::Transfer { to, value, .. } if to == RECIPIENT => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(to_recipient, vec![U256::from(1), U256::from(3)]);
    }

    #[test]
    fn test_balance_query_through_forward() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();

        let payload = abi::encode_balance_of(CORE);
        let receipt = relay
            .forward(RELAYER, &signer.request(TOKEN, payload, TOKEN, 0, 1))
            .unwrap();

        assert_eq!(
            receipt.return_data.as_slice(),
            &abi::u256_word(U256::from(CORE_TOKEN_FUNDING))
        );
    }

    #[test]
    fn test_pull_payment_needs_allowance() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let signer = Wallet::random();
        let owner = Address::new([0x0B; 20]);
        relay
            .host_mut()
            .token_transfer(TOKEN, DEPLOYER, owner, U256::from(1_000))
            .unwrap();

        let pull = abi::encode_call(
            abi::TRANSFER_FROM_SELECTOR,
            &[
                abi::address_word(owner),
                abi::address_word(RECIPIENT),
                abi::u256_word(U256::from(400)),
            ],
        );
        let err = relay
            .forward(RELAYER, &signer.request(TOKEN, pull.clone(), TOKEN, 0, 1))
            .unwrap_err();
        assert_eq!(err.kind(), RejectKind::ExecutionReverted);
        assert_eq!(err.reason(), ERR_INSUFFICIENT_ALLOWANCE);

        // owner approves the core directly on the ledger
        let approve = abi::encode_call(
            abi::APPROVE_SELECTOR,
            &[abi::address_word(CORE), abi::u256_word(U256::from(400))],
        );
        relay
            .host_mut()
            .call(owner, TOKEN, approve.as_slice())
            .unwrap();

        relay
            .forward(RELAYER, &signer.request(TOKEN, pull, TOKEN, 0, 2))
            .unwrap();
        let token = ledger(relay.host());
        assert_eq!(token.balance_of(RECIPIENT), U256::from(400));
        assert_eq!(token.balance_of(owner), U256::from(600));
        assert_eq!(token.allowance(owner, CORE), U256::zero());
    }

    #[test]
    fn test_direct_transfer_above_balance_reverts() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();

        let err = relay
            .host_mut()
            .token_transfer(TOKEN, RECIPIENT, RELAYER, U256::one())
            .unwrap_err();
        assert_eq!(err.reason.as_deref(), Some(ERR_EXCEEDS_BALANCE));
    }

    #[test]
    fn test_native_payment_between_accounts() {
        relay_telemetry::init_test_telemetry();
        let mut relay = relay();
        let payer = Address::new([0x0C; 20]);
        relay.host_mut().set_native_balance(payer, U256::from(10));

        relay
            .host_mut()
            .send_native(payer, CORE, U256::from(4))
            .unwrap();
        assert_eq!(native_balance(&relay, payer), U256::from(6));
        assert_eq!(native_balance(&relay, CORE), U256::from(CORE_NATIVE_FUNDING + 4));

        let err = relay
            .host_mut()
            .send_native(payer, CORE, U256::from(7))
            .unwrap_err();
        assert_eq!(err, Revert::empty());
    }
}
