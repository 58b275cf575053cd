//! # Shared Fixtures
//!
//! A relay core over an in-memory host with one deployed ERC20 ledger.
//! The core starts with 1,000,000 ledger units and 5 native units.

use k256::ecdsa::SigningKey;
use meta_relay::domain::abi;
use meta_relay::prelude::*;

pub const CORE: Address = Address::new([0xC0; 20]);
pub const TOKEN: Address = Address::new([0x70; 20]);
pub const DEPLOYER: Address = Address::new([0xD0; 20]);
pub const RELAYER: Address = Address::new([0xEE; 20]);
pub const RECIPIENT: Address = Address::new([0x0A; 20]);

pub const CORE_TOKEN_FUNDING: u64 = 1_000_000;
pub const CORE_NATIVE_FUNDING: u64 = 5;

/// A signing identity.
pub struct Wallet {
    pub key: SigningKey,
    pub address: Address,
}

impl Wallet {
    pub fn random() -> Self {
        let key = SigningKey::random(&mut rand::thread_rng());
        let address = address_from_key(key.verifying_key());
        Self { key, address }
    }

    /// Sign `payload` for `target` and wrap it into a request.
    pub fn request(
        &self,
        target: Address,
        payload: Bytes,
        fee_asset: Address,
        fee: u64,
        nonce: u64,
    ) -> ForwardRequest {
        let signature = sign_forward(&self.key, target, payload.as_slice())
            .expect("signing with a valid key");
        ForwardRequest::new(
            target,
            payload,
            signature.to_bytes(),
            fee_asset,
            U256::from(fee),
            U256::from(nonce),
            self.address,
        )
    }

    /// Signed `transfer(to, amount)` on the fixture ledger.
    pub fn token_transfer(
        &self,
        to: Address,
        amount: u64,
        fee_asset: Address,
        fee: u64,
        nonce: u64,
    ) -> ForwardRequest {
        let payload = abi::encode_transfer(to, U256::from(amount));
        self.request(TOKEN, payload, fee_asset, fee, nonce)
    }
}

/// Host with the ledger deployed and the core funded.
pub fn funded_host() -> InMemoryHost {
    let mut host = InMemoryHost::new();
    host.deploy(TOKEN, InMemoryErc20::new(DEPLOYER));
    host.token_transfer(TOKEN, DEPLOYER, CORE, U256::from(CORE_TOKEN_FUNDING))
        .expect("deployer holds the initial supply");
    host.set_native_balance(CORE, U256::from(CORE_NATIVE_FUNDING));
    host
}

pub fn relay() -> RelayOrchestrator<InMemoryHost> {
    relay_with(RelayConfig::for_core(CORE))
}

pub fn relay_with(config: RelayConfig) -> RelayOrchestrator<InMemoryHost> {
    RelayOrchestrator::new(&config, funded_host()).expect("valid config")
}

pub fn service() -> RelayService<InMemoryHost> {
    RelayService::new(RelayConfig::for_core(CORE), funded_host()).expect("valid config")
}

pub fn ledger(host: &InMemoryHost) -> &InMemoryErc20 {
    host.contract::<InMemoryErc20>(TOKEN)
        .expect("ledger deployed")
}

pub fn token_balance(relay: &RelayOrchestrator<InMemoryHost>, owner: Address) -> U256 {
    ledger(relay.host()).balance_of(owner)
}

pub fn native_balance(relay: &RelayOrchestrator<InMemoryHost>, owner: Address) -> U256 {
    relay.host().native_balance(owner)
}

/// Balances of every party a forward can touch.
#[derive(Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub core_token: U256,
    pub core_native: U256,
    pub relayer_token: U256,
    pub relayer_native: U256,
    pub recipient_token: U256,
}

impl Snapshot {
    pub fn take(relay: &RelayOrchestrator<InMemoryHost>) -> Self {
        Self {
            core_token: token_balance(relay, CORE),
            core_native: native_balance(relay, CORE),
            relayer_token: token_balance(relay, RELAYER),
            relayer_native: native_balance(relay, RELAYER),
            recipient_token: token_balance(relay, RECIPIENT),
        }
    }
}
