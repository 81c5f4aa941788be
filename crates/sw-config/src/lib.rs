//! Network identity and fixed transaction parameters for the swap frontend.
//!
//! Everything here is static: the `Default` impls describe Arc Testnet and the
//! contracts deployed on it. Controllers take these structs by value so tests
//! can point them at another chain id or shorten the delays.

use alloy_primitives::{Address, address};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use sw_api_types::Token;

pub const ARC_TESTNET_CHAIN_ID: u64 = 5_042_002;
pub const ARC_TESTNET_NAME: &str = "Arc Testnet";
pub const RPC_URL: &str = "https://rpc.testnet.arc.network";
pub const EXPLORER_URL: &str = "https://testnet.arcscan.app";

pub const ROUTER: Address = address!("0x8B40374CF60E3E66d61316cb4001d3c9db3bC28C");
/// Native USDC, 18 decimals.
pub const USDC: Address = address!("0x3600000000000000000000000000000000000000");
/// EURC, 6 decimals.
pub const EURC: Address = address!("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a");

const GWEI: u128 = 1_000_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contracts {
    pub router: Address,
    pub usdc: Address,
    pub eurc: Address,
}

impl Default for Contracts {
    fn default() -> Self {
        Self {
            router: ROUTER,
            usdc: USDC,
            eurc: EURC,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for NativeCurrency {
    fn default() -> Self {
        Self {
            name: Token::Usdc.symbol().to_owned(),
            symbol: Token::Usdc.symbol().to_owned(),
            decimals: Token::Usdc.decimals(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub native_currency: NativeCurrency,
    pub contracts: Contracts,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: ARC_TESTNET_CHAIN_ID,
            chain_name: ARC_TESTNET_NAME.to_owned(),
            rpc_url: RPC_URL.to_owned(),
            explorer_url: EXPLORER_URL.to_owned(),
            native_currency: NativeCurrency::default(),
            contracts: Contracts::default(),
        }
    }
}

impl NetworkConfig {
    /// Lower-case `0x` form expected by `wallet_switchEthereumChain`.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    pub fn token_address(&self, token: Token) -> Address {
        match token {
            Token::Usdc => self.contracts.usdc,
            Token::Eurc => self.contracts.eurc,
        }
    }
}

/// Recipient of the ERC-20 transfer that stands in for a swap settlement.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransferDestination {
    /// Send back to the connected account, mirroring the native path.
    #[default]
    Account,
    Router,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct GasSettings {
    pub approve_gas_limit: u64,
    pub native_transfer_gas_limit: u64,
    pub erc20_transfer_gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            approve_gas_limit: 100_000,
            native_transfer_gas_limit: 21_000,
            erc20_transfer_gas_limit: 150_000,
            max_fee_per_gas: 165 * GWEI,
            max_priority_fee_per_gas: 5 * GWEI,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SwapSettings {
    pub gas: GasSettings,
    pub settle_delay_ms: u64,
    pub receipt_poll_interval_ms: u64,
    pub transfer_destination: TransferDestination,
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            gas: GasSettings::default(),
            settle_delay_ms: 2_000,
            receipt_poll_interval_ms: 1_000,
            transfer_destination: TransferDestination::Account,
        }
    }
}

impl SwapSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}
