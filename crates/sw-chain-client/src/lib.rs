//! Seam between the swap frontend and the wallet extension.
//!
//! `WalletProvider` lists exactly the EIP-1193 requests the frontend makes.
//! The browser crate implements it over the injected `window.ethereum`
//! object; `mock::MockProvider` implements it in memory for tests.

pub mod erc20;
pub mod mock;

use alloy_primitives::{Address, Bytes, TxHash, U64, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::Duration;
use sw_config::{NativeCurrency, NetworkConfig};
use thiserror::Error;
use tracing::debug;

/// EIP-1193: the user rejected the request.
pub const USER_REJECTED_REQUEST: i64 = 4001;
/// EIP-3326: the wallet does not know the requested chain.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{message}")]
    Rpc { code: i64, message: String },
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    #[error("no injected wallet provider found")]
    Unavailable,
    #[error("malformed provider response: {0}")]
    Decode(String),
    #[error("wallet returned no accounts")]
    NoAccounts,
}

impl ProviderError {
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code() == Some(UNRECOGNIZED_CHAIN)
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code() == Some(USER_REJECTED_REQUEST)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    #[serde(default)]
    pub status: Option<U64>,
    #[serde(default)]
    pub block_number: Option<U64>,
}

impl TransactionReceipt {
    /// Pre-Byzantium receipts carry no status; treat them as successful.
    pub fn is_success(&self) -> bool {
        self.status.is_none_or(|status| status == U64::from(1))
    }
}

/// Parameters for `wallet_addEthereumChain` (EIP-3085).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl From<&NetworkConfig> for AddChainParams {
    fn from(config: &NetworkConfig) -> Self {
        Self {
            chain_id: config.chain_id_hex(),
            chain_name: config.chain_name.clone(),
            native_currency: config.native_currency.clone(),
            rpc_urls: vec![config.rpc_url.clone()],
            block_explorer_urls: vec![config.explorer_url.clone()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
}

pub type EventListener = Rc<dyn Fn(ProviderEvent)>;

#[async_trait(?Send)]
pub trait WalletProvider {
    /// `eth_requestAccounts`: prompts the user.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;
    /// `eth_accounts`: already-authorised accounts, never prompts.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;
    async fn chain_id(&self) -> Result<u64, ProviderError>;
    async fn switch_chain(&self, chain_id_hex: &str) -> Result<(), ProviderError>;
    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError>;
    async fn get_balance(&self, account: Address) -> Result<U256, ProviderError>;
    /// `eth_call` against the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError>;
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, ProviderError>;
    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, ProviderError>;
    fn subscribe(&self, listener: EventListener);
}

/// Suspends the current task; the browser backs this with a JS timer.
#[async_trait(?Send)]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}

/// Returns immediately. Used where waiting adds nothing, e.g. tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Immediate;

#[async_trait(?Send)]
impl Delay for Immediate {
    async fn sleep(&self, _duration: Duration) {}
}

/// Poll for a receipt until the transaction is mined.
///
/// A mined-but-reverted transaction is reported as `ProviderError::Reverted`.
pub async fn wait_for_receipt<P, D>(
    provider: &P,
    delay: &D,
    hash: TxHash,
    poll_interval: Duration,
) -> Result<TransactionReceipt, ProviderError>
where
    P: WalletProvider + ?Sized,
    D: Delay + ?Sized,
{
    loop {
        if let Some(receipt) = provider.transaction_receipt(hash).await? {
            if !receipt.is_success() {
                return Err(ProviderError::Reverted(hash));
            }
            return Ok(receipt);
        }
        debug!(%hash, "receipt not yet available");
        delay.sleep(poll_interval).await;
    }
}

/// Parse a `0x`-prefixed chain id as sent in `chainChanged` and `eth_chainId`.
pub fn parse_chain_id_hex(raw: &str) -> Result<u64, ProviderError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u64::from_str_radix(digits, 16)
        .map_err(|err| ProviderError::Decode(format!("chain id '{raw}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;

    #[test]
    fn parses_chain_id_hex() {
        assert_eq!(parse_chain_id_hex("0x4cef52").unwrap(), 5_042_002);
        assert_eq!(parse_chain_id_hex("0X1").unwrap(), 1);
        assert!(matches!(
            parse_chain_id_hex("0xzz"),
            Err(ProviderError::Decode(_))
        ));
    }

    #[test]
    fn error_codes() {
        assert!(ProviderError::rpc(UNRECOGNIZED_CHAIN, "unknown").is_unrecognized_chain());
        assert!(ProviderError::rpc(USER_REJECTED_REQUEST, "nope").is_user_rejection());
        assert_eq!(ProviderError::Unavailable.code(), None);
        assert_eq!(
            ProviderError::rpc(-32000, "insufficient funds").to_string(),
            "insufficient funds"
        );
    }

    #[test]
    fn add_chain_params_follow_network_config() {
        let params = AddChainParams::from(&NetworkConfig::default());
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["chainId"], "0x4cef52");
        assert_eq!(value["chainName"], "Arc Testnet");
        assert_eq!(value["nativeCurrency"]["symbol"], "USDC");
        assert_eq!(value["nativeCurrency"]["decimals"], 18);
        assert_eq!(value["rpcUrls"][0], "https://rpc.testnet.arc.network");
        assert_eq!(value["blockExplorerUrls"][0], "https://testnet.arcscan.app");
    }

    #[test]
    fn transaction_request_serializes_hex_quantities() {
        let tx = TransactionRequest {
            gas: Some(U256::from(21_000)),
            value: Some(U256::from(1)),
            ..Default::default()
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["gas"], "0x5208");
        assert_eq!(value["value"], "0x1");
        assert!(value.get("data").is_none());
        assert!(value.get("maxFeePerGas").is_none());
    }

    #[test]
    fn receipt_status() {
        let raw = serde_json::json!({
            "transactionHash": TxHash::ZERO.to_string(),
            "status": "0x0",
            "blockNumber": "0x10",
        });
        let receipt: TransactionReceipt = serde_json::from_value(raw).unwrap();
        assert!(!receipt.is_success());
        assert_eq!(receipt.block_number, Some(U64::from(16)));
    }

    #[tokio::test]
    async fn wait_for_receipt_polls_until_mined() -> anyhow::Result<()> {
        let provider = MockProvider::new(5_042_002);
        provider.set_receipt_delay_polls(2);
        let hash = provider
            .send_transaction(&TransactionRequest::default())
            .await?;

        let receipt = wait_for_receipt(&provider, &Immediate, hash, Duration::from_millis(1)).await?;
        assert_eq!(receipt.transaction_hash, hash);
        assert_eq!(provider.receipt_polls(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn wait_for_receipt_reports_reverts() -> anyhow::Result<()> {
        let provider = MockProvider::new(5_042_002);
        provider.revert_next_transaction();
        let hash = provider
            .send_transaction(&TransactionRequest::default())
            .await?;

        let err = wait_for_receipt(&provider, &Immediate, hash, Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::Reverted(hash));
        Ok(())
    }
}
