//! `WalletProvider` over the injected EIP-1193 `window.ethereum` object.
//!
//! Requests are built as `serde_json` values and handed to the wallet as plain
//! JS objects; replies come back through `serde_json::Value` so the typed
//! decoding is the same one the native tests exercise.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use sw_chain_client::{
    AddChainParams, Delay, EventListener, ProviderError, ProviderEvent, TransactionReceipt,
    TransactionRequest, WalletProvider, parse_chain_id_hex,
};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type Ethereum;

    #[wasm_bindgen(method, catch)]
    fn request(this: &Ethereum, args: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &Ethereum, event: &str, handler: &js_sys::Function);
}

type EventDecoder = fn(JsValue) -> Result<ProviderEvent, ProviderError>;

pub struct Eip1193Provider {
    ethereum: Option<Ethereum>,
}

impl Eip1193Provider {
    /// Look up `window.ethereum`. A page without a wallet still renders; every
    /// request then fails with `ProviderError::Unavailable`.
    pub fn detect() -> Self {
        let window = gloo_utils::window();
        let ethereum = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum"))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
            .map(|value| value.unchecked_into::<Ethereum>());
        if ethereum.is_none() {
            warn!("no injected wallet found on window.ethereum");
        }
        Self { ethereum }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ProviderError> {
        let ethereum = self.ethereum.as_ref().ok_or(ProviderError::Unavailable)?;
        debug!(method, "provider request");

        let args = json!({ "method": method, "params": params })
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| ProviderError::Decode(err.to_string()))?;
        let promise = ethereum.request(&args).map_err(rpc_error)?;
        let reply = JsFuture::from(promise).await.map_err(rpc_error)?;

        let value: Value = serde_wasm_bindgen::from_value(reply)
            .map_err(|err| ProviderError::Decode(err.to_string()))?;
        serde_json::from_value(value)
            .map_err(|err| ProviderError::Decode(format!("{method}: {err}")))
    }

    fn on_event(&self, name: &str, decode: EventDecoder, listener: EventListener) {
        let Some(ethereum) = &self.ethereum else {
            return;
        };
        let event = name.to_owned();
        let cb = Closure::wrap(Box::new(move |payload: JsValue| match decode(payload) {
            Ok(decoded) => listener(decoded),
            Err(err) => warn!(%err, event = %event, "ignoring malformed provider event"),
        }) as Box<dyn FnMut(JsValue)>);
        ethereum.on(name, cb.as_ref().unchecked_ref());
        cb.forget();
    }
}

#[async_trait(?Send)]
impl WalletProvider for Eip1193Provider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.send("eth_requestAccounts", json!([])).await
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.send("eth_accounts", json!([])).await
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let raw: String = self.send("eth_chainId", json!([])).await?;
        parse_chain_id_hex(&raw)
    }

    async fn switch_chain(&self, chain_id_hex: &str) -> Result<(), ProviderError> {
        let _: Value = self
            .send("wallet_switchEthereumChain", json!([{ "chainId": chain_id_hex }]))
            .await?;
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        let _: Value = self.send("wallet_addEthereumChain", json!([params])).await?;
        Ok(())
    }

    async fn get_balance(&self, account: Address) -> Result<U256, ProviderError> {
        self.send("eth_getBalance", json!([account, "latest"])).await
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        self.send("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, ProviderError> {
        self.send("eth_sendTransaction", json!([tx])).await
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        self.send("eth_getTransactionReceipt", json!([hash])).await
    }

    fn subscribe(&self, listener: EventListener) {
        self.on_event("accountsChanged", decode_accounts, listener.clone());
        self.on_event("chainChanged", decode_chain, listener);
    }
}

fn decode_accounts(payload: JsValue) -> Result<ProviderEvent, ProviderError> {
    serde_wasm_bindgen::from_value(payload)
        .map(ProviderEvent::AccountsChanged)
        .map_err(|err| ProviderError::Decode(err.to_string()))
}

fn decode_chain(payload: JsValue) -> Result<ProviderEvent, ProviderError> {
    let raw = payload
        .as_string()
        .ok_or_else(|| ProviderError::Decode("chainChanged payload is not a string".into()))?;
    parse_chain_id_hex(&raw).map(ProviderEvent::ChainChanged)
}

/// Wallets reject with `{ code, message }`; some mobile builds bury the code
/// under `data.originalError`.
fn rpc_error(err: JsValue) -> ProviderError {
    let field =
        |target: &JsValue, key: &str| js_sys::Reflect::get(target, &JsValue::from_str(key)).ok();

    let code = field(&err, "code")
        .and_then(|code| code.as_f64())
        .or_else(|| {
            field(&err, "data")
                .and_then(|data| field(&data, "originalError"))
                .and_then(|original| field(&original, "code"))
                .and_then(|code| code.as_f64())
        });
    let message = field(&err, "message")
        .and_then(|message| message.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));

    match code {
        Some(code) => ProviderError::rpc(code as i64, message),
        None => ProviderError::rpc(-1, message),
    }
}

/// Browser timer behind the settle delay and receipt polling.
pub struct GlooDelay;

#[async_trait(?Send)]
impl Delay for GlooDelay {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
