//! In-memory wallet provider with scripted failures and a request log.

use crate::erc20::IERC20;
use crate::{
    AddChainParams, EventListener, ProviderError, ProviderEvent, TransactionReceipt,
    TransactionRequest, UNRECOGNIZED_CHAIN, USER_REJECTED_REQUEST, WalletProvider,
    parse_chain_id_hex,
};
use alloy_primitives::{Address, Bytes, TxHash, U64, U256, keccak256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Default)]
struct MockState {
    accounts: Vec<Address>,
    authorized: bool,
    chain_id: u64,
    known_chains: Vec<u64>,
    native_balances: HashMap<Address, U256>,
    token_balances: HashMap<(Address, Address), U256>,
    request_accounts_error: Option<ProviderError>,
    switch_error: Option<ProviderError>,
    add_chain_error: Option<ProviderError>,
    balance_error: Option<ProviderError>,
    send_error: Option<ProviderError>,
    revert_next: bool,
    receipts: HashMap<TxHash, TransactionReceipt>,
    receipt_delay_polls: u32,
    sent: Vec<TransactionRequest>,
    added_chains: Vec<AddChainParams>,
    requests: Vec<&'static str>,
}

/// A wallet that knows one account and one chain to begin with.
///
/// Errors set with the `fail_*` methods are returned once and then cleared.
#[derive(Default)]
pub struct MockProvider {
    state: RefCell<MockState>,
    listeners: RefCell<Vec<EventListener>>,
    nonce: Cell<u64>,
    receipt_polls: Cell<u32>,
}

impl MockProvider {
    pub fn new(chain_id: u64) -> Self {
        let provider = Self::default();
        {
            let mut state = provider.state.borrow_mut();
            state.chain_id = chain_id;
            state.known_chains.push(chain_id);
        }
        provider
    }

    pub fn with_account(self, account: Address) -> Self {
        self.state.borrow_mut().accounts.push(account);
        self
    }

    /// Mark the accounts as previously authorised so `eth_accounts` returns them.
    pub fn authorized(self) -> Self {
        self.state.borrow_mut().authorized = true;
        self
    }

    pub fn set_native_balance(&self, account: Address, amount: U256) {
        self.state.borrow_mut().native_balances.insert(account, amount);
    }

    pub fn set_token_balance(&self, token: Address, owner: Address, amount: U256) {
        self.state
            .borrow_mut()
            .token_balances
            .insert((token, owner), amount);
    }

    pub fn set_active_chain(&self, chain_id: u64) {
        self.state.borrow_mut().chain_id = chain_id;
    }

    pub fn forget_chain(&self, chain_id: u64) {
        self.state
            .borrow_mut()
            .known_chains
            .retain(|known| *known != chain_id);
    }

    pub fn reject_request_accounts(&self) {
        self.state.borrow_mut().request_accounts_error = Some(ProviderError::rpc(
            USER_REJECTED_REQUEST,
            "User rejected the request.",
        ));
    }

    pub fn fail_switch(&self, err: ProviderError) {
        self.state.borrow_mut().switch_error = Some(err);
    }

    pub fn fail_add_chain(&self, err: ProviderError) {
        self.state.borrow_mut().add_chain_error = Some(err);
    }

    pub fn fail_balance(&self, err: ProviderError) {
        self.state.borrow_mut().balance_error = Some(err);
    }

    pub fn fail_send(&self, err: ProviderError) {
        self.state.borrow_mut().send_error = Some(err);
    }

    pub fn revert_next_transaction(&self) {
        self.state.borrow_mut().revert_next = true;
    }

    /// Receipts become visible only after this many empty polls.
    pub fn set_receipt_delay_polls(&self, polls: u32) {
        self.state.borrow_mut().receipt_delay_polls = polls;
    }

    pub fn receipt_polls(&self) -> u32 {
        self.receipt_polls.get()
    }

    pub fn sent_transactions(&self) -> Vec<TransactionRequest> {
        self.state.borrow().sent.clone()
    }

    pub fn added_chains(&self) -> Vec<AddChainParams> {
        self.state.borrow().added_chains.clone()
    }

    /// RPC method names in the order they were requested.
    pub fn requests(&self) -> Vec<&'static str> {
        self.state.borrow().requests.clone()
    }

    pub fn emit(&self, event: ProviderEvent) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(event.clone());
        }
    }

    fn log(&self, method: &'static str) {
        self.state.borrow_mut().requests.push(method);
    }

    fn activate_chain(&self, chain_id: u64) {
        self.state.borrow_mut().chain_id = chain_id;
        self.emit(ProviderEvent::ChainChanged(chain_id));
    }
}

#[async_trait(?Send)]
impl WalletProvider for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.log("eth_requestAccounts");
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.request_accounts_error.take() {
            return Err(err);
        }
        state.authorized = true;
        Ok(state.accounts.clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.log("eth_accounts");
        let state = self.state.borrow();
        Ok(if state.authorized {
            state.accounts.clone()
        } else {
            Vec::new()
        })
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.log("eth_chainId");
        Ok(self.state.borrow().chain_id)
    }

    async fn switch_chain(&self, chain_id_hex: &str) -> Result<(), ProviderError> {
        self.log("wallet_switchEthereumChain");
        let chain_id = parse_chain_id_hex(chain_id_hex)?;
        {
            let mut state = self.state.borrow_mut();
            if let Some(err) = state.switch_error.take() {
                return Err(err);
            }
            if !state.known_chains.contains(&chain_id) {
                return Err(ProviderError::rpc(
                    UNRECOGNIZED_CHAIN,
                    format!("Unrecognized chain ID \"{chain_id_hex}\"."),
                ));
            }
        }
        self.activate_chain(chain_id);
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        self.log("wallet_addEthereumChain");
        let chain_id = parse_chain_id_hex(&params.chain_id)?;
        {
            let mut state = self.state.borrow_mut();
            if let Some(err) = state.add_chain_error.take() {
                return Err(err);
            }
            state.added_chains.push(params.clone());
            state.known_chains.push(chain_id);
        }
        self.activate_chain(chain_id);
        Ok(())
    }

    async fn get_balance(&self, account: Address) -> Result<U256, ProviderError> {
        self.log("eth_getBalance");
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.balance_error.take() {
            return Err(err);
        }
        Ok(state
            .native_balances
            .get(&account)
            .copied()
            .unwrap_or_default())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        self.log("eth_call");
        let call = IERC20::balanceOfCall::abi_decode(&data)
            .map_err(|err| ProviderError::rpc(-32000, format!("execution reverted: {err}")))?;
        let balance = self
            .state
            .borrow()
            .token_balances
            .get(&(to, call.owner))
            .copied()
            .unwrap_or_default();
        Ok(Bytes::from(balance.to_be_bytes::<32>().to_vec()))
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, ProviderError> {
        self.log("eth_sendTransaction");
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.send_error.take() {
            return Err(err);
        }

        let nonce = self.nonce.get();
        self.nonce.set(nonce + 1);
        let hash = keccak256(nonce.to_be_bytes());

        let status = if std::mem::take(&mut state.revert_next) { 0 } else { 1 };
        state.receipts.insert(
            hash,
            TransactionReceipt {
                transaction_hash: hash,
                status: Some(U64::from(status)),
                block_number: Some(U64::from(nonce + 1)),
            },
        );
        state.sent.push(tx.clone());
        Ok(hash)
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        self.log("eth_getTransactionReceipt");
        self.receipt_polls.set(self.receipt_polls.get() + 1);
        let mut state = self.state.borrow_mut();
        if state.receipt_delay_polls > 0 {
            state.receipt_delay_polls -= 1;
            return Ok(None);
        }
        Ok(state.receipts.get(&hash).cloned())
    }

    fn subscribe(&self, listener: EventListener) {
        self.listeners.borrow_mut().push(listener);
    }
}
