use crate::amount::{AmountError, to_base_units};
use crate::draft::{PanelState, SwapDraft};
use crate::format::short_hash;
use alloy_primitives::{Address, TxHash, U256};
use std::rc::Rc;
use sw_api_types::{Pending, StatusMessage, Token};
use sw_chain_client::{Delay, ProviderError, TransactionRequest, WalletProvider, erc20, wait_for_receipt};
use sw_config::{SwapSettings, TransferDestination};
use sw_wallet_core::{FlagStore, Store, SubscriptionId, WalletSession};
use thiserror::Error;
use tracing::{info, warn};

pub const APPROVING: &str = "Approving tokens...";
pub const APPROVED: &str = "✓ Approved! Now click Swap.";
pub const SWAPPING: &str = "Swapping...";

#[derive(Debug, Error)]
pub enum SwapError {
    #[error("wallet not connected")]
    NotConnected,
    #[error("wallet is on the wrong network")]
    WrongNetwork,
    #[error("amount must be greater than zero in the token's smallest unit")]
    InvalidAmount,
    #[error("approve the token before swapping")]
    ApprovalRequired,
    #[error("the native token needs no approval")]
    ApprovalNotNeeded,
    #[error("another transaction is still pending")]
    Busy,
    #[error("invalid amount: {0}")]
    Amount(#[from] AmountError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Controller behind the swap form.
///
/// Only failures of the on-chain calls themselves end up in the status
/// message; precondition failures are returned without touching the form,
/// since the renderer keeps those controls disabled anyway.
pub struct SwapPanel<P, F, D> {
    session: Rc<WalletSession<P, F>>,
    delay: D,
    settings: SwapSettings,
    state: Store<PanelState>,
}

impl<P, F, D> SwapPanel<P, F, D>
where
    P: WalletProvider,
    F: FlagStore,
    D: Delay,
{
    pub fn new(session: Rc<WalletSession<P, F>>, delay: D, settings: SwapSettings) -> Self {
        Self {
            session,
            delay,
            settings,
            state: Store::default(),
        }
    }

    pub fn session(&self) -> &Rc<WalletSession<P, F>> {
        &self.session
    }

    pub fn store(&self) -> &Store<PanelState> {
        &self.state
    }

    pub fn snapshot(&self) -> PanelState {
        self.state.get()
    }

    pub fn draft(&self) -> SwapDraft {
        self.state.with(|s| s.draft.clone())
    }

    pub fn status(&self) -> StatusMessage {
        self.state.with(|s| s.status.clone())
    }

    pub fn subscribe(&self, subscriber: impl Fn(&PanelState) + 'static) -> SubscriptionId {
        self.state.subscribe(subscriber)
    }

    /// Returns the sanitised amount to write back into the input field.
    pub fn set_amount(&self, raw: &str) -> String {
        self.state.update(|s| s.draft.set_amount(raw).to_owned())
    }

    pub fn switch_tokens(&self) {
        self.state.update(|s| s.draft.switch_tokens());
    }

    pub fn needs_approval(&self) -> bool {
        self.state.with(|s| s.draft.needs_approval())
    }

    pub fn is_amount_valid(&self) -> bool {
        self.state.with(|s| s.draft.is_amount_valid())
    }

    pub fn can_approve(&self) -> bool {
        self.state.with(|s| s.draft.can_approve())
    }

    pub fn can_swap(&self) -> bool {
        self.state.with(|s| s.draft.can_swap())
    }

    /// Approve the router to spend the entered amount of the input token.
    pub async fn approve(&self) -> Result<TxHash, SwapError> {
        let account = self.preflight()?;
        let draft = self.draft();
        if !draft.needs_approval() {
            return Err(SwapError::ApprovalNotNeeded);
        }
        if !draft.is_amount_valid() {
            return Err(SwapError::InvalidAmount);
        }

        self.begin(Pending::Approving, APPROVING);
        let result = self.submit_approval(account, &draft).await;

        self.state.update(|s| {
            s.draft.pending = Pending::None;
            match &result {
                Ok(_) => {
                    // An edit made while the approval was mining needs a new one.
                    s.draft.approved = s.draft.amount_in == draft.amount_in
                        && s.draft.token_in == draft.token_in;
                    s.status = if s.draft.approved {
                        StatusMessage::success(APPROVED)
                    } else {
                        StatusMessage::default()
                    };
                }
                Err(err) => s.status = error_status(err),
            }
        });
        result
    }

    /// Submit the stand-in settlement transfer, then reload balances and
    /// clear the form once the settle delay has passed.
    pub async fn swap(&self) -> Result<TxHash, SwapError> {
        let account = self.preflight()?;
        let draft = self.draft();
        if !draft.is_amount_valid() {
            return Err(SwapError::InvalidAmount);
        }
        if draft.needs_approval() && !draft.approved {
            return Err(SwapError::ApprovalRequired);
        }

        self.begin(Pending::Swapping, SWAPPING);
        let result = self.submit_swap(account, &draft).await;

        self.state.update(|s| {
            s.draft.pending = Pending::None;
            s.status = match &result {
                Ok(hash) => StatusMessage::success(success_text(draft.token_in, hash)),
                Err(err) => error_status(err),
            };
        });
        let hash = result?;

        self.delay.sleep(self.settings.settle_delay()).await;
        self.session.refresh_balances().await;
        self.state.update(|s| {
            s.draft.reset();
            s.status = StatusMessage::default();
        });
        Ok(hash)
    }

    fn preflight(&self) -> Result<Address, SwapError> {
        let account = self.session.account().ok_or(SwapError::NotConnected)?;
        if !self.session.is_target_network() {
            return Err(SwapError::WrongNetwork);
        }
        if self.state.with(|s| s.draft.pending != Pending::None) {
            return Err(SwapError::Busy);
        }
        Ok(account)
    }

    fn begin(&self, pending: Pending, message: &str) {
        self.state.update(|s| {
            s.draft.pending = pending;
            s.status = StatusMessage::success(message);
        });
    }

    async fn submit_approval(&self, account: Address, draft: &SwapDraft) -> Result<TxHash, SwapError> {
        let config = self.session.config();
        let amount = to_base_units(&draft.amount_in, draft.token_in.decimals())?;
        let gas = &self.settings.gas;
        let tx = TransactionRequest {
            from: account,
            to: config.token_address(draft.token_in),
            data: Some(erc20::approve_calldata(config.contracts.router, amount)),
            gas: Some(U256::from(gas.approve_gas_limit)),
            ..self.fee_fields()
        };

        let hash = self.session.provider().send_transaction(&tx).await?;
        info!(%hash, token = %draft.token_in, "approval submitted");
        self.confirm(hash).await
    }

    async fn submit_swap(&self, account: Address, draft: &SwapDraft) -> Result<TxHash, SwapError> {
        let config = self.session.config();
        let amount = to_base_units(&draft.amount_in, draft.token_in.decimals())?;
        let gas = &self.settings.gas;
        let tx = if draft.token_in.is_native() {
            TransactionRequest {
                from: account,
                to: account,
                value: Some(amount),
                gas: Some(U256::from(gas.native_transfer_gas_limit)),
                ..self.fee_fields()
            }
        } else {
            let destination = match self.settings.transfer_destination {
                TransferDestination::Account => account,
                TransferDestination::Router => config.contracts.router,
            };
            TransactionRequest {
                from: account,
                to: config.token_address(draft.token_in),
                data: Some(erc20::transfer_calldata(destination, amount)),
                gas: Some(U256::from(gas.erc20_transfer_gas_limit)),
                ..self.fee_fields()
            }
        };

        let hash = self.session.provider().send_transaction(&tx).await?;
        info!(%hash, token = %draft.token_in, amount = %draft.amount_in, "swap submitted");
        self.confirm(hash).await
    }

    async fn confirm(&self, hash: TxHash) -> Result<TxHash, SwapError> {
        let provider = self.session.provider();
        wait_for_receipt(
            provider.as_ref(),
            &self.delay,
            hash,
            self.settings.receipt_poll_interval(),
        )
        .await?;
        Ok(hash)
    }

    fn fee_fields(&self) -> TransactionRequest {
        TransactionRequest {
            max_fee_per_gas: Some(U256::from(self.settings.gas.max_fee_per_gas)),
            max_priority_fee_per_gas: Some(U256::from(self.settings.gas.max_priority_fee_per_gas)),
            ..TransactionRequest::default()
        }
    }
}

fn success_text(token: Token, hash: &TxHash) -> String {
    let kind = if token.is_native() { "Native" } else { "ERC20" };
    format!("✓ {kind} Swap Success! TX: {}...", short_hash(hash))
}

fn error_status(err: &SwapError) -> StatusMessage {
    warn!(%err, "transaction failed");
    StatusMessage::error(format!("Error: {err}"))
}
