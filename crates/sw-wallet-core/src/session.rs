use crate::flags::FlagStore;
use crate::store::{Store, SubscriptionId};
use alloy_primitives::utils::format_units;
use alloy_primitives::{Address, U256};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use sw_api_types::{Balances, ConnectionPhase, Token};
use sw_chain_client::{AddChainParams, ProviderError, ProviderEvent, WalletProvider, erc20};
use sw_config::NetworkConfig;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub balances: Balances,
    pub manually_disconnected: bool,
    pub phase: ConnectionPhase,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn is_on_chain(&self, chain_id: u64) -> bool {
        self.chain_id == Some(chain_id)
    }

    fn adopt(&mut self, accounts: &[Address]) {
        match accounts.first() {
            Some(account) => {
                self.account = Some(*account);
                self.phase = ConnectionPhase::Connected;
            }
            None => self.clear_account(),
        }
    }

    fn clear_account(&mut self) {
        self.account = None;
        self.balances = Balances::default();
        self.phase = ConnectionPhase::Disconnected;
    }
}

/// Owns the connection to the injected wallet and the shared `Session`.
///
/// Connect and balance failures only reach the log; the session keeps its
/// previous state. `switch_network` is the one operation that reports errors.
pub struct WalletSession<P, F> {
    provider: Rc<P>,
    flags: F,
    config: NetworkConfig,
    state: Store<Session>,
}

impl<P, F> WalletSession<P, F>
where
    P: WalletProvider,
    F: FlagStore,
{
    pub fn new(provider: Rc<P>, flags: F, config: NetworkConfig) -> Self {
        let state = Store::new(Session {
            manually_disconnected: flags.manually_disconnected(),
            ..Session::default()
        });
        Self {
            provider,
            flags,
            config,
            state,
        }
    }

    pub fn provider(&self) -> &Rc<P> {
        &self.provider
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn store(&self) -> &Store<Session> {
        &self.state
    }

    pub fn snapshot(&self) -> Session {
        self.state.get()
    }

    pub fn account(&self) -> Option<Address> {
        self.state.with(|s| s.account)
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.state.with(|s| s.chain_id)
    }

    pub fn balances(&self) -> Balances {
        self.state.with(|s| s.balances.clone())
    }

    pub fn is_target_network(&self) -> bool {
        self.state.with(|s| s.is_on_chain(self.config.chain_id))
    }

    pub fn subscribe(&self, subscriber: impl Fn(&Session) + 'static) -> SubscriptionId {
        self.state.subscribe(subscriber)
    }

    /// Page-load initialisation: read the active chain and, unless the user
    /// disconnected by hand last time, pick up an already-authorised account.
    pub async fn restore(&self) {
        match self.provider.chain_id().await {
            Ok(chain_id) => self.state.update(|s| s.chain_id = Some(chain_id)),
            Err(err) => warn!(%err, "failed to read chain id"),
        }

        if self.flags.manually_disconnected() {
            debug!("manual disconnect flag set, skipping account restore");
        } else {
            match self.provider.accounts().await {
                Ok(accounts) if !accounts.is_empty() => {
                    info!(account = %accounts[0], "restored wallet session");
                    self.state.update(|s| s.adopt(&accounts));
                }
                Ok(_) => debug!("no authorised accounts to restore"),
                Err(err) => warn!(%err, "failed to read authorised accounts"),
            }
        }

        self.refresh_balances().await;
    }

    pub async fn connect(&self) {
        self.flags.set_manually_disconnected(false);
        self.state.update(|s| {
            s.manually_disconnected = false;
            s.phase = ConnectionPhase::Connecting;
        });

        match self.provider.request_accounts().await {
            Ok(accounts) if !accounts.is_empty() => {
                info!(account = %accounts[0], "wallet connected");
                self.state.update(|s| s.adopt(&accounts));
                self.refresh_balances().await;
            }
            Ok(_) => {
                warn!(err = %ProviderError::NoAccounts, "connection failed");
                self.state.update(|s| s.phase = ConnectionPhase::Disconnected);
            }
            Err(err) => {
                warn!(%err, "connection failed");
                self.state.update(|s| {
                    s.phase = if s.is_connected() {
                        ConnectionPhase::Connected
                    } else {
                        ConnectionPhase::Disconnected
                    };
                });
            }
        }
    }

    pub fn disconnect(&self) {
        self.flags.set_manually_disconnected(true);
        self.state.update(|s| {
            s.clear_account();
            s.manually_disconnected = true;
        });
        info!("wallet disconnected");
    }

    /// Ask the wallet to switch to the target chain, registering it first
    /// when the wallet answers with the unrecognized-chain code.
    pub async fn switch_network(&self) -> Result<(), ProviderError> {
        let chain_id_hex = self.config.chain_id_hex();
        match self.provider.switch_chain(&chain_id_hex).await {
            Ok(()) => {
                info!(chain_id = %chain_id_hex, "switched network");
                Ok(())
            }
            Err(err) if err.is_unrecognized_chain() => {
                info!(chain_id = %chain_id_hex, "chain unknown to wallet, adding it");
                self.provider
                    .add_chain(&AddChainParams::from(&self.config))
                    .await
            }
            Err(err) => {
                warn!(%err, "failed to switch network");
                Err(err)
            }
        }
    }

    pub async fn refresh_balances(&self) {
        let Some(account) = self.account() else {
            return;
        };
        if !self.is_target_network() {
            return;
        }

        let eurc = self.config.token_address(Token::Eurc);
        let fetched = futures::try_join!(
            self.provider.get_balance(account),
            erc20::balance_of(self.provider.as_ref(), eurc, account),
        );
        let (usdc_raw, eurc_raw) = match fetched {
            Ok(balances) => balances,
            Err(err) => {
                warn!(%err, "failed to load balances");
                return;
            }
        };

        let balances = match (
            format_balance(usdc_raw, Token::Usdc),
            format_balance(eurc_raw, Token::Eurc),
        ) {
            (Some(usdc), Some(eurc)) => Balances { usdc, eurc },
            _ => return,
        };

        self.state.update(|s| {
            if s.account == Some(account) {
                s.balances = balances;
            }
        });
    }

    /// Fold a provider event into the session. Returns whether balances
    /// should be reloaded as a consequence.
    pub fn apply_event(&self, event: ProviderEvent) -> bool {
        debug!(?event, "provider event");
        let target = self.config.chain_id;
        self.state.update(|s| {
            match event {
                ProviderEvent::AccountsChanged(accounts) => s.adopt(&accounts),
                ProviderEvent::ChainChanged(chain_id) => s.chain_id = Some(chain_id),
            }
            s.is_connected() && s.is_on_chain(target)
        })
    }

    pub async fn on_event(&self, event: ProviderEvent) {
        if self.apply_event(event) {
            self.refresh_balances().await;
        }
    }
}

impl<P, F> WalletSession<P, F>
where
    P: WalletProvider + 'static,
    F: FlagStore + 'static,
{
    /// Subscribe to the provider's account and chain notifications.
    ///
    /// `spawn` runs the follow-up work (balance reload) on the caller's
    /// executor. The listener holds only a weak reference to the session.
    pub fn listen<S>(self: &Rc<Self>, spawn: S)
    where
        S: Fn(LocalBoxFuture<'static, ()>) + 'static,
    {
        let weak = Rc::downgrade(self);
        self.provider.subscribe(Rc::new(move |event| {
            if let Some(session) = weak.upgrade() {
                spawn(Box::pin(async move { session.on_event(event).await }));
            }
        }));
    }
}

fn format_balance(raw: U256, token: Token) -> Option<String> {
    match format_units(raw, token.decimals()) {
        Ok(formatted) => Some(formatted),
        Err(err) => {
            warn!(%err, token = %token, "failed to format balance");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::InMemoryFlagStore;
    use alloy_primitives::address;
    use std::cell::RefCell;
    use sw_chain_client::mock::MockProvider;
    use sw_chain_client::{UNRECOGNIZED_CHAIN, USER_REJECTED_REQUEST};
    use sw_config::{ARC_TESTNET_CHAIN_ID, EURC};

    const ALICE: Address = address!("0x1111111111111111111111111111111111111111");
    const BOB: Address = address!("0x2222222222222222222222222222222222222222");

    type TestSession = WalletSession<MockProvider, Rc<InMemoryFlagStore>>;

    fn provider() -> Rc<MockProvider> {
        let provider = MockProvider::new(ARC_TESTNET_CHAIN_ID).with_account(ALICE);
        provider.set_native_balance(ALICE, U256::from(2_500_000_000_000_000_000u128));
        provider.set_token_balance(EURC, ALICE, U256::from(12_340_000u64));
        Rc::new(provider)
    }

    fn session(provider: &Rc<MockProvider>, flags: &Rc<InMemoryFlagStore>) -> TestSession {
        WalletSession::new(Rc::clone(provider), Rc::clone(flags), NetworkConfig::default())
    }

    #[tokio::test]
    async fn connect_adopts_first_account_and_loads_balances() -> anyhow::Result<()> {
        let provider = provider();
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = session(&provider, &flags);

        session.restore().await;
        assert_eq!(session.account(), None);

        session.connect().await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.account, Some(ALICE));
        assert_eq!(snapshot.phase, ConnectionPhase::Connected);
        assert!(session.is_target_network());
        assert_eq!(snapshot.balances.usdc, "2.500000000000000000");
        assert_eq!(snapshot.balances.eurc, "12.340000");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_connect_is_logged_not_surfaced() -> anyhow::Result<()> {
        let provider = provider();
        provider.reject_request_accounts();
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = session(&provider, &flags);

        session.connect().await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.account, None);
        assert_eq!(snapshot.phase, ConnectionPhase::Disconnected);
        Ok(())
    }

    #[tokio::test]
    async fn connect_passes_through_connecting_phase() -> anyhow::Result<()> {
        let provider = provider();
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = session(&provider, &flags);

        let phases = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&phases);
        session.subscribe(move |s| sink.borrow_mut().push(s.phase));

        session.connect().await;

        let phases = phases.borrow();
        assert_eq!(phases.first(), Some(&ConnectionPhase::Connecting));
        assert_eq!(phases.last(), Some(&ConnectionPhase::Connected));
        Ok(())
    }

    #[tokio::test]
    async fn manual_disconnect_suppresses_restore_until_connect() -> anyhow::Result<()> {
        let provider = provider();
        let flags = Rc::new(InMemoryFlagStore::default());

        let first_load = session(&provider, &flags);
        first_load.connect().await;
        assert_eq!(first_load.account(), Some(ALICE));
        first_load.disconnect();
        assert_eq!(first_load.account(), None);
        assert_eq!(first_load.balances(), Balances::default());
        assert!(flags.manually_disconnected());

        let reload = session(&provider, &flags);
        assert!(reload.snapshot().manually_disconnected);
        reload.restore().await;
        assert_eq!(reload.account(), None);
        assert!(!provider.requests().contains(&"eth_accounts"));

        reload.connect().await;
        assert_eq!(reload.account(), Some(ALICE));
        assert!(!flags.manually_disconnected());

        let another_reload = session(&provider, &flags);
        another_reload.restore().await;
        assert_eq!(another_reload.account(), Some(ALICE));
        Ok(())
    }

    #[tokio::test]
    async fn restore_reads_chain_and_authorised_account() -> anyhow::Result<()> {
        let provider = Rc::new(MockProvider::new(1).with_account(ALICE).authorized());
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = session(&provider, &flags);

        session.restore().await;

        assert_eq!(session.account(), Some(ALICE));
        assert_eq!(session.chain_id(), Some(1));
        assert!(!session.is_target_network());
        assert!(!provider.requests().contains(&"eth_getBalance"));
        Ok(())
    }

    #[tokio::test]
    async fn switch_network_on_known_chain() -> anyhow::Result<()> {
        let provider = provider();
        provider.set_active_chain(1);
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = session(&provider, &flags);

        session.switch_network().await?;

        assert!(provider.added_chains().is_empty());
        assert_eq!(
            provider.requests(),
            vec!["wallet_switchEthereumChain"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn unrecognized_chain_falls_back_to_add_chain() -> anyhow::Result<()> {
        let provider = provider();
        provider.set_active_chain(1);
        provider.forget_chain(ARC_TESTNET_CHAIN_ID);
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = session(&provider, &flags);

        session.switch_network().await?;

        let added = provider.added_chains();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].chain_id, "0x4cef52");
        assert_eq!(added[0].rpc_urls, vec![sw_config::RPC_URL.to_owned()]);
        assert_eq!(added[0].block_explorer_urls, vec![sw_config::EXPLORER_URL.to_owned()]);
        Ok(())
    }

    #[tokio::test]
    async fn other_switch_errors_propagate_unchanged() -> anyhow::Result<()> {
        let provider = provider();
        let rejection = ProviderError::rpc(USER_REJECTED_REQUEST, "User rejected the request.");
        provider.fail_switch(rejection.clone());
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = session(&provider, &flags);

        let err = session.switch_network().await.unwrap_err();

        assert_eq!(err, rejection);
        assert!(provider.added_chains().is_empty());
        assert!(!provider.requests().contains(&"wallet_addEthereumChain"));
        Ok(())
    }

    #[tokio::test]
    async fn add_chain_failure_is_returned() -> anyhow::Result<()> {
        let provider = provider();
        provider.forget_chain(ARC_TESTNET_CHAIN_ID);
        provider.fail_add_chain(ProviderError::rpc(-32602, "invalid params"));
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = session(&provider, &flags);

        let err = session.switch_network().await.unwrap_err();
        assert_eq!(err.code(), Some(-32602));
        assert_ne!(err.code(), Some(UNRECOGNIZED_CHAIN));
        Ok(())
    }

    #[tokio::test]
    async fn balance_failure_keeps_previous_balances() -> anyhow::Result<()> {
        let provider = provider();
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = session(&provider, &flags);
        session.restore().await;
        session.connect().await;
        let before = session.balances();

        provider.set_native_balance(ALICE, U256::ZERO);
        provider.fail_balance(ProviderError::rpc(-32603, "internal error"));
        session.refresh_balances().await;

        assert_eq!(session.balances(), before);
        Ok(())
    }

    #[tokio::test]
    async fn refresh_is_noop_off_target_chain() -> anyhow::Result<()> {
        let provider = provider();
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = session(&provider, &flags);
        session.apply_event(ProviderEvent::AccountsChanged(vec![ALICE]));
        session.apply_event(ProviderEvent::ChainChanged(1));

        session.refresh_balances().await;

        assert_eq!(session.balances(), Balances::default());
        assert!(provider.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn events_update_session() -> anyhow::Result<()> {
        let provider = provider();
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = session(&provider, &flags);

        assert!(!session.apply_event(ProviderEvent::ChainChanged(1)));
        assert!(!session.apply_event(ProviderEvent::AccountsChanged(vec![BOB, ALICE])));
        assert_eq!(session.account(), Some(BOB));
        assert!(session.apply_event(ProviderEvent::ChainChanged(ARC_TESTNET_CHAIN_ID)));

        assert!(!session.apply_event(ProviderEvent::AccountsChanged(Vec::new())));
        assert_eq!(session.account(), None);
        assert_eq!(session.snapshot().phase, ConnectionPhase::Disconnected);
        Ok(())
    }

    #[tokio::test]
    async fn listen_follows_wallet_switch() -> anyhow::Result<()> {
        let provider = provider();
        provider.set_active_chain(1);
        let flags = Rc::new(InMemoryFlagStore::default());
        let session = Rc::new(session(&provider, &flags));
        session.restore().await;
        session.connect().await;
        assert!(!session.is_target_network());

        let queue: Rc<RefCell<Vec<LocalBoxFuture<'static, ()>>>> = Rc::default();
        let sink = Rc::clone(&queue);
        session.listen(move |task| sink.borrow_mut().push(task));

        session.switch_network().await?;
        let tasks: Vec<_> = queue.borrow_mut().drain(..).collect();
        for task in tasks {
            task.await;
        }

        assert!(session.is_target_network());
        assert_eq!(session.balances().eurc, "12.340000");
        Ok(())
    }
}
