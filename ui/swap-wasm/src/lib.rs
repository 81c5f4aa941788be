//! ArcSwap WASM Frontend
//!
//! Binds the swap card in `index.html` to the controllers in `sw-wallet-core`
//! and `sw-swap-core`, talking to the injected wallet through EIP-1193.

pub mod config;
pub mod dom;
pub mod events;
pub mod logging;
pub mod provider;
pub mod render;
pub mod state;

use provider::{Eip1193Provider, GlooDelay};
use state::{App, LocalStorageFlag};
use std::rc::Rc;
use sw_swap_core::SwapPanel;
use sw_wallet_core::WalletSession;
use tracing::info;
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();
    logging::init();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let page = config::load();
    info!(chain_id = page.network.chain_id, "starting swap frontend");

    let provider = Rc::new(Eip1193Provider::detect());
    let session = Rc::new(WalletSession::new(provider, LocalStorageFlag, page.network));
    let panel = SwapPanel::new(session.clone(), GlooDelay, page.swap);

    let app = state::install(App {
        els: els.clone(),
        session,
        panel,
    });

    // Any state change repaints the whole card.
    app.session.subscribe(|_| repaint());
    app.panel.subscribe(|_| repaint());
    render::repaint(&app);

    events::bind_events(&els);
    app.session.listen(|task| wasm_bindgen_futures::spawn_local(task));

    app.session.restore().await;
    Ok(())
}

fn repaint() {
    if let Some(app) = state::app() {
        render::repaint(&app);
    }
}
