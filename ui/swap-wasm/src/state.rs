//! Global application state.
//!
//! The controllers are built once in `init()` and parked in a `thread_local!`
//! (WASM is single-threaded) so event closures can reach them.

use crate::dom::Elements;
use crate::provider::{Eip1193Provider, GlooDelay};
use gloo_storage::{LocalStorage, Storage};
use std::cell::RefCell;
use std::rc::Rc;
use sw_swap_core::SwapPanel;
use sw_wallet_core::{FlagStore, WalletSession};
use tracing::warn;

pub const MANUAL_DISCONNECT_KEY: &str = "isManualDisconnect";

pub type Session = WalletSession<Eip1193Provider, LocalStorageFlag>;
pub type Panel = SwapPanel<Eip1193Provider, LocalStorageFlag, GlooDelay>;

pub struct App {
    pub els: Elements,
    pub session: Rc<Session>,
    pub panel: Panel,
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

pub fn install(app: App) -> Rc<App> {
    let app = Rc::new(app);
    APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));
    app
}

/// `None` only before `init()` has finished wiring.
pub fn app() -> Option<Rc<App>> {
    APP.with(|slot| slot.borrow().clone())
}

/// The manual-disconnect flag, stored as `"true"` or absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageFlag;

impl FlagStore for LocalStorageFlag {
    fn manually_disconnected(&self) -> bool {
        LocalStorage::get::<bool>(MANUAL_DISCONNECT_KEY).unwrap_or(false)
    }

    fn set_manually_disconnected(&self, value: bool) {
        if !value {
            LocalStorage::delete(MANUAL_DISCONNECT_KEY);
            return;
        }
        if let Err(err) = LocalStorage::set(MANUAL_DISCONNECT_KEY, true) {
            warn!(%err, "failed to persist manual disconnect");
        }
    }
}
