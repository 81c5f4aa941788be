//! Event binding.
//!
//! Every handler looks the controllers up through `state::app()` and spawns
//! its async work with `wasm_bindgen_futures::spawn_local`.

use crate::dom::{self, Elements};
use crate::state::{self, App};
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Helper: attach async click handler to an element.
macro_rules! on_click_async {
    ($el:expr, $handler:expr) => {{
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            if let Some(app) = state::app() {
                wasm_bindgen_futures::spawn_local(async move {
                    $handler(app).await;
                });
            }
        }) as Box<dyn FnMut(_)>);
        if let Err(err) = $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref()) {
            warn!(?err, "failed to bind click handler");
        }
        cb.forget();
    }};
}

/// Helper: attach sync click handler.
macro_rules! on_click {
    ($el:expr, $handler:expr) => {{
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            if let Some(app) = state::app() {
                $handler(app.as_ref());
            }
        }) as Box<dyn FnMut(_)>);
        if let Err(err) = $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref()) {
            warn!(?err, "failed to bind click handler");
        }
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Wallet ──
    on_click_async!(els.connect_btn, on_connect);
    on_click!(els.disconnect_btn, |app: &App| app.session.disconnect());
    on_click_async!(els.wrong_network, on_switch_network);

    // ── Swap form ──
    {
        let input = els.amount_input.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let Some(app) = state::app() else {
                return;
            };
            let sanitized = app.panel.set_amount(&input.value());
            dom::set_input_value(&input, &sanitized);
        }) as Box<dyn FnMut(_)>);
        if let Err(err) = els
            .amount_input
            .add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())
        {
            warn!(?err, "failed to bind amount input handler");
        }
        cb.forget();
    }
    on_click!(els.switch_btn, |app: &App| app.panel.switch_tokens());
    on_click_async!(els.approve_btn, on_approve);
    on_click_async!(els.swap_btn, on_swap);
}

async fn on_connect(app: Rc<App>) {
    app.session.connect().await;
}

async fn on_switch_network(app: Rc<App>) {
    if let Err(err) = app.session.switch_network().await {
        warn!(%err, "network switch failed");
    }
}

// Failures are logged by the panel when it writes the error status.
async fn on_approve(app: Rc<App>) {
    if let Ok(hash) = app.panel.approve().await {
        info!(%hash, "approval confirmed");
    }
}

async fn on_swap(app: Rc<App>) {
    if let Ok(hash) = app.panel.swap().await {
        info!(%hash, "swap confirmed");
    }
}
