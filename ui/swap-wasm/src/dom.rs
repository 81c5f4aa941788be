//! DOM element bindings.
//!
//! All fields are resolved once at startup. Ids match `index.html`.

use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

pub const HIDDEN: &str = "hidden";

// ── Helpers ──

pub fn by_id(id: &str) -> Option<Element> {
    gloo_utils::document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn set_visible(el: &Element, visible: bool) {
    toggle_class(el, HIDDEN, !visible);
}

/// Writes only on change so the caret stays put while typing.
pub fn set_input_value(el: &HtmlInputElement, val: &str) {
    if el.value() != val {
        el.set_value(val);
    }
}

// ── Elements struct ──

/// All DOM element references used by the swap card.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Header
    pub card_title: Element,
    pub network_badge: Element,
    pub wallet_section: Element,
    pub account_label: Element,
    pub disconnect_btn: HtmlButtonElement,
    pub wrong_network: HtmlElement,

    // Connect prompt
    pub connect_section: Element,
    pub connect_btn: HtmlButtonElement,

    // Swap form
    pub swap_form: Element,
    pub from_balance: Element,
    pub from_symbol: Element,
    pub amount_input: HtmlInputElement,
    pub switch_btn: HtmlButtonElement,
    pub to_balance: Element,
    pub to_symbol: Element,
    pub to_amount: HtmlInputElement,
    pub gas_info: Element,
    pub gas_estimate: Element,
    pub network_fee: Element,
    pub approve_btn: HtmlButtonElement,
    pub swap_btn: HtmlButtonElement,
    pub status_msg: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_button {
    ($id:expr) => {
        by_id_typed::<HtmlButtonElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing button #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            card_title: get_el!("cardTitle"),
            network_badge: get_el!("networkBadge"),
            wallet_section: get_el!("walletSection"),
            account_label: get_el!("accountLabel"),
            disconnect_btn: get_button!("disconnectBtn"),
            wrong_network: get_html!("wrongNetwork"),

            connect_section: get_el!("connectSection"),
            connect_btn: get_button!("connectBtn"),

            swap_form: get_el!("swapForm"),
            from_balance: get_el!("fromBalance"),
            from_symbol: get_el!("fromSymbol"),
            amount_input: get_input!("amountIn"),
            switch_btn: get_button!("switchBtn"),
            to_balance: get_el!("toBalance"),
            to_symbol: get_el!("toSymbol"),
            to_amount: get_input!("amountOut"),
            gas_info: get_el!("gasInfo"),
            gas_estimate: get_el!("gasEstimate"),
            network_fee: get_el!("networkFee"),
            approve_btn: get_button!("approveBtn"),
            swap_btn: get_button!("swapBtn"),
            status_msg: get_el!("statusMsg"),
        })
    }
}
