//! Paints a `ShellView` onto the bound elements.

use crate::dom::{self, Elements};
use crate::state::App;
use sw_api_types::StatusKind;
use sw_swap_core::render;
use sw_swap_core::shell::{ButtonView, FormView, PanelView, ShellView};
use web_sys::HtmlButtonElement;

/// Recompute the view from the current session and panel state.
pub fn repaint(app: &App) {
    let view = render(
        &app.session.snapshot(),
        &app.panel.snapshot(),
        app.session.config(),
    );
    paint(&app.els, &view);
}

pub fn paint(els: &Elements, view: &ShellView) {
    let header = &view.header;
    dom::set_text(&els.card_title, header.title);
    dom::set_text(&els.network_badge, &header.network_badge);

    dom::set_visible(&els.wallet_section, header.account_label.is_some());
    dom::set_text(&els.account_label, header.account_label.as_deref().unwrap_or_default());

    dom::set_visible(&els.wrong_network, header.wrong_network_warning.is_some());
    dom::set_text(&els.wrong_network, header.wrong_network_warning.unwrap_or_default());

    dom::set_visible(
        &els.connect_section,
        matches!(view.panel, PanelView::ConnectPrompt(_)),
    );
    dom::set_visible(&els.swap_form, matches!(view.panel, PanelView::Form(_)));
    match &view.panel {
        PanelView::ConnectPrompt(button) => paint_button(&els.connect_btn, button),
        PanelView::Form(form) => paint_form(els, form),
        PanelView::Hidden => {}
    }
}

fn paint_form(els: &Elements, form: &FormView) {
    dom::set_text(&els.from_symbol, form.from.token.symbol());
    dom::set_text(&els.from_balance, &format!("Balance: {}", form.from.balance));
    dom::set_text(&els.to_symbol, form.to.token.symbol());
    dom::set_text(&els.to_balance, &format!("Balance: {}", form.to.balance));

    dom::set_input_value(&els.amount_input, &form.amount);
    dom::set_input_value(&els.to_amount, &form.amount);

    dom::set_visible(&els.gas_info, form.gas_info.is_some());
    if let Some(gas) = &form.gas_info {
        dom::set_text(&els.gas_estimate, gas.estimated_gas);
        dom::set_text(&els.network_fee, gas.network_fee);
    }

    dom::set_visible(&els.approve_btn, form.approve_button.is_some());
    if let Some(button) = &form.approve_button {
        paint_button(&els.approve_btn, button);
    }
    paint_button(&els.swap_btn, &form.swap_button);

    let status = form.status.as_ref();
    dom::set_visible(&els.status_msg, status.is_some());
    dom::set_text(&els.status_msg, status.map(|s| s.text.as_str()).unwrap_or_default());
    dom::toggle_class(
        &els.status_msg,
        "success",
        status.is_some_and(|s| s.kind == StatusKind::Success),
    );
    dom::toggle_class(
        &els.status_msg,
        "error",
        status.is_some_and(|s| s.kind == StatusKind::Error),
    );
}

fn paint_button(el: &HtmlButtonElement, button: &ButtonView) {
    dom::set_text(el, button.label);
    el.set_disabled(!button.enabled);
    dom::toggle_class(el, "completed", button.completed);
}
