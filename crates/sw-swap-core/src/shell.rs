//! What the page shows, derived from session and panel state.
//!
//! The browser layer only copies these values into the DOM, so every
//! decision about visibility, labels and enabled controls lives here.

use crate::draft::PanelState;
use crate::format::{format_balance, short_address};
use sw_api_types::{ConnectionPhase, Pending, StatusMessage, Token};
use sw_config::NetworkConfig;
use sw_wallet_core::Session;

pub const TITLE: &str = "Swap";
pub const WRONG_NETWORK_WARNING: &str = "⚠ Wrong Network. Click to Switch to Arc.";
pub const ESTIMATED_GAS: &str = "~0.0001 ARC";
pub const NETWORK_FEE: &str = "Low";
pub const CONNECT: &str = "Connect Wallet";
pub const CONNECTING: &str = "Connecting...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    pub header: HeaderView,
    pub panel: PanelView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub title: &'static str,
    pub network_badge: String,
    /// Present while connected; the Disconnect button goes with it.
    pub account_label: Option<String>,
    /// Clicking the warning triggers a network switch.
    pub wrong_network_warning: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    /// The Connect Wallet button, disabled while a request is in flight.
    ConnectPrompt(ButtonView),
    /// Connected to the wrong chain; the header carries the warning.
    Hidden,
    Form(FormView),
}

impl PanelView {
    pub fn is_interactive(&self) -> bool {
        !matches!(self, PanelView::Hidden)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub from: TokenRow,
    pub to: TokenRow,
    pub amount: String,
    pub gas_info: Option<GasInfo>,
    pub approve_button: Option<ButtonView>,
    pub swap_button: ButtonView,
    pub status: Option<StatusMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRow {
    pub token: Token,
    pub balance: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasInfo {
    pub estimated_gas: &'static str,
    pub network_fee: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonView {
    pub label: &'static str,
    pub enabled: bool,
    /// Rendered in the muted "done" style.
    pub completed: bool,
}

pub fn render(session: &Session, panel: &PanelState, config: &NetworkConfig) -> ShellView {
    let on_target = session.is_on_chain(config.chain_id);

    let header = HeaderView {
        title: TITLE,
        network_badge: config.chain_name.clone(),
        account_label: session.account.as_ref().map(short_address),
        wrong_network_warning: (session.is_connected() && !on_target)
            .then_some(WRONG_NETWORK_WARNING),
    };

    let panel = if !session.is_connected() {
        let connecting = session.phase == ConnectionPhase::Connecting;
        PanelView::ConnectPrompt(ButtonView {
            label: if connecting { CONNECTING } else { CONNECT },
            enabled: !connecting,
            completed: false,
        })
    } else if !on_target {
        PanelView::Hidden
    } else {
        PanelView::Form(render_form(session, panel))
    };

    ShellView { header, panel }
}

fn render_form(session: &Session, state: &PanelState) -> FormView {
    let draft = &state.draft;
    let amount_valid = draft.is_amount_valid();

    let approve_button = draft.needs_approval().then(|| ButtonView {
        label: match (draft.pending, draft.approved) {
            (Pending::Approving, _) => "Approving...",
            (_, true) => "Approved",
            _ => "Approve",
        },
        enabled: draft.can_approve(),
        completed: draft.approved,
    });

    let swap_button = ButtonView {
        label: if draft.pending == Pending::Swapping {
            "Swapping..."
        } else {
            "Swap"
        },
        enabled: draft.can_swap(),
        completed: false,
    };

    FormView {
        from: TokenRow {
            token: draft.token_in,
            balance: format_balance(session.balances.get(draft.token_in)),
        },
        to: TokenRow {
            token: draft.token_out,
            balance: format_balance(session.balances.get(draft.token_out)),
        },
        amount: draft.amount_in.clone(),
        gas_info: amount_valid.then_some(GasInfo {
            estimated_gas: ESTIMATED_GAS,
            network_fee: NETWORK_FEE,
        }),
        approve_button,
        swap_button,
        status: (!state.status.is_empty()).then(|| state.status.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, address};
    use sw_api_types::Balances;
    use sw_config::ARC_TESTNET_CHAIN_ID;

    const ALICE: Address = address!("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a");

    fn connected(chain_id: u64) -> Session {
        Session {
            account: Some(ALICE),
            chain_id: Some(chain_id),
            balances: Balances {
                usdc: "5.000000000000000000".to_owned(),
                eurc: "0.000000".to_owned(),
            },
            manually_disconnected: false,
            phase: ConnectionPhase::Connected,
        }
    }

    #[test]
    fn disconnected_shows_connect_prompt() {
        let view = render(&Session::default(), &PanelState::default(), &NetworkConfig::default());
        assert_eq!(view.header.account_label, None);
        assert_eq!(view.header.wrong_network_warning, None);
        assert_eq!(view.header.network_badge, "Arc Testnet");
        let PanelView::ConnectPrompt(button) = view.panel else {
            panic!("expected connect prompt");
        };
        assert_eq!(button.label, CONNECT);
        assert!(button.enabled);
    }

    #[test]
    fn connect_button_disabled_while_connecting() {
        let session = Session {
            phase: ConnectionPhase::Connecting,
            ..Session::default()
        };
        let view = render(&session, &PanelState::default(), &NetworkConfig::default());
        let PanelView::ConnectPrompt(button) = view.panel else {
            panic!("expected connect prompt");
        };
        assert_eq!(button.label, CONNECTING);
        assert!(!button.enabled);
    }

    #[test]
    fn wrong_network_warns_and_hides_panel() {
        let view = render(&connected(1), &PanelState::default(), &NetworkConfig::default());
        assert_eq!(view.header.wrong_network_warning, Some(WRONG_NETWORK_WARNING));
        assert_eq!(view.header.account_label.as_deref(), Some("0x89B5...D72a"));
        assert_eq!(view.panel, PanelView::Hidden);
        assert!(!view.panel.is_interactive());
    }

    #[test]
    fn native_form_has_no_approve_button() {
        let mut state = PanelState::default();
        state.draft.set_amount("1.5");
        let view = render(&connected(ARC_TESTNET_CHAIN_ID), &state, &NetworkConfig::default());
        assert_eq!(view.header.wrong_network_warning, None);

        let PanelView::Form(form) = view.panel else {
            panic!("expected form");
        };
        assert_eq!(form.from.token, Token::Usdc);
        assert_eq!(form.from.balance, "5.0000");
        assert_eq!(form.to.balance, "0.0");
        assert_eq!(form.amount, "1.5");
        assert!(form.gas_info.is_some());
        assert_eq!(form.approve_button, None);
        assert!(form.swap_button.enabled);
        assert_eq!(form.status, None);
    }

    #[test]
    fn erc20_form_walks_through_approval_labels() {
        let session = connected(ARC_TESTNET_CHAIN_ID);
        let config = NetworkConfig::default();
        let mut state = PanelState::default();
        state.draft.switch_tokens();

        let form = |state: &PanelState| match render(&session, state, &config).panel {
            PanelView::Form(form) => form,
            other => panic!("expected form, got {other:?}"),
        };

        let empty = form(&state);
        assert!(empty.gas_info.is_none());
        assert!(!empty.approve_button.unwrap().enabled);
        assert!(!empty.swap_button.enabled);

        state.draft.set_amount("12.5");
        let ready = form(&state);
        assert_eq!(ready.approve_button.unwrap().label, "Approve");
        assert!(ready.approve_button.unwrap().enabled);
        assert!(!ready.swap_button.enabled);

        state.draft.pending = Pending::Approving;
        state.status = StatusMessage::success("Approving tokens...");
        let approving = form(&state);
        assert_eq!(approving.approve_button.unwrap().label, "Approving...");
        assert!(!approving.approve_button.unwrap().enabled);
        assert_eq!(approving.status.unwrap().text, "Approving tokens...");

        state.draft.pending = Pending::None;
        state.draft.approved = true;
        let approved = form(&state);
        assert_eq!(approved.approve_button.unwrap().label, "Approved");
        assert!(approved.approve_button.unwrap().completed);
        assert!(approved.swap_button.enabled);

        state.draft.pending = Pending::Swapping;
        let swapping = form(&state);
        assert_eq!(swapping.swap_button.label, "Swapping...");
        assert!(!swapping.swap_button.enabled);
    }
}
