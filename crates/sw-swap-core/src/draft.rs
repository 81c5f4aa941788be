use crate::amount::{is_positive_amount, sanitize_amount};
use sw_api_types::{Pending, StatusMessage, Token};

/// Transient form state of the swap panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapDraft {
    pub amount_in: String,
    pub token_in: Token,
    pub token_out: Token,
    pub approved: bool,
    pub pending: Pending,
}

impl Default for SwapDraft {
    fn default() -> Self {
        Self {
            amount_in: String::new(),
            token_in: Token::Usdc,
            token_out: Token::Eurc,
            approved: false,
            pending: Pending::None,
        }
    }
}

impl SwapDraft {
    /// Store sanitised input; any edit invalidates a prior approval.
    pub fn set_amount(&mut self, raw: &str) -> &str {
        self.amount_in = sanitize_amount(raw);
        self.approved = false;
        &self.amount_in
    }

    pub fn switch_tokens(&mut self) {
        std::mem::swap(&mut self.token_in, &mut self.token_out);
        self.amount_in.clear();
        self.approved = false;
    }

    /// Strictly positive once converted to the input token's base units.
    pub fn is_amount_valid(&self) -> bool {
        is_positive_amount(&self.amount_in, self.token_in.decimals())
    }

    pub fn needs_approval(&self) -> bool {
        !self.token_in.is_native()
    }

    pub fn can_approve(&self) -> bool {
        self.needs_approval()
            && self.is_amount_valid()
            && !self.approved
            && self.pending != Pending::Approving
    }

    pub fn can_swap(&self) -> bool {
        self.is_amount_valid()
            && (!self.needs_approval() || self.approved)
            && self.pending != Pending::Swapping
    }

    /// Clear what a completed swap consumed; the token direction stays.
    pub fn reset(&mut self) {
        self.amount_in.clear();
        self.approved = false;
    }
}

/// Everything the swap panel renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    pub draft: SwapDraft,
    pub status: StatusMessage,
}
