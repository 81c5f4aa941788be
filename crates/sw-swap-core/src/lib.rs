//! Swap form logic and the page view model, independent of any DOM.

pub mod amount;
pub mod draft;
pub mod format;
pub mod panel;
pub mod shell;

pub use draft::{PanelState, SwapDraft};
pub use panel::{SwapError, SwapPanel};
pub use shell::{PanelView, ShellView, render};
