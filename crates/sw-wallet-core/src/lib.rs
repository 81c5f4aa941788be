//! Wallet session state for the swap frontend.

pub mod flags;
pub mod session;
pub mod store;

pub use flags::{FlagStore, InMemoryFlagStore};
pub use session::{Session, WalletSession};
pub use store::{Store, SubscriptionId};
