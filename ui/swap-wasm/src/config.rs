//! Optional per-page overrides of the Arc Testnet defaults.
//!
//! A page may embed
//! `<script id="arcswap-config" type="application/json">{...}</script>`;
//! missing fields keep their defaults.

use crate::dom;
use serde::Deserialize;
use sw_config::{NetworkConfig, SwapSettings};
use tracing::warn;

pub const CONFIG_ELEMENT_ID: &str = "arcswap-config";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub network: NetworkConfig,
    pub swap: SwapSettings,
}

pub fn load() -> PageConfig {
    let raw = dom::by_id(CONFIG_ELEMENT_ID).and_then(|el| el.text_content());
    parse(raw.as_deref())
}

fn parse(raw: Option<&str>) -> PageConfig {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return PageConfig::default();
    };
    serde_json::from_str(raw).unwrap_or_else(|err| {
        warn!(%err, "ignoring malformed page config");
        PageConfig::default()
    })
}
