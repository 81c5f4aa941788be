use serde::{Deserialize, Serialize};
use std::fmt;

/// The two swappable assets on the target network.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Token {
    /// Native gas token.
    Usdc,
    /// ERC-20 token.
    Eurc,
}

impl Token {
    pub fn symbol(self) -> &'static str {
        match self {
            Token::Usdc => "USDC",
            Token::Eurc => "EURC",
        }
    }

    pub fn decimals(self) -> u8 {
        match self {
            Token::Usdc => 18,
            Token::Eurc => 6,
        }
    }

    pub fn is_native(self) -> bool {
        matches!(self, Token::Usdc)
    }

    pub fn other(self) -> Token {
        match self {
            Token::Usdc => Token::Eurc,
            Token::Eurc => Token::Usdc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Decimal-formatted balances, one per token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balances {
    pub usdc: String,
    pub eurc: String,
}

impl Default for Balances {
    fn default() -> Self {
        Self {
            usdc: "0.0".to_owned(),
            eurc: "0.0".to_owned(),
        }
    }
}

impl Balances {
    pub fn get(&self, token: Token) -> &str {
        match token {
            Token::Usdc => &self.usdc,
            Token::Eurc => &self.eurc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPhase {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    #[default]
    None,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Which on-chain call the swap panel is currently waiting on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Pending {
    #[default]
    None,
    Approving,
    Swapping,
}
