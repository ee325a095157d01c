use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// US spot ETF family tracked by the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EtfSymbol {
    Btc,
    Eth,
}

impl EtfSymbol {
    /// Every supported symbol, BTC first.
    pub const ALL: [EtfSymbol; 2] = [EtfSymbol::Btc, EtfSymbol::Eth];

    /// Ticker-style name used in records and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
        }
    }

    /// ETF family identifier expected by the vendor API.
    pub fn vendor_type(&self) -> &'static str {
        match self {
            Self::Btc => "us-btc-spot",
            Self::Eth => "us-eth-spot",
        }
    }

    /// Lowercase key used in JSON maps (`btc`, `eth`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Btc => "btc",
            Self::Eth => "eth",
        }
    }
}

impl fmt::Display for EtfSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EtfSymbol {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BTC" | "US-BTC-SPOT" => Ok(Self::Btc),
            "ETH" | "US-ETH-SPOT" => Ok(Self::Eth),
            _ => Err(MarketDataError::UnsupportedSymbol(s.to_string())),
        }
    }
}
