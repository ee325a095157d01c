use std::fmt;

use etfdash_market_data::EtfSymbol;

/// Identifies the shape of a vendor request for caching.
///
/// Renders as `current-us-btc-spot` or `history-us-eth-spot-30`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    Current(EtfSymbol),
    History { symbol: EtfSymbol, days: u32 },
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current(symbol) => write!(f, "current-{}", symbol.vendor_type()),
            Self::History { symbol, days } => {
                write!(f, "history-{}-{}", symbol.vendor_type(), days)
            }
        }
    }
}
