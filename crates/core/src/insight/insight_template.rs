use etfdash_market_data::MetricRecord;

const USD_PER_MILLION: f64 = 1_000_000.0;

fn flow_phrase(record: &MetricRecord) -> String {
    let direction = if record.is_inflow() {
        "net inflow"
    } else {
        "net outflow"
    };
    format!(
        "{} ETFs recorded a {} of ${:.2}M",
        record.symbol,
        direction,
        record.daily_inflow.abs() / USD_PER_MILLION
    )
}

/// Render the fixed commentary template for a BTC/ETH pair.
pub fn generate_insight(btc: &MetricRecord, eth: &MetricRecord) -> String {
    let summary = match (btc.is_inflow(), eth.is_inflow()) {
        (true, true) => {
            "Both ETF families took in capital, a sign that institutions keep adding crypto exposure. Sentiment is constructive."
        }
        (false, false) => {
            "Both ETF families saw outflows, which may reflect short-term profit taking or caution. Watch whether the outflows persist."
        }
        _ => {
            "Flows diverged between the two families, suggesting investors are rotating between crypto assets rather than exiting."
        }
    };

    format!(
        "Today {}; {}.\n\n{}\n\nKeep tracking ETF flows alongside price action before drawing conclusions. This is not investment advice.",
        flow_phrase(btc),
        flow_phrase(eth),
        summary
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use etfdash_market_data::{EtfSymbol, PartialMetricRecord};

    fn record(symbol: EtfSymbol, inflow: f64) -> MetricRecord {
        PartialMetricRecord {
            daily_inflow: Some(inflow),
            ..Default::default()
        }
        .into_record(symbol, Utc::now(), "TEST")
    }

    #[test]
    fn test_both_inflows() {
        let text = generate_insight(
            &record(EtfSymbol::Btc, 642_350_000.0),
            &record(EtfSymbol::Eth, 405_550_000.0),
        );
        assert!(text.starts_with("Today BTC ETFs recorded a net inflow of $642.35M"));
        assert!(text.contains("ETH ETFs recorded a net inflow of $405.55M"));
        assert!(text.contains("Both ETF families took in capital"));
    }

    #[test]
    fn test_both_outflows_use_absolute_amounts() {
        let text = generate_insight(
            &record(EtfSymbol::Btc, -350_000_000.0),
            &record(EtfSymbol::Eth, -120_000_000.0),
        );
        assert!(text.contains("BTC ETFs recorded a net outflow of $350.00M"));
        assert!(text.contains("Both ETF families saw outflows"));
    }

    #[test]
    fn test_mixed_flows() {
        let text = generate_insight(
            &record(EtfSymbol::Btc, 10.0),
            &record(EtfSymbol::Eth, -10.0),
        );
        assert!(text.contains("Flows diverged"));
    }

    #[test]
    fn test_zero_counts_as_inflow() {
        let text = generate_insight(&record(EtfSymbol::Btc, 0.0), &record(EtfSymbol::Eth, 0.0));
        assert!(text.contains("net inflow of $0.00M"));
    }
}
