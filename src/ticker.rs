//! Ticker mentions and the price-change report sent back for each one.

use std::sync::LazyLock;

use regex::Regex;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};
use tracing::error;

use crate::market::{MarketData, PriceBar};
use crate::platform::Reply;

static TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[$]\b[A-Z]{3,5}\b").expect("ticker pattern is valid"));

/// Lookback windows reported for every ticker, in trading days
const DELTA_PERIODS: [(usize, &str); 3] = [(7, "07 Days"), (30, "30 Days"), (90, "90 Days")];

#[derive(Tabled)]
struct DeltaRow {
    #[tabled(rename = "Delta Period")]
    period: &'static str,
    #[tabled(rename = "Change")]
    change: String,
}

/// Symbols mentioned as `$XXXX` in `text`, in order, without the `$`.
pub fn extract_tickers(text: &str) -> Vec<String> {
    TICKER_RE
        .find_iter(text)
        .map(|m| m.as_str().trim_start_matches('$').to_string())
        .collect()
}

/// Fetch history for `symbol` and build its report.
pub async fn lookup(market: &dyn MarketData, symbol: &str) -> Reply {
    match market.history(symbol).await {
        Ok(history) => render_report(symbol, &history),
        Err(e) => {
            error!("Market data lookup for {} failed: {:#}", symbol, e);
            Reply::unavailable("market data")
        }
    }
}

/// Render the close price and delta table for an oldest-first history.
/// Bars without a finite close (gaps in the feed) are skipped.
pub fn render_report(symbol: &str, history: &[PriceBar]) -> Reply {
    let history: Vec<&PriceBar> = history.iter().filter(|bar| bar.close.is_finite()).collect();
    let (longest, _) = DELTA_PERIODS[DELTA_PERIODS.len() - 1];
    let Some(last) = history.last().filter(|_| history.len() >= longest) else {
        return Reply::text(format!(
            "Error: Not enough price history for {} to compute the {} day change.",
            symbol, longest
        ));
    };

    let rows: Vec<DeltaRow> = DELTA_PERIODS
        .iter()
        .map(|&(days, period)| DeltaRow {
            period,
            change: signed_dollars(last.close - history[history.len() - days].close),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()));

    Reply::Monospace(format!(
        "Ticker: {}\n\n{} - Close: ${:.2}\n\n{}",
        symbol, last.date, last.close, table
    ))
}

/// Round to cents and render with an explicit sign, e.g. `+$1.50`.
fn signed_dollars(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let sign = if rounded < 0.0 { '-' } else { '+' };
    format!("{}${:.2}", sign, rounded.abs())
}
