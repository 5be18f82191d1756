//! Field rendering: snapshot values to panel text

use std::time::Duration;

use chrono::NaiveTime;

use crate::display::DisplaySurface;
use crate::models::{SignalDisplay, Snapshot};
use crate::utils::{format_grouped, format_usd};

pub const LOADING_PRICE: &str = "Fetching...";
pub const LOADING_SIGNAL: &str = "Loading...";
pub const RETRY_PRICE: &str = "$0.00 (Retry)";

const NOT_AVAILABLE: &str = "N/A";

/// Transient state while a request is in flight
pub fn show_loading<S: DisplaySurface>(surface: &mut S) {
    surface.set_price(LOADING_PRICE);
    surface.set_signal_text(LOADING_SIGNAL);
}

/// Failure display; leaves the signal style class untouched
pub fn show_error<S: DisplaySurface>(surface: &mut S, message: &str) {
    surface.set_signal_text(&format!("Error: {}", message));
    surface.set_price(RETRY_PRICE);
}

/// Indicator line, or `None` when the snapshot has no `rsi` key at all.
/// Missing values show a bare `N/A`, without the currency sign.
pub fn indicators_text(snapshot: &Snapshot) -> Option<String> {
    let rsi = snapshot.rsi?;
    let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Some(format!(
        "RSI: {} | EMA Short: {} | EMA Long: {}",
        or_na(rsi.map(format_grouped)),
        or_na(snapshot.ema_short.map(format_usd)),
        or_na(snapshot.ema_long.map(format_usd)),
    ))
}

/// Apply the text fields of a snapshot. The chart is handled separately.
///
/// Returns true if the price was updated and flashed.
pub fn render_fields<S: DisplaySurface>(
    surface: &mut S,
    snapshot: &Snapshot,
    flash: Duration,
    updated_at: NaiveTime,
) -> bool {
    // Zero and NaN prices are treated as missing
    let price = snapshot.price.filter(|p| *p != 0.0 && !p.is_nan());
    if let Some(price) = price {
        surface.set_price(&format_usd(price));
        surface.flash_price(flash);
    }

    if let Some(raw) = snapshot.signal.as_deref().filter(|s| !s.is_empty()) {
        let display = SignalDisplay::from_raw(raw);
        surface.set_signal_text(display.text);
        surface.set_signal_class(display.class);
    }

    if let Some(text) = indicators_text(snapshot) {
        surface.set_indicators(&text);
    }

    surface.set_last_updated(&updated_at.format("%H:%M:%S").to_string());
    price.is_some()
}
