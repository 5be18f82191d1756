use std::time::Duration;

use crate::models::SignalClass;

/// A place the dashboard writes field text to.
///
/// Every setter defaults to a no-op, so implementations only override the
/// fields they actually have.
pub trait DisplaySurface {
    fn set_price(&mut self, _text: &str) {}

    /// Emphasise the price field for `duration`, after which it clears itself
    fn flash_price(&mut self, _duration: Duration) {}

    /// Replace the signal text, leaving its style class as it was
    fn set_signal_text(&mut self, _text: &str) {}

    fn set_signal_class(&mut self, _class: Option<SignalClass>) {}

    fn set_indicators(&mut self, _text: &str) {}

    fn set_last_updated(&mut self, _text: &str) {}

    /// Called once after a batch of field updates
    fn present(&mut self) {}
}
