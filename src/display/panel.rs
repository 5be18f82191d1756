//! In-memory text panel, echoed to the terminal as a table

use std::str::FromStr;
use std::time::Duration;

use tokio::time::Instant;

use super::surface::DisplaySurface;
use crate::error::DashboardError;
use crate::models::SignalClass;
use crate::utils::Table;

/// A panel field that may or may not be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Price,
    Signal,
    LastUpdated,
    Indicators,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Price => "price",
            Field::Signal => "signal",
            Field::LastUpdated => "lastUpdated",
            Field::Indicators => "indicators",
        }
    }
}

impl FromStr for Field {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "price" => Ok(Field::Price),
            "signal" => Ok(Field::Signal),
            "lastupdated" => Ok(Field::LastUpdated),
            "indicators" => Ok(Field::Indicators),
            _ => Err(DashboardError::Config(format!(
                "Unknown dashboard field '{}'. Use: price, signal, lastUpdated, indicators",
                s
            ))),
        }
    }
}

#[derive(Debug, Default)]
struct PriceSlot {
    text: String,
    flash_until: Option<Instant>,
}

#[derive(Debug, Default)]
struct SignalSlot {
    text: String,
    class: Option<SignalClass>,
}

/// Dashboard panel. Fields not configured stay `None` and ignore writes.
#[derive(Debug, Default)]
pub struct Panel {
    price: Option<PriceSlot>,
    signal: Option<SignalSlot>,
    indicators: Option<String>,
    last_updated: Option<String>,
    echo: bool,
}

impl Panel {
    pub fn new(fields: &[Field], echo: bool) -> Self {
        let mut panel = Panel {
            echo,
            ..Default::default()
        };
        for field in fields {
            match field {
                Field::Price => panel.price = Some(PriceSlot::default()),
                Field::Signal => panel.signal = Some(SignalSlot::default()),
                Field::Indicators => panel.indicators = Some(String::new()),
                Field::LastUpdated => panel.last_updated = Some(String::new()),
            }
        }
        panel
    }

    pub fn price_text(&self) -> Option<&str> {
        self.price.as_ref().map(|p| p.text.as_str())
    }

    pub fn is_price_flashing(&self) -> bool {
        self.price
            .as_ref()
            .and_then(|p| p.flash_until)
            .is_some_and(|until| Instant::now() < until)
    }

    pub fn signal_text(&self) -> Option<&str> {
        self.signal.as_ref().map(|s| s.text.as_str())
    }

    pub fn signal_class(&self) -> Option<SignalClass> {
        self.signal.as_ref().and_then(|s| s.class)
    }

    /// Class attribute of the signal field, e.g. `value buy`
    pub fn signal_class_attr(&self) -> Option<String> {
        self.signal.as_ref()?;
        Some(match self.signal_class() {
            Some(class) => format!("value {}", class.as_str()),
            None => "value".to_string(),
        })
    }

    pub fn indicators_text(&self) -> Option<&str> {
        self.indicators.as_deref()
    }

    pub fn last_updated_text(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    /// Render the present fields as a two-column table
    pub fn render(&self) -> String {
        let mut table = Table::new(vec!["Field", "Value"]);

        if let Some(price) = self.price_text() {
            let marker = if self.is_price_flashing() { " *" } else { "" };
            table.add_row(vec![Field::Price.name().into(), format!("{}{}", price, marker)]);
        }
        if let (Some(signal), Some(class)) = (self.signal_text(), self.signal_class_attr()) {
            table.add_row(vec![
                Field::Signal.name().into(),
                format!("{} [{}]", signal, class),
            ]);
        }
        if let Some(indicators) = self.indicators_text() {
            table.add_row(vec![Field::Indicators.name().into(), indicators.to_string()]);
        }
        if let Some(updated) = self.last_updated_text() {
            table.add_row(vec![Field::LastUpdated.name().into(), updated.to_string()]);
        }

        table.render()
    }
}

impl DisplaySurface for Panel {
    fn set_price(&mut self, text: &str) {
        if let Some(price) = &mut self.price {
            price.text = text.to_string();
        }
    }

    fn flash_price(&mut self, duration: Duration) {
        if let Some(price) = &mut self.price {
            price.flash_until = Some(Instant::now() + duration);
        }
    }

    fn set_signal_text(&mut self, text: &str) {
        if let Some(signal) = &mut self.signal {
            signal.text = text.to_string();
        }
    }

    fn set_signal_class(&mut self, class: Option<SignalClass>) {
        if let Some(signal) = &mut self.signal {
            signal.class = class;
        }
    }

    fn set_indicators(&mut self, text: &str) {
        if let Some(indicators) = &mut self.indicators {
            *indicators = text.to_string();
        }
    }

    fn set_last_updated(&mut self, text: &str) {
        if let Some(updated) = &mut self.last_updated {
            *updated = text.to_string();
        }
    }

    fn present(&mut self) {
        if self.echo {
            println!("{}", self.render());
        }
    }
}
