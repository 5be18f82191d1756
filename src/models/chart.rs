//! Chart models
//!
//! A `LineChart` is the state behind the price canvas: one shared label axis
//! and an ordered list of datasets. Index 0 is always the price line, indices
//! 1 and 2 are the short and long EMA overlays once they exist.

use std::str::FromStr;

use crate::error::DashboardError;

pub const PRICE_DATASET: usize = 0;
pub const EMA_SHORT_DATASET: usize = 1;
pub const EMA_LONG_DATASET: usize = 2;

/// Price line plus both EMA overlays
const FULL_DATASET_COUNT: usize = 3;

/// RGBA colour, alpha in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub f64);

/// A single line series on the chart
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: &'static str,
    pub color: Rgba,
    pub line_width: f64,
    /// Area fill under the line, if any
    pub fill: Option<Rgba>,
    pub values: Vec<f64>,
}

impl Dataset {
    pub fn price(values: Vec<f64>) -> Self {
        Self {
            label: "BTC Price (USD)",
            color: Rgba(0x00, 0xff, 0xff, 1.0),
            line_width: 2.0,
            fill: Some(Rgba(0, 255, 255, 0.1)),
            values,
        }
    }

    pub fn ema_short(values: Vec<f64>) -> Self {
        Self {
            label: "EMA Short (9)",
            color: Rgba(0x00, 0x80, 0x00, 1.0),
            line_width: 1.5,
            fill: None,
            values,
        }
    }

    pub fn ema_long(values: Vec<f64>) -> Self {
        Self {
            label: "EMA Long (26)",
            color: Rgba(0xff, 0xa5, 0x00, 1.0),
            line_width: 1.5,
            fill: None,
            values,
        }
    }
}

/// Chart data: shared category labels plus datasets
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl LineChart {
    /// A chart with only the price line.
    ///
    /// Room for the overlays is reserved up front so adding them later never
    /// moves the price dataset.
    pub fn new(labels: Vec<String>, prices: Vec<f64>) -> Self {
        let mut datasets = Vec::with_capacity(FULL_DATASET_COUNT);
        datasets.push(Dataset::price(prices));
        Self { labels, datasets }
    }

    pub fn has_ema(&self) -> bool {
        self.datasets.len() > EMA_LONG_DATASET
    }

    /// Min and max over every plotted value, `None` if there are none
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Lifecycle of the chart within a session. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChartPhase {
    Absent,
    Present,
    PresentWithEma,
}

/// What happens to existing EMA overlays when a snapshot carries none
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmaRetention {
    /// Overlays keep their last values until new ones arrive
    Keep,
    /// Overlays are emptied but stay on the chart
    Clear,
}

impl FromStr for EmaRetention {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "clear" => Ok(Self::Clear),
            other => Err(DashboardError::Config(format!(
                "Unknown EMA_RETENTION '{}'. Use: keep, clear",
                other
            ))),
        }
    }
}
