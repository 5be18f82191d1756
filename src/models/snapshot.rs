//! Snapshot payload returned by the signal endpoint

use serde::{Deserialize, Deserializer};

/// One poll result. Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "flexible_f64")]
    pub price: Option<f64>,
    #[serde(default)]
    pub signal: Option<String>,
    /// Outer `None`: key missing. `Some(None)`: key present but null.
    #[serde(default, deserialize_with = "nullable_f64")]
    pub rsi: Option<Option<f64>>,
    #[serde(default)]
    pub ema_short: Option<f64>,
    #[serde(default)]
    pub ema_long: Option<f64>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub prices: Option<Vec<f64>>,
    #[serde(default)]
    pub ema_short_series: Option<Vec<f64>>,
    #[serde(default)]
    pub ema_long_series: Option<Vec<f64>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Borrowed view of the series needed to reconcile the chart
#[derive(Debug, Clone, Copy)]
pub struct ChartSeries<'a> {
    pub labels: &'a [String],
    pub prices: &'a [f64],
    pub ema_short: &'a [f64],
    pub ema_long: &'a [f64],
}

impl ChartSeries<'_> {
    /// True when the snapshot carries EMA overlay data
    pub fn has_ema(&self) -> bool {
        !self.ema_short.is_empty()
    }
}

impl Snapshot {
    /// Error text reported by the backend, preferring `details` over `error`.
    /// `None` unless `error` is present and non-empty.
    pub fn reported_error(&self) -> Option<(String, Option<String>)> {
        let error = self.error.as_deref().filter(|e| !e.is_empty())?;
        let details = self.details.clone().filter(|d| !d.is_empty());
        Some((error.to_string(), details))
    }

    /// Series for the chart, only when both labels and prices are present
    pub fn chart_series(&self) -> Option<ChartSeries<'_>> {
        let labels = self.labels.as_deref()?;
        let prices = self.prices.as_deref()?;
        Some(ChartSeries {
            labels,
            prices,
            ema_short: self.ema_short_series.as_deref().unwrap_or_default(),
            ema_long: self.ema_long_series.as_deref().unwrap_or_default(),
        })
    }

    /// Describe series whose length disagrees with `labels`
    pub fn series_mismatches(&self) -> Vec<String> {
        let Some(labels) = &self.labels else {
            return Vec::new();
        };
        let expected = labels.len();

        [
            ("prices", self.prices.as_ref()),
            ("ema_short_series", self.ema_short_series.as_ref()),
            ("ema_long_series", self.ema_long_series.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, series)| {
            let series = series.filter(|s| !s.is_empty() || name == "prices")?;
            (series.len() != expected)
                .then(|| format!("{} has {} points, labels has {}", name, series.len(), expected))
        })
        .collect()
    }
}

/// Like `flexible_f64` but keeps an explicit null distinct from a missing key
fn nullable_f64<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    flexible_f64(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accept a JSON number, a numeric string, or null
fn flexible_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid number '{}': {}", text, e))),
    }
}
