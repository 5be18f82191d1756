//! Runtime configuration, read from the environment after `.env` is loaded

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::display::panel::Field;
use crate::error::{DashboardError, Result};
use crate::models::chart::EmaRetention;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api/data";
const DEFAULT_FIELDS: &str = "price,signal,lastUpdated,indicators";

/// How overlapping poll responses are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOrdering {
    /// Whichever response is processed last wins, even if it belongs to an older cycle
    LastArrivalWins,
    /// Responses from cycles older than the last applied one are dropped
    DiscardStale,
}

impl FromStr for ResponseOrdering {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "last-arrival" => Ok(Self::LastArrivalWins),
            "discard-stale" => Ok(Self::DiscardStale),
            other => Err(DashboardError::Config(format!(
                "Unknown RESPONSE_ORDERING '{}'. Use: last-arrival, discard-stale",
                other
            ))),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub poll_interval: Duration,
    pub retry_delay: Duration,
    /// `None` disables the client timeout
    pub request_timeout: Option<Duration>,
    pub price_flash: Duration,
    pub fields: Vec<Field>,
    /// `None` means there is no canvas to draw the chart on
    pub chart_output: Option<PathBuf>,
    pub chart_width: u32,
    pub chart_height: u32,
    pub ema_retention: EmaRetention,
    pub response_ordering: ResponseOrdering,
    pub echo_panel: bool,
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());

        let fields = get("DASHBOARD_FIELDS")
            .unwrap_or_else(|| DEFAULT_FIELDS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Field::from_str)
            .collect::<Result<Vec<_>>>()?;

        let chart_output = match get("CHART_OUTPUT") {
            Some(path) if path.is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from("price_chart.png")),
        };

        let timeout_secs: u64 = parse_or(&get, "REQUEST_TIMEOUT_SECS", 15)?;

        let config = Self {
            api_url: get("SIGNAL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            poll_interval: Duration::from_secs(parse_or(&get, "POLL_INTERVAL_SECS", 30)?),
            retry_delay: Duration::from_secs(parse_or(&get, "RETRY_DELAY_SECS", 10)?),
            request_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            price_flash: Duration::from_millis(parse_or(&get, "PRICE_FLASH_MILLIS", 700)?),
            fields,
            chart_output,
            chart_width: parse_or(&get, "CHART_WIDTH", 1024)?,
            chart_height: parse_or(&get, "CHART_HEIGHT", 480)?,
            ema_retention: get("EMA_RETENTION")
                .map(|v| v.parse::<EmaRetention>())
                .transpose()?
                .unwrap_or(EmaRetention::Keep),
            response_ordering: get("RESPONSE_ORDERING")
                .map(|v| v.parse::<ResponseOrdering>())
                .transpose()?
                .unwrap_or(ResponseOrdering::LastArrivalWins),
            echo_panel: get("ECHO_PANEL")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(DashboardError::Config("SIGNAL_API_URL cannot be empty".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(DashboardError::Config("POLL_INTERVAL_SECS must be positive".into()));
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(DashboardError::Config("CHART_WIDTH and CHART_HEIGHT must be positive".into()));
        }
        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|e| DashboardError::Config(format!("{} = '{}': {}", key, raw, e))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.retry_delay, Duration::from_secs(10));
        assert_eq!(config.price_flash, Duration::from_millis(700));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(
            config.fields,
            vec![Field::Price, Field::Signal, Field::LastUpdated, Field::Indicators]
        );
        assert_eq!(config.chart_output, Some(PathBuf::from("price_chart.png")));
        assert_eq!(config.ema_retention, EmaRetention::Keep);
        assert_eq!(config.response_ordering, ResponseOrdering::LastArrivalWins);
        assert!(config.echo_panel);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("POLL_INTERVAL_SECS", "5"),
            ("REQUEST_TIMEOUT_SECS", "0"),
            ("DASHBOARD_FIELDS", "signal, price"),
            ("CHART_OUTPUT", ""),
            ("EMA_RETENTION", "clear"),
            ("RESPONSE_ORDERING", "discard-stale"),
            ("ECHO_PANEL", "false"),
        ])
        .unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.fields, vec![Field::Signal, Field::Price]);
        assert_eq!(config.chart_output, None);
        assert_eq!(config.ema_retention, EmaRetention::Clear);
        assert_eq!(config.response_ordering, ResponseOrdering::DiscardStale);
        assert!(!config.echo_panel);
    }

    #[test]
    fn test_unparseable_number_is_an_error() {
        let err = config_from(&[("RETRY_DELAY_SECS", "ten")]).unwrap_err();
        assert!(err.to_string().contains("RETRY_DELAY_SECS"));
    }

    #[test]
    fn test_rejects_zero_interval_and_unknown_values() {
        assert!(config_from(&[("POLL_INTERVAL_SECS", "0")]).is_err());
        assert!(config_from(&[("CHART_WIDTH", "0")]).is_err());
        assert!(config_from(&[("DASHBOARD_FIELDS", "price,volume")]).is_err());
        assert!(config_from(&[("EMA_RETENTION", "forever")]).is_err());
        assert!(config_from(&[("RESPONSE_ORDERING", "random")]).is_err());
    }
}
