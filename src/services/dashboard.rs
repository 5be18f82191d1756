//! Dashboard controller: the one owner of panel, chart state and canvas

use std::time::Duration;

use chrono::NaiveTime;
use tracing::{error, warn};

use super::chart_service::{ChartState, Reconciliation};
use super::render_service;
use crate::config::ResponseOrdering;
use crate::display::{ChartCanvas, DisplaySurface, SharedCanvas};
use crate::error::Result;
use crate::models::snapshot::ChartSeries;
use crate::models::{EmaRetention, LineChart, Snapshot};

/// Settings the controller needs from `Config`
#[derive(Debug, Clone, Copy)]
pub struct DashboardSettings {
    pub price_flash: Duration,
    pub ema_retention: EmaRetention,
    pub response_ordering: ResponseOrdering,
}

/// Result of handing a poll outcome to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Fields (and the chart, if the snapshot had series) were updated
    Updated {
        chart: Option<Reconciliation>,
        /// How long the price stays emphasised, if it was updated
        flash: Option<Duration>,
    },
    /// Dropped because a newer cycle has already been applied
    Stale,
}

/// A copy of the chart waiting to be drawn, detached from the dashboard
pub struct Redraw<C> {
    canvas: SharedCanvas<C>,
    chart: LineChart,
    version: u64,
}

impl<C: ChartCanvas> Redraw<C> {
    /// Draw the chart. Blocks on image encoding and file I/O.
    pub fn run(self) -> Result<bool> {
        self.canvas.draw(&self.chart, self.version)
    }
}

pub struct Dashboard<S, C> {
    surface: S,
    canvas: Option<SharedCanvas<C>>,
    chart: ChartState,
    settings: DashboardSettings,
    last_applied: u64,
    /// Bumped on every reconciliation
    chart_version: u64,
    /// Last version handed out by `take_redraw`
    queued_version: u64,
}

impl<S: DisplaySurface, C: ChartCanvas> Dashboard<S, C> {
    pub fn new(surface: S, canvas: Option<C>, settings: DashboardSettings) -> Self {
        if canvas.is_none() {
            error!("Chart canvas not configured, the price chart will not be drawn");
        }
        Self {
            surface,
            canvas: canvas.map(SharedCanvas::new),
            chart: ChartState::new(settings.ema_retention),
            settings,
            last_applied: 0,
            chart_version: 0,
            queued_version: 0,
        }
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub fn chart(&self) -> &ChartState {
        &self.chart
    }

    #[cfg(test)]
    pub fn chart_phase(&self) -> crate::models::ChartPhase {
        self.chart.phase()
    }

    #[cfg(test)]
    pub fn canvas(&self) -> Option<&SharedCanvas<C>> {
        self.canvas.as_ref()
    }

    /// Mark cycle `seq` as applied, unless a newer one already was
    fn admit(&mut self, seq: u64) -> bool {
        if self.settings.response_ordering == ResponseOrdering::DiscardStale && seq < self.last_applied {
            warn!("Discarding response from cycle {} (cycle {} already applied)", seq, self.last_applied);
            return false;
        }
        self.last_applied = self.last_applied.max(seq);
        true
    }

    pub fn show_loading(&mut self) {
        render_service::show_loading(&mut self.surface);
        self.surface.present();
    }

    /// Re-echo the surface as it stands, e.g. once a price flash has run out
    pub fn present(&mut self) {
        self.surface.present();
    }

    /// Apply a successful snapshot from cycle `seq`.
    ///
    /// The chart state is reconciled here; drawing it is left to the caller
    /// through `take_redraw`.
    pub fn apply_snapshot(&mut self, seq: u64, snapshot: &Snapshot, now: NaiveTime) -> Applied {
        if !self.admit(seq) {
            return Applied::Stale;
        }

        for mismatch in snapshot.series_mismatches() {
            warn!("Snapshot series misaligned: {}", mismatch);
        }

        let flashed =
            render_service::render_fields(&mut self.surface, snapshot, self.settings.price_flash, now);
        let chart = snapshot.chart_series().and_then(|series| self.update_chart(series));
        self.surface.present();

        Applied::Updated {
            chart,
            flash: flashed.then_some(self.settings.price_flash),
        }
    }

    fn update_chart(&mut self, series: ChartSeries<'_>) -> Option<Reconciliation> {
        if self.canvas.is_none() {
            error!("Chart canvas not found, skipping chart update");
            return None;
        }

        self.chart_version += 1;
        Some(self.chart.reconcile(series))
    }

    /// The chart as of the latest reconciliation, unless it was already taken
    pub fn take_redraw(&mut self) -> Option<Redraw<C>> {
        if self.queued_version == self.chart_version {
            return None;
        }
        let canvas = self.canvas.clone()?;
        let chart = self.chart.chart()?.clone();
        self.queued_version = self.chart_version;

        Some(Redraw {
            canvas,
            chart,
            version: self.chart_version,
        })
    }

    /// Show a failed poll from cycle `seq`. Returns false if it was stale.
    pub fn show_error(&mut self, seq: u64, message: &str) -> bool {
        if !self.admit(seq) {
            return false;
        }
        render_service::show_error(&mut self.surface, message);
        self.surface.present();
        true
    }
}
