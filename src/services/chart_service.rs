use crate::models::chart::{EMA_LONG_DATASET, EMA_SHORT_DATASET, PRICE_DATASET};
use crate::models::snapshot::ChartSeries;
use crate::models::{ChartPhase, Dataset, EmaRetention, LineChart};

/// Outcome of one reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub from: ChartPhase,
    pub to: ChartPhase,
}

/// The single chart of a session, mutated in place on every snapshot
#[derive(Debug)]
pub struct ChartState {
    chart: Option<LineChart>,
    retention: EmaRetention,
}

/// Overwrite `target` with `source` without replacing the allocation
fn overwrite<T: Clone>(target: &mut Vec<T>, source: &[T]) {
    target.clear();
    target.extend_from_slice(source);
}

impl ChartState {
    pub fn new(retention: EmaRetention) -> Self {
        Self {
            chart: None,
            retention,
        }
    }

    pub fn phase(&self) -> ChartPhase {
        match &self.chart {
            None => ChartPhase::Absent,
            Some(chart) if chart.has_ema() => ChartPhase::PresentWithEma,
            Some(_) => ChartPhase::Present,
        }
    }

    pub fn chart(&self) -> Option<&LineChart> {
        self.chart.as_ref()
    }

    /// Bring the chart in line with `series`, creating it on first use.
    ///
    /// EMA overlays are added once, the first time a snapshot carries EMA
    /// data, and are never removed afterwards.
    pub fn reconcile(&mut self, series: ChartSeries<'_>) -> Reconciliation {
        let from = self.phase();

        let chart = self
            .chart
            .get_or_insert_with(|| LineChart::new(series.labels.to_vec(), series.prices.to_vec()));

        if from != ChartPhase::Absent {
            overwrite(&mut chart.labels, series.labels);
            overwrite(&mut chart.datasets[PRICE_DATASET].values, series.prices);
        }

        if series.has_ema() {
            if chart.has_ema() {
                overwrite(&mut chart.datasets[EMA_SHORT_DATASET].values, series.ema_short);
                overwrite(&mut chart.datasets[EMA_LONG_DATASET].values, series.ema_long);
            } else {
                chart.datasets.push(Dataset::ema_short(series.ema_short.to_vec()));
                chart.datasets.push(Dataset::ema_long(series.ema_long.to_vec()));
            }
        } else if chart.has_ema() && self.retention == EmaRetention::Clear {
            chart.datasets[EMA_SHORT_DATASET].values.clear();
            chart.datasets[EMA_LONG_DATASET].values.clear();
        }

        Reconciliation {
            from,
            to: self.phase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Series {
        labels: Vec<String>,
        prices: Vec<f64>,
        ema_short: Vec<f64>,
        ema_long: Vec<f64>,
    }

    impl Series {
        fn new(prices: &[f64]) -> Self {
            Self {
                labels: (0..prices.len()).map(|i| format!("10:{:02}", i)).collect(),
                prices: prices.to_vec(),
                ema_short: Vec::new(),
                ema_long: Vec::new(),
            }
        }

        fn with_ema(mut self, short: &[f64], long: &[f64]) -> Self {
            self.ema_short = short.to_vec();
            self.ema_long = long.to_vec();
            self
        }

        fn view(&self) -> ChartSeries<'_> {
            ChartSeries {
                labels: &self.labels,
                prices: &self.prices,
                ema_short: &self.ema_short,
                ema_long: &self.ema_long,
            }
        }
    }

    #[test]
    fn test_absent_to_present() {
        let mut state = ChartState::new(EmaRetention::Keep);
        assert_eq!(state.phase(), ChartPhase::Absent);

        let series = Series::new(&[65000.0, 65100.0]);
        let result = state.reconcile(series.view());

        assert_eq!(result, Reconciliation { from: ChartPhase::Absent, to: ChartPhase::Present });
        let chart = state.chart().unwrap();
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].values, vec![65000.0, 65100.0]);
        assert_eq!(chart.labels, vec!["10:00", "10:01"]);
    }

    #[test]
    fn test_absent_straight_to_ema() {
        let mut state = ChartState::new(EmaRetention::Keep);
        let series = Series::new(&[1.0, 2.0]).with_ema(&[1.5, 1.6], &[1.2, 1.3]);

        let result = state.reconcile(series.view());
        assert_eq!(result.to, ChartPhase::PresentWithEma);
        let chart = state.chart().unwrap();
        assert_eq!(chart.datasets.len(), 3);
        assert_eq!(chart.datasets[1].label, "EMA Short (9)");
        assert_eq!(chart.datasets[2].values, vec![1.2, 1.3]);
    }

    #[test]
    fn test_present_updates_in_place_and_adds_ema_once() {
        let mut state = ChartState::new(EmaRetention::Keep);
        state.reconcile(Series::new(&[65000.0, 65100.0]).view());
        let primary_before = &state.chart().unwrap().datasets[0] as *const Dataset;

        let next = Series::new(&[65050.0, 65150.0]).with_ema(&[64900.0, 64950.0], &[64700.0, 64800.0]);
        let result = state.reconcile(next.view());
        assert_eq!(result, Reconciliation { from: ChartPhase::Present, to: ChartPhase::PresentWithEma });

        let chart = state.chart().unwrap();
        assert_eq!(&chart.datasets[0] as *const Dataset, primary_before);
        assert_eq!(chart.datasets[0].values, vec![65050.0, 65150.0]);
        assert_eq!(chart.datasets.len(), 3);

        // Re-applying the same snapshot must not duplicate overlays
        let before = chart.clone();
        state.reconcile(next.view());
        assert_eq!(state.chart().unwrap(), &before);
    }

    #[test]
    fn test_length_follows_latest_prices() {
        let mut state = ChartState::new(EmaRetention::Keep);
        state.reconcile(Series::new(&[1.0, 2.0, 3.0]).view());
        state.reconcile(Series::new(&[4.0]).view());

        let chart = state.chart().unwrap();
        assert_eq!(chart.labels.len(), 1);
        assert_eq!(chart.datasets[0].values, vec![4.0]);
    }

    #[test]
    fn test_keep_retains_stale_ema() {
        let mut state = ChartState::new(EmaRetention::Keep);
        state.reconcile(Series::new(&[1.0, 2.0]).with_ema(&[1.5, 1.6], &[1.2, 1.3]).view());
        let result = state.reconcile(Series::new(&[3.0, 4.0]).view());

        assert_eq!(result.to, ChartPhase::PresentWithEma);
        let chart = state.chart().unwrap();
        assert_eq!(chart.datasets[0].values, vec![3.0, 4.0]);
        assert_eq!(chart.datasets[1].values, vec![1.5, 1.6]);
        assert_eq!(chart.datasets[2].values, vec![1.2, 1.3]);
    }

    #[test]
    fn test_clear_empties_ema_but_keeps_datasets() {
        let mut state = ChartState::new(EmaRetention::Clear);
        state.reconcile(Series::new(&[1.0, 2.0]).with_ema(&[1.5, 1.6], &[1.2, 1.3]).view());
        let result = state.reconcile(Series::new(&[3.0, 4.0]).view());

        assert_eq!(result.to, ChartPhase::PresentWithEma);
        let chart = state.chart().unwrap();
        assert_eq!(chart.datasets.len(), 3);
        assert!(chart.datasets[1].values.is_empty());
        assert!(chart.datasets[2].values.is_empty());
    }

    #[test]
    fn test_dataset_count_never_decreases() {
        let mut state = ChartState::new(EmaRetention::Clear);
        let sequence = [
            Series::new(&[1.0]),
            Series::new(&[2.0]).with_ema(&[2.0], &[2.0]),
            Series::new(&[3.0]),
            Series::new(&[]),
            Series::new(&[5.0]).with_ema(&[5.0], &[5.0]),
        ];

        let mut last_count = 0;
        for series in &sequence {
            state.reconcile(series.view());
            let count = state.chart().unwrap().datasets.len();
            assert!(count >= last_count);
            last_count = count;
        }
        assert_eq!(last_count, 3);
    }
}
