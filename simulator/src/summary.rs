//! Plain aggregation over a run's results.

use std::collections::BTreeMap;

use serde::Serialize;

use letitride_types::{FiveCardHand, RunOutput, StopReason};

#[derive(Clone, Debug, Default)]
struct Stats {
    count: u64,
    total: f64,
    total_sq: f64,
}

impl Stats {
    fn add(&mut self, value: i64) {
        let v = value as f64;
        self.count += 1;
        self.total += v;
        self.total_sq += v * v;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }

    fn stderr(&self) -> f64 {
        if self.count <= 1 {
            return 0.0;
        }
        let mean = self.mean();
        let var = (self.total_sq / self.count as f64) - mean * mean;
        let var = if var < 0.0 { 0.0 } else { var };
        (var / self.count as f64).sqrt()
    }
}

/// Run level figures printed by the CLI.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub units: u64,
    pub results: u64,
    pub master_seed: u64,
    pub reproducible: bool,
    pub workers: usize,
    pub elapsed_ms: u64,
    pub total_rounds: u64,

    pub mean_delta: f64,
    pub stderr_delta: f64,
    pub min_delta: i64,
    pub max_delta: i64,

    /// Base bets left riding plus bonus wagers.
    pub total_wagered: u64,
    pub total_net: i64,
    pub bonus_net: i64,
    /// Share of the amount wagered kept by the house.
    pub house_edge: f64,

    pub stop_reasons: BTreeMap<StopReason, u64>,
    pub hands: BTreeMap<FiveCardHand, u64>,
}

impl RunSummary {
    pub fn from_output(output: &RunOutput) -> Self {
        let mut deltas = Stats::default();
        let mut min_delta = i64::MAX;
        let mut max_delta = i64::MIN;
        let mut total_wagered = 0u64;
        let mut total_net = 0i64;
        let mut bonus_net = 0i64;
        let mut stop_reasons = BTreeMap::new();
        let mut hands = BTreeMap::new();

        for result in &output.results {
            deltas.add(result.bankroll_delta);
            min_delta = min_delta.min(result.bankroll_delta);
            max_delta = max_delta.max(result.bankroll_delta);

            let aggregates = &result.aggregates;
            total_wagered = total_wagered
                .saturating_add(aggregates.at_risk)
                .saturating_add(aggregates.bonus_wagered);
            total_net = total_net.saturating_add(result.bankroll_delta);
            bonus_net = bonus_net.saturating_add(aggregates.bonus_net);
            *stop_reasons.entry(result.stop_reason).or_insert(0) += 1;
            for (hand, count) in &aggregates.hands {
                *hands.entry(*hand).or_insert(0) += count;
            }
        }
        if output.results.is_empty() {
            min_delta = 0;
            max_delta = 0;
        }

        let house_edge = if total_wagered == 0 {
            0.0
        } else {
            -(total_net as f64) / total_wagered as f64
        };

        Self {
            units: output.metadata.units,
            results: output.results.len() as u64,
            master_seed: output.metadata.master_seed,
            reproducible: output.metadata.reproducible,
            workers: output.metadata.workers,
            elapsed_ms: output.metadata.elapsed_ms,
            total_rounds: output.metadata.total_rounds,
            mean_delta: deltas.mean(),
            stderr_delta: deltas.stderr(),
            min_delta,
            max_delta,
            total_wagered,
            total_net,
            bonus_net,
            house_edge,
            stop_reasons,
            hands,
        }
    }
}
