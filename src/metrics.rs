//! In-process evaluation statistics for the dashboard.

use crate::types::prediction::{PredictionResult, RiskLevel};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for dashboard evaluations
pub struct DashboardMetrics {
    /// Successful evaluations
    pub evaluations: AtomicU64,
    /// Evaluations that failed in the scaler or model
    pub prediction_errors: AtomicU64,
    /// Submissions rejected for out-of-range inputs
    pub rejected_inputs: AtomicU64,
    /// Evaluations by risk level
    by_risk_level: RwLock<HashMap<RiskLevel, u64>>,
    /// Evaluation times (in microseconds)
    evaluation_times: RwLock<Vec<u64>>,
    /// Efficiency score distribution, ten points per bucket
    efficiency_buckets: RwLock<[u64; 10]>,
    /// Start time for uptime
    start_time: Instant,
}

impl DashboardMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            evaluations: AtomicU64::new(0),
            prediction_errors: AtomicU64::new(0),
            rejected_inputs: AtomicU64::new(0),
            by_risk_level: RwLock::new(HashMap::new()),
            evaluation_times: RwLock::new(Vec::with_capacity(1000)),
            efficiency_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a successful evaluation
    pub fn record_evaluation(&self, elapsed: Duration, result: &PredictionResult) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.evaluation_times.write() {
            times.push(elapsed.as_micros() as u64);
            // Keep only last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        if let Ok(mut by_level) = self.by_risk_level.write() {
            *by_level.entry(result.risk_level).or_insert(0) += 1;
        }

        let bucket = ((result.efficiency_score / 10.0) as usize).min(9);
        if let Ok(mut buckets) = self.efficiency_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    pub fn record_prediction_error(&self) {
        self.prediction_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_input(&self) {
        self.rejected_inputs.fetch_add(1, Ordering::Relaxed);
    }

    /// Get evaluation time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let Ok(times) = self.evaluation_times.read() else {
            return ProcessingStats::default();
        };
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: sorted[count - 1],
        }
    }

    /// Evaluations per risk level
    pub fn get_risk_levels(&self) -> HashMap<RiskLevel, u64> {
        self.by_risk_level
            .read()
            .map(|by_level| by_level.clone())
            .unwrap_or_default()
    }

    pub fn get_efficiency_distribution(&self) -> [u64; 10] {
        self.efficiency_buckets
            .read()
            .map(|buckets| *buckets)
            .unwrap_or_default()
    }

    /// Point-in-time copy for the metrics endpoint
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            evaluations: self.evaluations.load(Ordering::Relaxed),
            prediction_errors: self.prediction_errors.load(Ordering::Relaxed),
            rejected_inputs: self.rejected_inputs.load(Ordering::Relaxed),
            evaluation_time: self.get_processing_stats(),
            risk_levels: self.get_risk_levels(),
            efficiency_distribution: self.get_efficiency_distribution(),
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        let processing = &snapshot.evaluation_time;

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║             FURNACE DIGITAL TWIN - SESSION SUMMARY           ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Evaluations: {:>8}  │  Errors: {:>6}  │  Rejected: {:>6} ║",
            snapshot.evaluations, snapshot.prediction_errors, snapshot.rejected_inputs
        );
        info!(
            "║ Evaluation Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Risk Levels:                                                 ║");
        for level in [RiskLevel::Stable, RiskLevel::Warning, RiskLevel::Critical] {
            let count = snapshot.risk_levels.get(&level).copied().unwrap_or(0);
            let pct = if snapshot.evaluations > 0 {
                (count as f64 / snapshot.evaluations as f64) * 100.0
            } else {
                0.0
            };
            info!("║   {:10}: {:>6} ({:>5.1}%)", level.as_str(), count, pct);
        }
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Efficiency Score Distribution:                               ║");
        let total: u64 = snapshot.efficiency_distribution.iter().sum();
        for (i, &count) in snapshot.efficiency_distribution.iter().enumerate() {
            let pct = if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 };
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "║   {:>3}-{:<3}: {:>6} ({:>5.1}%) {}",
                i * 10,
                (i + 1) * 10,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluation time statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Serializable view of the collected metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub evaluations: u64,
    pub prediction_errors: u64,
    pub rejected_inputs: u64,
    pub evaluation_time: ProcessingStats,
    pub risk_levels: HashMap<RiskLevel, u64>,
    pub efficiency_distribution: [u64; 10],
}
