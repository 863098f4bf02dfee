//! 运行指标收集模块
//!
//! 统计图变更次数与算法运行情况

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 全局指标
#[derive(Debug)]
pub struct Metrics {
    /// 图变更统计
    graph_stats: GraphStats,
    /// 算法统计
    algorithm_stats: AlgorithmStats,
    /// 启动时间
    start_time: Instant,
}

/// 图变更统计
#[derive(Debug, Default)]
struct GraphStats {
    vertices_inserted: AtomicU64,
    vertices_removed: AtomicU64,
    edges_inserted: AtomicU64,
    edges_removed: AtomicU64,
}

/// 算法统计
#[derive(Debug, Default)]
struct AlgorithmStats {
    /// 总运行次数
    total_runs: AtomicU64,
    /// 失败次数（包括不支持的图形态）
    failed_runs: AtomicU64,
    /// 运行总耗时（微秒）
    total_duration_us: AtomicU64,
    /// 慢运行数（>1s）
    slow_runs: AtomicU64,
}

/// 可导出的指标快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub vertices_inserted: u64,
    pub vertices_removed: u64,
    pub edges_inserted: u64,
    pub edges_removed: u64,

    pub algorithm_runs: u64,
    pub algorithm_failures: u64,
    pub avg_algorithm_duration_ms: f64,
    pub slow_algorithm_runs: u64,

    pub uptime_seconds: u64,
}

impl Metrics {
    /// 创建新的指标收集器
    pub fn new() -> Self {
        Self {
            graph_stats: GraphStats::default(),
            algorithm_stats: AlgorithmStats::default(),
            start_time: Instant::now(),
        }
    }

    pub fn record_vertex_inserted(&self) {
        self.graph_stats
            .vertices_inserted
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_vertex_removed(&self) {
        self.graph_stats
            .vertices_removed
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_edge_inserted(&self) {
        self.graph_stats.edges_inserted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_edge_removed(&self) {
        self.graph_stats.edges_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录算法开始
    pub fn record_algorithm_start(&self) -> AlgorithmTimer {
        self.algorithm_stats
            .total_runs
            .fetch_add(1, Ordering::Relaxed);
        AlgorithmTimer::new()
    }

    /// 记录算法结束
    pub fn record_algorithm_complete(&self, timer: AlgorithmTimer, success: bool) {
        let duration = timer.elapsed();

        if !success {
            self.algorithm_stats
                .failed_runs
                .fetch_add(1, Ordering::Relaxed);
        }

        self.algorithm_stats
            .total_duration_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        if duration.as_secs() >= 1 {
            self.algorithm_stats.slow_runs.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        let runs = self.algorithm_stats.total_runs.load(Ordering::Relaxed);
        let total_duration_us = self
            .algorithm_stats
            .total_duration_us
            .load(Ordering::Relaxed);

        let avg_algorithm_duration_ms = if runs > 0 {
            (total_duration_us as f64) / (runs as f64) / 1000.0
        } else {
            0.0
        };

        MetricsSnapshot {
            vertices_inserted: self.graph_stats.vertices_inserted.load(Ordering::Relaxed),
            vertices_removed: self.graph_stats.vertices_removed.load(Ordering::Relaxed),
            edges_inserted: self.graph_stats.edges_inserted.load(Ordering::Relaxed),
            edges_removed: self.graph_stats.edges_removed.load(Ordering::Relaxed),
            algorithm_runs: runs,
            algorithm_failures: self.algorithm_stats.failed_runs.load(Ordering::Relaxed),
            avg_algorithm_duration_ms,
            slow_algorithm_runs: self.algorithm_stats.slow_runs.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// 算法计时器
pub struct AlgorithmTimer {
    start: Instant,
}

impl AlgorithmTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// 全局指标实例
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// 获取全局指标实例
pub fn global() -> &'static Metrics {
    &METRICS
}

/// 计时运行一个算法并记录结果
pub(crate) fn observe<T, E>(run: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    let metrics = global();
    let timer = metrics.record_algorithm_start();
    let result = run();
    metrics.record_algorithm_complete(timer, result.is_ok());
    result
}
