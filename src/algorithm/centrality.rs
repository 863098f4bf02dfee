//! 关键顶点（接近中心性）
//!
//! 中心性 = (可达数 - 1)² / ((|V| - 1) × 距离和)，距离和为 0 时中心性为 0。
//! 不可达顶点对距离和的贡献为 0。

use crate::error::{Error, Result};
use crate::graph::{Graph, Vertex, VertexId};
use crate::metrics;
use crate::types::Weight;
use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// 关键顶点配置
#[derive(Debug, Clone, Copy)]
pub struct CentralityConfig {
    /// 选取的顶点比例（向上取整）
    pub top_ratio: f64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self { top_ratio: 0.2 }
    }
}

/// 带中心性分数的顶点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyVertex<D> {
    pub vertex: Vertex<D>,
    pub centrality: f64,
}

/// 关键顶点查找器
pub struct KeyVertexFinder<'a, D> {
    graph: &'a Graph<D>,
    config: CentralityConfig,
}

impl<'a, D> KeyVertexFinder<'a, D>
where
    D: Clone + Eq + Hash + Debug,
{
    pub fn new(graph: &'a Graph<D>) -> Self {
        Self {
            graph,
            config: CentralityConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CentralityConfig) -> Self {
        self.config = config;
        self
    }

    /// 选取中心性最高的 `ceil(top_ratio × |V|)` 个顶点
    ///
    /// 按中心性降序排列，相同分数时 ID 小的在前。含负权边的图返回 `Error::Unsupported`。
    pub fn find(&self) -> Result<Vec<KeyVertex<D>>> {
        metrics::observe(|| {
            let mut scores = self.scores()?;
            scores.sort_by(|a, b| {
                b.centrality
                    .partial_cmp(&a.centrality)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.vertex.id().cmp(&b.vertex.id()))
            });

            let take = (self.config.top_ratio * self.graph.vertex_count() as f64).ceil() as usize;
            scores.truncate(take);

            debug!(selected = scores.len(), "关键顶点查找完成");
            Ok(scores)
        })
    }

    /// 全部顶点的接近中心性（按 ID 排序）
    pub fn closeness_centrality(&self) -> Result<Vec<KeyVertex<D>>> {
        metrics::observe(|| self.scores())
    }

    fn scores(&self) -> Result<Vec<KeyVertex<D>>> {
        if self.graph.has_negative_edges() {
            return Err(Error::Unsupported("含负权边的图没有定义接近中心性".to_string()));
        }

        let n = self.graph.vertex_count();
        Ok(self
            .graph
            .iter_vertices()
            .map(|vertex| {
                let sum = self.distance_sum(vertex.id());
                let reachable = self.reachable_count(vertex.id());
                KeyVertex {
                    vertex: vertex.clone(),
                    centrality: closeness(reachable, n, sum),
                }
            })
            .collect())
    }

    /// 单源松弛，返回到所有可达顶点的距离和（i128 累加不会溢出）
    fn distance_sum(&self, src: VertexId) -> i128 {
        let adjacency = self.graph.adjacency();
        let mut distances: HashMap<VertexId, Weight> = HashMap::new();
        let mut settled: HashSet<VertexId> = HashSet::new();
        let mut queue: PriorityQueue<VertexId, Reverse<Weight>> = PriorityQueue::new();

        distances.insert(src, 0);
        queue.push(src, Reverse(0));

        while let Some((u, Reverse(dist))) = queue.pop() {
            settled.insert(u);
            for &v in adjacency.neighbors(u).into_iter().flatten() {
                if settled.contains(&v) {
                    continue;
                }
                let Some(weight) = self.graph.weight_between(u, v) else {
                    continue;
                };
                let candidate = dist.saturating_add(weight);
                if distances.get(&v).map_or(true, |&best| candidate < best) {
                    distances.insert(v, candidate);
                    queue.push_increase(v, Reverse(candidate));
                }
            }
        }

        distances.values().map(|&d| i128::from(d)).sum()
    }

    /// BFS 统计可达顶点数（含自身）
    fn reachable_count(&self, src: VertexId) -> usize {
        let adjacency = self.graph.adjacency();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(src);
        queue.push_back(src);

        while let Some(u) = queue.pop_front() {
            for &v in adjacency.neighbors(u).into_iter().flatten() {
                if visited.insert(v) {
                    queue.push_back(v);
                }
            }
        }

        visited.len()
    }
}

fn closeness(reachable: usize, vertex_count: usize, distance_sum: i128) -> f64 {
    if distance_sum == 0 || vertex_count < 2 {
        return 0.0;
    }
    let reached = (reachable.saturating_sub(1)) as f64;
    (reached * reached) / ((vertex_count - 1) as f64 * distance_sum as f64)
}
