//! 最短路径
//!
//! 按图形态分派：非负权用 Dijkstra，有向负权用 Bellman-Ford

use crate::error::{Error, Result};
use crate::graph::{Edge, EdgeKey, Graph, Vertex, VertexId};
use crate::metrics;
use crate::types::Weight;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, warn};

/// 路径结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult<D> {
    /// 路径上的顶点序列（含起点）
    pub vertices: Vec<Vertex<D>>,
    /// 路径上的边序列
    pub edges: Vec<Edge<D>>,
    /// 路径总权重
    pub total_weight: Weight,
}

impl<D> PathResult<D> {
    fn with_start(start: Vertex<D>) -> Self {
        Self {
            vertices: vec![start],
            edges: Vec::new(),
            total_weight: 0,
        }
    }

    /// 路径边数
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// 最短路径查找器
pub struct ShortestPathFinder<'a, D> {
    graph: &'a Graph<D>,
}

impl<'a, D> ShortestPathFinder<'a, D>
where
    D: Clone + Eq + Hash + Debug,
{
    /// 创建查找器
    pub fn new(graph: &'a Graph<D>) -> Self {
        Self { graph }
    }

    /// 查找 `src` 到 `dest` 的最短路径
    ///
    /// 不可达或被负环干扰时返回 `Ok(None)`；不带权的图以及含负权边的无向图
    /// 没有定义最短路径，返回 `Error::Unsupported`。
    pub fn find(&self, src: &Vertex<D>, dest: &Vertex<D>) -> Result<Option<PathResult<D>>> {
        metrics::observe(|| {
            for v in [src, dest] {
                if !self.graph.contains_vertex(v) {
                    return Err(Error::VertexNotFound(format!("{:?}", v)));
                }
            }

            if !self.graph.is_weighted() {
                warn!("不带权的图不支持最短路径");
                return Err(Error::Unsupported("不带权的图没有定义最短路径".to_string()));
            }

            if src.id() == dest.id() {
                return Ok(Some(PathResult::with_start(src.clone())));
            }

            let predecessors = if !self.graph.has_negative_edges() {
                self.dijkstra(src.id(), dest.id())
            } else if self.graph.is_directed() {
                match self.bellman_ford(src.id(), dest.id()) {
                    Some(predecessors) => predecessors,
                    None => return Ok(None),
                }
            } else {
                warn!("含负权边的无向图不支持最短路径");
                return Err(Error::Unsupported(
                    "含负权边的无向图没有定义最短路径".to_string(),
                ));
            };

            let path = self.reconstruct_path(src.id(), dest.id(), &predecessors);
            debug!(
                src = %src.id(),
                dest = %dest.id(),
                found = path.is_some(),
                "最短路径查找完成"
            );
            Ok(path)
        })
    }

    /// Dijkstra：优先队列按累计距离排序，已处理的 (顶点, 距离) 对做惰性删除
    fn dijkstra(&self, src: VertexId, dest: VertexId) -> HashMap<VertexId, EdgeKey> {
        let adjacency = self.graph.adjacency();
        let mut distances: HashMap<VertexId, Weight> = HashMap::new();
        let mut predecessors: HashMap<VertexId, EdgeKey> = HashMap::new();
        let mut visited: HashSet<(VertexId, Weight)> = HashSet::new();
        let mut heap = BinaryHeap::new();

        distances.insert(src, 0);
        heap.push(Reverse((0, src)));

        while let Some(Reverse((dist, u))) = heap.pop() {
            if !visited.insert((u, dist)) {
                continue;
            }
            if distances.get(&u).is_some_and(|&best| dist > best) {
                continue;
            }
            if u == dest {
                break;
            }

            for &v in adjacency.neighbors(u).into_iter().flatten() {
                let Some(key) = self.graph.find_edge_key(u, v) else {
                    continue;
                };
                let Some(weight) = self.graph.weight_between(u, v) else {
                    continue;
                };
                let candidate = dist.saturating_add(weight);
                if distances.get(&v).map_or(true, |&best| candidate < best) {
                    distances.insert(v, candidate);
                    predecessors.insert(v, key);
                    heap.push(Reverse((candidate, v)));
                }
            }
        }

        predecessors
    }

    /// Bellman-Ford：松弛 |V| 轮，再做一轮负环传播；目标受负环影响时返回 None
    fn bellman_ford(&self, src: VertexId, dest: VertexId) -> Option<HashMap<VertexId, EdgeKey>> {
        let n = self.graph.vertex_count();
        let edges: Vec<(EdgeKey, Weight)> = self.graph.edge_keys().collect();
        let mut distances: Vec<Option<Weight>> = vec![None; n];
        let mut predecessors: HashMap<VertexId, EdgeKey> = HashMap::new();

        distances[src.index()] = Some(0);

        for _ in 0..n {
            let mut changed = false;
            for &(key, weight) in &edges {
                let Some(du) = distances[key.from.index()] else {
                    continue;
                };
                let candidate = du.saturating_add(weight);
                if distances[key.to.index()].map_or(true, |dv| candidate < dv) {
                    distances[key.to.index()] = Some(candidate);
                    predecessors.insert(key.to, key);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        // 负环可达的顶点单独标记，不与饱和后的距离混淆
        let mut tainted = vec![false; n];
        for _ in 0..n {
            let mut changed = false;
            for &(key, weight) in &edges {
                let Some(du) = distances[key.from.index()] else {
                    continue;
                };
                let Some(dv) = distances[key.to.index()] else {
                    continue;
                };
                if tainted[key.to.index()] {
                    continue;
                }
                if tainted[key.from.index()] || du.saturating_add(weight) < dv {
                    tainted[key.to.index()] = true;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        if tainted[dest.index()] {
            debug!(dest = %dest, "目标受负环影响");
            return None;
        }
        Some(predecessors)
    }

    /// 沿前驱表重构路径；缺少前驱即视为无路径
    fn reconstruct_path(
        &self,
        src: VertexId,
        dest: VertexId,
        predecessors: &HashMap<VertexId, EdgeKey>,
    ) -> Option<PathResult<D>> {
        let mut keys = Vec::new();
        let mut current = dest;

        while current != src {
            let key = *predecessors.get(&current)?;
            keys.push(key);
            if keys.len() > self.graph.vertex_count() {
                return None;
            }
            current = key.opposite(current)?;
        }
        keys.reverse();

        let mut path = PathResult::with_start(self.graph.vertex(src)?.clone());
        let mut at = src;
        for key in keys {
            let next = key.opposite(at)?;
            path.total_weight = path
                .total_weight
                .saturating_add(self.graph.weight_between(at, next)?);
            path.edges.push(self.graph.materialize(key));
            path.vertices.push(self.graph.vertex(next)?.clone());
            at = next;
        }

        Some(path)
    }
}
