//! 强连通分量（Kosaraju）

use crate::error::Result;
use crate::graph::{Graph, Vertex, VertexId};
use crate::metrics;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// 强连通分量查找器
pub struct SccFinder<'a, D> {
    graph: &'a Graph<D>,
}

impl<'a, D> SccFinder<'a, D>
where
    D: Clone + Eq + Hash + Debug,
{
    /// 创建查找器
    pub fn new(graph: &'a Graph<D>) -> Self {
        Self { graph }
    }

    /// 查找全部强连通分量
    ///
    /// 单顶点分量也会返回。分量内按顶点 ID 排序，分量之间按最小顶点 ID 排序。
    pub fn find(&self) -> Result<Vec<Vec<Vertex<D>>>> {
        metrics::observe(|| {
            let components: Vec<Vec<Vertex<D>>> = self
                .component_ids()
                .into_iter()
                .map(|ids| {
                    ids.into_iter()
                        .filter_map(|id| self.graph.vertex(id).cloned())
                        .collect()
                })
                .collect();

            debug!(count = components.len(), "强连通分量查找完成");
            Ok(components)
        })
    }

    /// 按顶点 ID 给出的强连通分量
    pub fn component_ids(&self) -> Vec<Vec<VertexId>> {
        let order = self.finish_order();
        let n = self.graph.vertex_count();
        let adjacency = self.graph.adjacency();

        let mut assigned = vec![false; n];
        let mut components = Vec::new();

        // 第二遍：在反向图上按完成时间逆序 DFS
        for &start in order.iter().rev() {
            if assigned[start.index()] {
                continue;
            }

            let mut component = Vec::new();
            let mut stack = vec![start];
            assigned[start.index()] = true;

            while let Some(u) = stack.pop() {
                component.push(u);
                for pred in adjacency.predecessors(u) {
                    if !assigned[pred.index()] {
                        assigned[pred.index()] = true;
                        stack.push(pred);
                    }
                }
            }

            component.sort();
            components.push(component);
        }

        components.sort_by_key(|c| c.first().copied());
        components
    }

    /// 第一遍：DFS 记录完成顺序
    fn finish_order(&self) -> Vec<VertexId> {
        let n = self.graph.vertex_count();
        let adjacency = self.graph.adjacency();

        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        let mut stack: Vec<(VertexId, usize)> = Vec::new();

        for root in 0..n {
            if visited[root] {
                continue;
            }
            visited[root] = true;
            stack.push((VertexId::new(root), 0));

            while let Some((u, next)) = stack.last_mut() {
                let u = *u;
                let neighbor = adjacency
                    .neighbors(u)
                    .and_then(|set| set.get_index(*next))
                    .copied();

                match neighbor {
                    Some(v) => {
                        *next += 1;
                        if !visited[v.index()] {
                            visited[v.index()] = true;
                            stack.push((v, 0));
                        }
                    }
                    None => {
                        stack.pop();
                        order.push(u);
                    }
                }
            }
        }

        order
    }
}
