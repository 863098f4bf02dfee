//! 最小生成树（Kruskal）

use crate::error::{Error, Result};
use crate::graph::{Edge, EdgeKey, Graph};
use crate::metrics;
use crate::types::Weight;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// 并查集（路径压缩 + 按秩合并）
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    /// 查找根
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // 路径压缩
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// 合并两个集合；已在同一集合时返回 false
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return false;
        }

        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
        true
    }

    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }
}

/// 生成森林
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanningForest<D> {
    /// 按选中顺序排列的边
    pub edges: Vec<Edge<D>>,
    /// 总权重
    pub total_weight: Weight,
}

/// 最小生成树计算器
pub struct MinimumSpanningTree<'a, D> {
    graph: &'a Graph<D>,
}

impl<'a, D> MinimumSpanningTree<'a, D>
where
    D: Clone + Eq + Hash + Debug,
{
    pub fn new(graph: &'a Graph<D>) -> Self {
        Self { graph }
    }

    /// Kruskal 算法
    ///
    /// 仅适用于无向带权图。权重相同的边按 (较小端点 ID, 较大端点 ID) 排序；
    /// 非连通图得到生成森林。
    pub fn find(&self) -> Result<SpanningForest<D>> {
        metrics::observe(|| {
            if self.graph.is_directed() || !self.graph.is_weighted() {
                return Err(Error::Unsupported(format!(
                    "最小生成树仅适用于无向带权图，当前为 {}",
                    self.graph.kind()
                )));
            }

            let mut edges: Vec<(EdgeKey, Weight)> = self.graph.edge_keys().collect();
            edges.sort_by_key(|(key, weight)| (*weight, key.normalized()));

            let mut sets = UnionFind::new(self.graph.vertex_count());
            let mut forest = SpanningForest {
                edges: Vec::new(),
                total_weight: 0,
            };

            for (key, weight) in edges {
                if sets.union(key.from.index(), key.to.index()) {
                    forest.edges.push(self.graph.materialize(key));
                    forest.total_weight += weight;
                }
            }

            debug!(
                edges = forest.edges.len(),
                total_weight = forest.total_weight,
                "最小生成树计算完成"
            );
            Ok(forest)
        })
    }
}

impl<D> SpanningForest<D> {
    /// 森林是否连接了给定数量的顶点
    pub fn spans(&self, vertex_count: usize) -> bool {
        self.edges.len() + 1 == vertex_count.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Vertex;

    fn weighted(n: usize, edges: &[(usize, usize, Weight)]) -> (Graph<usize>, Vec<Vertex<usize>>) {
        let mut graph = Graph::weighted_undirected();
        let vertices: Vec<_> = (0..n).map(|i| graph.add_vertex(i)).collect();
        for &(a, b, w) in edges {
            graph.add_weighted_edge(&vertices[a], &vertices[b], w).unwrap();
        }
        (graph, vertices)
    }

    #[test]
    fn test_union_find() {
        let mut sets = UnionFind::new(5);
        assert!(sets.union(0, 1));
        assert!(sets.union(3, 4));
        assert!(!sets.union(1, 0));
        assert!(sets.connected(0, 1));
        assert!(!sets.connected(1, 3));
        assert!(sets.union(1, 4));
        assert!(sets.connected(0, 3));
    }

    #[test]
    fn test_square_drops_heavy_edge() {
        let (graph, v) = weighted(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 0, 5)]);
        let forest = MinimumSpanningTree::new(&graph).find().unwrap();

        assert_eq!(forest.edges.len(), 3);
        assert_eq!(forest.total_weight, 3);
        assert!(!forest.edges.contains(&graph.get_edge(&v[3], &v[0]).unwrap()));
        assert!(forest.spans(4));
    }

    #[test]
    fn test_negative_and_zero_weights() {
        let (graph, _) = weighted(3, &[(0, 1, -2), (1, 2, 0), (0, 2, 1)]);
        let forest = MinimumSpanningTree::new(&graph).find().unwrap();
        assert_eq!(forest.total_weight, -2);
        assert_eq!(forest.edges.len(), 2);
    }

    #[test]
    fn test_selection_order_and_ties() {
        let (graph, v) = weighted(4, &[(2, 3, 1), (0, 1, 1), (1, 2, 2), (0, 2, 2)]);
        let forest = MinimumSpanningTree::new(&graph).find().unwrap();

        assert_eq!(
            forest.edges,
            vec![
                graph.get_edge(&v[0], &v[1]).unwrap(),
                graph.get_edge(&v[2], &v[3]).unwrap(),
                graph.get_edge(&v[0], &v[2]).unwrap(),
            ]
        );
    }

    #[test]
    fn test_disconnected_graph_yields_forest() {
        let (graph, _) = weighted(5, &[(0, 1, 3), (2, 3, 4)]);
        let forest = MinimumSpanningTree::new(&graph).find().unwrap();
        assert_eq!(forest.edges.len(), 2);
        assert!(!forest.spans(5));
    }

    #[test]
    fn test_requires_weighted_undirected() {
        let graph: Graph<usize> = Graph::weighted_directed();
        assert!(matches!(
            MinimumSpanningTree::new(&graph).find(),
            Err(Error::Unsupported(_))
        ));
        let graph: Graph<usize> = Graph::undirected();
        assert!(MinimumSpanningTree::new(&graph).find().is_err());
    }
}
