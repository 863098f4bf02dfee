//! 桥查找
//!
//! 基于 DFS 发现时间与 low-link 值的双连通性分析

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, VertexId};
use crate::metrics;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// DFS 栈帧
struct Frame {
    vertex: VertexId,
    parent: Option<VertexId>,
    next: usize,
}

/// 桥查找器
pub struct BridgeFinder<'a, D> {
    graph: &'a Graph<D>,
}

impl<'a, D> BridgeFinder<'a, D>
where
    D: Clone + Eq + Hash + Debug,
{
    /// 创建桥查找器
    pub fn new(graph: &'a Graph<D>) -> Self {
        Self { graph }
    }

    /// 查找全部桥
    ///
    /// 每个连通分量从 ID 最小的未访问顶点开始一次 DFS；
    /// 树边 (u, v) 是桥当且仅当 `low[v] > disc[u]`。
    pub fn find(&self) -> Result<Vec<Edge<D>>> {
        metrics::observe(|| {
            if self.graph.is_directed() {
                return Err(Error::Unsupported("桥查找仅适用于无向图".to_string()));
            }

            let bridges: Vec<Edge<D>> = self
                .bridge_keys()
                .into_iter()
                .filter_map(|(u, v)| self.graph.find_edge_key(u, v))
                .map(|key| self.graph.materialize(key))
                .collect();

            debug!(count = bridges.len(), "桥查找完成");
            Ok(bridges)
        })
    }

    fn bridge_keys(&self) -> Vec<(VertexId, VertexId)> {
        let n = self.graph.vertex_count();
        let adjacency = self.graph.adjacency();

        let mut disc: Vec<Option<usize>> = vec![None; n];
        let mut low = vec![0usize; n];
        let mut timer = 0usize;
        let mut bridges = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();

        for root in 0..n {
            if disc[root].is_some() {
                continue;
            }

            disc[root] = Some(timer);
            low[root] = timer;
            timer += 1;
            stack.push(Frame {
                vertex: VertexId::new(root),
                parent: None,
                next: 0,
            });

            while let Some(frame) = stack.last_mut() {
                let u = frame.vertex;
                let next = adjacency
                    .neighbors(u)
                    .and_then(|set| set.get_index(frame.next))
                    .copied();

                match next {
                    Some(v) => {
                        frame.next += 1;
                        if Some(v) == frame.parent {
                            continue;
                        }
                        match disc[v.index()] {
                            // 回边
                            Some(d) => low[u.index()] = low[u.index()].min(d),
                            None => {
                                disc[v.index()] = Some(timer);
                                low[v.index()] = timer;
                                timer += 1;
                                stack.push(Frame {
                                    vertex: v,
                                    parent: Some(u),
                                    next: 0,
                                });
                            }
                        }
                    }
                    None => {
                        let parent = frame.parent;
                        stack.pop();
                        if let Some(p) = parent {
                            low[p.index()] = low[p.index()].min(low[u.index()]);
                            let disc_p = disc[p.index()].unwrap_or(0);
                            if low[u.index()] > disc_p {
                                bridges.push((p, u));
                            }
                        }
                    }
                }
            }
        }

        bridges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Vertex;

    fn build(n: usize, edges: &[(usize, usize)]) -> (Graph<usize>, Vec<Vertex<usize>>) {
        let mut graph = Graph::undirected();
        let vertices: Vec<_> = (0..n).map(|i| graph.add_vertex(i)).collect();
        for &(a, b) in edges {
            graph.add_edge(&vertices[a], &vertices[b]).unwrap();
        }
        (graph, vertices)
    }

    #[test]
    fn test_ring_has_no_bridges() {
        let (graph, _) = build(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        assert!(BridgeFinder::new(&graph).find().unwrap().is_empty());
    }

    #[test]
    fn test_chain_is_all_bridges() {
        let (graph, _) = build(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
        let bridges = BridgeFinder::new(&graph).find().unwrap();
        assert_eq!(bridges.len(), 5);
        for edge in graph.edges() {
            assert!(bridges.contains(&edge));
        }
    }

    #[test]
    fn test_two_triangles_joined_by_bridge() {
        //  0 - 1       3 - 4
        //   \ /         \ /
        //    2 --------- 5
        // 另有一个孤立分量 6 - 7
        let (graph, v) = build(
            8,
            &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 5), (6, 7)],
        );
        let bridges = BridgeFinder::new(&graph).find().unwrap();

        assert_eq!(bridges.len(), 2);
        assert!(bridges.contains(&graph.get_edge(&v[2], &v[5]).unwrap()));
        assert!(bridges.contains(&graph.get_edge(&v[6], &v[7]).unwrap()));
    }

    #[test]
    fn test_bridges_do_not_mutate_graph() {
        let (graph, _) = build(3, &[(0, 1), (1, 2)]);
        let before = graph.edges();
        BridgeFinder::new(&graph).find().unwrap();
        assert_eq!(graph.edges(), before);
    }

    #[test]
    fn test_directed_graph_is_unsupported() {
        let graph: Graph<usize> = Graph::directed();
        assert!(matches!(
            BridgeFinder::new(&graph).find(),
            Err(Error::Unsupported(_))
        ));
    }
}
