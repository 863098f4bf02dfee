//! 环路枚举
//!
//! 枚举经过指定顶点的全部简单环：先求出该顶点所在的强连通分量，
//! 在分量的导出子图上做 Johnson 风格的阻塞 DFS。

use crate::algorithm::scc::SccFinder;
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, Vertex, VertexId};
use crate::metrics;
use indexmap::IndexSet;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace};

/// 环上的一步：经过的边与到达的顶点
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CycleStep<D> {
    pub edge: Edge<D>,
    pub vertex: Vertex<D>,
}

/// 从源点出发并回到源点的环
pub type Cycle<D> = Vec<CycleStep<D>>;

struct CircuitFrame {
    vertex: usize,
    next: usize,
    found: bool,
}

/// 环路查找器
pub struct CycleFinder<'a, D> {
    graph: &'a Graph<D>,
}

impl<'a, D> CycleFinder<'a, D>
where
    D: Clone + Eq + Hash + Debug,
{
    /// 创建查找器
    pub fn new(graph: &'a Graph<D>) -> Self {
        Self { graph }
    }

    /// 枚举经过 `source` 的全部简单环
    pub fn find(&self, source: &Vertex<D>) -> Result<Vec<Cycle<D>>> {
        metrics::observe(|| {
            if !self.graph.is_directed() {
                return Err(Error::Unsupported("环路枚举仅适用于有向图".to_string()));
            }
            if !self.graph.contains_vertex(source) {
                return Err(Error::VertexNotFound(format!("{:?}", source)));
            }
            if self.graph.adjacency().out_degree(source.id()) == 0 {
                return Ok(Vec::new());
            }

            let component = SccFinder::new(self.graph)
                .component_ids()
                .into_iter()
                .find(|c| c.contains(&source.id()))
                .unwrap_or_default();
            if component.len() < 2 {
                return Ok(Vec::new());
            }

            let adjacency = self.induced_adjacency(&component);
            let start = component
                .iter()
                .position(|&id| id == source.id())
                .unwrap_or_default();

            let cycles: Vec<Cycle<D>> = circuits(&adjacency, start)
                .into_iter()
                .map(|path| self.translate(&component, &path))
                .collect();

            debug!(
                source = %source.id(),
                component = component.len(),
                count = cycles.len(),
                "环路枚举完成"
            );
            Ok(cycles)
        })
    }

    /// 分量的导出邻接表，顶点按 `members` 中的位置编号
    fn induced_adjacency(&self, members: &[VertexId]) -> Vec<IndexSet<usize>> {
        let local: HashMap<VertexId, usize> = members
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        let adjacency = self.graph.adjacency();
        members
            .iter()
            .map(|&u| {
                adjacency
                    .neighbors(u)
                    .into_iter()
                    .flatten()
                    .filter_map(|v| local.get(v).copied())
                    .collect()
            })
            .collect()
    }

    /// 把局部编号的路径翻译回原图的边与顶点
    fn translate(&self, members: &[VertexId], path: &[usize]) -> Cycle<D> {
        let original: Vec<VertexId> = path.iter().map(|&i| members[i]).collect();

        let mut steps = Vec::with_capacity(original.len());
        for (i, &from) in original.iter().enumerate() {
            let to = original[(i + 1) % original.len()];
            if let (Some(key), Some(vertex)) =
                (self.graph.find_edge_key(from, to), self.graph.vertex(to))
            {
                steps.push(CycleStep {
                    edge: self.graph.materialize(key),
                    vertex: vertex.clone(),
                });
            }
        }
        steps
    }
}

/// 阻塞 DFS：返回所有从 `start` 出发回到 `start` 的顶点路径（不含结尾的重复起点）
fn circuits(adjacency: &[IndexSet<usize>], start: usize) -> Vec<Vec<usize>> {
    let n = adjacency.len();

    let mut blocked = vec![false; n];
    let mut blocked_map: Vec<IndexSet<usize>> = vec![IndexSet::new(); n];
    let mut path = vec![start];
    let mut frames = vec![CircuitFrame {
        vertex: start,
        next: 0,
        found: false,
    }];
    let mut cycles = Vec::new();
    blocked[start] = true;

    while let Some(frame) = frames.last_mut() {
        let v = frame.vertex;
        let next = adjacency[v].get_index(frame.next).copied();

        match next {
            Some(w) => {
                frame.next += 1;
                if w == start {
                    trace!(length = path.len(), "发现环");
                    cycles.push(path.clone());
                    frame.found = true;
                } else if !blocked[w] {
                    blocked[w] = true;
                    path.push(w);
                    frames.push(CircuitFrame {
                        vertex: w,
                        next: 0,
                        found: false,
                    });
                }
            }
            None => {
                let found = frame.found;
                frames.pop();
                path.pop();

                if found {
                    unblock(v, &mut blocked, &mut blocked_map);
                } else {
                    for &w in &adjacency[v] {
                        blocked_map[w].insert(v);
                    }
                }

                if let Some(parent) = frames.last_mut() {
                    parent.found |= found;
                }
            }
        }
    }

    cycles
}

/// 解除阻塞，并沿阻塞表传递
fn unblock(u: usize, blocked: &mut [bool], blocked_map: &mut [IndexSet<usize>]) {
    let mut work = vec![u];
    while let Some(x) = work.pop() {
        if !blocked[x] {
            continue;
        }
        blocked[x] = false;
        work.extend(blocked_map[x].drain(..));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directed(n: usize, edges: &[(usize, usize)]) -> (Graph<usize>, Vec<Vertex<usize>>) {
        let mut graph = Graph::directed();
        let vertices: Vec<_> = (0..n).map(|i| graph.add_vertex(i * 10)).collect();
        for &(a, b) in edges {
            graph.add_edge(&vertices[a], &vertices[b]).unwrap();
        }
        (graph, vertices)
    }

    fn vertex_paths(cycles: &[Cycle<usize>]) -> Vec<Vec<usize>> {
        let mut paths: Vec<Vec<usize>> = cycles
            .iter()
            .map(|c| c.iter().map(|step| step.vertex.id().index()).collect())
            .collect();
        paths.sort();
        paths
    }

    #[test]
    fn test_cycles_through_source() {
        // A→B, B→C, C→A, B→A, C→D, D→A
        let (graph, v) = directed(4, &[(0, 1), (1, 2), (2, 0), (1, 0), (2, 3), (3, 0)]);
        let cycles = CycleFinder::new(&graph).find(&v[0]).unwrap();

        assert_eq!(
            vertex_paths(&cycles),
            vec![vec![1, 0], vec![1, 2, 0], vec![1, 2, 3, 0]]
        );

        // 每一步的边都以上一步到达的顶点为起点
        for cycle in &cycles {
            let mut at = v[0].clone();
            for step in cycle {
                assert_eq!(step.edge.vertex1(), &at);
                assert_eq!(step.edge.vertex2(), &step.vertex);
                at = step.vertex.clone();
            }
            assert_eq!(at, v[0]);
        }
    }

    #[test]
    fn test_complete_digraph_counts_all_cycles() {
        let mut edges = Vec::new();
        for a in 0..4 {
            for b in 0..4 {
                if a != b {
                    edges.push((a, b));
                }
            }
        }
        let (graph, v) = directed(4, &edges);
        let cycles = CycleFinder::new(&graph).find(&v[2]).unwrap();

        // 长度 2: 3 个，长度 3: 6 个，长度 4: 6 个
        assert_eq!(cycles.len(), 15);
        let unique: std::collections::HashSet<_> = vertex_paths(&cycles).into_iter().collect();
        assert_eq!(unique.len(), 15);
    }

    #[test]
    fn test_no_outgoing_edges() {
        let (graph, v) = directed(2, &[(0, 1)]);
        assert!(CycleFinder::new(&graph).find(&v[1]).unwrap().is_empty());
    }

    #[test]
    fn test_singleton_component() {
        let (graph, v) = directed(3, &[(0, 1), (1, 2), (2, 1)]);
        assert!(CycleFinder::new(&graph).find(&v[0]).unwrap().is_empty());
        assert_eq!(CycleFinder::new(&graph).find(&v[1]).unwrap().len(), 1);
    }

    #[test]
    fn test_circuits_on_local_adjacency() {
        // 0→1, 1→2, 2→0, 2→1
        let adjacency: Vec<IndexSet<usize>> = vec![
            [1].into_iter().collect(),
            [2].into_iter().collect(),
            [0, 1].into_iter().collect(),
        ];
        assert_eq!(circuits(&adjacency, 0), vec![vec![0, 1, 2]]);
        assert_eq!(circuits(&adjacency, 1), vec![vec![1, 2, 0], vec![1, 2]]);
    }

    #[test]
    fn test_errors() {
        let (graph, _) = directed(1, &[]);
        let stranger = Vertex::new(VertexId::new(3), 0);
        assert!(CycleFinder::new(&graph)
            .find(&stranger)
            .unwrap_err()
            .is_not_found());

        let mut undirected = Graph::undirected();
        let a = undirected.add_vertex(1);
        assert!(matches!(
            CycleFinder::new(&undirected).find(&a),
            Err(Error::Unsupported(_))
        ));
    }
}
