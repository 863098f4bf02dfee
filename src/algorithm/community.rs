//! 社区发现（Louvain）
//!
//! 先把图转换为无向带权的连接表（不带权的边权重为 1.0），然后交替执行：
//! 局部移动（每个节点移入模块度增益最大的相邻社区）和聚合（社区折叠为超节点），
//! 直到没有节点移动。可选地对较大的社区递归拆分。

use crate::error::Result;
use crate::graph::{Graph, Vertex, VertexId};
use crate::metrics;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace};

/// 社区划分结果：每个社区内按顶点 ID 排序，社区之间按最小顶点 ID 排序
pub type Communities<D> = Vec<Vec<Vertex<D>>>;

/// Louvain 配置
#[derive(Debug, Clone)]
pub struct LouvainConfig {
    /// 递归拆分深度，0 表示不拆分
    pub max_depth: usize,
    /// 最多聚合层数
    pub max_levels: usize,
    /// 每层最多扫描轮数
    pub max_sweeps: usize,
    /// 一轮扫描的模块度提升低于此值即停止
    pub min_gain: f64,
    /// 参与递归拆分的最小社区规模
    pub min_split_size: usize,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            max_levels: 32,
            max_sweeps: 64,
            min_gain: 1e-7,
            min_split_size: 3,
        }
    }
}

/// 无向带权连接
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// 连接表：节点为 `0..node_count`
#[derive(Debug, Clone, Default)]
pub struct LinkList {
    pub node_count: usize,
    pub links: Vec<Link>,
}

impl LinkList {
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            links: Vec::new(),
        }
    }

    /// 从图构建连接表，节点编号即顶点 ID；有向边按无向连接处理
    pub fn from_graph<D>(graph: &Graph<D>) -> Self {
        let mut list = Self::new(graph.vertex_count());
        for (key, weight) in graph.edge_keys() {
            let weight = if graph.is_weighted() { weight as f64 } else { 1.0 };
            list.add_link(key.from.index(), key.to.index(), weight);
        }
        list
    }

    pub fn add_link(&mut self, source: usize, target: usize, weight: f64) {
        self.links.push(Link {
            source,
            target,
            weight,
        });
    }

    /// 连接权重总和 m
    pub fn total_weight(&self) -> f64 {
        self.links.iter().map(|l| l.weight).sum()
    }

    /// 计算划分的模块度
    ///
    /// Q = Σ_c [ in_c / m - (tot_c / 2m)² ]，`partition[i]` 为节点 i 的社区编号
    pub fn modularity(&self, partition: &[usize]) -> f64 {
        let m = self.total_weight();
        if m <= 0.0 || partition.is_empty() {
            return 0.0;
        }

        let count = partition.iter().copied().max().map_or(0, |c| c + 1);
        let mut internal = vec![0.0; count];
        let mut totals = vec![0.0; count];

        for link in &self.links {
            let cs = partition[link.source];
            let ct = partition[link.target];
            totals[cs] += link.weight;
            totals[ct] += link.weight;
            if cs == ct {
                internal[cs] += link.weight;
            }
        }

        internal
            .iter()
            .zip(&totals)
            .map(|(inner, total)| inner / m - (total / (2.0 * m)).powi(2))
            .sum()
    }

    /// 节点的加权度数（自环计两次）
    fn degrees(&self) -> Vec<f64> {
        let mut degrees = vec![0.0; self.node_count];
        for link in &self.links {
            degrees[link.source] += link.weight;
            degrees[link.target] += link.weight;
        }
        degrees
    }

    /// 邻接表（不含自环）
    fn neighbours(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adjacency = vec![Vec::new(); self.node_count];
        for link in &self.links {
            if link.source != link.target {
                adjacency[link.source].push((link.target, link.weight));
                adjacency[link.target].push((link.source, link.weight));
            }
        }
        adjacency
    }

    /// 按社区折叠为超节点，社区内部连接变为自环
    fn aggregate(&self, assignment: &[usize], count: usize) -> Self {
        let mut merged: IndexMap<(usize, usize), f64> = IndexMap::new();
        for link in &self.links {
            let a = assignment[link.source];
            let b = assignment[link.target];
            *merged.entry((a.min(b), a.max(b))).or_insert(0.0) += link.weight;
        }

        let mut list = Self::new(count);
        for ((source, target), weight) in merged {
            list.add_link(source, target, weight);
        }
        list
    }

    /// 由给定节点导出的子连接表，节点按 `members` 中的顺序重新编号
    fn induced(&self, members: &[usize]) -> Self {
        let local: HashMap<usize, usize> = members
            .iter()
            .enumerate()
            .map(|(i, &node)| (node, i))
            .collect();

        let mut list = Self::new(members.len());
        for link in &self.links {
            if let (Some(&s), Some(&t)) = (local.get(&link.source), local.get(&link.target)) {
                list.add_link(s, t, link.weight);
            }
        }
        list
    }
}

/// 在连接表上运行 Louvain，返回每个节点的社区编号（按首次出现顺序从 0 连续编号）
pub fn louvain(links: &LinkList, config: &LouvainConfig) -> Vec<usize> {
    let mut membership: Vec<usize> = (0..links.node_count).collect();
    if links.total_weight() <= 0.0 {
        return membership;
    }

    let mut level = links.clone();
    for depth in 0..config.max_levels {
        let (partition, moved) = local_moves(&level, config);
        if !moved {
            break;
        }

        let (assignment, count) = renumber(&partition);
        for community in membership.iter_mut() {
            *community = assignment[*community];
        }
        trace!(level = depth, communities = count, "Louvain 层级完成");

        if count == level.node_count {
            break;
        }
        level = level.aggregate(&assignment, count);
    }

    renumber(&membership).0
}

/// 第一阶段：按节点编号顺序反复做局部移动
fn local_moves(links: &LinkList, config: &LouvainConfig) -> (Vec<usize>, bool) {
    let n = links.node_count;
    let adjacency = links.neighbours();
    let degrees = links.degrees();
    let two_m = 2.0 * links.total_weight();

    let mut community: Vec<usize> = (0..n).collect();
    let mut totals = degrees.clone();
    let mut quality = links.modularity(&community);
    let mut moved_any = false;

    for _ in 0..config.max_sweeps {
        let mut moved = false;

        for node in 0..n {
            let current = community[node];
            let k = degrees[node];

            let mut weights: IndexMap<usize, f64> = IndexMap::new();
            for &(neighbour, weight) in &adjacency[node] {
                *weights.entry(community[neighbour]).or_insert(0.0) += weight;
            }

            totals[current] -= k;
            let mut best = current;
            let mut best_gain =
                weights.get(&current).copied().unwrap_or(0.0) - totals[current] * k / two_m;
            for (&candidate, &weight) in &weights {
                let gain = weight - totals[candidate] * k / two_m;
                if gain > best_gain {
                    best = candidate;
                    best_gain = gain;
                }
            }
            totals[best] += k;

            if best != current {
                community[node] = best;
                moved = true;
                moved_any = true;
            }
        }

        if !moved {
            break;
        }
        let next = links.modularity(&community);
        let improvement = next - quality;
        quality = next;
        if improvement < config.min_gain {
            break;
        }
    }

    (community, moved_any)
}

/// 把任意社区编号压缩为按首次出现顺序的连续编号
fn renumber(partition: &[usize]) -> (Vec<usize>, usize) {
    let mut ids: HashMap<usize, usize> = HashMap::new();
    let assignment = partition
        .iter()
        .map(|community| {
            let next = ids.len();
            *ids.entry(*community).or_insert(next)
        })
        .collect();
    (assignment, ids.len())
}

/// 按社区分组，组内节点升序，组按最小节点排序
fn group(membership: &[usize]) -> Vec<Vec<usize>> {
    let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
    for (node, &community) in membership.iter().enumerate() {
        groups.entry(community).or_default().push(node);
    }
    groups.into_values().collect()
}

/// Louvain 加可选的递归拆分
fn detect(links: &LinkList, config: &LouvainConfig, depth: usize) -> Vec<usize> {
    let membership = louvain(links, config);
    if depth >= config.max_depth {
        return membership;
    }

    let mut result = vec![0; links.node_count];
    let mut next = 0;
    for members in group(&membership) {
        if members.len() >= config.min_split_size {
            let inner = detect(&links.induced(&members), config, depth + 1);
            let (inner, count) = renumber(&inner);
            for (local, &node) in members.iter().enumerate() {
                result[node] = next + inner[local];
            }
            next += count;
        } else {
            for &node in &members {
                result[node] = next;
            }
            next += 1;
        }
    }
    result
}

/// 社区发现器
pub struct CommunityDetector<'a, D> {
    graph: &'a Graph<D>,
    config: LouvainConfig,
}

impl<'a, D> CommunityDetector<'a, D>
where
    D: Clone + Eq + Hash + Debug,
{
    pub fn new(graph: &'a Graph<D>) -> Self {
        Self {
            graph,
            config: LouvainConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LouvainConfig) -> Self {
        self.config = config;
        self
    }

    /// 每个顶点（按 ID）的社区编号
    pub fn partition(&self) -> Vec<usize> {
        detect(&LinkList::from_graph(self.graph), &self.config, 0)
    }

    /// 划分的模块度
    pub fn modularity(&self) -> f64 {
        LinkList::from_graph(self.graph).modularity(&self.partition())
    }

    /// 发现社区
    pub fn find(&self) -> Result<Communities<D>> {
        metrics::observe(|| {
            let communities: Communities<D> = group(&self.partition())
                .into_iter()
                .map(|members| {
                    members
                        .into_iter()
                        .filter_map(|i| self.graph.vertex(VertexId::new(i)).cloned())
                        .collect()
                })
                .collect();

            debug!(
                vertices = self.graph.vertex_count(),
                communities = communities.len(),
                "社区发现完成"
            );
            Ok(communities)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> (Graph<usize>, Vec<Vertex<usize>>) {
        let mut graph = Graph::undirected();
        let v: Vec<_> = (0..6).map(|i| graph.add_vertex(i)).collect();
        for &(a, b) in &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)] {
            graph.add_edge(&v[a], &v[b]).unwrap();
        }
        (graph, v)
    }

    #[test]
    fn test_empty_and_single() {
        let empty: Graph<usize> = Graph::undirected();
        assert!(CommunityDetector::new(&empty).find().unwrap().is_empty());

        let mut single = Graph::undirected();
        let a = single.add_vertex(1);
        assert_eq!(CommunityDetector::new(&single).find().unwrap(), vec![vec![a]]);
    }

    #[test]
    fn test_two_triangles() {
        let (graph, v) = two_triangles();
        let communities = CommunityDetector::new(&graph).find().unwrap();

        assert_eq!(
            communities,
            vec![v[0..3].to_vec(), v[3..6].to_vec()]
        );
        assert!(CommunityDetector::new(&graph).modularity() > 0.3);
    }

    #[test]
    fn test_isolated_vertices_stay_apart() {
        let mut graph: Graph<usize> = Graph::undirected();
        for i in 0..3 {
            graph.add_vertex(i);
        }
        let communities = CommunityDetector::new(&graph).find().unwrap();
        assert_eq!(communities.len(), 3);
    }

    #[test]
    fn test_modularity() {
        let mut links = LinkList::new(4);
        links.add_link(0, 1, 1.0);
        links.add_link(2, 3, 1.0);

        assert!((links.modularity(&[0, 0, 1, 1]) - 0.5).abs() < 1e-9);
        assert!(links.modularity(&[0, 1, 2, 3]) < 0.0);
        assert_eq!(LinkList::new(2).modularity(&[0, 1]), 0.0);
    }

    #[test]
    fn test_link_list_from_weighted_graph() {
        let mut graph = Graph::weighted_directed();
        let a = graph.add_vertex('a');
        let b = graph.add_vertex('b');
        graph.add_weighted_edge(&a, &b, 4).unwrap();
        graph.add_weighted_edge(&b, &a, 2).unwrap();

        let links = LinkList::from_graph(&graph);
        assert_eq!(links.node_count, 2);
        assert_eq!(links.total_weight(), 6.0);
        assert_eq!(louvain(&links, &LouvainConfig::default()), vec![0, 0]);
    }

    #[test]
    fn test_non_positive_weight_keeps_singletons() {
        let mut links = LinkList::new(3);
        links.add_link(0, 1, -1.0);
        links.add_link(1, 2, 1.0);
        assert_eq!(louvain(&links, &LouvainConfig::default()), vec![0, 1, 2]);
    }

    #[test]
    fn test_recursive_split_covers_every_vertex() {
        let (graph, _) = two_triangles();
        let config = LouvainConfig {
            max_depth: 2,
            ..LouvainConfig::default()
        };
        let communities = CommunityDetector::new(&graph)
            .with_config(config)
            .find()
            .unwrap();

        let total: usize = communities.iter().map(Vec::len).sum();
        assert_eq!(total, 6);
        for community in &communities {
            assert!(community.windows(2).all(|w| w[0].id() < w[1].id()));
        }
    }
}
