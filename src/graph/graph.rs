//! 图数据结构
//!
//! 四种图形态（有向/无向 × 带权/不带权）共用一个容器，由 [`GraphKind`] 决定行为

use super::edge::{Edge, EdgeKey};
use super::index::AdjacencyIndex;
use super::vertex::{Vertex, VertexId};
use crate::error::{Error, Result};
use crate::metrics;
use crate::types::{GraphKind, Weight, DEFAULT_WEIGHT};
use indexmap::IndexMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// 图
///
/// 顶点 ID 始终稠密：删除任意顶点后，当前 ID 最大的顶点会被重新编号到空出的位置。
#[derive(Debug, Clone)]
pub struct Graph<D> {
    /// 图形态
    kind: GraphKind,
    /// 顶点列表，下标即顶点 ID
    vertices: Vec<Vertex<D>>,
    /// 边集合与权重表（不带权的图中权重恒为 1）
    edges: IndexMap<EdgeKey, Weight>,
    /// 邻接索引
    index: AdjacencyIndex,
}

impl<D> Graph<D> {
    /// 创建指定形态的空图
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
            edges: IndexMap::new(),
            index: AdjacencyIndex::new(kind.directed),
        }
    }

    /// 无向不带权图
    pub fn undirected() -> Self {
        Self::new(GraphKind::UNDIRECTED)
    }

    /// 有向不带权图
    pub fn directed() -> Self {
        Self::new(GraphKind::DIRECTED)
    }

    /// 无向带权图
    pub fn weighted_undirected() -> Self {
        Self::new(GraphKind::WEIGHTED_UNDIRECTED)
    }

    /// 有向带权图
    pub fn weighted_directed() -> Self {
        Self::new(GraphKind::WEIGHTED_DIRECTED)
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn is_directed(&self) -> bool {
        self.kind.directed
    }

    pub fn is_weighted(&self) -> bool {
        self.kind.weighted
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// 按 ID 获取顶点
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<D>> {
        self.vertices.get(id.index())
    }

    /// 按 ID 顺序遍历顶点（不复制）
    pub fn iter_vertices(&self) -> impl Iterator<Item = &Vertex<D>> + '_ {
        self.vertices.iter()
    }

    /// 遍历边键与权重
    pub fn edge_keys(&self) -> impl Iterator<Item = (EdgeKey, Weight)> + '_ {
        self.edges.iter().map(|(key, weight)| (*key, *weight))
    }

    /// 获取邻接索引引用
    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.index
    }

    /// 查找连接两个顶点的边键；无向图会尝试两个方向
    pub fn find_edge_key(&self, a: VertexId, b: VertexId) -> Option<EdgeKey> {
        let key = EdgeKey::new(a, b);
        if self.edges.contains_key(&key) {
            return Some(key);
        }
        if !self.kind.directed && self.edges.contains_key(&key.reversed()) {
            return Some(key.reversed());
        }
        None
    }

    /// 两点之间边的权重
    pub fn weight_between(&self, a: VertexId, b: VertexId) -> Option<Weight> {
        self.find_edge_key(a, b)
            .and_then(|key| self.edges.get(&key).copied())
    }

    /// 是否存在负权边（不带权的图恒为 false）
    pub fn has_negative_edges(&self) -> bool {
        self.kind.weighted && self.edges.values().any(|&w| w < 0)
    }

    /// 清空图
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.index.clear();
    }

    fn attach_edge(&mut self, key: EdgeKey, weight: Weight) {
        self.edges.insert(key, weight);
        self.index.add_edge(key);
    }

    fn detach_edge(&mut self, key: EdgeKey) -> Option<Weight> {
        let weight = self.edges.shift_remove(&key)?;
        self.index.remove_edge(key);
        Some(weight)
    }
}

impl<D> Graph<D>
where
    D: Clone + Eq + Hash + Debug,
{
    // ==================== 顶点操作 ====================

    /// 添加顶点，ID 为当前顶点数量
    pub fn add_vertex(&mut self, data: D) -> Vertex<D> {
        let id = VertexId::new(self.vertices.len());
        let vertex = Vertex::new(id, data);

        self.vertices.push(vertex.clone());
        self.index.push_vertex();
        metrics::global().record_vertex_inserted();

        vertex
    }

    /// 顶点（按 ID 与数据同时匹配）是否在图中
    pub fn contains_vertex(&self, vertex: &Vertex<D>) -> bool {
        self.vertices.get(vertex.id().index()) == Some(vertex)
    }

    /// 删除顶点
    ///
    /// 先删除全部关联边，再把 ID 最大的顶点重新编号到被删除顶点的位置并重新挂接其边。
    /// 返回被删除的原始顶点。
    pub fn remove_vertex(&mut self, vertex: &Vertex<D>) -> Result<Vertex<D>> {
        if !self.contains_vertex(vertex) {
            return Err(Error::VertexNotFound(format!("{:?}", vertex)));
        }

        let id = vertex.id();
        for key in self.index.incident(id) {
            self.detach_edge(key);
        }

        let last = VertexId::new(self.vertices.len() - 1);
        let mut relinked = Vec::new();
        if last != id {
            for key in self.index.incident(last) {
                if let Some(weight) = self.detach_edge(key) {
                    relinked.push((key, weight));
                }
            }
        }

        let removed = self.vertices.swap_remove(id.index());
        self.index.swap_remove_vertex(id);

        if last != id {
            debug!(from = %last, to = %id, "顶点重新编号");
            self.vertices[id.index()].relabel(id);
            let remap = |v: VertexId| if v == last { id } else { v };
            for (key, weight) in relinked {
                self.attach_edge(EdgeKey::new(remap(key.from), remap(key.to)), weight);
            }
        }

        metrics::global().record_vertex_removed();
        Ok(removed)
    }

    /// 获取全部顶点（按 ID 排序的快照）
    pub fn vertices(&self) -> Vec<Vertex<D>> {
        self.vertices.clone()
    }

    /// 获取顶点的邻居
    pub fn neighbours(&self, vertex: &Vertex<D>) -> Result<Vec<Vertex<D>>> {
        self.ensure_vertex(vertex)?;
        Ok(self
            .index
            .neighbors(vertex.id())
            .map(|set| set.iter().map(|id| self.vertices[id.index()].clone()).collect())
            .unwrap_or_default())
    }

    /// 获取顶点的前驱（有向图中的入边来源，无向图中等同邻居）
    pub fn predecessors(&self, vertex: &Vertex<D>) -> Result<Vec<Vertex<D>>> {
        self.ensure_vertex(vertex)?;
        Ok(self
            .index
            .predecessors(vertex.id())
            .into_iter()
            .map(|id| self.vertices[id.index()].clone())
            .collect())
    }

    /// 获取顶点的度（有向图中为出度）
    pub fn degree(&self, vertex: &Vertex<D>) -> Result<usize> {
        self.ensure_vertex(vertex)?;
        Ok(self.index.out_degree(vertex.id()))
    }

    // ==================== 边操作 ====================

    /// 添加边；带权图中默认权重为 1
    pub fn add_edge(&mut self, v1: &Vertex<D>, v2: &Vertex<D>) -> Result<Edge<D>> {
        self.insert_edge(v1, v2, DEFAULT_WEIGHT)
    }

    /// 添加带权边
    pub fn add_weighted_edge(
        &mut self,
        v1: &Vertex<D>,
        v2: &Vertex<D>,
        weight: Weight,
    ) -> Result<Edge<D>> {
        if !self.kind.weighted {
            return Err(Error::Unsupported(format!(
                "{} 图不能保存权重",
                self.kind
            )));
        }
        self.insert_edge(v1, v2, weight)
    }

    fn insert_edge(&mut self, v1: &Vertex<D>, v2: &Vertex<D>, weight: Weight) -> Result<Edge<D>> {
        if v1.id() == v2.id() {
            return Err(Error::InvalidArgument(format!(
                "不支持自环: {:?}",
                v1
            )));
        }
        if !self.contains_vertex(v1) {
            return Err(Error::InvalidArgument(format!("端点 {:?} 不在图中", v1)));
        }
        if !self.contains_vertex(v2) {
            return Err(Error::InvalidArgument(format!("端点 {:?} 不在图中", v2)));
        }

        // 已存在则原样返回
        if let Some(key) = self.find_edge_key(v1.id(), v2.id()) {
            return Ok(self.materialize(key));
        }

        let key = EdgeKey::new(v1.id(), v2.id());
        self.attach_edge(key, weight);
        metrics::global().record_edge_inserted();

        Ok(self.materialize(key))
    }

    /// 删除边
    pub fn remove_edge(&mut self, edge: &Edge<D>) -> Result<Edge<D>> {
        let key = self.resolve_edge(edge)?;
        let removed = self.materialize(key);
        self.detach_edge(key);
        metrics::global().record_edge_removed();
        Ok(removed)
    }

    /// 获取全部边（快照，顺序不作保证）
    pub fn edges(&self) -> Vec<Edge<D>> {
        self.edges.keys().map(|&key| self.materialize(key)).collect()
    }

    /// 获取连接两个顶点的边
    pub fn get_edge(&self, v1: &Vertex<D>, v2: &Vertex<D>) -> Result<Edge<D>> {
        if !self.contains_vertex(v1) || !self.contains_vertex(v2) {
            return Err(Error::EdgeNotFound(format!("{:?} - {:?}", v1, v2)));
        }
        self.find_edge_key(v1.id(), v2.id())
            .map(|key| self.materialize(key))
            .ok_or_else(|| Error::EdgeNotFound(format!("{:?} - {:?}", v1, v2)))
    }

    /// 边是否在图中
    pub fn contains_edge(&self, edge: &Edge<D>) -> bool {
        self.resolve_edge(edge).is_ok()
    }

    /// 权重表；不带权的图中每条边映射为 1
    pub fn weight_map(&self) -> IndexMap<Edge<D>, Weight> {
        self.edges
            .iter()
            .map(|(&key, &weight)| {
                let weight = if self.kind.weighted { weight } else { DEFAULT_WEIGHT };
                (self.materialize(key), weight)
            })
            .collect()
    }

    /// 获取边的权重
    pub fn get_weight(&self, edge: &Edge<D>) -> Result<Weight> {
        let key = self.resolve_edge(edge)?;
        Ok(if self.kind.weighted {
            self.edges[&key]
        } else {
            DEFAULT_WEIGHT
        })
    }

    /// 修改边的权重
    pub fn set_weight(&mut self, edge: &Edge<D>, weight: Weight) -> Result<()> {
        if !self.kind.weighted {
            return Err(Error::Unsupported(format!(
                "{} 图不能保存权重",
                self.kind
            )));
        }
        let key = self.resolve_edge(edge)?;
        self.edges.insert(key, weight);
        Ok(())
    }

    /// 由边键构造边
    pub fn materialize(&self, key: EdgeKey) -> Edge<D> {
        Edge::new(
            self.vertices[key.from.index()].clone(),
            self.vertices[key.to.index()].clone(),
        )
    }

    fn ensure_vertex(&self, vertex: &Vertex<D>) -> Result<()> {
        if self.contains_vertex(vertex) {
            Ok(())
        } else {
            Err(Error::VertexNotFound(format!("{:?}", vertex)))
        }
    }

    fn resolve_edge(&self, edge: &Edge<D>) -> Result<EdgeKey> {
        if self.contains_vertex(edge.vertex1()) && self.contains_vertex(edge.vertex2()) {
            if let Some(key) = self.find_edge_key(edge.vertex1().id(), edge.vertex2().id()) {
                return Ok(key);
            }
        }
        Err(Error::EdgeNotFound(format!(
            "{:?} - {:?}",
            edge.vertex1(),
            edge.vertex2()
        )))
    }
}

impl<D> Default for Graph<D> {
    fn default() -> Self {
        Self::undirected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_dense<D: Clone + Eq + Hash + Debug>(graph: &Graph<D>) {
        for (i, v) in graph.vertices().iter().enumerate() {
            assert_eq!(v.id().index(), i);
        }
        for edge in graph.edges() {
            assert!(graph.contains_vertex(edge.vertex1()));
            assert!(graph.contains_vertex(edge.vertex2()));
        }
    }

    #[test]
    fn test_graph_basic() {
        let mut graph = Graph::undirected();

        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(c.id(), VertexId::new(2));

        let e = graph.add_edge(&a, &b).unwrap();
        assert_eq!(graph.edge_count(), 1);

        // 无向图两个方向都能查到
        assert_eq!(graph.get_edge(&a, &b).unwrap(), e);
        assert_eq!(graph.get_edge(&b, &a).unwrap(), e);
        assert!(graph.get_edge(&a, &c).unwrap_err().is_not_found());

        assert_eq!(graph.neighbours(&a).unwrap(), vec![b.clone()]);
        assert_eq!(graph.neighbours(&b).unwrap(), vec![a.clone()]);
        assert!(graph.neighbours(&c).unwrap().is_empty());
    }

    #[test]
    fn test_directed_edges_are_one_way() {
        let mut graph = Graph::directed();
        let a = graph.add_vertex(1);
        let b = graph.add_vertex(2);

        graph.add_edge(&a, &b).unwrap();

        assert!(graph.get_edge(&a, &b).is_ok());
        assert!(graph.get_edge(&b, &a).is_err());
        assert!(graph.neighbours(&b).unwrap().is_empty());
        assert_eq!(graph.predecessors(&b).unwrap(), vec![a.clone()]);

        // 反向边是另一条边
        graph.add_edge(&b, &a).unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_add_edge_is_idempotent() {
        let mut graph = Graph::weighted_undirected();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");

        let first = graph.add_weighted_edge(&a, &b, 7).unwrap();
        let second = graph.add_weighted_edge(&b, &a, 3).unwrap();

        assert_eq!(first, second);
        assert_eq!(graph.edge_count(), 1);
        // 已存在的边不被修改
        assert_eq!(graph.get_weight(&first).unwrap(), 7);
    }

    #[test]
    fn test_add_edge_rejects_invalid_endpoints() {
        let mut graph = Graph::undirected();
        let a = graph.add_vertex("a");
        let stranger = Vertex::new(VertexId::new(5), "x");
        let impostor = Vertex::new(VertexId::new(0), "not-a");

        assert!(matches!(graph.add_edge(&a, &a), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            graph.add_edge(&a, &stranger),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            graph.add_edge(&impostor, &a),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_weights() {
        let mut graph = Graph::weighted_directed();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");

        let ab = graph.add_edge(&a, &b).unwrap();
        let bc = graph.add_weighted_edge(&b, &c, -4).unwrap();

        assert_eq!(graph.get_weight(&ab).unwrap(), 1);
        assert_eq!(graph.get_weight(&bc).unwrap(), -4);
        assert!(graph.has_negative_edges());

        graph.set_weight(&bc, 4).unwrap();
        assert!(!graph.has_negative_edges());

        let map = graph.weight_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&bc], 4);

        graph.remove_edge(&bc).unwrap();
        assert!(graph.get_weight(&bc).unwrap_err().is_not_found());
        assert_eq!(graph.weight_map().len(), 1);
    }

    #[test]
    fn test_unweighted_graph_reports_unit_weights() {
        let mut graph = Graph::undirected();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let e = graph.add_edge(&a, &b).unwrap();

        assert_eq!(graph.weight_map()[&e], 1);
        assert!(!graph.has_negative_edges());
        assert!(matches!(
            graph.add_weighted_edge(&a, &b, 3),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(graph.set_weight(&e, 3), Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = Graph::undirected();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.add_edge(&a, &b).unwrap();

        // 反向描述的边同样可以删除
        let removed = graph.remove_edge(&Edge::new(b.clone(), a.clone())).unwrap();
        assert_eq!(removed, Edge::new(a.clone(), b.clone()));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.neighbours(&a).unwrap().is_empty());
        assert!(graph.remove_edge(&removed).unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_vertex_relabels_max_id() {
        let mut graph = Graph::weighted_directed();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        let d = graph.add_vertex("d");

        graph.add_weighted_edge(&a, &b, 1).unwrap();
        graph.add_weighted_edge(&d, &c, 5).unwrap();
        graph.add_weighted_edge(&b, &d, 9).unwrap();

        let removed = graph.remove_vertex(&a).unwrap();
        assert_eq!(removed, a);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        // d 被重新编号为 0
        let d_new = graph.vertex(VertexId::new(0)).unwrap().clone();
        assert_eq!(d_new.data(), &"d");
        assert!(!graph.contains_vertex(&d));

        let dc = graph.get_edge(&d_new, &c).unwrap();
        assert_eq!(graph.get_weight(&dc).unwrap(), 5);
        let bd = graph.get_edge(&b, &d_new).unwrap();
        assert_eq!(graph.get_weight(&bd).unwrap(), 9);
        assert_eq!(graph.predecessors(&d_new).unwrap(), vec![b.clone()]);

        assert_dense(&graph);
    }

    #[test]
    fn test_remove_vertex_not_found() {
        let mut graph = Graph::undirected();
        let a = graph.add_vertex("a");
        graph.remove_vertex(&a).unwrap();

        assert!(graph.remove_vertex(&a).unwrap_err().is_not_found());
        assert!(graph.is_empty());
        assert!(graph.neighbours(&a).unwrap_err().is_not_found());
    }

    #[test]
    fn test_snapshots_survive_mutation() {
        let mut graph = Graph::undirected();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.add_edge(&a, &b).unwrap();

        let vertices = graph.vertices();
        let edges = graph.edges();
        graph.clear();

        assert_eq!(vertices.len(), 2);
        assert_eq!(edges.len(), 1);
        assert_eq!(graph.vertex_count(), 0);
    }

    #[test]
    fn test_ids_stay_dense_under_random_mutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut graph = Graph::undirected();

        for step in 0..400u32 {
            let n = graph.vertex_count();
            match rng.gen_range(0..4) {
                0 | 1 => {
                    graph.add_vertex(step);
                }
                2 if n >= 2 => {
                    let a = graph.vertex(VertexId::new(rng.gen_range(0..n))).cloned().unwrap();
                    let b = graph.vertex(VertexId::new(rng.gen_range(0..n))).cloned().unwrap();
                    if a != b {
                        graph.add_edge(&a, &b).unwrap();
                    }
                }
                _ if n > 0 => {
                    let v = graph.vertex(VertexId::new(rng.gen_range(0..n))).cloned().unwrap();
                    graph.remove_vertex(&v).unwrap();
                }
                _ => {}
            }
            assert_dense(&graph);
        }
    }
}
