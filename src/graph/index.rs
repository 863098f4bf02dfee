//! 图索引
//!
//! 邻接表与关联边索引，按顶点 ID 直接寻址

use crate::graph::edge::EdgeKey;
use crate::graph::vertex::VertexId;
use indexmap::IndexSet;

/// 邻接索引
///
/// 无向图中每条边同时登记在两个端点的出边集合中，邻接关系对称；
/// 有向图只登记在源点的出边集合和目标点的入边集合中。
#[derive(Debug, Clone)]
pub struct AdjacencyIndex {
    /// 是否有向
    directed: bool,
    /// 顶点 -> 邻居集合
    adjacency: Vec<IndexSet<VertexId>>,
    /// 顶点 -> 出边集合（无向图中为全部关联边）
    outgoing: Vec<IndexSet<EdgeKey>>,
    /// 顶点 -> 入边集合（仅有向图使用）
    incoming: Vec<IndexSet<EdgeKey>>,
}

impl AdjacencyIndex {
    /// 创建新索引
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            adjacency: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// 为新顶点分配空的索引项
    pub fn push_vertex(&mut self) {
        self.adjacency.push(IndexSet::new());
        self.outgoing.push(IndexSet::new());
        self.incoming.push(IndexSet::new());
    }

    /// 移除顶点的索引项，末尾顶点的索引项移动到该位置
    ///
    /// 调用前该顶点与末尾顶点都必须已经没有关联边。
    pub fn swap_remove_vertex(&mut self, id: VertexId) {
        debug_assert!(self.incident(id).is_empty());
        self.adjacency.swap_remove(id.index());
        self.outgoing.swap_remove(id.index());
        self.incoming.swap_remove(id.index());
    }

    /// 登记边
    pub fn add_edge(&mut self, key: EdgeKey) {
        let (from, to) = (key.from.index(), key.to.index());

        self.adjacency[from].insert(key.to);
        self.outgoing[from].insert(key);

        if self.directed {
            self.incoming[to].insert(key);
        } else {
            self.adjacency[to].insert(key.from);
            self.outgoing[to].insert(key);
        }
    }

    /// 注销边
    pub fn remove_edge(&mut self, key: EdgeKey) {
        let (from, to) = (key.from.index(), key.to.index());

        self.adjacency[from].shift_remove(&key.to);
        self.outgoing[from].shift_remove(&key);

        if self.directed {
            self.incoming[to].shift_remove(&key);
        } else {
            self.adjacency[to].shift_remove(&key.from);
            self.outgoing[to].shift_remove(&key);
        }
    }

    /// 获取顶点的邻居
    pub fn neighbors(&self, id: VertexId) -> Option<&IndexSet<VertexId>> {
        self.adjacency.get(id.index())
    }

    /// 获取顶点的出边
    pub fn outgoing(&self, id: VertexId) -> Option<&IndexSet<EdgeKey>> {
        self.outgoing.get(id.index())
    }

    /// 获取顶点的入边
    pub fn incoming(&self, id: VertexId) -> Option<&IndexSet<EdgeKey>> {
        if self.directed {
            self.incoming.get(id.index())
        } else {
            self.outgoing.get(id.index())
        }
    }

    /// 获取顶点的前驱（入边来源的顶点）
    pub fn predecessors(&self, id: VertexId) -> Vec<VertexId> {
        self.incoming(id)
            .map(|edges| edges.iter().filter_map(|key| key.opposite(id)).collect())
            .unwrap_or_default()
    }

    /// 获取与顶点关联的全部边
    pub fn incident(&self, id: VertexId) -> Vec<EdgeKey> {
        let mut edges: Vec<EdgeKey> = self
            .outgoing(id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        if self.directed {
            if let Some(set) = self.incoming.get(id.index()) {
                edges.extend(set.iter().copied());
            }
        }
        edges
    }

    /// 获取顶点的出度
    pub fn out_degree(&self, id: VertexId) -> usize {
        self.outgoing(id).map(|set| set.len()).unwrap_or(0)
    }

    /// 获取顶点的入度
    pub fn in_degree(&self, id: VertexId) -> usize {
        self.incoming(id).map(|set| set.len()).unwrap_or(0)
    }

    /// 清空索引
    pub fn clear(&mut self) {
        self.adjacency.clear();
        self.outgoing.clear();
        self.incoming.clear();
    }
}
