//! 顶点定义
//!
//! 顶点携带一个稠密的 ID 和任意负载数据

use serde::{Deserialize, Serialize};
use std::fmt;

/// 顶点 ID（从 0 开始连续分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub usize);

impl VertexId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for VertexId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 顶点
///
/// 相等性由 `(id, data)` 共同决定：删除顶点触发 ID 重排后，
/// 旧的顶点值与图中重新编号的顶点不再相等。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex<D> {
    /// 顶点 ID
    id: VertexId,
    /// 负载数据
    data: D,
}

impl<D> Vertex<D> {
    /// 创建新顶点
    pub fn new(id: VertexId, data: D) -> Self {
        Self { id, data }
    }

    /// 获取顶点 ID
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// 获取负载数据
    pub fn data(&self) -> &D {
        &self.data
    }

    /// 取出负载数据
    pub fn into_data(self) -> D {
        self.data
    }

    pub(crate) fn relabel(&mut self, id: VertexId) {
        self.id = id;
    }
}

impl<D: fmt::Display> fmt::Display for Vertex<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}({})", self.id, self.data)
    }
}
