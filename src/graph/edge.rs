//! 边定义
//!
//! 边只由两个端点确定，权重保存在图的权重表中

use crate::graph::vertex::{Vertex, VertexId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边键：按创建时的方向记录的端点 ID 对
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub from: VertexId,
    pub to: VertexId,
}

impl EdgeKey {
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }

    /// 反向键
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    /// 是否以该顶点为端点
    pub fn touches(&self, id: VertexId) -> bool {
        self.from == id || self.to == id
    }

    /// 获取另一端点
    pub fn opposite(&self, id: VertexId) -> Option<VertexId> {
        if self.from == id {
            Some(self.to)
        } else if self.to == id {
            Some(self.from)
        } else {
            None
        }
    }

    /// 无方向的排序键（小 ID 在前）
    pub fn normalized(&self) -> (VertexId, VertexId) {
        if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// 边
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge<D> {
    /// 第一个端点（有向图中为源点）
    vertex1: Vertex<D>,
    /// 第二个端点（有向图中为目标点）
    vertex2: Vertex<D>,
}

impl<D> Edge<D> {
    /// 创建新边
    pub fn new(vertex1: Vertex<D>, vertex2: Vertex<D>) -> Self {
        Self { vertex1, vertex2 }
    }

    /// 获取第一个端点
    pub fn vertex1(&self) -> &Vertex<D> {
        &self.vertex1
    }

    /// 获取第二个端点
    pub fn vertex2(&self) -> &Vertex<D> {
        &self.vertex2
    }

    /// 获取边键
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.vertex1.id(), self.vertex2.id())
    }

    /// 是否连接给定的两个顶点（忽略方向）
    pub fn connects(&self, a: VertexId, b: VertexId) -> bool {
        let key = self.key();
        key == EdgeKey::new(a, b) || key == EdgeKey::new(b, a)
    }
}

impl<D: fmt::Display> fmt::Display for Edge<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.vertex1, self.vertex2)
    }
}
