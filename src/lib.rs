//! GraphKit - 内存图数据结构与经典图算法
//!
//! 支持有向/无向 × 带权/不带权四种图，提供：
//! - 桥、强连通分量、环路枚举
//! - 最短路径（Dijkstra / Bellman-Ford）、最小生成树（Kruskal）
//! - 关键顶点（接近中心性）、社区发现（Louvain）
//! - JSON / 二进制 / CSV 导入导出

pub mod algorithm;
pub mod cli;
pub mod error;
pub mod graph;
pub mod import;
pub mod metrics;
pub mod types;

// 重导出常用类型
pub use algorithm::{
    BridgeFinder, CommunityDetector, CycleFinder, KeyVertexFinder, MinimumSpanningTree,
    PathResult, SccFinder, ShortestPathFinder,
};
pub use error::{Error, Result};
pub use graph::{Edge, EdgeKey, Graph, Vertex, VertexId};
pub use import::{BatchImporter, GraphDocument, ImportStats};
pub use types::{GraphKind, Weight, DEFAULT_WEIGHT};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
