//! 图算法模块
//!
//! 所有算法只读访问图，返回派生结果，不修改图本身

mod bridges;
mod centrality;
mod community;
mod cycles;
mod mst;
mod scc;
mod shortest_path;

pub use bridges::BridgeFinder;
pub use centrality::{CentralityConfig, KeyVertex, KeyVertexFinder};
pub use community::{louvain, Communities, CommunityDetector, Link, LinkList, LouvainConfig};
pub use cycles::{Cycle, CycleFinder, CycleStep};
pub use mst::{MinimumSpanningTree, SpanningForest, UnionFind};
pub use scc::SccFinder;
pub use shortest_path::{PathResult, ShortestPathFinder};
