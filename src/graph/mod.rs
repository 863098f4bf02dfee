//! 图核心模块
//!
//! 定义顶点、边和图容器

mod edge;
mod graph;
mod index;
mod vertex;

pub use edge::{Edge, EdgeKey};
pub use graph::Graph;
pub use index::AdjacencyIndex;
pub use vertex::{Vertex, VertexId};
