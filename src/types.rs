//! 通用类型定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 边权重（整数）
pub type Weight = i64;

/// 未指定权重时的默认值
pub const DEFAULT_WEIGHT: Weight = 1;

/// 图的形态：有向/无向 × 带权/不带权
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphKind {
    pub directed: bool,
    pub weighted: bool,
}

impl GraphKind {
    pub const UNDIRECTED: GraphKind = GraphKind {
        directed: false,
        weighted: false,
    };
    pub const DIRECTED: GraphKind = GraphKind {
        directed: true,
        weighted: false,
    };
    pub const WEIGHTED_UNDIRECTED: GraphKind = GraphKind {
        directed: false,
        weighted: true,
    };
    pub const WEIGHTED_DIRECTED: GraphKind = GraphKind {
        directed: true,
        weighted: true,
    };

    pub fn new(directed: bool, weighted: bool) -> Self {
        Self { directed, weighted }
    }
}

impl Default for GraphKind {
    fn default() -> Self {
        Self::UNDIRECTED
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.directed { "directed" } else { "undirected" };
        if self.weighted {
            write!(f, "weighted {}", direction)
        } else {
            write!(f, "{}", direction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_kind_display() {
        assert_eq!(GraphKind::DIRECTED.to_string(), "directed");
        assert_eq!(GraphKind::WEIGHTED_UNDIRECTED.to_string(), "weighted undirected");
        assert_eq!(GraphKind::default(), GraphKind::UNDIRECTED);
    }
}
