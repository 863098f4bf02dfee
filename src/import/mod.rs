//! 数据导入导出模块
//!
//! - JSON 图文档：`{isDirected, isWeighted, vertices, edges}`
//! - 二进制快照（bincode）
//! - CSV 边列表批量导入

use crate::error::{Error, Result};
use crate::graph::{Graph, Vertex};
use crate::types::{GraphKind, Weight, DEFAULT_WEIGHT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs::File;
use std::hash::Hash;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;
use tracing::{debug, warn};

/// 边记录：端点为顶点 ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: usize,
    pub target: usize,
    #[serde(default)]
    pub weight: Option<Weight>,
}

/// 图文档
///
/// 顶点按 ID 顺序保存，重建时先按顺序添加顶点再添加边，因此 ID 保持不变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument<D> {
    pub is_directed: bool,
    pub is_weighted: bool,
    pub vertices: Vec<D>,
    pub edges: Vec<EdgeRecord>,
}

impl<D> GraphDocument<D> {
    pub fn kind(&self) -> GraphKind {
        GraphKind::new(self.is_directed, self.is_weighted)
    }
}

impl<D> Graph<D>
where
    D: Clone + Eq + Hash + Debug,
{
    /// 导出为图文档
    pub fn to_document(&self) -> GraphDocument<D> {
        let weighted = self.is_weighted();
        GraphDocument {
            is_directed: self.is_directed(),
            is_weighted: weighted,
            vertices: self.iter_vertices().map(|v| v.data().clone()).collect(),
            edges: self
                .edge_keys()
                .map(|(key, weight)| EdgeRecord {
                    source: key.from.index(),
                    target: key.to.index(),
                    weight: weighted.then_some(weight),
                })
                .collect(),
        }
    }

    /// 从图文档重建
    pub fn from_document(document: GraphDocument<D>) -> Result<Self> {
        let mut graph = Graph::new(document.kind());
        let vertices: Vec<Vertex<D>> = document
            .vertices
            .into_iter()
            .map(|data| graph.add_vertex(data))
            .collect();

        for record in &document.edges {
            let (Some(source), Some(target)) =
                (vertices.get(record.source), vertices.get(record.target))
            else {
                return Err(Error::InvalidArgument(format!(
                    "边 ({}, {}) 引用了不存在的顶点，共 {} 个顶点",
                    record.source,
                    record.target,
                    vertices.len()
                )));
            };

            match (document.is_weighted, record.weight) {
                (true, weight) => {
                    graph.add_weighted_edge(source, target, weight.unwrap_or(DEFAULT_WEIGHT))?;
                }
                (false, None) => {
                    graph.add_edge(source, target)?;
                }
                (false, Some(_)) => {
                    return Err(Error::InvalidArgument(format!(
                        "不带权的图中边 ({}, {}) 带有权重",
                        record.source, record.target
                    )));
                }
            }
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "图文档加载完成"
        );
        Ok(graph)
    }
}

impl<D> Graph<D>
where
    D: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned,
{
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_document(serde_json::from_str(json)?)
    }

    /// 二进制快照
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.to_document())?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_document(bincode::deserialize(bytes)?)
    }

    /// 写入 JSON 文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &self.to_document())?;
        Ok(())
    }

    /// 读取 JSON 文件
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Self::from_document(serde_json::from_reader(reader)?)
    }
}

/// 导入统计
#[derive(Debug, Default, Clone)]
pub struct ImportStats {
    pub vertices_imported: usize,
    pub edges_imported: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

/// CSV 边列表导入器
///
/// 每行为 `source,target[,weight]`，顶点按标签在首次出现时创建。
/// 格式错误的行计入 `errors` 并跳过。
pub struct BatchImporter {
    kind: GraphKind,
    has_headers: bool,
}

impl BatchImporter {
    /// 创建导入器
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            has_headers: true,
        }
    }

    /// 是否跳过表头
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// 从 CSV 文件导入
    pub fn import_csv<P: AsRef<Path>>(&self, path: P) -> Result<(Graph<String>, ImportStats)> {
        self.import_reader(File::open(path)?)
    }

    /// 从任意读取器导入
    pub fn import_reader<R: Read>(&self, reader: R) -> Result<(Graph<String>, ImportStats)> {
        let start = std::time::Instant::now();
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut graph = Graph::new(self.kind);
        let mut labels: HashMap<String, Vertex<String>> = HashMap::new();
        let mut stats = ImportStats::default();

        for (line, record) in rows.records().enumerate() {
            let imported = record
                .map_err(Error::from)
                .and_then(|record| self.import_row(&mut graph, &mut labels, &record));
            match imported {
                Ok(true) => stats.edges_imported += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(line = line + 1, error = %e, "跳过无效行");
                    stats.errors += 1;
                }
            }
        }

        stats.vertices_imported = graph.vertex_count();
        stats.duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            vertices = stats.vertices_imported,
            edges = stats.edges_imported,
            errors = stats.errors,
            "CSV 导入完成"
        );
        Ok((graph, stats))
    }

    /// 导入一行；返回是否新增了边
    fn import_row(
        &self,
        graph: &mut Graph<String>,
        labels: &mut HashMap<String, Vertex<String>>,
        record: &csv::StringRecord,
    ) -> Result<bool> {
        let (Some(source), Some(target)) = (record.get(0), record.get(1)) else {
            return Err(Error::ImportError("CSV 格式错误: 至少需要两列".to_string()));
        };
        if source.is_empty() || target.is_empty() {
            return Err(Error::ImportError("CSV 格式错误: 端点为空".to_string()));
        }
        if source == target {
            return Err(Error::InvalidArgument(format!("不支持自环: {}", source)));
        }

        let weight = match record.get(2).filter(|w| !w.is_empty()) {
            Some(raw) => Some(
                raw.parse::<Weight>()
                    .map_err(|e| Error::ImportError(format!("无效权重 '{}': {}", raw, e)))?,
            ),
            None => None,
        };

        let from = intern(graph, labels, source);
        let to = intern(graph, labels, target);

        let before = graph.edge_count();
        if self.kind.weighted {
            graph.add_weighted_edge(&from, &to, weight.unwrap_or(DEFAULT_WEIGHT))?;
        } else {
            graph.add_edge(&from, &to)?;
        }
        Ok(graph.edge_count() > before)
    }
}

fn intern(
    graph: &mut Graph<String>,
    labels: &mut HashMap<String, Vertex<String>>,
    label: &str,
) -> Vertex<String> {
    labels
        .entry(label.to_string())
        .or_insert_with(|| graph.add_vertex(label.to_string()))
        .clone()
}
