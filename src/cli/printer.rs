//! 结果打印器
//!
//! 提供表格和垂直格式的结果输出

use crate::algorithm::{KeyVertex, PathResult, SpanningForest};
use crate::graph::{Edge, Graph, Vertex};
use crate::metrics::MetricsSnapshot;
use prettytable::{format, row, Cell, Row, Table};

/// 打印模式
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PrintMode {
    /// 表格模式
    Table,
    /// 垂直模式 (\G)
    Vertical,
}

/// 结果打印器
pub struct Printer {
    mode: PrintMode,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(PrintMode::Table)
    }
}

impl Printer {
    pub fn new(mode: PrintMode) -> Self {
        Self { mode }
    }

    /// 设置打印模式
    pub fn set_mode(&mut self, mode: PrintMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> PrintMode {
        self.mode
    }

    /// 打印行集
    pub fn print_rows(&self, columns: &[&str], rows: &[Vec<String>]) -> String {
        if rows.is_empty() {
            return "Empty set\n".to_string();
        }

        let output = match self.mode {
            PrintMode::Table => self.format_table(columns, rows),
            PrintMode::Vertical => self.format_vertical(columns, rows),
        };
        format!("{}{} row(s) in set\n", output, rows.len())
    }

    /// 表格格式
    fn format_table(&self, columns: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(Row::new(columns.iter().map(|c| Cell::new(c)).collect()));

        for row_data in rows {
            table.add_row(Row::new(row_data.iter().map(|v| Cell::new(v)).collect()));
        }

        table.to_string()
    }

    /// 垂直格式
    fn format_vertical(&self, columns: &[&str], rows: &[Vec<String>]) -> String {
        let width = columns.iter().map(|c| c.len()).max().unwrap_or(0);
        let mut output = String::new();

        for (i, row_data) in rows.iter().enumerate() {
            output.push_str(&format!(
                "*************************** {}. row ***************************\n",
                i + 1
            ));
            for (j, col) in columns.iter().enumerate() {
                let value = row_data.get(j).map(String::as_str).unwrap_or("");
                output.push_str(&format!("{:>width$}: {}\n", col, value, width = width));
            }
        }

        output
    }

    pub fn print_vertices(&self, vertices: &[Vertex<String>]) -> String {
        let rows: Vec<Vec<String>> = vertices
            .iter()
            .map(|v| vec![v.id().to_string(), v.data().clone()])
            .collect();
        self.print_rows(&["id", "label"], &rows)
    }

    /// 打印边；不带权的图不显示权重列
    pub fn print_edges(&self, graph: &Graph<String>, edges: &[Edge<String>]) -> String {
        if !graph.is_weighted() {
            let rows: Vec<Vec<String>> = edges
                .iter()
                .map(|e| vec![e.vertex1().to_string(), e.vertex2().to_string()])
                .collect();
            return self.print_rows(&["from", "to"], &rows);
        }

        let rows: Vec<Vec<String>> = edges
            .iter()
            .map(|e| {
                let weight = graph
                    .weight_between(e.vertex1().id(), e.vertex2().id())
                    .map(|w| w.to_string())
                    .unwrap_or_default();
                vec![e.vertex1().to_string(), e.vertex2().to_string(), weight]
            })
            .collect();
        self.print_rows(&["from", "to", "weight"], &rows)
    }

    /// 打印顶点分组（强连通分量、社区）
    pub fn print_groups(&self, groups: &[Vec<Vertex<String>>]) -> String {
        let rows: Vec<Vec<String>> = groups
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let members: Vec<String> = group.iter().map(|v| v.to_string()).collect();
                vec![i.to_string(), group.len().to_string(), members.join(", ")]
            })
            .collect();
        self.print_rows(&["#", "size", "members"], &rows)
    }

    pub fn print_path(&self, path: &PathResult<String>) -> String {
        let route: Vec<String> = path.vertices.iter().map(|v| v.to_string()).collect();
        format!(
            "{}\n{} edge(s), total weight {}\n",
            route.join(" -> "),
            path.len(),
            path.total_weight
        )
    }

    pub fn print_forest(&self, graph: &Graph<String>, forest: &SpanningForest<String>) -> String {
        format!(
            "{}total weight {}\n",
            self.print_edges(graph, &forest.edges),
            forest.total_weight
        )
    }

    pub fn print_key_vertices(&self, keys: &[KeyVertex<String>]) -> String {
        let rows: Vec<Vec<String>> = keys
            .iter()
            .map(|k| vec![k.vertex.to_string(), format!("{:.4}", k.centrality)])
            .collect();
        self.print_rows(&["vertex", "closeness"], &rows)
    }

    /// 打印统计信息
    pub fn print_stats(&self, graph: &Graph<String>, metrics: &MetricsSnapshot) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Property", "Value"]);
        table.add_row(row!["Graph Kind", graph.kind().to_string()]);
        table.add_row(row!["Vertex Count", graph.vertex_count().to_string()]);
        table.add_row(row!["Edge Count", graph.edge_count().to_string()]);
        table.add_row(row!["Vertices Inserted", metrics.vertices_inserted.to_string()]);
        table.add_row(row!["Vertices Removed", metrics.vertices_removed.to_string()]);
        table.add_row(row!["Edges Inserted", metrics.edges_inserted.to_string()]);
        table.add_row(row!["Edges Removed", metrics.edges_removed.to_string()]);
        table.add_row(row!["Algorithm Runs", metrics.algorithm_runs.to_string()]);
        table.add_row(row!["Algorithm Failures", metrics.algorithm_failures.to_string()]);
        table.add_row(row![
            "Avg Algorithm Time (ms)",
            format!("{:.3}", metrics.avg_algorithm_duration_ms)
        ]);
        table.add_row(row!["Uptime (s)", metrics.uptime_seconds.to_string()]);
        table.to_string()
    }

    /// 打印帮助信息
    pub fn print_help() -> String {
        r#"
═══════════════════════════════════════════════════════════════
                     GraphKit CLI 命令帮助
═══════════════════════════════════════════════════════════════

图管理:
  new <directed|undirected> [weighted]
                       新建空图
  load <file>          从 JSON 文档加载
  save <file>          保存为 JSON 文档
  show                 显示全部顶点和边

编辑:
  vertex add <label>   添加顶点
  vertex rm <id>       删除顶点（最大 ID 的顶点会接管该 ID）
  edge add <a> <b> [w] 添加边
  edge rm <a> <b>      删除边
  neighbours <id>      查看顶点邻居

算法:
  bridges              桥（无向图）
  scc                  强连通分量
  cycles <id>          经过顶点的全部简单环（有向图）
  path <a> <b>         最短路径（带权图）
  mst                  最小生成树（无向带权图）
  key                  关键顶点（接近中心性）
  communities [depth]  社区发现（Louvain，可选递归拆分深度）

控制台命令 (以 : 开头):
  :help, :h            显示帮助
  :stats               显示统计信息
  :clear               清屏
  :quit, :q            退出程序

提示: 在命令末尾加 \G 可垂直显示结果
═══════════════════════════════════════════════════════════════
"#
        .to_string()
    }
}

/// 检查命令是否以 \G 结尾（垂直显示）
pub fn check_vertical_display(input: &str) -> (String, bool) {
    let trimmed = input.trim();
    if trimmed.ends_with("\\G") || trimmed.ends_with("\\g") {
        let clean = trimmed[..trimmed.len() - 2].trim().to_string();
        (clean, true)
    } else {
        (trimmed.to_string(), false)
    }
}
