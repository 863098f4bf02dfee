//! 控制台命令处理
//!
//! 以 : 开头的是控制台命令，其余为图编辑与算法命令

use crate::algorithm::{
    BridgeFinder, CommunityDetector, CycleFinder, KeyVertexFinder, LouvainConfig,
    MinimumSpanningTree, SccFinder, ShortestPathFinder,
};
use crate::cli::printer::{check_vertical_display, PrintMode, Printer};
use crate::error::{Error, Result};
use crate::graph::{Graph, Vertex, VertexId};
use crate::metrics;
use crate::types::{GraphKind, Weight, DEFAULT_WEIGHT};
use tracing::debug;

/// 控制台命令执行结果
#[derive(Debug)]
pub enum CommandResult {
    /// 继续运行
    Continue,
    /// 退出程序
    Exit,
    /// 显示消息
    Message(String),
    /// 错误
    Error(String),
}

/// 交互会话：持有当前图和打印器
pub struct Session {
    graph: Graph<String>,
    printer: Printer,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Graph::undirected())
    }
}

impl Session {
    pub fn new(graph: Graph<String>) -> Self {
        Self {
            graph,
            printer: Printer::default(),
        }
    }

    pub fn graph(&self) -> &Graph<String> {
        &self.graph
    }

    /// 解析并执行一行输入
    pub fn execute(&mut self, input: &str) -> CommandResult {
        let (line, vertical) = check_vertical_display(input);
        if line.is_empty() {
            return CommandResult::Continue;
        }
        if is_console_command(&line) {
            return self.execute_console_command(&line);
        }

        self.printer.set_mode(if vertical {
            PrintMode::Vertical
        } else {
            PrintMode::Table
        });

        let words: Vec<&str> = line.split_whitespace().collect();
        debug!(command = words[0], "执行命令");
        match self.dispatch(&words) {
            Ok(output) => CommandResult::Message(output),
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    fn execute_console_command(&mut self, line: &str) -> CommandResult {
        let cmd = line.trim_start_matches(':').to_lowercase();
        match cmd.as_str() {
            "help" | "h" => CommandResult::Message(Printer::print_help()),
            "quit" | "q" | "exit" => CommandResult::Exit,
            "stats" => CommandResult::Message(
                self.printer
                    .print_stats(&self.graph, &metrics::global().snapshot()),
            ),
            "clear" => {
                print!("\x1B[2J\x1B[1;1H");
                CommandResult::Continue
            }
            _ => CommandResult::Error(format!("Unknown command: {}. Type :help for help.", cmd)),
        }
    }

    fn dispatch(&mut self, words: &[&str]) -> Result<String> {
        let args = &words[1..];
        match words[0].to_lowercase().as_str() {
            "new" => self.new_graph(args),
            "load" => {
                let path = arg(args, 0, "load <file>")?;
                self.graph = Graph::load_json(path)?;
                Ok(format!(
                    "已加载 {} ({} 个顶点, {} 条边)\n",
                    self.graph.kind(),
                    self.graph.vertex_count(),
                    self.graph.edge_count()
                ))
            }
            "save" => {
                let path = arg(args, 0, "save <file>")?;
                self.graph.save_json(path)?;
                Ok(format!("已保存到 {}\n", path))
            }
            "vertex" | "v" => self.vertex_command(args),
            "edge" | "e" => self.edge_command(args),
            "show" => Ok(format!(
                "{}{}",
                self.printer.print_vertices(&self.graph.vertices()),
                self.printer.print_edges(&self.graph, &self.graph.edges())
            )),
            "neighbours" | "neighbors" | "n" => {
                let vertex = self.vertex_arg(args, 0, "neighbours <id>")?;
                let neighbours = self.graph.neighbours(&vertex)?;
                Ok(self.printer.print_vertices(&neighbours))
            }
            "bridges" => {
                let bridges = BridgeFinder::new(&self.graph).find()?;
                Ok(self.printer.print_edges(&self.graph, &bridges))
            }
            "scc" => {
                let components = SccFinder::new(&self.graph).find()?;
                Ok(self.printer.print_groups(&components))
            }
            "cycles" => {
                let source = self.vertex_arg(args, 0, "cycles <id>")?;
                let cycles = CycleFinder::new(&self.graph).find(&source)?;
                let rows: Vec<Vec<String>> = cycles
                    .iter()
                    .enumerate()
                    .map(|(i, cycle)| {
                        let mut route = vec![source.to_string()];
                        route.extend(cycle.iter().map(|step| step.vertex.to_string()));
                        vec![i.to_string(), cycle.len().to_string(), route.join(" -> ")]
                    })
                    .collect();
                Ok(self.printer.print_rows(&["#", "length", "cycle"], &rows))
            }
            "path" => {
                let src = self.vertex_arg(args, 0, "path <a> <b>")?;
                let dest = self.vertex_arg(args, 1, "path <a> <b>")?;
                match ShortestPathFinder::new(&self.graph).find(&src, &dest)? {
                    Some(path) => Ok(self.printer.print_path(&path)),
                    None => Ok("未找到路径\n".to_string()),
                }
            }
            "mst" => {
                let forest = MinimumSpanningTree::new(&self.graph).find()?;
                Ok(self.printer.print_forest(&self.graph, &forest))
            }
            "key" => {
                let keys = KeyVertexFinder::new(&self.graph).find()?;
                Ok(self.printer.print_key_vertices(&keys))
            }
            "communities" => {
                let max_depth = match args.first() {
                    Some(raw) => parse_number(raw)?,
                    None => 0,
                };
                let config = LouvainConfig {
                    max_depth,
                    ..LouvainConfig::default()
                };
                let communities = CommunityDetector::new(&self.graph)
                    .with_config(config)
                    .find()?;
                Ok(self.printer.print_groups(&communities))
            }
            other => Err(Error::InvalidArgument(format!(
                "未知命令: {}。输入 :help 查看帮助。",
                other
            ))),
        }
    }

    fn new_graph(&mut self, args: &[&str]) -> Result<String> {
        let usage = "new <directed|undirected> [weighted]";
        let directed = match arg(args, 0, usage)? {
            "directed" => true,
            "undirected" => false,
            _ => return Err(usage_error(usage)),
        };
        let weighted = match args.get(1) {
            Some(&"weighted") => true,
            None => false,
            Some(_) => return Err(usage_error(usage)),
        };

        self.graph = Graph::new(GraphKind::new(directed, weighted));
        Ok(format!("已创建 {} 图\n", self.graph.kind()))
    }

    fn vertex_command(&mut self, args: &[&str]) -> Result<String> {
        match arg(args, 0, "vertex <add|rm> ...")? {
            "add" => {
                let label = arg(args, 1, "vertex add <label>")?;
                let vertex = self.graph.add_vertex(label.to_string());
                Ok(format!("{}\n", vertex))
            }
            "rm" => {
                let vertex = self.vertex_arg(args, 1, "vertex rm <id>")?;
                let removed = self.graph.remove_vertex(&vertex)?;
                Ok(format!("已删除 {}\n", removed))
            }
            _ => Err(usage_error("vertex <add|rm> ...")),
        }
    }

    fn edge_command(&mut self, args: &[&str]) -> Result<String> {
        match arg(args, 0, "edge <add|rm> ...")? {
            "add" => {
                let usage = "edge add <a> <b> [w]";
                let a = self.vertex_arg(args, 1, usage)?;
                let b = self.vertex_arg(args, 2, usage)?;
                let edge = match args.get(3) {
                    Some(raw) => {
                        let weight: Weight = parse_number(raw)?;
                        self.graph.add_weighted_edge(&a, &b, weight)?
                    }
                    None if self.graph.is_weighted() => {
                        self.graph.add_weighted_edge(&a, &b, DEFAULT_WEIGHT)?
                    }
                    None => self.graph.add_edge(&a, &b)?,
                };
                Ok(format!("{}\n", edge))
            }
            "rm" => {
                let usage = "edge rm <a> <b>";
                let a = self.vertex_arg(args, 1, usage)?;
                let b = self.vertex_arg(args, 2, usage)?;
                let edge = self.graph.get_edge(&a, &b)?;
                let removed = self.graph.remove_edge(&edge)?;
                Ok(format!("已删除 {}\n", removed))
            }
            _ => Err(usage_error("edge <add|rm> ...")),
        }
    }

    /// 按 ID 解析顶点参数
    fn vertex_arg(&self, args: &[&str], index: usize, usage: &str) -> Result<Vertex<String>> {
        let id: usize = parse_number(arg(args, index, usage)?)?;
        self.graph
            .vertex(VertexId::new(id))
            .cloned()
            .ok_or_else(|| Error::VertexNotFound(format!("#{}", id)))
    }
}

fn arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str> {
    args.get(index).copied().ok_or_else(|| usage_error(usage))
}

fn usage_error(usage: &str) -> Error {
    Error::InvalidArgument(format!("用法: {}", usage))
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::InvalidArgument(format!("无效数字: {}", raw)))
}

/// 检查输入是否是控制台命令
pub fn is_console_command(input: &str) -> bool {
    input.trim().starts_with(':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn run(session: &mut Session, input: &str) -> String {
        match session.execute(input) {
            CommandResult::Message(output) => output,
            other => panic!("{} 执行失败: {:?}", input, other),
        }
    }

    #[test]
    fn test_build_and_query() {
        let mut session = Session::default();
        run(&mut session, "new directed weighted");
        for label in ["a", "b", "c"] {
            run(&mut session, &format!("vertex add {}", label));
        }
        run(&mut session, "edge add 0 1 4");
        run(&mut session, "edge add 1 2");
        run(&mut session, "edge add 0 2 9");

        assert_eq!(session.graph().edge_count(), 3);
        assert_eq!(session.graph().weight_between(1.into(), 2.into()), Some(1));

        let path = run(&mut session, "path 0 2");
        assert!(path.contains("#0(a) -> #1(b) -> #2(c)"));
        assert!(path.contains("total weight 5"));

        assert!(run(&mut session, "scc").contains("3 row(s)"));
    }

    #[test]
    fn test_remove_commands() {
        let mut session = Session::default();
        run(&mut session, "vertex add x");
        run(&mut session, "vertex add y");
        run(&mut session, "vertex add z");
        run(&mut session, "edge add 0 2");
        run(&mut session, "edge rm 2 0");
        assert_eq!(session.graph().edge_count(), 0);

        run(&mut session, "vertex rm 0");
        let labels: Vec<String> = session
            .graph()
            .vertices()
            .into_iter()
            .map(Vertex::into_data)
            .collect();
        assert_eq!(labels, vec!["z".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_errors_are_reported() {
        let mut session = Session::default();
        assert!(matches!(session.execute("vertex rm 3"), CommandResult::Error(_)));
        assert!(matches!(session.execute("edge add 0"), CommandResult::Error(_)));
        assert!(matches!(session.execute("mst"), CommandResult::Error(_)));
        assert!(matches!(session.execute("frobnicate"), CommandResult::Error(_)));
        assert!(matches!(session.execute(":nope"), CommandResult::Error(_)));
    }

    #[test]
    fn test_console_commands() {
        let mut session = Session::default();
        assert!(matches!(session.execute(":quit"), CommandResult::Exit));
        assert!(matches!(session.execute(":help"), CommandResult::Message(_)));
        assert!(matches!(session.execute(":stats"), CommandResult::Message(_)));
        assert!(matches!(session.execute("   "), CommandResult::Continue));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("graph.json");
        let file = file.to_string_lossy();

        let mut session = Session::default();
        run(&mut session, "vertex add a");
        run(&mut session, "vertex add b");
        run(&mut session, "edge add 0 1");
        run(&mut session, &format!("save {}", file));

        let mut other = Session::default();
        run(&mut other, &format!("load {}", file));
        assert_eq!(other.graph().vertex_count(), 2);
        assert_eq!(other.graph().edge_count(), 1);
        assert!(run(&mut other, "bridges").contains("1 row(s)"));
    }

    #[test]
    fn test_communities_command() {
        let mut session = Session::default();
        for label in ["a", "b", "c"] {
            run(&mut session, &format!("vertex add {}", label));
        }
        run(&mut session, "edge add 0 1");
        let output = run(&mut session, "communities \\G");
        assert!(output.contains("2. row"));
    }
}
