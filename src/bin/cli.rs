//! GraphKit CLI 工具
//!
//! 交互式命令行界面

use anyhow::Context as _;
use clap::Parser;
use colored::Colorize;
use graphkit::cli::{CommandCompleter, CommandResult, Session};
use graphkit::Graph;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "graphkit-cli")]
#[command(about = "GraphKit 命令行工具", version)]
struct Args {
    /// 启动时加载的图文档（JSON）
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// 执行单个命令后退出
    #[arg(short = 'e', long)]
    execute: Option<String>,

    /// 日志级别（RUST_LOG 优先）
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// 历史记录文件
    #[arg(long)]
    history: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let graph = match &args.input {
        Some(path) => Graph::load_json(path)
            .with_context(|| format!("无法加载图文档 {}", path.display()))?,
        None => Graph::undirected(),
    };
    let mut session = Session::new(graph);

    // 单个命令模式
    if let Some(command) = args.execute {
        return match session.execute(&command) {
            CommandResult::Error(e) => Err(anyhow::anyhow!(e)),
            result => {
                report(result);
                Ok(())
            }
        };
    }

    println!("GraphKit CLI {}", graphkit::VERSION);
    println!("=============================================");
    println!(
        "当前图: {} ({} 个顶点, {} 条边)",
        session.graph().kind(),
        session.graph().vertex_count(),
        session.graph().edge_count()
    );
    println!("\n输入 ':help' 查看命令列表，':quit' 退出\n");

    let mut editor: Editor<CommandCompleter, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(CommandCompleter::new()));

    let history = args.history.or_else(default_history_path);
    if let Some(path) = &history {
        // 首次运行时历史文件不存在
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("graphkit> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str())?;
                if !report(session.execute(&line)) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &history {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        editor.save_history(path)?;
    }

    println!("再见！");
    Ok(())
}

/// 打印命令结果；返回是否继续运行
fn report(result: CommandResult) -> bool {
    match result {
        CommandResult::Continue => true,
        CommandResult::Exit => false,
        CommandResult::Message(output) => {
            print!("{}", output);
            true
        }
        CommandResult::Error(e) => {
            eprintln!("{} {}", "错误:".red().bold(), e);
            true
        }
    }
}

fn init_logging(level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("graphkit").join("history.txt"))
}
