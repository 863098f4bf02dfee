//! GraphKit 数据导入工具
//!
//! 把 CSV 边列表转换为 JSON 图文档或二进制快照

use anyhow::Context;
use clap::Parser;
use graphkit::{BatchImporter, GraphKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "graphkit-import")]
#[command(about = "GraphKit 数据导入工具", version)]
struct Args {
    /// 输入 CSV 文件（source,target[,weight]）
    #[arg(short, long)]
    input: PathBuf,

    /// 输出 JSON 文件
    #[arg(short, long)]
    output: PathBuf,

    /// 生成有向图
    #[arg(long)]
    directed: bool,

    /// 生成带权图
    #[arg(long)]
    weighted: bool,

    /// 输入文件没有表头
    #[arg(long)]
    no_header: bool,

    /// 输出格式: json, bincode
    #[arg(short, long, default_value = "json")]
    format: String,
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();

    let args = Args::parse();
    let kind = GraphKind::new(args.directed, args.weighted);

    println!("GraphKit 数据导入工具");
    println!("========================");
    println!("输入文件: {:?}", args.input);
    println!("输出文件: {:?}", args.output);
    println!("图类型: {}", kind);
    println!("输出格式: {}", args.format);

    println!("\n开始导入...");

    let (graph, stats) = BatchImporter::new(kind)
        .with_headers(!args.no_header)
        .import_csv(&args.input)
        .with_context(|| format!("无法读取 {}", args.input.display()))?;

    match args.format.as_str() {
        "json" => graph.save_json(&args.output)?,
        "bincode" | "bin" => std::fs::write(&args.output, graph.to_bytes()?)?,
        other => anyhow::bail!("不支持的格式: {}", other),
    }

    println!("\n导入完成!");
    println!("  顶点导入: {}", stats.vertices_imported);
    println!("  边导入: {}", stats.edges_imported);
    println!("  错误数: {}", stats.errors);
    println!("  耗时: {} ms", stats.duration_ms);

    Ok(())
}
