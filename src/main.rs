use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

// 导入库模块
use index_advisor::config::Config;
use index_advisor::metadata::{CatalogFormat, CatalogLoader};
use index_advisor::query::optimizer::{IndexOptimizer, OptimizationReport};
use index_advisor::query::shape::QueryShape;
use index_advisor::utils::logging;

#[derive(Parser)]
#[clap(version = "0.1.0", author = "Index Advisor Contributors")]
enum Cli {
    /// Recommend indexes for one query shape or an array of query shapes
    Advise {
        /// Query shape JSON file
        #[clap(short, long)]
        shape: PathBuf,
        /// Catalog JSON file
        #[clap(long)]
        catalog: PathBuf,
        /// Catalog format: native, information-schema or manual (detected when omitted)
        #[clap(short, long)]
        format: Option<String>,
        #[clap(short, long)]
        config: Option<PathBuf>,
    },
    /// Write the default configuration file
    InitConfig { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli {
        Cli::Advise {
            shape,
            catalog,
            format,
            config,
        } => {
            let config = match config {
                Some(path) => Config::load(&path)
                    .with_context(|| format!("加载配置失败: {}", path.display()))?,
                None => Config::default(),
            };
            logging::init(&config.log).map_err(|e| anyhow::anyhow!("日志初始化失败: {}", e))?;

            let result = advise(&config, &shape, &catalog, format.as_deref());
            logging::shutdown();
            result?;
        }
        Cli::InitConfig { path } => {
            Config::default()
                .save(&path)
                .with_context(|| format!("写入配置失败: {}", path.display()))?;
            println!("Configuration written to {}", path.display());
        }
    }

    Ok(())
}

fn advise(config: &Config, shape_path: &Path, catalog_path: &Path, format: Option<&str>) -> Result<()> {
    let format = format.map(str::parse::<CatalogFormat>).transpose()?;
    let catalog = CatalogLoader::from_path(catalog_path, format)
        .with_context(|| format!("加载 Catalog 失败: {}", catalog_path.display()))?;

    let content = fs::read_to_string(shape_path)
        .with_context(|| format!("读取查询形态失败: {}", shape_path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let optimizer = IndexOptimizer::from_config(&config.optimizer);
    if value.is_array() {
        let shapes: Vec<QueryShape> = serde_json::from_value(value)?;
        let results = optimizer.optimize_batch(&shapes, &catalog);
        let reports =
            OptimizationReport::batch_to_json(&results).context("序列化优化结果失败")?;
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        let shape: QueryShape = serde_json::from_value(value)?;
        let report = optimizer.optimize(&shape, &catalog)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
