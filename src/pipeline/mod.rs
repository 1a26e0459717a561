//! 流水线工作流
//!
//! 严格线性执行：检索词生成 → 抓取+分类 → 洞察提取 → 主题分桶 →
//! HTML渲染 → 清理中间文件 →（部署模式）归档索引。阶段之间通过
//! 输出目录下的JSON文件交接，单进程单实例运行，不加文件锁。

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::arxiv::ArxivClient;
use crate::cache::CacheManager;
use crate::config::Config;
use crate::llm::LLMClient;
use crate::types::{DateRange, PaperBundle};

pub mod categorizer;
pub mod classifier;
pub mod extractor;
pub mod fetcher;
pub mod term_generator;

use classifier::RelevanceClassifier;
use extractor::LlmInsightExtractor;

/// 中间交接文件名
const PAPERS_FILE: &str = "relative_papers.json";
const CATEGORIZED_FILE: &str = "categorized_papers.json";

/// 启动一次完整的报告生成
pub async fn launch(config: &Config) -> Result<()> {
    println!("arXiv 学术进展报告生成");
    println!("{}", "=".repeat(50));

    let today = Local::now().date_naive();
    let date_range = DateRange::ending_at(today, config.days_back.max(1));

    let run_dir = run_directory(&config.output_path, today);
    fs::create_dir_all(&run_dir).context(format!("输出目录创建失败: {:?}", run_dir))?;

    println!("📅 检索窗口: {}（{} 天）", date_range, config.days_back.max(1));
    println!("📂 输出目录: {}", run_dir.display());

    let llm_client = if config.llm_configured() {
        Some(LLMClient::new(config.llm.clone())?)
    } else {
        eprintln!("⚠️ 未配置LLM API KEY：相关性分类将fail-open，洞察字段将为空");
        None
    };
    let cache = CacheManager::new(config.cache.clone());
    let arxiv = ArxivClient::new();

    step("生成检索词");
    let terms =
        term_generator::generate_search_terms(config, llm_client.as_ref(), &cache).await?;
    if config.verbose {
        for term in &terms {
            println!("  - {}", term);
        }
    }

    step("检索arXiv论文");
    let classifier = RelevanceClassifier::new(llm_client.as_ref(), config);
    let mut papers =
        fetcher::fetch_papers(&arxiv, &terms, date_range, config, &classifier).await?;

    let papers_path = run_dir.join(PAPERS_FILE);
    save_json(
        &papers_path,
        &PaperBundle {
            papers: papers.clone(),
            date_range,
        },
    )?;

    step("提取论文洞察");
    let insight_extractor = LlmInsightExtractor::new(llm_client.as_ref());
    extractor::enrich_papers(config, &insight_extractor, &arxiv, &mut papers).await?;
    save_json(
        &papers_path,
        &PaperBundle {
            papers: papers.clone(),
            date_range,
        },
    )?;

    step("论文分类");
    let bundle = categorizer::categorize(&papers, date_range);
    let categorized_path = run_dir.join(CATEGORIZED_FILE);
    save_json(&categorized_path, &bundle)?;

    step("生成HTML报告");
    crate::report::render(config, &bundle, &run_dir)?;

    step("清理临时文件");
    cleanup_intermediate(&[papers_path, categorized_path]);

    if config.deploy_mode {
        step("生成归档索引");
        crate::report::indexer::generate_index(&config.output_path)?;
    }

    println!("\n{}", "=".repeat(50));
    println!("✅ 全部步骤完成");
    println!("📄 报告: {}", run_dir.join("index.html").display());
    println!("{}", "=".repeat(50));

    Ok(())
}

/// 以报告生成日期组织的运行目录：output_path/YYYY/MM/DD
pub fn run_directory(output_path: &Path, today: chrono::NaiveDate) -> PathBuf {
    output_path
        .join(today.format("%Y").to_string())
        .join(today.format("%m").to_string())
        .join(today.format("%d").to_string())
}

fn step(name: &str) {
    println!("\n{}", "=".repeat(50));
    println!("Step: {}", name);
    println!("{}", "=".repeat(50));
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).context(format!("中间文件写入失败: {:?}", path))?;
    Ok(())
}

fn cleanup_intermediate(paths: &[PathBuf]) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(_) => println!("🗑️ 已删除: {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => eprintln!("⚠️ 临时文件删除失败 {}: {}", path.display(), e),
        }
    }
}
