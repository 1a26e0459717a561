//! 洞察提取
//!
//! 逐篇向模型索要关键词、中文总结和翻译摘要，并用按ID重取的
//! 全文刷新摘要字段（抓取阶段存的是截断版本）。整个阶段是
//! 尽力而为：重试耗尽后三个增强字段保持为空，论文照常进入
//! 分类和渲染。

use anyhow::{Result, anyhow};
use serde::Deserialize;

use crate::arxiv::ArxivClient;
use crate::config::Config;
use crate::llm::client::utils::parse_model_json;
use crate::llm::retry::{Fallback, call_with_retry};
use crate::llm::{LLMClient, prompts};
use crate::types::Paper;

/// 模型响应形状，字段缺失按None处理
#[derive(Debug, Default, Deserialize)]
pub struct InsightFields {
    pub keywords: Option<String>,
    pub summary: Option<String>,
    pub abstract_cn: Option<String>,
}

/// 洞察提取接口，单次调用，重试由调用方包裹
pub trait InsightExtractor {
    async fn extract(&self, title: &str, abstract_text: &str) -> Result<InsightFields>;
}

/// 基于LLM的洞察提取器
///
/// 未配置模型客户端时（client为None）直接返回全空字段，不发请求。
pub struct LlmInsightExtractor<'a> {
    client: Option<&'a LLMClient>,
}

impl<'a> LlmInsightExtractor<'a> {
    pub fn new(client: Option<&'a LLMClient>) -> Self {
        Self { client }
    }
}

impl InsightExtractor for LlmInsightExtractor<'_> {
    /// 请求错误和JSON解析失败都作为错误传播，由外层重试
    async fn extract(&self, title: &str, abstract_text: &str) -> Result<InsightFields> {
        let Some(client) = self.client else {
            return Ok(InsightFields::default());
        };

        let user_prompt = prompts::extract_insights_prompt(title, abstract_text);
        let raw = client.prompt(prompts::SYSTEM_PROMPT, &user_prompt).await?;
        parse_model_json::<InsightFields>(&raw).map_err(|e| anyhow!("{}", e))
    }
}

/// 就地增强整批论文记录
pub async fn enrich_papers<E: InsightExtractor>(
    config: &Config,
    extractor: &E,
    arxiv: &ArxivClient,
    papers: &mut [Paper],
) -> Result<()> {
    refresh_abstracts(arxiv, papers).await;
    apply_insights(config, extractor, papers).await
}

/// 按ID重取每篇论文，刷新截断的摘要；失败只记日志
async fn refresh_abstracts(arxiv: &ArxivClient, papers: &mut [Paper]) {
    for paper in papers.iter_mut() {
        match arxiv.fetch_by_id(&paper.arxiv_id).await {
            Ok(Some(full)) => paper.abstract_text = full.abstract_text,
            Ok(None) => eprintln!("⚠️ arXiv未返回 {} 的记录，沿用截断摘要", paper.arxiv_id),
            Err(e) => eprintln!("⚠️ 重取 {} 失败，沿用截断摘要: {}", paper.arxiv_id, e),
        }
    }
}

/// 逐篇提取洞察并写回增强字段，重试耗尽后以全空字段兜底
pub async fn apply_insights<E: InsightExtractor>(
    config: &Config,
    extractor: &E,
    papers: &mut [Paper],
) -> Result<()> {
    let total = papers.len();
    println!("处理 {} 篇论文...", total);

    for (i, paper) in papers.iter_mut().enumerate() {
        let insights = call_with_retry(
            "洞察提取",
            config.llm.retry_attempts,
            config.llm.retry_delay_ms,
            Fallback::Value(InsightFields::default()),
            || extractor.extract(&paper.title, &paper.abstract_text),
        )
        .await?;

        paper.keywords = insights.keywords;
        paper.summary = insights.summary;
        paper.abstract_cn = insights.abstract_cn;

        println!("✅ ({}/{}) {}", i + 1, total, paper.arxiv_id);
    }

    Ok(())
}
