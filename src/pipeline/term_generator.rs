//! 检索词生成
//!
//! 把主题列表变成一组arXiv检索词。结果按主题列表字符串的精确值
//! 缓存到磁盘：命中时原样返回，不再访问模型；主题变化时重新生成
//! 并覆盖缓存。生成失败是致命错误，零检索词跑下去只会默默产出
//! 一份空报告。

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::cache::CacheManager;
use crate::config::Config;
use crate::llm::client::utils::parse_model_json;
use crate::llm::retry::{Fallback, call_with_retry};
use crate::llm::{LLMClient, prompts};

const CACHE_CATEGORY: &str = "search_terms";

/// 模型响应形状
#[derive(Debug, Deserialize)]
struct SearchTermsResponse {
    search_terms: Vec<String>,
}

/// 缓存条目负载：生成时用的主题字符串 + 检索词列表
/// （生成时间戳由缓存条目本身记录）
#[derive(Debug, Serialize, Deserialize)]
pub struct TermCacheData {
    pub topics: String,
    pub search_terms: Vec<String>,
}

/// 生成（或复用）检索词列表
///
/// 配置中固定了search_terms时直接采用，不触碰模型和缓存。
pub async fn generate_search_terms(
    config: &Config,
    client: Option<&LLMClient>,
    cache: &CacheManager,
) -> Result<Vec<String>> {
    if !config.search_terms.is_empty() {
        println!("📌 使用配置固定的 {} 个检索词", config.search_terms.len());
        return Ok(config.search_terms.clone());
    }

    let topics_key = config.topics_key();

    if let Some(cached) = cache.get::<TermCacheData>(CACHE_CATEGORY, &topics_key).await? {
        println!("✅ 检索词缓存命中（{} 个检索词）", cached.search_terms.len());
        return Ok(cached.search_terms);
    }

    let client = client.ok_or_else(|| {
        anyhow!("未配置LLM API KEY，无法生成检索词；可在配置中固定search_terms后重试")
    })?;

    let user_prompt = prompts::search_terms_prompt(&config.topics);

    let terms = call_with_retry(
        "检索词生成",
        config.llm.retry_attempts,
        config.llm.retry_delay_ms,
        Fallback::Fatal,
        || async {
            let raw = client.prompt(prompts::SYSTEM_PROMPT, &user_prompt).await?;
            let parsed: SearchTermsResponse =
                parse_model_json(&raw).map_err(|e| anyhow!("{}", e))?;
            let terms = dedup_preserving_order(parsed.search_terms);
            if terms.is_empty() {
                bail!("模型未返回任何检索词");
            }
            Ok(terms)
        },
    )
    .await?;

    cache
        .set(
            CACHE_CATEGORY,
            &topics_key,
            TermCacheData {
                topics: topics_key.clone(),
                search_terms: terms.clone(),
            },
        )
        .await?;

    println!("✅ 生成 {} 个检索词并写入缓存", terms.len());
    Ok(terms)
}

/// 去重但保持首见顺序
fn dedup_preserving_order(terms: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}
