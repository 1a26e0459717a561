//! arXiv检索API客户端
//!
//! 通过arXiv的Atom订阅接口（http://export.arxiv.org/api/query）按
//! 自由文本检索论文，按提交时间倒序返回。接口免认证，但要求
//! 客户端自觉限速（约3秒一次请求）。

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

use crate::types::Paper;

const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// arXiv官方要求的请求间隔
const ARXIV_RATE_LIMIT_MS: u64 = 3000;

/// Atom订阅响应
#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

/// 单篇论文条目
#[derive(Debug, Deserialize)]
struct Entry {
    id: String,
    title: String,
    summary: String,
    published: String,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
    #[serde(rename = "category", default)]
    categories: Vec<Category>,
    // 该字段位于arxiv命名空间，序列化名带前缀
    #[serde(rename = "primary_category", alias = "arxiv:primary_category", default)]
    primary_category: Option<Category>,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(rename = "@term")]
    term: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@title", default)]
    title: Option<String>,
}

/// arXiv API客户端
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ArxivClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ArxivClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: ARXIV_API_URL.to_string(),
        }
    }

    /// 按自由文本检索，最多返回max_results条，按提交时间倒序
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Paper>> {
        sleep(Duration::from_millis(ARXIV_RATE_LIMIT_MS)).await;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", query),
                ("start", "0"),
                ("max_results", &max_results.to_string()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await
            .context("arXiv请求发送失败")?
            .error_for_status()
            .context("arXiv返回错误状态")?;

        let xml = response.text().await.context("arXiv响应读取失败")?;
        parse_feed(&xml)
    }

    /// 按ID精确获取单篇论文（ID会先剥离版本号后缀）
    pub async fn fetch_by_id(&self, arxiv_id: &str) -> Result<Option<Paper>> {
        sleep(Duration::from_millis(ARXIV_RATE_LIMIT_MS)).await;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("id_list", base_id(arxiv_id)), ("max_results", "1")])
            .send()
            .await
            .context("arXiv请求发送失败")?
            .error_for_status()
            .context("arXiv返回错误状态")?;

        let xml = response.text().await.context("arXiv响应读取失败")?;
        Ok(parse_feed(&xml)?.into_iter().next())
    }
}

/// 剥离arXiv ID的版本号后缀（2501.00001v2 -> 2501.00001）
pub fn base_id(arxiv_id: &str) -> &str {
    arxiv_id.split('v').next().unwrap_or(arxiv_id)
}

/// 解析Atom订阅XML为论文记录列表
///
/// 单个条目解析失败（如日期格式异常）时跳过该条目并记录日志，
/// 不让一篇异常论文拖垮整批结果。
pub fn parse_feed(xml: &str) -> Result<Vec<Paper>> {
    let feed: Feed =
        quick_xml::de::from_str(xml).context("arXiv Atom订阅解析失败")?;

    let mut papers = Vec::new();
    for entry in feed.entries {
        match entry_to_paper(entry) {
            Ok(paper) => papers.push(paper),
            Err(e) => eprintln!("⚠️ 跳过无法解析的arXiv条目: {}", e),
        }
    }
    Ok(papers)
}

fn entry_to_paper(entry: Entry) -> Result<Paper> {
    // Atom的id是完整URL，末段才是arXiv ID
    let arxiv_id = entry
        .id
        .rsplit('/')
        .next()
        .unwrap_or(entry.id.as_str())
        .to_string();

    let published = DateTime::parse_from_rfc3339(&entry.published)
        .with_context(|| format!("发表日期解析失败: {}", entry.published))?
        .date_naive();

    let primary_category = entry
        .primary_category
        .map(|c| c.term)
        .or_else(|| entry.categories.first().map(|c| c.term.clone()))
        .unwrap_or_default();

    let pdf_url = entry
        .links
        .iter()
        .find(|l| l.title.as_deref() == Some("pdf"))
        .map(|l| l.href.clone())
        .unwrap_or_else(|| format!("https://arxiv.org/pdf/{}", arxiv_id));

    Ok(Paper {
        arxiv_id,
        title: normalize_whitespace(&entry.title),
        authors: entry.authors.into_iter().map(|a| a.name).collect(),
        published,
        abstract_text: normalize_whitespace(&entry.summary),
        pdf_url,
        primary_category,
        topics: Vec::new(),
        keywords: None,
        summary: None,
        abstract_cn: None,
    })
}

/// arXiv的标题和摘要夹杂换行与缩进，折叠成单个空格
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query Results</title>
  <entry>
    <id>http://arxiv.org/abs/2501.00001v1</id>
    <title>A Medical  Large Language
 Model</title>
    <summary>We present a
 clinical reasoning model.</summary>
    <published>2025-01-05T10:30:00Z</published>
    <author><name>Alice Zhang</name></author>
    <author><name>Bob Li</name></author>
    <category term="cs.CL"/>
    <category term="cs.AI"/>
    <link href="http://arxiv.org/abs/2501.00001v1" rel="alternate"/>
    <link href="http://arxiv.org/pdf/2501.00001v1" title="pdf" rel="related"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2501.00002v2</id>
    <title>Medical Benchmark</title>
    <summary>A benchmark.</summary>
    <published>2025-01-04T00:00:00Z</published>
    <author><name>Carol Wang</name></author>
    <category term="cs.LG"/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed_fields() {
        let papers = parse_feed(SAMPLE_FEED).unwrap();
        assert_eq!(papers.len(), 2);

        let first = &papers[0];
        assert_eq!(first.arxiv_id, "2501.00001v1");
        assert_eq!(first.title, "A Medical Large Language Model");
        assert_eq!(first.abstract_text, "We present a clinical reasoning model.");
        assert_eq!(first.authors, vec!["Alice Zhang", "Bob Li"]);
        assert_eq!(
            first.published,
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
        );
        assert_eq!(first.primary_category, "cs.CL");
        assert_eq!(first.pdf_url, "http://arxiv.org/pdf/2501.00001v1");
        assert!(first.topics.is_empty());
    }

    #[test]
    fn test_parse_feed_pdf_fallback() {
        let papers = parse_feed(SAMPLE_FEED).unwrap();
        assert_eq!(papers[1].pdf_url, "https://arxiv.org/pdf/2501.00002v2");
    }

    #[test]
    fn test_parse_empty_feed() {
        let xml = r#"<?xml version="1.0"?><feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;
        let papers = parse_feed(xml).unwrap();
        assert!(papers.is_empty());
    }

    #[test]
    fn test_base_id_strips_version() {
        assert_eq!(base_id("2501.00001v2"), "2501.00001");
        assert_eq!(base_id("2501.00001"), "2501.00001");
    }
}
