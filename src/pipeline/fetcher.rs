//! 论文抓取
//!
//! 对每个检索词独立请求arXiv，候选依次经过三道过滤：
//! 日期窗口（最便宜，最先跑）、关键词初筛、LLM相关性分类。
//! 跨检索词以arxiv_id去重，后续检索词里再次出现的论文既不重复
//! 收录、也不重复分类。单个检索词请求失败只记日志并跳过，
//! 查询级容错，不中断整次运行。

use anyhow::Result;
use std::collections::HashSet;

use crate::arxiv::ArxivClient;
use crate::config::Config;
use crate::pipeline::classifier::TopicClassifier;
use crate::types::{DateRange, Paper};

/// 抓取阶段暂存的摘要长度上限（字符），全文由提取阶段刷新
const ABSTRACT_TRUNCATE_CHARS: usize = 500;

/// 抓取窗口内与主题相关的论文，按发表日期倒序返回
pub async fn fetch_papers<C: TopicClassifier>(
    arxiv: &ArxivClient,
    terms: &[String],
    date_range: DateRange,
    config: &Config,
    classifier: &C,
) -> Result<Vec<Paper>> {
    let mut seen = HashSet::new();
    let mut collected = Vec::new();

    for term in terms {
        println!("🔍 检索: {}", term);
        match arxiv.search(term, config.max_results_per_query).await {
            Ok(batch) => {
                sift_batch(
                    batch,
                    date_range,
                    &config.filter_keywords,
                    classifier,
                    &mut seen,
                    &mut collected,
                )
                .await;
            }
            Err(e) => {
                eprintln!("⚠️ 检索词 \"{}\" 请求失败，跳过: {}", term, e);
            }
        }
    }

    collected.sort_by(|a, b| b.published.cmp(&a.published));

    println!("✅ 共收录 {} 篇去重后的相关论文", collected.len());
    Ok(collected)
}

/// 过滤一批候选并把通过的论文并入收集结果
pub async fn sift_batch<C: TopicClassifier>(
    batch: Vec<Paper>,
    date_range: DateRange,
    filter_keywords: &[String],
    classifier: &C,
    seen: &mut HashSet<String>,
    collected: &mut Vec<Paper>,
) {
    for mut paper in batch {
        if !date_range.contains(paper.published) {
            continue;
        }

        // 已收录的论文不再重复分类
        if seen.contains(&paper.arxiv_id) {
            continue;
        }

        if !keywords_filter(filter_keywords, &paper.title, &paper.abstract_text) {
            continue;
        }

        let classification = classifier.classify(&paper.title, &paper.abstract_text).await;
        if !classification.related {
            continue;
        }
        paper.topics = classification.topics;

        paper.abstract_text = paper
            .abstract_text
            .chars()
            .take(ABSTRACT_TRUNCATE_CHARS)
            .collect();

        println!("  📄 收录: {} - {}", paper.arxiv_id, truncate_title(&paper.title));
        seen.insert(paper.arxiv_id.clone());
        collected.push(paper);
    }
}

/// 关键词初筛：标题+摘要包含任一配置关键词即通过；列表为空时放行所有候选
fn keywords_filter(filter_keywords: &[String], title: &str, abstract_text: &str) -> bool {
    if filter_keywords.is_empty() {
        return true;
    }
    let text = format!("{} {}", title, abstract_text).to_lowercase();
    filter_keywords
        .iter()
        .any(|kw| text.contains(&kw.to_lowercase()))
}

fn truncate_title(title: &str) -> String {
    title.chars().take(60).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classifier::Classification;
    use chrono::NaiveDate;

    /// 所有论文都相关、主题固定的测试桩
    struct StubClassifier {
        topics: Vec<String>,
    }

    impl TopicClassifier for StubClassifier {
        async fn classify(&self, _title: &str, _abstract: &str) -> Classification {
            Classification {
                related: true,
                topics: self.topics.clone(),
            }
        }
    }

    /// 按标题关键字拒绝的测试桩
    struct RejectingClassifier;

    impl TopicClassifier for RejectingClassifier {
        async fn classify(&self, title: &str, _abstract: &str) -> Classification {
            Classification {
                related: !title.contains("unrelated"),
                topics: Vec::new(),
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn paper(id: &str, title: &str, published: NaiveDate) -> Paper {
        Paper {
            arxiv_id: id.to_string(),
            title: title.to_string(),
            authors: vec!["A".to_string()],
            published,
            abstract_text: "clinical reasoning with large language models".to_string(),
            pdf_url: format!("https://arxiv.org/pdf/{}", id),
            primary_category: "cs.CL".to_string(),
            topics: Vec::new(),
            keywords: None,
            summary: None,
            abstract_cn: None,
        }
    }

    fn range() -> DateRange {
        DateRange::ending_at(date(2025, 1, 10), 7)
    }

    async fn sift(
        batches: Vec<Vec<Paper>>,
        filter_keywords: &[String],
    ) -> Vec<Paper> {
        let classifier = StubClassifier {
            topics: vec!["医疗大模型".to_string()],
        };
        let mut seen = HashSet::new();
        let mut collected = Vec::new();
        for batch in batches {
            sift_batch(
                batch,
                range(),
                filter_keywords,
                &classifier,
                &mut seen,
                &mut collected,
            )
            .await;
        }
        collected
    }

    #[tokio::test]
    async fn test_date_window_is_inclusive() {
        let batch = vec![
            paper("1", "edge start", date(2025, 1, 4)),
            paper("2", "edge end", date(2025, 1, 10)),
            paper("3", "before", date(2025, 1, 3)),
            paper("4", "after", date(2025, 1, 11)),
        ];
        let collected = sift(vec![batch], &[]).await;
        let ids: Vec<_> = collected.iter().map(|p| p.arxiv_id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"1"));
        assert!(ids.contains(&"2"));
    }

    #[tokio::test]
    async fn test_dedup_across_queries() {
        let first = vec![paper("2501.00001", "Paper A", date(2025, 1, 5))];
        let second = vec![
            paper("2501.00001", "Paper A", date(2025, 1, 5)),
            paper("2501.00002", "Paper B", date(2025, 1, 6)),
        ];
        let collected = sift(vec![first, second], &[]).await;
        assert_eq!(collected.len(), 2);
        assert_eq!(
            collected
                .iter()
                .filter(|p| p.arxiv_id == "2501.00001")
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_keyword_filter_empty_passes_everything() {
        let batch = vec![paper("1", "Anything", date(2025, 1, 5))];
        let collected = sift(vec![batch], &[]).await;
        assert_eq!(collected.len(), 1);
    }

    #[tokio::test]
    async fn test_keyword_filter_matches_case_insensitively() {
        let batch = vec![
            paper("1", "Clinical LLM", date(2025, 1, 5)),
            paper("2", "Quantum Computing", date(2025, 1, 5)),
        ];
        // 摘要里两篇都含"clinical"，用只命中标题的词来区分
        let mut no_match = paper("2", "Quantum Computing", date(2025, 1, 5));
        no_match.abstract_text = "qubits and gates".to_string();
        let batch = vec![batch[0].clone(), no_match];

        let collected = sift(vec![batch], &["CLINICAL".to_string()]).await;
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].arxiv_id, "1");
    }

    #[tokio::test]
    async fn test_unrelated_papers_discarded() {
        let batch = vec![
            paper("1", "related work", date(2025, 1, 5)),
            paper("2", "unrelated work", date(2025, 1, 5)),
        ];
        let mut seen = HashSet::new();
        let mut collected = Vec::new();
        sift_batch(batch, range(), &[], &RejectingClassifier, &mut seen, &mut collected).await;
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].arxiv_id, "1");
    }

    #[tokio::test]
    async fn test_classifier_topics_attached_and_abstract_truncated() {
        let mut long = paper("1", "Long abstract", date(2025, 1, 5));
        long.abstract_text = "x".repeat(900);
        let collected = sift(vec![vec![long]], &[]).await;
        assert_eq!(collected[0].topics, vec!["医疗大模型"]);
        assert_eq!(collected[0].abstract_text.chars().count(), 500);
    }

    #[tokio::test]
    async fn test_sorted_by_published_descending() {
        let batch = vec![
            paper("1", "older", date(2025, 1, 4)),
            paper("2", "newest", date(2025, 1, 9)),
            paper("3", "middle", date(2025, 1, 6)),
        ];
        let mut collected = sift(vec![batch], &[]).await;
        collected.sort_by(|a, b| b.published.cmp(&a.published));
        let ids: Vec<_> = collected.iter().map(|p| p.arxiv_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }
}
