//! 论文分类
//!
//! 按论文携带的主题标签分桶。桶的归属取标签去除首尾空白后的
//! 精确值，不做子串匹配。规范化后没有任何主题的论文归入保留的
//! 兜底标签，而不是丢弃——成功通过分类器的论文不应从报告里
//! 无声消失。桶内以arxiv_id去重并保持首次归入顺序。

use std::collections::{HashMap, HashSet};

use crate::types::{CategorizedBundle, DateRange, Paper};

/// 保留的兜底主题标签
pub const FALLBACK_TOPIC: &str = "Other";

/// 把增强后的论文列表按主题分桶
pub fn categorize(papers: &[Paper], date_range: DateRange) -> CategorizedBundle {
    let mut bundle = CategorizedBundle::new(date_range);
    // topic -> 已归入该桶的arxiv_id
    let mut tracker: HashMap<String, HashSet<String>> = HashMap::new();

    for paper in papers {
        let mut topics: Vec<String> = paper
            .topics
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if topics.is_empty() {
            topics.push(FALLBACK_TOPIC.to_string());
        }

        for topic in topics {
            let ids = tracker.entry(topic.clone()).or_default();
            if ids.insert(paper.arxiv_id.clone()) {
                bundle.categories.entry(topic).or_default().push(paper.clone());
            }
        }
    }

    println!("分类完成:");
    for (topic, topic_papers) in &bundle.categories {
        println!("  {}: {} 篇", topic, topic_papers.len());
    }
    println!("共 {} 个论文-主题对", bundle.total_pairs());

    bundle
}
