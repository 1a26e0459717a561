//! 相关性分类器
//!
//! 逐篇询问模型论文是否属于配置的主题、命中哪些主题。
//! 故障策略是fail-open：请求重试耗尽或解析失败都不会丢弃论文，
//! 宁可让一篇不相关的论文进入报告，也不因瞬时故障漏掉相关论文。

use serde::Deserialize;

use crate::config::Config;
use crate::llm::client::utils::parse_model_json;
use crate::llm::retry::{Fallback, call_with_retry};
use crate::llm::{LLMClient, prompts};

/// 分类结论
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Classification {
    pub related: bool,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl Classification {
    /// fail-open结论：视为相关，主题为空
    pub fn fail_open() -> Self {
        Self {
            related: true,
            topics: Vec::new(),
        }
    }
}

/// 主题分类接口，抓取阶段通过它询问每个候选
pub trait TopicClassifier {
    async fn classify(&self, title: &str, abstract_text: &str) -> Classification;
}

/// 基于LLM的相关性分类器
///
/// 未配置模型客户端时（client为None）对所有候选fail-open，
/// 保证流水线在没有模型的环境下仍可运行。
pub struct RelevanceClassifier<'a> {
    client: Option<&'a LLMClient>,
    topics: &'a [String],
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl<'a> RelevanceClassifier<'a> {
    pub fn new(client: Option<&'a LLMClient>, config: &'a Config) -> Self {
        Self {
            client,
            topics: &config.topics,
            retry_attempts: config.llm.retry_attempts,
            retry_delay_ms: config.llm.retry_delay_ms,
        }
    }
}

impl TopicClassifier for RelevanceClassifier<'_> {
    /// 逐篇同步调用，不做跨论文批处理
    async fn classify(&self, title: &str, abstract_text: &str) -> Classification {
        let Some(client) = self.client else {
            return Classification::fail_open();
        };

        let user_prompt = prompts::topic_related_prompt(self.topics, title, abstract_text);

        let result = call_with_retry(
            "相关性分类",
            self.retry_attempts,
            self.retry_delay_ms,
            Fallback::Value(Classification::fail_open()),
            || async {
                let raw = client.prompt(prompts::SYSTEM_PROMPT, &user_prompt).await?;
                Ok(parse_classification(&raw))
            },
        )
        .await;

        // Fallback::Value保证不会走到Err分支
        result.unwrap_or_else(|_| Classification::fail_open())
    }
}

/// 解析模型的分类响应
///
/// JSON解析失败时退回粗糙启发式：原始文本以肯定token开头即视为相关，
/// 主题为空。
pub fn parse_classification(raw: &str) -> Classification {
    match parse_model_json::<Classification>(raw) {
        Ok(classification) => classification,
        Err(failure) => Classification {
            related: failure.raw.trim().to_lowercase().starts_with("yes"),
            topics: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_no_client_fails_open() {
        let config = Config::default();
        let classifier = RelevanceClassifier::new(None, &config);

        let result = classifier.classify("Any Title", "Any abstract").await;
        assert!(result.related);
        assert!(result.topics.is_empty());
    }

    #[test]
    fn test_parse_classification_json() {
        let raw = r#"```json
{"related": true, "topics": ["医疗大模型"]}
```"#;
        let c = parse_classification(raw);
        assert!(c.related);
        assert_eq!(c.topics, vec!["医疗大模型"]);
    }

    #[test]
    fn test_parse_classification_unrelated() {
        let c = parse_classification(r#"{"related": false, "topics": []}"#);
        assert!(!c.related);
    }

    #[test]
    fn test_parse_classification_topics_optional() {
        let c = parse_classification(r#"{"related": true}"#);
        assert!(c.related);
        assert!(c.topics.is_empty());
    }

    #[test]
    fn test_heuristic_affirmative_prefix() {
        let c = parse_classification("Yes, this paper is about medical LLMs.");
        assert!(c.related);
        assert!(c.topics.is_empty());
    }

    #[test]
    fn test_heuristic_negative_text() {
        let c = parse_classification("No, unrelated.");
        assert!(!c.related);
    }
}
