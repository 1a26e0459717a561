//! 提示词模板
//!
//! 所有模板都要求模型返回单轮、JSON形状的回复，不使用流式输出。

/// 通用系统提示词
pub const SYSTEM_PROMPT: &str =
    "你是一个严谨的学术论文分析助手。始终只输出要求的JSON内容，不要附加解释。";

/// 检索词生成：根据主题列表生成适合arXiv检索的英文检索词
pub fn search_terms_prompt(topics: &[String]) -> String {
    format!(
        r#"请为以下研究主题生成一组arXiv检索词。

研究主题：{topics}

要求：
1. 生成5到8个英文检索词，覆盖全部主题
2. 固定短语使用英文双引号包裹，例如 "large language model"
3. 检索词之间不要重复

请返回包含以下字段的JSON：
{{
    "search_terms": ["检索词1", "检索词2"]
}}"#,
        topics = topics.join("、")
    )
}

/// 相关性判断：论文是否属于配置的主题，属于哪些主题
pub fn topic_related_prompt(topics: &[String], title: &str, abstract_text: &str) -> String {
    let topic_lines: String = topics
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}\n", i + 1, t))
        .collect();

    format!(
        r#"判断以下论文是否与给定主题相关。

论文标题：{title}
论文摘要：{abstract_text}

只判断是否属于以下主题之一：
{topic_lines}
请返回包含以下字段的JSON：
{{
    "related": true或false,
    "topics": ["命中的主题名称，未命中时为空数组"]
}}"#
    )
}

/// 洞察提取：关键词、中文总结、翻译摘要
pub fn extract_insights_prompt(title: &str, abstract_text: &str) -> String {
    format!(
        r#"请分析以下论文信息，返回JSON格式：

论文标题：{title}
论文摘要：{abstract_text}

请返回包含以下字段的JSON：
{{
    "keywords": "关键词1, 关键词2, 关键词3（3-5个，用逗号分隔）",
    "summary": "100字以内的中文总结",
    "abstract_cn": "将摘要翻译成中文，保留专业术语的英文并用括号标注"
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_terms_prompt_embeds_topics() {
        let topics = vec!["医疗大模型".to_string(), "医疗智能体".to_string()];
        let prompt = search_terms_prompt(&topics);
        assert!(prompt.contains("医疗大模型、医疗智能体"));
        assert!(prompt.contains("search_terms"));
    }

    #[test]
    fn test_topic_related_prompt_lists_topics() {
        let topics = vec!["医疗大模型".to_string(), "医疗数据集".to_string()];
        let prompt = topic_related_prompt(&topics, "Some Title", "Some abstract");
        assert!(prompt.contains("1. 医疗大模型"));
        assert!(prompt.contains("2. 医疗数据集"));
        assert!(prompt.contains("Some Title"));
        assert!(prompt.contains("\"related\""));
    }

    #[test]
    fn test_extract_insights_prompt_fields() {
        let prompt = extract_insights_prompt("T", "A");
        assert!(prompt.contains("keywords"));
        assert!(prompt.contains("summary"));
        assert!(prompt.contains("abstract_cn"));
    }
}
