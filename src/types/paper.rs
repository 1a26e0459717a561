use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// 论文记录 - 贯穿整条流水线的核心数据结构
///
/// 以arXiv分配的稳定ID作为身份标识，所有去重和查找都以它为键。
/// 增强字段（关键词、中文总结、翻译摘要）由洞察提取阶段补充，
/// 提取失败时保持为None，论文仍然继续参与分类和渲染。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paper {
    /// arXiv分配的稳定ID，去重和查找的唯一键
    pub arxiv_id: String,

    /// 论文标题
    pub title: String,

    /// 作者列表（保持原始顺序，仅姓名）
    pub authors: Vec<String>,

    /// 发表日期
    pub published: NaiveDate,

    /// 英文摘要（抓取阶段可能存储截断版本，提取阶段刷新为全文）
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// PDF直链
    pub pdf_url: String,

    /// arXiv主分类
    pub primary_category: String,

    /// 分类器分配的主题标签，兼容列表和逗号分隔字符串两种持久化格式
    #[serde(default, deserialize_with = "deserialize_topics")]
    pub topics: Vec<String>,

    /// 关键词（LLM生成，逗号分隔）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    /// 中文总结（LLM生成）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// 中文翻译摘要（LLM生成）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_cn: Option<String>,
}

/// 主题字段的持久化格式存在两种历史变体：JSON数组和逗号分隔字符串。
/// 反序列化时统一接受两者，规范化（去空白、丢弃空token）由分类阶段负责。
fn deserialize_topics<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TopicsField {
        List(Vec<String>),
        Joined(String),
    }

    match Option::<TopicsField>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(TopicsField::List(list)) => Ok(list),
        Some(TopicsField::Joined(joined)) => {
            Ok(joined.split(',').map(|t| t.to_string()).collect())
        }
    }
}

/// 检索日期窗口（日历日粒度，闭区间）
///
/// 每次运行根据days_back窗口计算一次，抓取阶段之后仅用于展示。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 以end为终点、向前回溯days_back天（含end当天）构造窗口
    pub fn ending_at(end: NaiveDate, days_back: u32) -> Self {
        let span = chrono::Days::new(days_back.saturating_sub(1) as u64);
        let start = end.checked_sub_days(span).unwrap_or(end);
        Self { start, end }
    }

    /// 日期是否落在窗口内（两端均含）
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ~ {}", self.start, self.end)
    }
}

/// 抓取/提取阶段之间落盘的论文清单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperBundle {
    pub papers: Vec<Paper>,
    pub date_range: DateRange,
}

/// 按主题标签分桶后的产出，供报告渲染消费
///
/// 桶内论文按首次归入顺序排列，桶内以arxiv_id去重。
/// 一篇论文被分到多个主题时会出现在每个对应的桶里（有意的扇出）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizedBundle {
    pub date_range: DateRange,

    #[serde(flatten)]
    pub categories: BTreeMap<String, Vec<Paper>>,
}

impl CategorizedBundle {
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            categories: BTreeMap::new(),
        }
    }

    /// 论文-主题对总数
    pub fn total_pairs(&self) -> usize {
        self.categories.values().map(|papers| papers.len()).sum()
    }
}
