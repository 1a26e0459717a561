//! 模型响应的规范化与解析
//!
//! 模型返回的JSON经常被markdown代码围栏包裹，有时带语言标注。
//! 围栏剥离是显式的规范化步骤，先于解析执行，不与业务逻辑交织；
//! 解析结果带标签返回，失败分支保留原始文本供调用方决定兜底策略。

use serde::de::DeserializeOwned;

/// 解析失败，携带模型的原始响应文本
#[derive(Debug)]
pub struct ParseFailure {
    pub raw: String,
    pub error: serde_json::Error,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "模型响应JSON解析失败: {}", self.error)
    }
}

impl std::error::Error for ParseFailure {}

/// 剥离可选的markdown代码围栏（兼容```json等语言标注）
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // 围栏首行可能是语言标注，一并丢弃
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => return trimmed,
    };

    match body.trim_end().strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => body.trim(),
    }
}

/// 规范化后解析模型响应为指定的JSON形状
pub fn parse_model_json<T>(raw: &str) -> Result<T, ParseFailure>
where
    T: DeserializeOwned,
{
    let normalized = strip_code_fences(raw);
    serde_json::from_str::<T>(normalized).map_err(|error| ParseFailure {
        raw: raw.to_string(),
        error,
    })
}
