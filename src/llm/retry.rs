//! 有界重试辅助
//!
//! 三处模型调用点（检索词生成、相关性分类、洞察提取）共享同一套
//! 重试循环，只在耗尽后的兜底策略上不同：致命传播、fail-open、空结果。

use anyhow::Result;
use std::future::Future;

/// 重试耗尽后的兜底策略
pub enum Fallback<T> {
    /// 传播最后一次错误，终止整次运行
    Fatal,
    /// 以给定值兜底继续
    Value(T),
}

/// 通用有界重试：每次失败记录日志，耗尽后按兜底策略收场
///
/// `attempts`为总尝试次数（至少执行一次），`delay_ms`为两次尝试间的
/// 固定等待，0表示立即重试。
pub async fn call_with_retry<T, F, Fut>(
    log_tag: &str,
    attempts: u32,
    delay_ms: u64,
    fallback: Fallback<T>,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    let mut last_err = None;

    for attempt in 1..=attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                eprintln!(
                    "❌ [{}] 调用模型服务出错 (第 {} / {} 次尝试): {}",
                    log_tag, attempt, attempts, err
                );
                last_err = Some(err);
                if attempt < attempts && delay_ms > 0 {
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    match fallback {
        Fallback::Fatal => {
            Err(last_err.unwrap_or_else(|| anyhow::anyhow!("[{}] 重试耗尽", log_tag)))
        }
        Fallback::Value(value) => {
            eprintln!("⚠️ [{}] 重试耗尽，使用兜底结果继续", log_tag);
            Ok(value)
        }
    }
}
