//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::{Result, anyhow};

use crate::config::LLMConfig;

mod providers;
pub mod utils;

use providers::ProviderClient;

/// LLM客户端 - 提供统一的单轮对话接口
///
/// 重试与兜底策略由调用方通过[`crate::llm::retry::call_with_retry`]控制，
/// 这里只负责发起一次请求。
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// 单轮对话，返回模型的原始文本响应
    ///
    /// 空响应视为错误，交由调用方的重试逻辑处理。
    pub async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let agent = self
            .client
            .create_agent(&self.config.model, system_prompt, &self.config);

        let response = agent.prompt(user_prompt).await?;
        if response.trim().is_empty() {
            return Err(anyhow!("模型返回了空响应"));
        }
        Ok(response)
    }
}
