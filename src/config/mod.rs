use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// LLM Provider类型（仅保留OpenAI兼容的chat-completion服务）
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
///
/// 每个流水线阶段都通过显式传入的配置工作，不直接读取环境变量；
/// 唯一例外是LLM API KEY的缺省值取自OPENAI_API_KEY。
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 主题列表，分类和报告分章的依据
    pub topics: Vec<String>,

    /// 检索回溯天数（含当天）
    pub days_back: u32,

    /// 每个检索词的最大返回条数
    pub max_results_per_query: usize,

    /// 关键词初筛列表，为空时初筛放行所有候选
    pub filter_keywords: Vec<String>,

    /// 固定检索词列表，非空时跳过LLM检索词生成
    pub search_terms: Vec<String>,

    /// 报告输出根目录，每次运行写入其下的YYYY/MM/DD子目录
    pub output_path: PathBuf,

    /// 部署模式：运行结束后重建归档索引页
    pub deploy_mode: bool,

    /// 是否启用详细日志
    pub verbose: bool,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 检索词缓存配置
    pub cache: CacheConfig,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY，为空表示未配置模型（分类阶段fail-open）
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 模型名称
    pub model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,
}

/// 检索词缓存配置
///
/// 缓存以主题列表字符串的精确值为键，主题不变则无限期复用，没有TTL。
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,

    /// 缓存目录
    pub cache_dir: PathBuf,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 主题列表的精确字符串形式，作为检索词缓存的键
    pub fn topics_key(&self) -> String {
        self.topics.join(",")
    }

    /// 是否配置了可用的模型客户端
    pub fn llm_configured(&self) -> bool {
        !self.llm.api_key.trim().is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topics: vec![
                "医疗大模型".to_string(),
                "医疗数据集".to_string(),
                "医疗智能体".to_string(),
            ],
            days_back: 7,
            max_results_per_query: 50,
            filter_keywords: vec![],
            search_terms: vec![],
            output_path: PathBuf::from("./docs"),
            deploy_mode: false,
            verbose: false,
            llm: LLMConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model: String::from("gpt-4o-mini"),
            max_tokens: 8192,
            temperature: 0.1,
            retry_attempts: 2,
            retry_delay_ms: 0,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from(".paper-radar/cache"),
        }
    }
}
