use crate::config::{Config, LLMProvider};
use clap::Parser;
use std::path::PathBuf;

/// paper-radar - 由Rust与AI驱动的arXiv学术进展报告生成器
#[derive(Parser, Debug)]
#[command(name = "paper-radar")]
#[command(
    about = "Scheduled arXiv research report pipeline. It fetches recent papers for a configured topic list, filters them for relevance with an LLM, enriches them with generated insights, and renders a static HTML report with an archive index."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 主题列表（逗号分隔）
    #[arg(short, long)]
    pub topics: Option<String>,

    /// 检索回溯天数（含当天）
    #[arg(long)]
    pub days_back: Option<u32>,

    /// 每个检索词的最大返回条数
    #[arg(long)]
    pub max_results: Option<usize>,

    /// 关键词初筛列表（逗号分隔，为空时放行所有候选）
    #[arg(long)]
    pub filter_keywords: Option<String>,

    /// 报告输出根目录
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 部署模式：运行结束后重建归档索引页
    #[arg(long)]
    pub deploy: bool,

    /// LLM Provider (openai, deepseek, moonshot, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 模型名称
    #[arg(long)]
    pub model: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 是否禁用检索词缓存
    #[arg(long)]
    pub no_cache: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            // 如果显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path).unwrap_or_else(|_| {
                panic!("⚠️ 警告: 无法读取配置文件 {:?}", config_path)
            })
        } else {
            // 如果没有显式指定配置文件，尝试从默认位置加载
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("paper-radar.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|_| {
                    panic!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}",
                        default_config_path
                    )
                })
            } else {
                // 默认配置文件不存在，使用默认值
                Config::default()
            }
        };

        // 覆盖配置文件中的设置
        if let Some(topics) = self.topics {
            config.topics = split_comma_list(&topics);
        }
        if let Some(days_back) = self.days_back {
            config.days_back = days_back;
        }
        if let Some(max_results) = self.max_results {
            config.max_results_per_query = max_results;
        }
        if let Some(filter_keywords) = self.filter_keywords {
            config.filter_keywords = split_comma_list(&filter_keywords);
        }
        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }
        if self.deploy {
            config.deploy_mode = true;
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 缓存配置
        if self.no_cache {
            config.cache.enabled = false;
        }

        // 其他配置
        if self.verbose {
            config.verbose = true;
        }

        config
    }
}

/// 逗号分隔字符串拆成去空白、无空项的列表
pub fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
