pub mod arxiv;
pub mod cache;
pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::launch;
