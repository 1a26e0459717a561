pub mod client;
pub mod prompts;
pub mod retry;

pub use client::LLMClient;
