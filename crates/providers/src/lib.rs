//! HTTP clients for the external generation capabilities: text generation,
//! web search, and text-to-image rendering.

pub mod anthropic;
pub mod stability;
pub mod tavily;

pub use anthropic::AnthropicClient;
pub use stability::StabilityClient;
pub use tavily::TavilyClient;
