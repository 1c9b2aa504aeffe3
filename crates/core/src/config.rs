use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `ADFORGE__` and optional config files.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_num_campaigns")]
    pub num_campaigns: usize,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_version")]
    pub api_version: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_enabled")]
    pub enabled: bool,
    #[serde(default = "default_search_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_search_num_results")]
    pub num_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_image_api_host")]
    pub api_host: String,
    #[serde(default = "default_image_engine")]
    pub engine_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_image_dim")]
    pub width: u32,
    #[serde(default = "default_image_dim")]
    pub height: u32,
    #[serde(default = "default_image_steps")]
    pub steps: u32,
    #[serde(default = "default_cfg_scale")]
    pub cfg_scale: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

// Default functions
fn default_num_campaigns() -> usize {
    5
}
fn default_output_dir() -> String {
    "Outputs".to_string()
}
fn default_llm_api_base() -> String {
    "https://api.anthropic.com".to_string()
}
fn default_llm_model() -> String {
    "claude-3-sonnet-20240229".to_string()
}
fn default_llm_version() -> String {
    "2023-06-01".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_search_enabled() -> bool {
    true
}
fn default_search_api_base() -> String {
    "https://api.tavily.com".to_string()
}
fn default_search_num_results() -> usize {
    10
}
fn default_image_api_host() -> String {
    "https://api.stability.ai".to_string()
}
fn default_image_engine() -> String {
    "stable-diffusion-xl-1024-v1-0".to_string()
}
fn default_image_dim() -> u32 {
    1024
}
fn default_image_steps() -> u32 {
    10
}
fn default_cfg_scale() -> f64 {
    7.5
}
fn default_store_path() -> String {
    "data/analyses.jsonl".to_string()
}
fn default_cache_max_entries() -> usize {
    10_000
}
fn default_max_attempts() -> u32 {
    3
}
fn default_base_delay_ms() -> u64 {
    4_000
}
fn default_max_delay_ms() -> u64 {
    10_000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_llm_api_base(),
            api_key: String::new(),
            model: default_llm_model(),
            api_version: default_llm_version(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: default_search_enabled(),
            api_base: default_search_api_base(),
            api_key: String::new(),
            num_results: default_search_num_results(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_host: default_image_api_host(),
            engine_id: default_image_engine(),
            api_key: String::new(),
            width: default_image_dim(),
            height: default_image_dim(),
            steps: default_image_steps(),
            cfg_scale: default_cfg_scale(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_cache_max_entries(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            num_campaigns: default_num_campaigns(),
            output_dir: default_output_dir(),
            llm: LlmConfig::default(),
            search: SearchConfig::default(),
            image: ImageConfig::default(),
            store: StoreConfig::default(),
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ADFORGE")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
