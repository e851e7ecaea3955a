//! Runtime configuration.
//!
//! Built once at startup and passed by reference to every stage. Values come
//! from the process environment, after loading a `.env` file from the
//! working directory if one exists.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OPENROUTER_API_KEY` | required |
//! | `LLM_MODEL_NAME` | `meta-llama/llama-3.3-70b-instruct:free` |
//! | `LLM_TEMPERATURE` | `0.1` |
//! | `MAX_CHUNK_SIZE` | `4000` |
//! | `DELAY_BETWEEN_CHUNKS` | `2` seconds |
//! | `DELAY_BETWEEN_RATIOS` | `5` seconds |
//! | `OPENROUTER_BASE_URL` | `https://openrouter.ai/api/v1` |
//! | `LLM_REQUEST_TIMEOUT` | `120` seconds |
//!
//! Optional values that fail to parse fall back to their default with a
//! warning. Only a missing API key is fatal.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::{ChunkCapacity, Error, Result};

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
/// Default OpenRouter endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

const DEFAULT_CHUNK_DELAY_SECS: u64 = 2;
const DEFAULT_RATIO_DELAY_SECS: u64 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Everything a run needs to know besides its input.
#[derive(Clone)]
pub struct Config {
    /// OpenRouter API key.
    pub api_key: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Chunk size ceiling.
    pub capacity: ChunkCapacity,
    /// Pause between consecutive chunk requests.
    pub chunk_delay: Duration,
    /// Pause between ratio passes when running every ratio.
    pub ratio_delay: Duration,
    /// Chat completions base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Config {
    /// Load from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        // A missing .env is normal; real environment variables still apply.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("OPENROUTER_API_KEY").ok_or(Error::MissingConfig("OPENROUTER_API_KEY"))?;

        let model = get("LLM_MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = parse_or_default(
            "LLM_TEMPERATURE",
            get("LLM_TEMPERATURE"),
            DEFAULT_TEMPERATURE,
            |t: &f32| t.is_finite() && *t >= 0.0,
        );

        let max_chunk = parse_or_default(
            "MAX_CHUNK_SIZE",
            get("MAX_CHUNK_SIZE"),
            ChunkCapacity::DEFAULT_MAX,
            |n: &usize| *n > 0,
        );
        let capacity = ChunkCapacity::new(max_chunk)?;

        let chunk_delay = parse_or_default(
            "DELAY_BETWEEN_CHUNKS",
            get("DELAY_BETWEEN_CHUNKS"),
            DEFAULT_CHUNK_DELAY_SECS,
            |_| true,
        );
        let ratio_delay = parse_or_default(
            "DELAY_BETWEEN_RATIOS",
            get("DELAY_BETWEEN_RATIOS"),
            DEFAULT_RATIO_DELAY_SECS,
            |_| true,
        );
        let timeout = parse_or_default(
            "LLM_REQUEST_TIMEOUT",
            get("LLM_REQUEST_TIMEOUT"),
            DEFAULT_TIMEOUT_SECS,
            |n: &u64| *n > 0,
        );

        let base_url = get("OPENROUTER_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            model,
            temperature,
            capacity,
            chunk_delay: Duration::from_secs(chunk_delay),
            ratio_delay: Duration::from_secs(ratio_delay),
            base_url,
            request_timeout: Duration::from_secs(timeout),
        })
    }

    /// Log the effective settings. The API key is never printed.
    pub fn log_summary(&self) {
        info!(
            model = %self.model,
            temperature = self.temperature,
            max_chunk_size = self.capacity.max(),
            chunk_delay_secs = self.chunk_delay.as_secs(),
            ratio_delay_secs = self.ratio_delay.as_secs(),
            "configuration loaded"
        );
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("capacity", &self.capacity)
            .field("chunk_delay", &self.chunk_delay)
            .field("ratio_delay", &self.ratio_delay)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr + fmt::Display + Copy,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            warn!("invalid {key} '{raw}', using default value of {default}");
            default
        }
    }
}
