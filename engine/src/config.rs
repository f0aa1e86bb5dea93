use crate::error::EngineError;
use std::env;
use std::str::FromStr;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_MONGO_URL: &str = "mongodb://localhost:27017";
const DEFAULT_DB_NAME: &str = "aura_database";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// How the document is turned into model-consumable context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStrategy {
    /// Extract plain text locally and embed it in the prompt.
    Extract,
    /// Attach the raw document bytes to the model call.
    Attach,
    /// Ask the model to segment the document into bounded chunks first.
    Chunk,
}

impl ContextStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextStrategy::Extract => "extract",
            ContextStrategy::Attach => "attach",
            ContextStrategy::Chunk => "chunk",
        }
    }
}

impl FromStr for ContextStrategy {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "extract" => Ok(ContextStrategy::Extract),
            "attach" => Ok(ContextStrategy::Attach),
            "chunk" => Ok(ContextStrategy::Chunk),
            other => Err(EngineError::Configuration(format!(
                "unknown CONTEXT_STRATEGY '{other}' (expected extract, attach or chunk)"
            ))),
        }
    }
}

/// Environment-sourced service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api_keys: Vec<String>,
    /// Shared secret for bearer auth. Absence is reported per request, not
    /// at startup.
    pub bearer_token: Option<String>,
    pub mongo_url: String,
    pub db_name: String,
    pub model: String,
    pub strategy: ContextStrategy,
    pub bind_addr: String,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, EngineError> {
        let keys_raw = env::var("GOOGLE_API_KEYS").unwrap_or_default();
        let api_keys: Vec<String> = keys_raw
            .split(',')
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect();
        if api_keys.is_empty() {
            return Err(EngineError::Configuration(
                "GOOGLE_API_KEYS is not set or empty".to_string(),
            ));
        }

        let strategy = match env::var("CONTEXT_STRATEGY") {
            Ok(raw) => raw.parse()?,
            Err(_) => ContextStrategy::Extract,
        };

        Ok(Self {
            api_keys,
            bearer_token: env::var("BEARER_TOKEN").ok().filter(|t| !t.is_empty()),
            mongo_url: env::var("MONGO_URL").unwrap_or_else(|_| DEFAULT_MONGO_URL.to_string()),
            db_name: env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string()),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            strategy,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}
