use std::env;

use anyhow::Result;

pub const GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct GeminiProviderConfig {
    pub host: String,
}

impl GeminiProviderConfig {
    pub fn new(host: String) -> Self {
        Self { host }
    }

    /// Load configuration from environment variables, falling back to the
    /// public endpoint. The API key is supplied per submission, not here.
    pub fn from_env() -> Result<Self> {
        let host = env::var("GEMINI_HOST").unwrap_or_else(|_| GEMINI_HOST.to_string());
        Ok(Self::new(host))
    }
}

impl Default for GeminiProviderConfig {
    fn default() -> Self {
        Self::new(GEMINI_HOST.to_string())
    }
}
