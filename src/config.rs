//! Configuration management for the Glossa server

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub corpus: CorpusConfig,
    pub assist: AssistConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    /// Base URL of the upstream corpus provider
    pub base_url: String,
    /// Body cache capacity (documents)
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistConfig {
    /// Gemini is used when a key is set, the local Ollama otherwise
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub ollama_url: String,
    pub ollama_model: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: "sqlite:./glossa.db".to_string(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        CorpusConfig {
            base_url: "http://localhost:8080".to_string(),
            cache_capacity: 64,
        }
    }
}

impl Default for AssistConfig {
    fn default() -> Self {
        AssistConfig {
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2:1b".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            corpus: CorpusConfig::default(),
            assist: AssistConfig::default(),
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./glossa.db".to_string()),
            },
            corpus: CorpusConfig {
                base_url: env::var("CORPUS_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080".to_string()),
                cache_capacity: env::var("CORPUS_CACHE_CAPACITY")
                    .unwrap_or_else(|_| "64".to_string())
                    .parse()
                    .unwrap_or(64),
            },
            assist: AssistConfig {
                gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
                gemini_model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
                ollama_url: env::var("OLLAMA_HOST")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                ollama_model: env::var("OLLAMA_MODEL")
                    .unwrap_or_else(|_| "llama3.2:1b".to_string()),
            },
        }
    }
}
