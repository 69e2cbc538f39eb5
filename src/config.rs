use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_MODEL_PATH: &str = "models/saved_model.json";
pub const DEFAULT_SERVICE_NAME: &str = "Enterprise MLOps Prediction API";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Artifact location. Fixed for the lifetime of the process; `/model/reload`
    /// re-reads this same path.
    pub model_path: String,
    pub service_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .unwrap_or(8000),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            model: ModelConfig {
                model_path: env::var("MODEL_PATH")
                    .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string()),
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string()),
            },
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.model.model_path.trim().is_empty() {
            anyhow::bail!("MODEL_PATH must not be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("PORT must be a non-zero port number");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                log_level: "debug".to_string(),
            },
            model: ModelConfig {
                model_path: DEFAULT_MODEL_PATH.to_string(),
                service_name: DEFAULT_SERVICE_NAME.to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let config = sample();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_empty_model_path_rejected() {
        let mut config = sample();
        config.model.model_path = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = sample();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }
}
