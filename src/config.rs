use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    /// `None` when no API key is set; summaries are then unavailable.
    pub ai: Option<AiConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = value("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_path = value("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let ai = value("GEMINI_API_KEY")
            .or_else(|| value("GOOGLE_API_KEY"))
            .map(|api_key| AiConfig {
                api_key,
                model: value("DAILYTRAC_AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: value("DAILYTRAC_AI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
            });

        Self {
            port,
            data_path,
            ai,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/state.json"));
        assert!(config.ai.is_none());
    }

    #[test]
    fn bad_port_falls_back() {
        assert_eq!(config(&[("PORT", "http")]).port, 8080);
        assert_eq!(config(&[("PORT", "9090")]).port, 9090);
    }

    #[test]
    fn api_key_enables_summaries() {
        let config = config(&[
            ("GOOGLE_API_KEY", "google"),
            ("DAILYTRAC_AI_BASE_URL", "http://127.0.0.1:9999"),
        ]);
        let ai = config.ai.unwrap();
        assert_eq!(ai.api_key, "google");
        assert_eq!(ai.model, "gemini-2.0-flash");
        assert_eq!(ai.base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn gemini_key_wins_and_blank_is_unset() {
        let ai = config(&[("GEMINI_API_KEY", "gemini"), ("GOOGLE_API_KEY", "google")])
            .ai
            .unwrap();
        assert_eq!(ai.api_key, "gemini");
        assert!(config(&[("GEMINI_API_KEY", "  ")]).ai.is_none());
    }
}
