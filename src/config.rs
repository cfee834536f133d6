//! Startup configuration read from the environment

use crate::llm::LlmConfig;
use crate::state_machine::AnswerStyle;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub port: u16,
    pub answer_style: AnswerStyle,
    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("Data.csv"),
            port: 8000,
            answer_style: AnswerStyle::Plain,
            llm: LlmConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset or unparsable values fall back to defaults
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let answer_style = match lookup("FAQ_ANSWER_STYLE") {
            Some(raw) => AnswerStyle::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Unknown FAQ_ANSWER_STYLE, using plain");
                AnswerStyle::Plain
            }),
            None => defaults.answer_style,
        };

        Self {
            data_path: lookup("FAQ_DATA_PATH").map_or(defaults.data_path, PathBuf::from),
            port: lookup("FAQ_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            answer_style,
            llm: LlmConfig::from_lookup(&lookup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.data_path, PathBuf::from("Data.csv"));
        assert_eq!(config.port, 8000);
        assert_eq!(config.answer_style, AnswerStyle::Plain);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("FAQ_DATA_PATH", "/srv/faq.csv"),
            ("FAQ_PORT", "9090"),
            ("FAQ_ANSWER_STYLE", "explained"),
        ]));
        assert_eq!(config.data_path, PathBuf::from("/srv/faq.csv"));
        assert_eq!(config.port, 9090);
        assert_eq!(config.answer_style, AnswerStyle::Explained);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("FAQ_PORT", "not-a-port"),
            ("FAQ_ANSWER_STYLE", "loud"),
        ]));
        assert_eq!(config.port, 8000);
        assert_eq!(config.answer_style, AnswerStyle::Plain);
    }

    #[test]
    fn test_llm_settings_come_from_same_source() {
        let config = AppConfig::from_lookup(lookup(&[
            ("FAQ_LLM_BASE_URL", "http://localhost:8080"),
            ("FAQ_LLM_TIMEOUT_SECS", "12"),
        ]));
        assert_eq!(config.llm.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.llm.timeout, std::time::Duration::from_secs(12));

        let config = AppConfig::from_lookup(lookup(&[]));
        assert!(config.llm.base_url.is_none());
    }
}
