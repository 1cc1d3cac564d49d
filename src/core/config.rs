use std::env;

use crate::chat::prompt::SYSTEM_PROMPT;
use crate::dashscope::GenerationParams;

/// Number of prior turns included in each model request when
/// `TUTOR_CONTEXT_WINDOW` is not set.
pub const DEFAULT_CONTEXT_WINDOW: usize = 5;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub system_prompt: String,
    pub context_window: usize,
    pub generation: GenerationParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        // The deployment secret store injects the key as a process
        // environment variable; locally it comes from the `.env` file
        // loaded at startup. An absent key is passed through as-is and
        // fails at the first provider call with an auth error.
        let api_key = env::var("DASHSCOPE_API_KEY").unwrap_or_default();
        let api_url = env::var("TUTOR_API_URL")
            .unwrap_or_else(|_| "https://dashscope.aliyuncs.com".to_string());
        let model = env::var("TUTOR_MODEL").unwrap_or_else(|_| "qwen-vl-max".to_string());
        let system_prompt =
            env::var("TUTOR_SYSTEM_PROMPT").unwrap_or_else(|_| SYSTEM_PROMPT.to_string());
        let context_window = env::var("TUTOR_CONTEXT_WINDOW")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CONTEXT_WINDOW);

        Self {
            api_key,
            api_url,
            model,
            system_prompt,
            context_window,
            generation: GenerationParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_and_window() {
        let config = AppConfig::default();
        assert_eq!(config.model, "qwen-vl-max");
        assert_eq!(config.context_window, DEFAULT_CONTEXT_WINDOW);
        assert!(config.api_url.starts_with("https://dashscope"));
    }

    #[test]
    fn test_default_system_prompt_is_tutor_persona() {
        let config = AppConfig::default();
        assert!(config.system_prompt.contains("Socratic"));
    }
}
