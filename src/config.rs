use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://public-api.gamma.app/v1.0/generations";
pub const DEFAULT_PUBLIC_PROMPT_DIR: &str = "prompts/public";
pub const DEFAULT_PRIVATE_PROMPT_DIR: &str = "prompts/private";

const DEFAULT_TIMEOUT_MS: u64 = 10 * 60_000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;
const DEFAULT_RELOAD_DEBOUNCE_MS: u64 = 500;

/// Process-wide configuration, read from the environment once at startup
/// and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub public_prompt_dir: String,
    pub private_prompt_dir: String,
    pub hot_reload: bool,
    pub reload_debounce: Duration,
    pub generation_timeout: Duration,
    pub poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("GAMMA_API_KEY").unwrap_or_default(),
            base_url: env::var("GAMMA_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            public_prompt_dir: env::var("GAMMA_PROMPTS_PUBLIC_DIR")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_PROMPT_DIR.to_string()),
            private_prompt_dir: env::var("GAMMA_PROMPTS_PRIVATE_DIR")
                .unwrap_or_else(|_| DEFAULT_PRIVATE_PROMPT_DIR.to_string()),
            hot_reload: env::var("GAMMA_PROMPTS_HOT_RELOAD")
                .map(|value| value != "false")
                .unwrap_or(true),
            reload_debounce: duration_var("GAMMA_PROMPTS_DEBOUNCE_MS", DEFAULT_RELOAD_DEBOUNCE_MS),
            generation_timeout: duration_var("GAMMA_TIMEOUT_MS", DEFAULT_TIMEOUT_MS),
            poll_interval: duration_var("GAMMA_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

fn duration_var(name: &str, default_ms: u64) -> Duration {
    let ms = env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default_ms);
    Duration::from_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        // Drive defaults through duration_var directly so the test does not
        // depend on the ambient environment.
        assert_eq!(
            duration_var("GAMMA_TEST_UNSET_VAR", DEFAULT_POLL_INTERVAL_MS),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn timeout_covers_several_polls() {
        assert!(DEFAULT_TIMEOUT_MS >= 4 * DEFAULT_POLL_INTERVAL_MS);
    }
}
