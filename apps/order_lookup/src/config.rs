use std::{fs, path::Path, time::Duration};

pub const CONFIG_FILE: &str = "order_lookup.toml";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const CONFIG_SOURCE: &str = "config file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the config file, then the environment. Later layers win.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match raw.parse::<toml::Table>() {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("base_url").and_then(toml::Value::as_str) {
                    settings.base_url = v.to_string();
                }
                match file_cfg.get("request_timeout_secs") {
                    Some(toml::Value::Integer(secs)) => match u64::try_from(*secs) {
                        Ok(secs) => settings.request_timeout_secs = Some(secs),
                        Err(_) => warn_invalid_timeout(CONFIG_SOURCE, &secs.to_string()),
                    },
                    Some(toml::Value::String(v)) => apply_timeout(&mut settings, CONFIG_SOURCE, v),
                    Some(other) => warn_invalid_timeout(CONFIG_SOURCE, &other.to_string()),
                    None => {}
                }
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring unreadable config file")
            }
        }
    }

    if let Some(v) = env("ORDER_LOOKUP_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        apply_timeout(&mut settings, "APP__REQUEST_TIMEOUT_SECS", &v);
    }

    settings.base_url = normalize_base_url(&settings.base_url);
    settings
}

fn apply_timeout(settings: &mut Settings, source: &str, raw: &str) {
    match raw.trim().parse::<u64>() {
        Ok(parsed) => settings.request_timeout_secs = Some(parsed),
        Err(_) => warn_invalid_timeout(source, raw),
    }
}

fn warn_invalid_timeout(source: &str, value: &str) {
    tracing::warn!(
        source,
        value,
        "ignoring request_timeout_secs; expected a non-negative number of seconds"
    );
}

pub fn normalize_base_url(raw_base_url: &str) -> String {
    let trimmed = raw_base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
