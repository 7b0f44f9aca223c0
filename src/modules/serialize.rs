use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;

/// Application configuration, `webstack.toml`.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub spider: SpiderConfig,
    pub browser: BrowserConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SpiderConfig {
    pub user_agents: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            user_agents: Vec::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    /// Window height used when a breakpoint picks the width.
    pub panel_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            panel_height: 800,
        }
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&text)?;
    Ok(config)
}

pub fn save_config(path: &str, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let toml_str = toml::to_string_pretty(config)?;
    fs::write(path, toml_str)?;
    Ok(())
}

/// Load `path`, falling back to defaults when the file does not exist.
pub fn load_config_or_default(path: &str) -> Result<AppConfig, Box<dyn Error>> {
    match load_config(path) {
        Ok(config) => Ok(config),
        Err(err) if is_not_found(&err) => Ok(AppConfig::default()),
        Err(err) => Err(err),
    }
}

pub fn is_not_found(err: &Box<dyn Error>) -> bool {
    err.downcast_ref::<std::io::Error>()
        .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_the_rest_with_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [spider]
            user_agents = ["agent-a"]
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.spider.user_agents, vec!["agent-a"]);
        assert_eq!(config.spider.timeout_secs, 10);
        assert_eq!(config.browser.webdriver_url, "http://localhost:4444");
        assert_eq!(config.browser.panel_height, 800);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let mut path = std::env::temp_dir();
        path.push("webstack_no_such_config.toml");
        let config = load_config_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let mut path = std::env::temp_dir();
        path.push("webstack_bad_config.toml");
        fs::write(&path, "server = \"nope\"").unwrap();
        assert!(load_config(path.to_str().unwrap()).is_err());
        let _ = fs::remove_file(&path);
    }
}
