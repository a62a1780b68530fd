//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    pub server: ServerConfig,
    /// Remote SPARQL endpoint configuration / 远程SPARQL端点配置
    pub sparql: SparqlConfig,
    /// Search configuration / 搜索配置
    pub search: SearchConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// How the query text travels to the endpoint / 查询发送方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestMode {
    /// Query text as request body / 请求体携带查询
    #[default]
    Post,
    /// Query text url-encoded in the query string / 查询参数携带查询
    Get,
}

/// Remote SPARQL endpoint configuration / 远程SPARQL端点配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SparqlConfig {
    /// Endpoint URL, without query string / 端点地址
    pub endpoint: String,
    /// Value sent as User-Agent / 客户端标识
    pub user_agent: String,
    /// Hard timeout for one remote call / 单次远程调用超时（秒）
    pub timeout_secs: u64,
    pub request_mode: RequestMode,
}

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Language used when the request carries none / 默认语言
    pub default_language: String,
    pub default_limit: usize,
    /// Upper bound for the `limit` parameter / limit参数上限
    pub max_limit: usize,
    /// Label/alias languages matched by country search / 国家搜索匹配的语言
    pub country_languages: Vec<String>,
    /// Label fallback languages for city search / 城市搜索标签回退语言
    pub city_languages: Vec<String>,
    /// Candidates requested from the entity search service / 实体搜索候选数量
    pub city_candidate_limit: usize,
    /// Ceiling of the remote LIMIT clause / 远程LIMIT上限
    pub city_remote_limit_max: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3031,
        }
    }
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://query.wikidata.org/sparql".to_string(),
            user_agent: "OneRoadTrip/Search/2.2 (+local; no-auth)".to_string(),
            timeout_secs: 15,
            request_mode: RequestMode::Post,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_language: "fr".to_string(),
            default_limit: 12,
            max_limit: 30,
            country_languages: ["fr", "en", "it", "es", "pt", "ar"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            city_languages: ["fr", "en", "es", "it", "pt", "ar"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            city_candidate_limit: 50,
            city_remote_limit_max: 50,
        }
    }
}

impl SparqlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl AppConfig {
    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Apply HOST / PORT environment overrides / 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::var("HOST").ok(), std::env::var("PORT").ok());
    }

    fn apply_overrides(&mut self, host: Option<String>, port: Option<String>) {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.server.host = host.trim().to_string();
        }
        if let Some(port) = port {
            match port.trim().parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    let mut config = load_config_from(&get_config_path())?;
    config.apply_env_overrides();
    Ok(config)
}

/// Load configuration from a given path / 从指定路径加载配置
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        // Load existing config / 加载现有配置
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        // Create default config / 创建默认配置
        let config = AppConfig::default();
        save_config(config_path, &config)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
pub fn save_config(config_path: &Path, config: &AppConfig) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = load_config_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.server.port, 3031);
        assert_eq!(config.sparql.timeout_secs, 15);
        assert_eq!(config.sparql.request_mode, RequestMode::Post);
        assert_eq!(config.search.country_languages.len(), 6);

        // Second load reads the file just written / 第二次读取已写入的文件
        let again = load_config_from(&path).unwrap();
        assert_eq!(again.sparql.endpoint, config.sparql.endpoint);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"sparql":{"timeout_secs":3,"request_mode":"get"}}"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.sparql.timeout_secs, 3);
        assert_eq!(config.sparql.request_mode, RequestMode::Get);
        assert_eq!(config.sparql.user_agent, "OneRoadTrip/Search/2.2 (+local; no-auth)");
        assert_eq!(config.search.default_language, "fr");
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("127.0.0.1".to_string()), Some("8080".to_string()));
        assert_eq!(config.get_bind_address(), "127.0.0.1:8080");

        config.apply_overrides(Some("  ".to_string()), Some("not-a-port".to_string()));
        assert_eq!(config.get_bind_address(), "127.0.0.1:8080");
    }
}
