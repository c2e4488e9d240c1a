use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: HTTP 宿主地址与端口
/// - storage: 存储后端（memory / file）
/// - links: 短码生成、有效期与批量限制
/// - clicks: 点击缓冲与刷盘
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub links: LinkConfig,
    #[serde(default)]
    pub clicks: ClickConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config file > 默认值
    /// ENV 前缀：LAPSE，分隔符：__
    /// 示例：LAPSE__SERVER__PORT=9999
    pub fn load(path: &str) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] {}", e);
                Self::default()
            }
        }
    }

    /// Like [`StaticConfig::load`] but reports failures instead of falling
    /// back to defaults.
    pub fn try_load(path: &str) -> Result<Self, String> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("LAPSE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| format!("Failed to build config: {}", e))?;

        settings
            .try_deserialize::<StaticConfig>()
            .map_err(|e| format!("Failed to deserialize config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// "memory" or "file"
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// JSON document used by the file backend
    #[serde(default = "default_storage_path")]
    pub path: String,
}

/// 短链接规则
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Prefix used to build the short link returned by create
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_validity_minutes")]
    pub default_validity_minutes: i64,
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: usize,
}

/// 点击记录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickConfig {
    /// Periodic flush interval of the server host, 0 disables it
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
    /// Buffered events that trigger an early flush
    #[serde(default = "default_max_buffered_clicks")]
    pub max_buffered_clicks: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

fn default_storage_path() -> String {
    "lapselink.json".to_string()
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_code_length() -> usize {
    6
}

fn default_validity_minutes() -> i64 {
    30
}

fn default_max_batch() -> usize {
    5
}

fn default_max_generation_attempts() -> usize {
    100
}

fn default_flush_interval_secs() -> u64 {
    5
}

fn default_max_buffered_clicks() -> usize {
    64
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: default_storage_path(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            code_length: default_code_length(),
            default_validity_minutes: default_validity_minutes(),
            max_batch: default_max_batch(),
            max_generation_attempts: default_max_generation_attempts(),
        }
    }
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: default_flush_interval_secs(),
            max_buffered_clicks: default_max_buffered_clicks(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_link_rules() {
        let config = StaticConfig::default();
        assert_eq!(config.links.default_validity_minutes, 30);
        assert_eq!(config.links.max_batch, 5);
        assert_eq!(config.links.code_length, 6);
        assert_eq!(config.storage.backend, "memory");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str("[links]\nmax_batch = 10\n").unwrap();
        assert_eq!(parsed.links.max_batch, 10);
        assert_eq!(parsed.links.default_validity_minutes, 30);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = StaticConfig::default();
        config.server.port = 9100;
        config.save_to_file(&path).unwrap();

        let loaded = StaticConfig::try_load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.server.port, 9100);
    }
}
