//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, TranslationConfig};

/// 配置常量
pub mod constants {
    // 默认API设置
    pub const DEFAULT_API_BASE_URL: &str = "https://api.anthropic.com/v1";
    pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    // 补全长度上限
    pub const DEFAULT_MAX_TOKENS_SINGLE: u32 = 1024;
    pub const DEFAULT_MAX_TOKENS_BATCH: u32 = 4096;

    // 缓存设置
    pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

    // 重试设置
    pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 3;
    pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

    // 默认目标语言
    pub const DEFAULT_TARGET_LANG: &str = "sv";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "lingocache.toml",
        "config.toml",
        ".lingocache.toml",
        "~/.config/lingocache/config.toml",
        "/etc/lingocache/config.toml",
    ];
}

/// 便利函数
pub fn config_file_exists() -> bool {
    constants::CONFIG_PATHS
        .iter()
        .any(|path| std::path::Path::new(shellexpand::tilde(path).as_ref()).exists())
}

/// 加载配置，失败时回退到默认值
pub fn load_config_or_default() -> TranslationConfig {
    match ConfigManager::new() {
        Ok(manager) => manager.get_config().clone(),
        Err(e) => {
            tracing::warn!("配置加载失败，使用默认配置: {}", e);
            TranslationConfig::default()
        }
    }
}
