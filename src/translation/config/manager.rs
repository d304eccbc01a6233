//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值。
//! 加载顺序: 配置文件 -> 环境变量覆盖 -> 校验。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译服务配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    // 基础配置
    pub enabled: bool,
    pub default_target_lang: String,

    // API 配置
    pub api_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub request_timeout_secs: u64,

    // 补全长度配置
    pub max_tokens_single: u32,
    pub max_tokens_batch: u32,

    // 缓存配置
    pub cache_capacity: usize,

    // 重试配置
    pub retry_enabled: bool,
    pub max_retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_target_lang: constants::DEFAULT_TARGET_LANG.to_string(),

            api_base_url: constants::DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            model: constants::DEFAULT_MODEL.to_string(),
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,

            max_tokens_single: constants::DEFAULT_MAX_TOKENS_SINGLE,
            max_tokens_batch: constants::DEFAULT_MAX_TOKENS_BATCH,

            cache_capacity: constants::DEFAULT_CACHE_CAPACITY,

            retry_enabled: true,
            max_retry_attempts: constants::DEFAULT_MAX_RETRY_ATTEMPTS,
            retry_delay_ms: constants::DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl TranslationConfig {
    /// 创建带指定目标语言的默认配置
    pub fn default_with_lang(target_lang: &str) -> Self {
        Self {
            default_target_lang: target_lang.to_string(),
            ..Self::default()
        }
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.default_target_lang.trim().is_empty() {
            return Err(TranslationError::ConfigError(
                "默认目标语言不能为空".to_string(),
            ));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(TranslationError::ConfigError(format!(
                "API 基础地址必须以 http:// 或 https:// 开头: {}",
                self.api_base_url
            )));
        }

        if self.model.trim().is_empty() {
            return Err(TranslationError::ConfigError("模型名称不能为空".to_string()));
        }

        if self.request_timeout_secs == 0 {
            return Err(TranslationError::ConfigError(
                "请求超时必须大于0".to_string(),
            ));
        }

        if self.max_tokens_single == 0 || self.max_tokens_batch == 0 {
            return Err(TranslationError::ConfigError(
                "补全长度上限必须大于0".to_string(),
            ));
        }

        if self.cache_capacity == 0 {
            return Err(TranslationError::ConfigError(
                "缓存容量必须大于0".to_string(),
            ));
        }

        if self.retry_enabled && self.max_retry_attempts == 0 {
            return Err(TranslationError::ConfigError(
                "启用重试时重试次数不能为0".to_string(),
            ));
        }

        Ok(())
    }

    /// 应用环境变量覆盖（使用类型安全环境变量系统）
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{cache, translation, EnvVar};

        if let Ok(enabled) = translation::Enabled::get() {
            self.enabled = enabled;
        }

        if let Ok(target_lang) = translation::DefaultTargetLang::get() {
            self.default_target_lang = target_lang;
        }

        if let Ok(base_url) = translation::ApiBaseUrl::get() {
            tracing::info!("环境变量覆盖 API 基础地址: {}", base_url);
            self.api_base_url = base_url;
        }

        if let Ok(api_key) = translation::ApiKey::get() {
            self.api_key = Some(api_key);
        }

        if let Ok(model) = translation::Model::get() {
            self.model = model;
        }

        if let Ok(timeout) = translation::RequestTimeout::get() {
            self.request_timeout_secs = timeout.as_secs();
        }

        if let Ok(retry_enabled) = translation::RetryEnabled::get() {
            self.retry_enabled = retry_enabled;
        }

        if let Ok(attempts) = translation::MaxRetryAttempts::get() {
            self.max_retry_attempts = attempts;
        }

        if let Ok(delay) = translation::RetryDelayMs::get() {
            self.retry_delay_ms = delay;
        }

        if let Ok(capacity) = cache::Capacity::get() {
            self.cache_capacity = capacity;
        }
    }

    /// 转换为Duration类型
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> TranslationResult<Self> {
        let mut config = Self::load_config()?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslationConfig {
        &self.config
    }

    /// 从文件加载配置
    fn load_config() -> TranslationResult<TranslationConfig> {
        // 首先尝试加载 .env 文件
        Self::load_dotenv();

        // 查找配置文件
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &str) -> TranslationResult<TranslationConfig> {
        if path.ends_with(".toml") {
            let content = std::fs::read_to_string(path)
                .map_err(|e| TranslationError::ConfigError(format!("读取配置文件失败: {}", e)))?;
            Ok(toml::from_str(&content)?)
        } else {
            // 其他格式交给 config 库按扩展名识别
            let settings = config::Config::builder()
                .add_source(config::File::from(Path::new(path)))
                .build()?;
            Ok(settings.try_deserialize()?)
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env.development", ".env.production", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() {
                if dotenv::from_filename(env_file).is_ok() {
                    tracing::info!("已加载环境变量文件: {}", env_file);
                    break;
                }
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> TranslationResult<()> {
        let config = TranslationConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
