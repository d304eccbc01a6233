//! 翻译模块
//!
//! 提供完整的翻译缓存与批量对账功能，采用清晰的模块化架构：
//! - **core**: 翻译服务与外部补全客户端
//! - **pipeline**: 提示词构造与批量对账
//! - **storage**: 翻译结果缓存
//! - **config**: 配置管理
//! - **error**: 错误处理
//! - **lang**: 目标语言解析
//! - **page**: 页面字符串包
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use lingocache::translation::{TranslationConfig, TranslationService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = TranslationConfig::default();
//! config.api_key = Some("sk-...".to_string());
//!
//! let service = TranslationService::new(config)?;
//! let greeting = service.translate_one("Hello", "sv").await;
//! println!("{}", greeting);
//! # Ok(())
//! # }
//! ```

/// 配置管理模块
///
/// 提供 API 配置、缓存容量、重试策略等设置
pub mod config;

/// 核心翻译模块
///
/// 包含翻译服务、补全客户端、健康检查和统计信息
pub mod core;

/// 错误处理模块
///
/// 定义翻译过程中可能出现的各种错误类型
pub mod error;

/// 目标语言模块
///
/// 语言代码解析与显示名称
pub mod lang;

/// 页面字符串包模块
///
/// 站点通用键值字符串的预翻译辅助
pub mod page;

/// 翻译管道模块
///
/// 提示词构造与批量响应对账
pub mod pipeline;

/// 存储模块
///
/// 有界 LRU 翻译缓存
pub mod storage;

// ============================================================================
// 核心API导出
// ============================================================================

/// 翻译服务的主要组件
///
/// - `TranslationService`: 主翻译服务
/// - `HealthStatus` / `HealthLevel`: 服务健康状态
/// - `ServiceStats` / `ServiceStatsSnapshot`: 服务统计信息
pub use core::{
    HealthLevel, HealthStatus, ServiceStats, ServiceStatsSnapshot, TranslationService,
};

/// 配置管理相关组件
pub use config::{constants, ConfigManager, TranslationConfig};

/// 错误处理相关类型
pub use error::{ErrorCategory, ErrorSeverity, TranslationError, TranslationResult};

/// 目标语言
pub use lang::Language;

/// 翻译结果条目及其来源
pub use pipeline::{TranslatedItem, TranslationOutcome};

/// 缓存组件
pub use storage::{CacheKey, CacheStatsSnapshot, TranslationCache};

// ============================================================================
// 便利函数导出
// ============================================================================

/// 检查翻译配置文件是否存在
pub fn config_file_exists() -> bool {
    config::config_file_exists()
}

/// 加载配置，失败时回退到默认值
pub fn load_config_or_default() -> TranslationConfig {
    config::load_config_or_default()
}
