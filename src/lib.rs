//! # Lingocache Library
//!
//! 翻译缓存与批量对账层：把英文站点文案翻译成北欧语言，
//! 通过有界 LRU 缓存和批量请求合并控制外部补全服务的调用成本。
//!
//! ## 模块组织
//!
//! - `translation` - 翻译服务、缓存、批量对账与配置
//! - `env` - 类型安全的环境变量定义
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use lingocache::{TranslationConfig, TranslationService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = TranslationConfig::default();
//! config.api_key = Some("sk-...".to_string());
//!
//! let service = TranslationService::new(config)?;
//! let texts = service
//!     .translate_many(&["Hello".to_string(), "World".to_string()], "da")
//!     .await;
//! println!("{:?}", texts);
//! # Ok(())
//! # }
//! ```

pub mod env;
pub mod translation;

// Re-export commonly used items for convenience
pub use translation::{
    HealthLevel, HealthStatus, Language, TranslatedItem, TranslationCache, TranslationConfig,
    TranslationError, TranslationOutcome, TranslationResult, TranslationService,
};
