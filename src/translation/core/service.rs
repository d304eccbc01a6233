//! 翻译服务核心实现
//!
//! 对外的统一入口，组合缓存、批量调和器和外部补全客户端。
//! 所有公开方法都是软失败的：外部服务不可用时返回源文本，
//! 调用方永远不需要处理翻译错误。
//!
//! ## 主要组件
//!
//! - `TranslationService`: 主服务对象，可放入 `Arc` 在多任务间共享
//! - `ServiceStats`: 线程安全的统计信息收集器
//! - `HealthStatus`: 服务健康状态报告

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Instant;

use tracing::info;

use crate::translation::{
    config::TranslationConfig,
    core::client::{AnthropicClient, CompletionBackend},
    error::TranslationResult,
    lang::Language,
    pipeline::batch::{BatchReconciler, ReconcilerStatsSnapshot, TranslatedItem, TranslationOutcome},
    storage::cache::{CacheStatsSnapshot, TranslationCache},
};

/// 统一的翻译服务
///
/// 持有进程内唯一的翻译缓存和批量调和器。服务自身不保存可变
/// 状态，所有方法接受 `&self`，可以通过 `Arc` 在并发任务间共享。
pub struct TranslationService {
    /// 生效的配置副本
    config: TranslationConfig,

    /// 翻译结果缓存，由服务独占创建，初始为空
    cache: Arc<TranslationCache>,

    /// 批量调和器，负责缓存未命中条目的外部翻译与结果对位
    reconciler: BatchReconciler,

    /// 服务级统计信息
    stats: ServiceStats,
}

impl TranslationService {
    /// 根据配置创建翻译服务
    ///
    /// 使用真实的 Anthropic 客户端作为补全后端。配置无效或缺少
    /// API 密钥时返回配置错误。
    pub fn new(config: TranslationConfig) -> TranslationResult<Self> {
        config.validate()?;
        let backend: Arc<dyn CompletionBackend> = Arc::new(AnthropicClient::new(&config)?);
        Ok(Self::with_backend(config, backend))
    }

    /// 使用指定补全后端创建翻译服务
    ///
    /// 这是依赖注入的接缝，测试通过它注入可编程的模拟后端。
    pub fn with_backend(config: TranslationConfig, backend: Arc<dyn CompletionBackend>) -> Self {
        let cache = Arc::new(TranslationCache::new(config.cache_capacity));
        let reconciler = BatchReconciler::new(
            Arc::clone(&cache),
            backend,
            config.max_tokens_single,
            config.max_tokens_batch,
        );

        info!(
            model = %config.model,
            cache_capacity = config.cache_capacity,
            "翻译服务已创建"
        );

        Self {
            config,
            cache,
            reconciler,
            stats: ServiceStats::default(),
        }
    }

    /// 翻译单条文本
    ///
    /// 空白文本和英语/缺失语言代码原样返回。翻译失败时返回源文本。
    pub async fn translate_one(&self, text: &str, lang_code: &str) -> String {
        self.translate_one_detailed(text, lang_code).await.text
    }

    /// 翻译单条文本并报告路径
    pub async fn translate_one_detailed(&self, text: &str, lang_code: &str) -> TranslatedItem {
        let start = Instant::now();
        self.stats.inc_requests();

        let item = match Language::resolve(lang_code) {
            None => TranslatedItem {
                text: text.to_string(),
                outcome: TranslationOutcome::Passthrough,
            },
            Some(_) if text.trim().is_empty() => TranslatedItem {
                text: text.to_string(),
                outcome: TranslationOutcome::Passthrough,
            },
            Some(lang) => self.reconciler.translate_single(text, lang).await,
        };

        self.stats.record_outcome(item.outcome);
        self.stats.add_processing_time(start.elapsed());
        item
    }

    /// 批量翻译
    ///
    /// 返回与输入等长、位置一一对应的译文列表。任何失败条目
    /// 降级为源文本。
    pub async fn translate_many(&self, texts: &[String], lang_code: &str) -> Vec<String> {
        self.translate_many_detailed(texts, lang_code)
            .await
            .into_iter()
            .map(|item| item.text)
            .collect()
    }

    /// 批量翻译并逐条报告路径
    pub async fn translate_many_detailed(
        &self,
        texts: &[String],
        lang_code: &str,
    ) -> Vec<TranslatedItem> {
        let start = Instant::now();
        self.stats.inc_requests();

        if texts.is_empty() {
            return Vec::new();
        }

        let items = match Language::resolve(lang_code) {
            None => texts
                .iter()
                .map(|text| TranslatedItem {
                    text: text.clone(),
                    outcome: TranslationOutcome::Passthrough,
                })
                .collect(),
            Some(lang) => self.reconciler.translate_batch(texts, lang).await,
        };

        for item in &items {
            self.stats.record_outcome(item.outcome);
        }
        self.stats.add_processing_time(start.elapsed());
        items
    }

    /// 按键批量翻译
    ///
    /// 接受有序的（键，文本）对，返回键到译文的映射。底层复用
    /// 批量翻译路径，重复键以后出现的为准。
    pub async fn translate_keyed(
        &self,
        pairs: &[(String, String)],
        lang_code: &str,
    ) -> HashMap<String, String> {
        let texts: Vec<String> = pairs.iter().map(|(_, text)| text.clone()).collect();
        let translated = self.translate_many(&texts, lang_code).await;

        pairs
            .iter()
            .zip(translated)
            .map(|((key, _), text)| (key.clone(), text))
            .collect()
    }

    /// 清空整个翻译缓存
    ///
    /// 由运维操作触发，不在常规流量路径上。
    pub fn invalidate_all(&self) {
        info!(entries = self.cache.len(), "清空翻译缓存");
        self.cache.clear();
    }

    /// 当前配置
    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    /// 缓存统计快照
    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    /// 调和器统计快照
    pub fn reconciler_stats(&self) -> ReconcilerStatsSnapshot {
        self.reconciler.stats()
    }

    /// 服务统计信息
    pub fn get_stats(&self) -> &ServiceStats {
        &self.stats
    }

    /// 获取服务健康状态
    ///
    /// 外部调用全部失败时后端记为不健康，部分失败记为降级。
    pub fn get_health(&self) -> HealthStatus {
        let mut components = HashMap::new();
        components.insert("config".to_string(), HealthLevel::Healthy);
        components.insert("cache".to_string(), HealthLevel::Healthy);

        let reconciler_stats = self.reconciler.stats();
        let backend_level = if reconciler_stats.external_calls == 0 {
            HealthLevel::Healthy
        } else if reconciler_stats.external_failures == reconciler_stats.external_calls {
            HealthLevel::Unhealthy
        } else if reconciler_stats.external_failures > 0 {
            HealthLevel::Degraded
        } else {
            HealthLevel::Healthy
        };
        components.insert("backend".to_string(), backend_level);

        let overall = if components.values().any(|&l| l == HealthLevel::Unhealthy) {
            HealthLevel::Unhealthy
        } else if components.values().any(|&l| l == HealthLevel::Degraded) {
            HealthLevel::Degraded
        } else {
            HealthLevel::Healthy
        };

        HealthStatus { overall, components }
    }
}

impl std::fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationService")
            .field("cache_entries", &self.cache.len())
            .field("cache_capacity", &self.cache.capacity())
            .finish()
    }
}

/// 翻译服务统计信息（线程安全版本）
///
/// 所有字段使用原子类型，支持无锁并发更新。通过 [`snapshot`]
/// 获取一致的时间点副本。
///
/// [`snapshot`]: ServiceStats::snapshot
#[derive(Debug, Default)]
pub struct ServiceStats {
    /// 收到的翻译请求次数（单条和批量各算一次）
    pub requests: AtomicU64,
    /// 透传的条目数
    pub passthroughs: AtomicU64,
    /// 缓存命中的条目数
    pub cache_hits: AtomicU64,
    /// 新产生译文的条目数
    pub translations_completed: AtomicU64,
    /// 回退到源文本的条目数
    pub fallbacks: AtomicU64,
    /// 总处理时间（微秒）
    pub processing_time: AtomicU64,
}

impl ServiceStats {
    /// 增加请求计数
    pub fn inc_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// 按条目路径更新对应计数器
    pub fn record_outcome(&self, outcome: TranslationOutcome) {
        let counter = match outcome {
            TranslationOutcome::Passthrough => &self.passthroughs,
            TranslationOutcome::CacheHit => &self.cache_hits,
            TranslationOutcome::Translated => &self.translations_completed,
            TranslationOutcome::Fallback => &self.fallbacks,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// 累加处理时间
    pub fn add_processing_time(&self, duration: std::time::Duration) {
        self.processing_time
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        self.requests.store(0, Ordering::Relaxed);
        self.passthroughs.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.translations_completed.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
        self.processing_time.store(0, Ordering::Relaxed);
    }

    /// 获取统计数据的一致性快照
    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            passthroughs: self.passthroughs.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            translations_completed: self.translations_completed.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            processing_time: std::time::Duration::from_micros(
                self.processing_time.load(Ordering::Relaxed),
            ),
        }
    }
}

/// 翻译服务统计数据的不可变快照
#[derive(Debug, Clone, Copy)]
pub struct ServiceStatsSnapshot {
    pub requests: u64,
    pub passthroughs: u64,
    pub cache_hits: u64,
    pub translations_completed: u64,
    pub fallbacks: u64,
    pub processing_time: std::time::Duration,
}

/// 翻译服务的健康状态报告
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// 整体健康级别
    pub overall: HealthLevel,
    /// 各组件的健康状态映射
    pub components: HashMap<String, HealthLevel>,
}

/// 健康状态级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthLevel {
    /// 组件运行正常
    Healthy,
    /// 部分功能受限但仍可用
    Degraded,
    /// 组件无法正常工作
    Unhealthy,
}
