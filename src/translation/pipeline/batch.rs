//! 批量翻译调和器
//!
//! 把一组待翻译文本合并为一次外部请求：先逐条查缓存，缓存未命中的
//! 文本拼成编号列表提示词，一次调用外部服务，再按编号把响应行
//! 对应回原始位置。任何一步失败都按条目降级为源文本，不向上抛错。
//!
//! 同一个键的并发未命中通过在途注册表去重：第一个调用方发起外部
//! 请求，其余调用方等待共享结果，不产生额外的外部调用。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use regex::Regex;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::translation::core::client::CompletionBackend;
use crate::translation::lang::Language;
use crate::translation::pipeline::prompt::{batch_prompt, single_prompt};
use crate::translation::storage::cache::{CacheKey, TranslationCache};

/// 在途结果通道值
///
/// `None` 表示调用尚未完成；`Some(None)` 表示调用完成但该键没有
/// 可用译文（失败或解析不出），等待方回退到源文本。
type InflightValue = Option<Option<String>>;

/// 单个条目的翻译路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// 无需翻译，原样返回
    Passthrough,
    /// 缓存命中
    CacheHit,
    /// 本次外部调用产生的新译文
    Translated,
    /// 翻译失败，回退到源文本
    Fallback,
}

/// 翻译结果条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedItem {
    pub text: String,
    pub outcome: TranslationOutcome,
}

impl TranslatedItem {
    fn new(text: String, outcome: TranslationOutcome) -> Self {
        Self { text, outcome }
    }
}

/// 调和器统计计数器
#[derive(Debug, Default)]
struct ReconcilerCounters {
    external_calls: AtomicU64,
    external_failures: AtomicU64,
    parse_failures: AtomicU64,
    shared_waits: AtomicU64,
}

/// 调和器统计快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerStatsSnapshot {
    pub external_calls: u64,
    pub external_failures: u64,
    pub parse_failures: u64,
    pub shared_waits: u64,
}

/// 批量翻译调和器
pub struct BatchReconciler {
    cache: Arc<TranslationCache>,
    backend: Arc<dyn CompletionBackend>,
    inflight: DashMap<CacheKey, watch::Receiver<InflightValue>>,
    line_pattern: Regex,
    max_tokens_single: u32,
    max_tokens_batch: u32,
    counters: ReconcilerCounters,
}

impl BatchReconciler {
    /// 创建调和器
    pub fn new(
        cache: Arc<TranslationCache>,
        backend: Arc<dyn CompletionBackend>,
        max_tokens_single: u32,
        max_tokens_batch: u32,
    ) -> Self {
        Self {
            cache,
            backend,
            inflight: DashMap::new(),
            line_pattern: Regex::new(r"^(\d+)\.\s*(.+)$").unwrap(),
            max_tokens_single,
            max_tokens_batch,
            counters: ReconcilerCounters::default(),
        }
    }

    /// 翻译单条文本
    ///
    /// 缓存命中直接返回；未命中时走单条提示词路径。同键并发调用
    /// 共享一次外部请求。
    pub async fn translate_single(&self, text: &str, lang: Language) -> TranslatedItem {
        if text.trim().is_empty() {
            return TranslatedItem::new(text.to_string(), TranslationOutcome::Passthrough);
        }

        let key = CacheKey::new(lang, text);
        if let Some(hit) = self.cache.get(&key) {
            return TranslatedItem::new(hit, TranslationOutcome::CacheHit);
        }

        match self.register(&key) {
            Registration::Waiter(rx) => self.await_shared(key, rx, text).await,
            Registration::Owner(tx) => {
                let prompt = single_prompt(text, lang);
                self.counters.external_calls.fetch_add(1, Ordering::Relaxed);
                let value = match self.backend.complete(&prompt, self.max_tokens_single).await {
                    Ok(raw) => {
                        let translated = raw.trim().to_string();
                        if translated.is_empty() {
                            None
                        } else {
                            Some(translated)
                        }
                    }
                    Err(err) => {
                        self.counters
                            .external_failures
                            .fetch_add(1, Ordering::Relaxed);
                        warn!(error = %err, lang = %lang, "单条翻译失败，回退到源文本");
                        None
                    }
                };
                self.publish(&key, &tx, value.clone());
                match value {
                    Some(translated) => {
                        TranslatedItem::new(translated, TranslationOutcome::Translated)
                    }
                    None => TranslatedItem::new(text.to_string(), TranslationOutcome::Fallback),
                }
            }
        }
    }

    /// 翻译一批文本
    ///
    /// 返回与输入等长、位置一一对应的结果。空白条目原样透传；
    /// 全部命中缓存时不产生外部调用。
    pub async fn translate_batch(&self, texts: &[String], lang: Language) -> Vec<TranslatedItem> {
        let mut results: Vec<Option<TranslatedItem>> = vec![None; texts.len()];
        let mut miss_indices: Vec<usize> = Vec::new();
        let mut owned: Vec<(CacheKey, watch::Sender<InflightValue>)> = Vec::new();
        let mut waiting: Vec<(usize, CacheKey, watch::Receiver<InflightValue>)> = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            if text.trim().is_empty() {
                results[i] = Some(TranslatedItem::new(
                    text.clone(),
                    TranslationOutcome::Passthrough,
                ));
                continue;
            }

            let key = CacheKey::new(lang, text.clone());
            if let Some(hit) = self.cache.get(&key) {
                results[i] = Some(TranslatedItem::new(hit, TranslationOutcome::CacheHit));
                continue;
            }

            match self.register(&key) {
                Registration::Owner(tx) => {
                    miss_indices.push(i);
                    owned.push((key, tx));
                }
                Registration::Waiter(rx) => {
                    waiting.push((i, key, rx));
                }
            }
        }

        if !miss_indices.is_empty() {
            let miss_texts: Vec<&str> = miss_indices.iter().map(|&i| texts[i].as_str()).collect();
            let prompt = batch_prompt(&miss_texts, lang);
            debug!(misses = miss_indices.len(), lang = %lang, "发起批量翻译请求");

            self.counters.external_calls.fetch_add(1, Ordering::Relaxed);
            let resolved: Vec<Option<String>> =
                match self.backend.complete(&prompt, self.max_tokens_batch).await {
                    Ok(raw) => self.parse_numbered_response(&raw, miss_indices.len()),
                    Err(err) => {
                        self.counters
                            .external_failures
                            .fetch_add(1, Ordering::Relaxed);
                        warn!(error = %err, lang = %lang, "批量翻译失败，全部未命中条目回退到源文本");
                        vec![None; miss_indices.len()]
                    }
                };

            // 先发布共享结果，再填充自身条目，保证同批次内的等待方不会悬挂
            for (j, (key, tx)) in owned.iter().enumerate() {
                self.publish(key, tx, resolved[j].clone());
                let i = miss_indices[j];
                results[i] = Some(match &resolved[j] {
                    Some(translated) => {
                        TranslatedItem::new(translated.clone(), TranslationOutcome::Translated)
                    }
                    None => TranslatedItem::new(texts[i].clone(), TranslationOutcome::Fallback),
                });
            }
        }

        for (i, key, rx) in waiting {
            results[i] = Some(self.await_shared(key, rx, &texts[i]).await);
        }

        results
            .into_iter()
            .map(|item| match item {
                Some(item) => item,
                // 不可达: 每个索引都在上面三条路径之一被填充
                None => TranslatedItem::new(String::new(), TranslationOutcome::Fallback),
            })
            .collect()
    }

    /// 清点统计快照
    pub fn stats(&self) -> ReconcilerStatsSnapshot {
        ReconcilerStatsSnapshot {
            external_calls: self.counters.external_calls.load(Ordering::Relaxed),
            external_failures: self.counters.external_failures.load(Ordering::Relaxed),
            parse_failures: self.counters.parse_failures.load(Ordering::Relaxed),
            shared_waits: self.counters.shared_waits.load(Ordering::Relaxed),
        }
    }

    /// 在在途注册表中登记一个键
    fn register(&self, key: &CacheKey) -> Registration {
        match self.inflight.entry(key.clone()) {
            Entry::Occupied(entry) => {
                self.counters.shared_waits.fetch_add(1, Ordering::Relaxed);
                Registration::Waiter(entry.get().clone())
            }
            Entry::Vacant(entry) => {
                let (tx, rx) = watch::channel(None);
                entry.insert(rx);
                Registration::Owner(tx)
            }
        }
    }

    /// 发布共享结果并注销在途记录
    ///
    /// 必须先从注册表移除再发送，否则新的调用方可能拿到已经
    /// 完成的通道并错过后续缓存写入。发送失败说明没有等待方。
    fn publish(&self, key: &CacheKey, tx: &watch::Sender<InflightValue>, value: Option<String>) {
        if let Some(translated) = &value {
            self.cache.insert(key.clone(), translated.clone());
        }
        self.inflight.remove(key);
        let _ = tx.send(Some(value));
    }

    /// 等待另一个调用方发布的共享结果
    async fn await_shared(
        &self,
        key: CacheKey,
        mut rx: watch::Receiver<InflightValue>,
        source: &str,
    ) -> TranslatedItem {
        match rx.wait_for(|value| value.is_some()).await {
            Ok(value) => match value.clone().flatten() {
                Some(translated) => {
                    TranslatedItem::new(translated, TranslationOutcome::Translated)
                }
                None => TranslatedItem::new(source.to_string(), TranslationOutcome::Fallback),
            },
            Err(_) => {
                // 发起方在发布前被取消，清理过期的在途记录
                self.inflight.remove(&key);
                TranslatedItem::new(source.to_string(), TranslationOutcome::Fallback)
            }
        }
    }

    /// 解析编号响应
    ///
    /// 第 j 个非空行必须带有 `j+1. ` 前缀，编号不匹配的行按解析
    /// 失败处理，对应条目回退。超出预期数量的行被丢弃。
    fn parse_numbered_response(&self, raw: &str, expected: usize) -> Vec<Option<String>> {
        let mut resolved: Vec<Option<String>> = vec![None; expected];
        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.len() != expected {
            warn!(
                expected,
                actual = lines.len(),
                "批量响应行数与未命中条目数不一致"
            );
        }

        for (j, line) in lines.iter().take(expected).enumerate() {
            match self.line_pattern.captures(line) {
                Some(caps) => {
                    let ordinal: usize = caps[1].parse().unwrap_or(0);
                    if ordinal != j + 1 {
                        self.counters.parse_failures.fetch_add(1, Ordering::Relaxed);
                        warn!(line_index = j, ordinal, "响应行编号与位置不一致，该条目回退");
                        continue;
                    }
                    let candidate = caps[2].trim();
                    if !candidate.is_empty() {
                        resolved[j] = Some(candidate.to_string());
                    }
                }
                None => {
                    self.counters.parse_failures.fetch_add(1, Ordering::Relaxed);
                    warn!(line_index = j, "响应行缺少编号前缀，该条目回退");
                }
            }
        }

        resolved
    }
}

enum Registration {
    Owner(watch::Sender<InflightValue>),
    Waiter(watch::Receiver<InflightValue>),
}

impl std::fmt::Debug for BatchReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchReconciler")
            .field("inflight", &self.inflight.len())
            .finish()
    }
}
