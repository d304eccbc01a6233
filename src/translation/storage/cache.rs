//! 翻译结果缓存
//!
//! 基于 `lru::LruCache` 的有界缓存，按（目标语言，源文本）精确匹配，
//! 不做任何文本归一化。所有读写都会把条目提升为最近使用，
//! 容量满时严格驱逐最久未使用的条目。无过期时间，只由容量和
//! 显式清空控制生命周期。

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use lru::LruCache;
use tracing::debug;

use crate::translation::lang::Language;

/// 缓存键
///
/// 同一源文本在不同目标语言下是两个独立条目。文本按原样比较，
/// 不做大小写或空白归一化。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub lang: Language,
    pub text: String,
}

impl CacheKey {
    /// 创建缓存键
    pub fn new(lang: Language, text: impl Into<String>) -> Self {
        Self {
            lang,
            text: text.into(),
        }
    }
}

/// 缓存统计计数器
#[derive(Debug, Default)]
struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// 缓存统计快照
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStatsSnapshot {
    /// 计算缓存命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// 翻译缓存
///
/// 内部使用互斥锁保护的 LRU 结构，锁从不跨越 await 点持有。
pub struct TranslationCache {
    inner: Mutex<LruCache<CacheKey, String>>,
    capacity: usize,
    counters: CacheCounters,
}

impl TranslationCache {
    /// 创建指定容量的缓存
    ///
    /// 容量为 0 时按 1 处理，保证缓存始终可用。
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            capacity: capacity.get(),
            counters: CacheCounters::default(),
        }
    }

    /// 查询缓存条目
    ///
    /// 命中时条目被提升为最近使用。
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut inner = self.inner.lock().unwrap();
        match inner.get(key) {
            Some(value) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Some(value.clone())
            }
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// 写入缓存条目
    ///
    /// 键已存在时覆盖并提升为最近使用；容量满时先驱逐最久未使用的条目。
    pub fn insert(&self, key: CacheKey, value: String) {
        let mut inner = self.inner.lock().unwrap();
        let will_evict = inner.len() == self.capacity && !inner.contains(&key);
        if let Some((evicted, _)) = inner.push(key, value) {
            if will_evict {
                self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(lang = %evicted.lang, "缓存已满，驱逐最久未使用的条目");
            }
        }
    }

    /// 检查键是否存在
    ///
    /// 存在时同样提升为最近使用，与后续的 `get` 保持一致的访问语义。
    pub fn contains(&self, key: &CacheKey) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.get(key).is_some()
    }

    /// 清空全部条目
    ///
    /// 仅由显式的缓存失效操作调用，统计计数保留。
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.clear();
    }

    /// 当前条目数
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// 缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 最大容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 获取统计快照
    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            entries: self.len(),
            capacity: self.capacity,
        }
    }
}

impl std::fmt::Debug for TranslationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationCache")
            .field("entries", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
