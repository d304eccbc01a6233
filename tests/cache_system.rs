//! 缓存系统集成测试
//!
//! 测试有界 LRU 缓存的淘汰顺序、统计口径以及服务层的缓存行为

use std::sync::Arc;

use lingocache::translation::storage::cache::{CacheKey, TranslationCache};
use lingocache::translation::Language;
use lingocache::TranslationService;

mod common {
    include!("common/mod.rs");
}

use common::{init_tracing, service_with_responses, test_config, MockBackend};

/// 测试基本缓存操作
#[test]
fn test_basic_cache_operations() {
    let cache = TranslationCache::new(10);
    let key = CacheKey::new(Language::Swedish, "Hello world");

    assert!(cache.get(&key).is_none(), "cache should start empty");
    assert!(cache.is_empty());

    cache.insert(key.clone(), "Hej världen".to_string());
    assert_eq!(cache.get(&key).as_deref(), Some("Hej världen"));
    assert!(cache.contains(&key));
    assert_eq!(cache.len(), 1);
}

/// 测试严格的 LRU 淘汰顺序
#[test]
fn test_lru_eviction_prefers_least_recently_used() {
    let cache = TranslationCache::new(2);
    let key_a = CacheKey::new(Language::Swedish, "A");
    let key_b = CacheKey::new(Language::Swedish, "B");
    let key_c = CacheKey::new(Language::Swedish, "C");

    cache.insert(key_a.clone(), "a".to_string());
    cache.insert(key_b.clone(), "b".to_string());

    // 触碰 A，让 B 成为最久未使用
    assert!(cache.get(&key_a).is_some());

    cache.insert(key_c.clone(), "c".to_string());

    assert!(cache.contains(&key_a), "A was refreshed and must survive");
    assert!(!cache.contains(&key_b), "B was LRU and must be evicted");
    assert!(cache.contains(&key_c));

    let stats = cache.stats();
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.capacity, 2);
}

/// 测试缓存键按语言和精确文本区分
#[test]
fn test_cache_keys_are_exact_and_per_language() {
    let cache = TranslationCache::new(10);

    cache.insert(CacheKey::new(Language::Swedish, "Hello"), "Hej".to_string());
    cache.insert(CacheKey::new(Language::Danish, "Hello"), "Hej".to_string());

    assert_eq!(cache.len(), 2, "same text per language is a distinct entry");

    // 大小写与空白差异都视为不同键
    assert!(cache
        .get(&CacheKey::new(Language::Swedish, "hello"))
        .is_none());
    assert!(cache
        .get(&CacheKey::new(Language::Swedish, "Hello "))
        .is_none());
}

/// 测试重复请求命中缓存，不再调用后端
#[tokio::test]
async fn test_repeat_request_hits_cache() {
    init_tracing();
    let (service, backend) = service_with_responses(vec![Ok("Hej".to_string())]);

    let first = service.translate_one("Hello", "sv").await;
    let second = service.translate_one("Hello", "sv").await;

    assert_eq!(first, "Hej");
    assert_eq!(second, "Hej");
    assert_eq!(backend.calls(), 1, "second request must be served from cache");

    let stats = service.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

/// 测试整体失效后重新翻译
#[tokio::test]
async fn test_invalidate_all_forces_retranslation() {
    init_tracing();
    let (service, backend) =
        service_with_responses(vec![Ok("Hej".to_string()), Ok("Hejsan".to_string())]);

    assert_eq!(service.translate_one("Hello", "sv").await, "Hej");
    service.invalidate_all();
    assert_eq!(service.cache_stats().entries, 0);

    assert_eq!(service.translate_one("Hello", "sv").await, "Hejsan");
    assert_eq!(backend.calls(), 2, "invalidation must drop cached entries");
}

/// 测试淘汰后旧条目重新走外部翻译
#[tokio::test]
async fn test_evicted_entry_translates_again() {
    init_tracing();
    let backend = Arc::new(MockBackend::new(vec![
        Ok("Ett".to_string()),
        Ok("Två".to_string()),
        Ok("Ett".to_string()),
    ]));
    let service = TranslationService::with_backend(test_config(1), backend.clone());

    assert_eq!(service.translate_one("One", "sv").await, "Ett");
    // 容量为 1，每次新键插入都会挤出上一条
    assert_eq!(service.translate_one("Two", "sv").await, "Två");
    assert_eq!(service.translate_one("One", "sv").await, "Ett");

    assert_eq!(backend.calls(), 3);
    assert_eq!(service.cache_stats().evictions, 2);
}

/// 测试命中率计算
#[tokio::test]
async fn test_hit_rate_reflects_traffic() {
    init_tracing();
    let (service, _backend) = service_with_responses(vec![Ok("Hej".to_string())]);

    service.translate_one("Hello", "sv").await;
    service.translate_one("Hello", "sv").await;
    service.translate_one("Hello", "sv").await;

    let stats = service.cache_stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    let rate = stats.hit_rate();
    assert!((rate - 2.0 / 3.0).abs() < 1e-9, "unexpected hit rate {rate}");
}
