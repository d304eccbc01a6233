//! 错误处理集成测试
//!
//! 测试后端失败、响应异常和限流场景下的降级与恢复

use lingocache::translation::error::TranslationError;
use lingocache::translation::{HealthLevel, TranslationConfig, TranslationOutcome};
use lingocache::TranslationService;

mod common {
    include!("common/mod.rs");
}

use common::{init_tracing, service_with_responses};

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// 测试缺少 API 密钥时服务创建失败
#[test]
fn test_service_requires_api_key() {
    let config = TranslationConfig::default();
    assert!(config.api_key.is_none());

    let result = TranslationService::new(config);
    assert!(matches!(result, Err(TranslationError::ConfigError(_))));
}

/// 测试单条请求失败时回退到源文本
#[tokio::test]
async fn test_single_failure_falls_back_to_source() {
    init_tracing();
    let (service, backend) = service_with_responses(vec![Err(
        TranslationError::NetworkError("connection refused".to_string()),
    )]);

    let item = service.translate_one_detailed("Hello", "sv").await;

    assert_eq!(item.text, "Hello");
    assert_eq!(item.outcome, TranslationOutcome::Fallback);
    assert_eq!(backend.calls(), 1);
}

/// 测试失败结果不会写入缓存
#[tokio::test]
async fn test_failures_are_not_cached() {
    init_tracing();
    let (service, backend) = service_with_responses(vec![
        Err(TranslationError::TimeoutError("deadline".to_string())),
        Ok("Hej".to_string()),
    ]);

    assert_eq!(service.translate_one("Hello", "sv").await, "Hello");
    assert_eq!(service.cache_stats().entries, 0, "fallback must not be cached");

    // 后端恢复后同一文本重新翻译成功
    assert_eq!(service.translate_one("Hello", "sv").await, "Hej");
    assert_eq!(backend.calls(), 2);
    assert_eq!(service.cache_stats().entries, 1);
}

/// 测试批量请求失败时整批逐条回退
#[tokio::test]
async fn test_batch_failure_falls_back_every_item() {
    init_tracing();
    let (service, _backend) = service_with_responses(vec![Err(
        TranslationError::TranslationServiceError("HTTP 500".to_string()),
    )]);

    let items = service
        .translate_many_detailed(&texts(&["One", "Two", "Three"]), "sv")
        .await;

    assert_eq!(items.len(), 3);
    for (item, source) in items.iter().zip(["One", "Two", "Three"]) {
        assert_eq!(item.text, source);
        assert_eq!(item.outcome, TranslationOutcome::Fallback);
    }

    let stats = service.get_stats().snapshot();
    assert_eq!(stats.fallbacks, 3);
}

/// 测试限流错误直接回退，不污染缓存
#[tokio::test]
async fn test_rate_limit_falls_back() {
    init_tracing();
    let (service, _backend) =
        service_with_responses(vec![Err(TranslationError::RateLimitExceeded)]);

    let item = service.translate_one_detailed("Hello", "sv").await;
    assert_eq!(item.text, "Hello");
    assert_eq!(item.outcome, TranslationOutcome::Fallback);
    assert_eq!(service.cache_stats().entries, 0);
}

/// 测试编号错乱的响应按条目降级
#[tokio::test]
async fn test_misnumbered_response_degrades_per_item() {
    init_tracing();
    let (service, _backend) =
        service_with_responses(vec![Ok("1. Hej\n3. Fel".to_string())]);

    let items = service
        .translate_many_detailed(&texts(&["Hello", "World"]), "sv")
        .await;

    assert_eq!(items[0].text, "Hej");
    assert_eq!(items[0].outcome, TranslationOutcome::Translated);
    assert_eq!(items[1].text, "World");
    assert_eq!(items[1].outcome, TranslationOutcome::Fallback);

    assert!(service.reconciler_stats().parse_failures >= 1);
}

/// 测试全部失败时健康状态为不健康
#[tokio::test]
async fn test_health_unhealthy_when_backend_always_fails() {
    init_tracing();
    let (service, _backend) = service_with_responses(vec![
        Err(TranslationError::NetworkError("down".to_string())),
        Err(TranslationError::NetworkError("down".to_string())),
    ]);

    service.translate_one("Hello", "sv").await;
    service.translate_one("World", "sv").await;

    let health = service.get_health();
    assert_eq!(health.overall, HealthLevel::Unhealthy);
    assert_eq!(health.components["backend"], HealthLevel::Unhealthy);
}

/// 测试部分失败时健康状态为降级
#[tokio::test]
async fn test_health_degraded_after_partial_failures() {
    init_tracing();
    let (service, _backend) = service_with_responses(vec![
        Ok("Hej".to_string()),
        Err(TranslationError::TimeoutError("deadline".to_string())),
    ]);

    service.translate_one("Hello", "sv").await;
    service.translate_one("World", "sv").await;

    let health = service.get_health();
    assert_eq!(health.overall, HealthLevel::Degraded);
}

/// 测试无流量时健康状态为健康
#[tokio::test]
async fn test_health_healthy_without_traffic() {
    init_tracing();
    let (service, _backend) = service_with_responses(vec![]);

    let health = service.get_health();
    assert_eq!(health.overall, HealthLevel::Healthy);
}

/// 测试统计重置
#[tokio::test]
async fn test_stats_reset_clears_counters() {
    init_tracing();
    let (service, _backend) = service_with_responses(vec![Ok("Hej".to_string())]);

    service.translate_one("Hello", "sv").await;
    assert_eq!(service.get_stats().snapshot().requests, 1);

    service.get_stats().reset();
    let stats = service.get_stats().snapshot();
    assert_eq!(stats.requests, 0);
    assert_eq!(stats.translations_completed, 0);
}
