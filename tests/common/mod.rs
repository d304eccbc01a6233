// 集成测试公共模块
//
// 提供脚本化补全后端和测试服务构造辅助

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;

use lingocache::translation::core::CompletionBackend;
use lingocache::translation::error::{TranslationError, TranslationResult};
use lingocache::translation::{TranslationConfig, TranslationService};

static TRACING: Once = Once::new();

/// 初始化测试日志输出（重复调用安全）
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// 脚本化补全后端
///
/// 按顺序返回预设响应，记录调用次数与收到的提示词。
/// 可选的人工延迟用于并发去重场景。
pub struct MockBackend {
    responses: Mutex<VecDeque<TranslationResult<String>>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl MockBackend {
    pub fn new(responses: Vec<TranslationResult<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(responses: Vec<TranslationResult<String>>, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(responses)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, prompt: &str, _max_tokens: u32) -> TranslationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TranslationError::InternalError(
                    "mock backend exhausted".to_string(),
                ))
            })
    }
}

/// 小容量的测试配置
pub fn test_config(cache_capacity: usize) -> TranslationConfig {
    TranslationConfig {
        cache_capacity,
        retry_enabled: false,
        ..TranslationConfig::default()
    }
}

/// 构建带脚本后端的翻译服务
pub fn service_with_responses(
    responses: Vec<TranslationResult<String>>,
) -> (TranslationService, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new(responses));
    let service = TranslationService::with_backend(test_config(100), backend.clone());
    (service, backend)
}
