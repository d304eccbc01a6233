//! 外部补全服务客户端
//!
//! 封装对 Anthropic messages API 的单次调用：渲染好的提示词进，
//! 修剪后的纯文本出。网络失败、非成功状态码和缺少文本内容的响应
//! 都作为错误返回，由调用方降级处理。客户端内部带有限次数的
//! 指数退避重试。

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::translation::config::TranslationConfig;
use crate::translation::error::{TranslationError, TranslationResult};

/// 补全后端接口
///
/// 把外部服务隔离在一个最小的 trait 后面，测试时可以替换为
/// 记录调用次数和提示词内容的模拟实现。
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// 发送提示词并返回修剪后的响应文本
    async fn complete(&self, prompt: &str, max_tokens: u32) -> TranslationResult<String>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

/// Anthropic messages API 客户端
pub struct AnthropicClient {
    http: reqwest::Client,
    api_base_url: String,
    api_key: String,
    model: String,
    retry_enabled: bool,
    max_retry_attempts: u32,
    retry_delay_ms: u64,
}

impl AnthropicClient {
    /// 根据配置创建客户端
    ///
    /// 缺少 API 密钥或 HTTP 客户端构建失败时返回配置错误。
    pub fn new(config: &TranslationConfig) -> TranslationResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                TranslationError::ConfigError("缺少 API 密钥，无法创建翻译客户端".to_string())
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("HTTP 客户端构建失败: {}", e)))?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            retry_enabled: config.retry_enabled,
            max_retry_attempts: config.max_retry_attempts,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// 发送一次请求，不做重试
    async fn send_once(&self, prompt: &str, max_tokens: u32) -> TranslationResult<String> {
        let url = format!("{}/messages", self.api_base_url);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(TranslationError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::TranslationServiceError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let payload: MessagesResponse = response.json().await?;
        let text = payload
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(TranslationError::ParseError(
                "响应中没有文本内容".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl CompletionBackend for AnthropicClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> TranslationResult<String> {
        let attempts = if self.retry_enabled {
            self.max_retry_attempts.max(1)
        } else {
            1
        };

        let mut last_error = TranslationError::InternalError("重试循环未执行".to_string());

        for attempt in 0..attempts {
            if attempt > 0 {
                // 指数退避: delay * 2^(attempt-1)
                let delay = self.retry_delay_ms.saturating_mul(1 << (attempt - 1));
                debug!(attempt, delay_ms = delay, "等待后重试翻译请求");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            match self.send_once(prompt, max_tokens).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt + 1 < attempts => {
                    warn!(error = %err, attempt, "翻译请求失败，将重试");
                    last_error = err;
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> TranslationConfig {
        TranslationConfig {
            api_key: Some("test-key".to_string()),
            ..TranslationConfig::default()
        }
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = TranslationConfig {
            api_key: None,
            ..TranslationConfig::default()
        };
        assert!(AnthropicClient::new(&config).is_err());

        let config = TranslationConfig {
            api_key: Some("   ".to_string()),
            ..TranslationConfig::default()
        };
        assert!(AnthropicClient::new(&config).is_err());
    }

    #[test]
    fn test_client_normalizes_base_url() {
        let config = TranslationConfig {
            api_base_url: "https://api.anthropic.com/v1/".to_string(),
            ..config_with_key()
        };
        let client = AnthropicClient::new(&config).unwrap();
        assert_eq!(client.api_base_url, "https://api.anthropic.com/v1");
    }

    #[test]
    fn test_request_serialization() {
        let request = MessagesRequest {
            model: "claude-3-haiku-20240307",
            max_tokens: 1024,
            messages: vec![Message {
                role: "user",
                content: "Translate this",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-3-haiku-20240307");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Translate this");
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{"content":[{"type":"text","text":"  Hej  "},{"type":"tool_use"},{"type":"text","text":"!"}]}"#;
        let payload: MessagesResponse = serde_json::from_str(raw).unwrap();
        let text: String = payload
            .content
            .iter()
            .filter(|b| b.block_type == "text")
            .map(|b| b.text.as_str())
            .collect();
        assert_eq!(text.trim(), "Hej  !");
    }
}
