//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。所有外部服务失败最终都会在
//! 调用边界被降级为源文本回退，错误类型主要服务于日志和内部判断。

use thiserror::Error;

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 配置缺失或非法
    #[error("配置无效: {0}")]
    ConfigError(String),

    /// 网络连接失败
    #[error("网络请求失败: {0}")]
    NetworkError(String),

    /// 命中外部服务的速率限制
    #[error("触发速率限制，请稍后重试")]
    RateLimitExceeded,

    /// 调用方传入的参数不合法
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 外部补全服务返回错误状态
    #[error("补全服务错误: {0}")]
    TranslationServiceError(String),

    /// 请求超出时限
    #[error("操作超时: {0}")]
    TimeoutError(String),

    /// 响应内容无法解析
    #[error("响应解析失败: {0}")]
    ParseError(String),

    /// 请求体或配置序列化失败
    #[error("序列化失败: {0}")]
    SerializationError(String),

    /// 不应出现的内部状态
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 判断该错误是否值得重试
    ///
    /// 速率限制不参与重试，需等待窗口重置后由调用方重新发起。
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TranslationError::NetworkError(_)
                | TranslationError::TimeoutError(_)
                | TranslationError::TranslationServiceError(_)
        )
    }

    /// 错误的严重程度，用于选择日志级别
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::NetworkError(_)
            | TranslationError::RateLimitExceeded
            | TranslationError::TimeoutError(_) => ErrorSeverity::Warning,
            TranslationError::TranslationServiceError(_)
            | TranslationError::ParseError(_)
            | TranslationError::SerializationError(_) => ErrorSeverity::Error,
            TranslationError::ConfigError(_) | TranslationError::InternalError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 错误所属类别，用于统计归档
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::NetworkError(_) => ErrorCategory::Network,
            TranslationError::RateLimitExceeded => ErrorCategory::RateLimit,
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::TranslationServiceError(_) => ErrorCategory::Service,
            TranslationError::TimeoutError(_) => ErrorCategory::Timeout,
            TranslationError::ParseError(_) => ErrorCategory::Parsing,
            TranslationError::SerializationError(_) => ErrorCategory::Serialization,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Network,
    RateLimit,
    Input,
    Service,
    Timeout,
    Parsing,
    Serialization,
    Internal,
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::NetworkError(format!("IO 操作失败: {}", error))
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::SerializationError(format!("JSON 处理失败: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ParseError(format!("TOML 解析失败: {}", error))
    }
}

impl From<config::ConfigError> for TranslationError {
    fn from(error: config::ConfigError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TimeoutError(error.to_string())
        } else {
            TranslationError::NetworkError(error.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::TimeoutError(format!("异步任务超时: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(TranslationError::NetworkError("x".into()).is_retryable());
        assert!(TranslationError::TimeoutError("x".into()).is_retryable());
        assert!(TranslationError::TranslationServiceError("x".into()).is_retryable());
        assert!(!TranslationError::RateLimitExceeded.is_retryable());
        assert!(!TranslationError::ConfigError("x".into()).is_retryable());
        assert!(!TranslationError::ParseError("x".into()).is_retryable());
    }

    #[test]
    fn test_severity_and_category() {
        let err = TranslationError::ConfigError("missing".into());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let err = TranslationError::TranslationServiceError("503".into());
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.category(), ErrorCategory::Service);
    }
}
