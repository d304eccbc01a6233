//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问。每个变量是一个实现了
//! [`EnvVar`] 的零大小类型，解析失败会带上变量名和原因。

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "environment variable {}: {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

fn invalid(variable: &str, message: impl Into<String>) -> EnvError {
    EnvError {
        variable: variable.to_string(),
        message: message.into(),
    }
}

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(raw) => Self::parse(&raw),
            Err(_) => Self::DEFAULT.ok_or_else(|| invalid(Self::NAME, "required but not set")),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    ///
    /// `Option<String>` 无法作为 const 默认值携带内容，
    /// 因此覆写 `get` 提供运行期默认。下同。
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "LINGOCACHE_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log verbosity: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            env::var(Self::NAME).map_or_else(|_| Ok("info".to_string()), |raw| Self::parse(&raw))
        }

        fn parse(value: &str) -> EnvResult<String> {
            let level = value.trim().to_ascii_lowercase();
            match level.as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(level),
                other => Err(invalid(Self::NAME, format!("unknown log level '{other}'"))),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable ANSI colors when set to any non-empty value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 约定：只要设置了非空值就生效
            Ok(!value.is_empty())
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 翻译功能启用状态
    pub struct Enabled;
    impl EnvVar<bool> for Enabled {
        const NAME: &'static str = "LINGOCACHE_TRANSLATION_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Master switch for the translation layer";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 默认目标语言
    pub struct DefaultTargetLang;
    impl EnvVar<String> for DefaultTargetLang {
        const NAME: &'static str = "LINGOCACHE_DEFAULT_TARGET_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Default target language (ISO 639-1 code)";

        fn get() -> EnvResult<String> {
            env::var(Self::NAME).map_or_else(|_| Ok("sv".to_string()), |raw| Self::parse(&raw))
        }

        fn parse(value: &str) -> EnvResult<String> {
            let code = value.trim().to_ascii_lowercase();
            if code.len() == 2 {
                Ok(code)
            } else {
                Err(invalid(Self::NAME, "expected a 2-letter ISO 639-1 code"))
            }
        }
    }

    /// API 基础地址
    pub struct ApiBaseUrl;
    impl EnvVar<String> for ApiBaseUrl {
        const NAME: &'static str = "LINGOCACHE_API_BASE_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Completion API base URL";

        fn get() -> EnvResult<String> {
            env::var(Self::NAME).map_or_else(
                |_| Ok("https://api.anthropic.com/v1".to_string()),
                |raw| Self::parse(&raw),
            )
        }

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("https://") || url.starts_with("http://") {
                Ok(url.to_string())
            } else {
                Err(invalid(Self::NAME, "expected an http:// or https:// URL"))
            }
        }
    }

    /// API 密钥
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "ANTHROPIC_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Completion API authentication key";

        fn parse(value: &str) -> EnvResult<String> {
            let key = value.trim();
            if key.is_empty() {
                Err(invalid(Self::NAME, "key is empty"))
            } else {
                Ok(key.to_string())
            }
        }
    }

    /// 补全模型标识
    pub struct Model;
    impl EnvVar<String> for Model {
        const NAME: &'static str = "LINGOCACHE_MODEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Completion model identifier";

        fn get() -> EnvResult<String> {
            env::var(Self::NAME).map_or_else(
                |_| Ok("claude-3-haiku-20240307".to_string()),
                |raw| Self::parse(&raw),
            )
        }

        fn parse(value: &str) -> EnvResult<String> {
            let model = value.trim();
            if model.is_empty() {
                Err(invalid(Self::NAME, "model identifier is empty"))
            } else {
                Ok(model.to_string())
            }
        }
    }

    /// 单次请求超时
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "LINGOCACHE_REQUEST_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30));
        const DESCRIPTION: &'static str = "Per-request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_ranged::<u64>(value, Self::NAME, 1, 300).map(Duration::from_secs)
        }
    }

    /// 重试功能启用状态
    pub struct RetryEnabled;
    impl EnvVar<bool> for RetryEnabled {
        const NAME: &'static str = "LINGOCACHE_RETRY_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Enable bounded retries for retryable failures";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 最大重试次数
    pub struct MaxRetryAttempts;
    impl EnvVar<u32> for MaxRetryAttempts {
        const NAME: &'static str = "LINGOCACHE_MAX_RETRY_ATTEMPTS";
        const DEFAULT: Option<u32> = Some(3);
        const DESCRIPTION: &'static str = "Maximum attempts per external request";

        fn parse(value: &str) -> EnvResult<u32> {
            parse_ranged(value, Self::NAME, 1, 10)
        }
    }

    /// 重试基础延迟（毫秒）
    pub struct RetryDelayMs;
    impl EnvVar<u64> for RetryDelayMs {
        const NAME: &'static str = "LINGOCACHE_RETRY_DELAY_MS";
        const DEFAULT: Option<u64> = Some(1000);
        const DESCRIPTION: &'static str = "Base retry delay in milliseconds";

        fn parse(value: &str) -> EnvResult<u64> {
            parse_ranged(value, Self::NAME, 10, 60_000)
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 缓存容量（条目数）
    pub struct Capacity;
    impl EnvVar<usize> for Capacity {
        const NAME: &'static str = "LINGOCACHE_CACHE_CAPACITY";
        const DEFAULT: Option<usize> = Some(1000);
        const DESCRIPTION: &'static str = "Translation cache capacity (number of entries)";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_ranged(value, Self::NAME, 1, 1_000_000)
        }
    }
}

fn parse_bool(value: &str, variable: &str) -> EnvResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enabled" => Ok(true),
        "0" | "false" | "no" | "off" | "disabled" => Ok(false),
        other => Err(invalid(
            variable,
            format!("unrecognized boolean '{other}' (use true/false, 1/0, yes/no, on/off)"),
        )),
    }
}

fn parse_ranged<N>(value: &str, variable: &str, min: N, max: N) -> EnvResult<N>
where
    N: std::str::FromStr + PartialOrd + fmt::Display + Copy,
{
    let number: N = value
        .trim()
        .parse()
        .map_err(|_| invalid(variable, "expected an integer"))?;

    if number < min || number > max {
        return Err(invalid(
            variable,
            format!("value {number} outside allowed range {min}..={max}"),
        ));
    }

    Ok(number)
}
