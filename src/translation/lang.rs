//! 目标语言定义
//!
//! 提供固定的目标语言枚举和语言代码解析。支持的语言集合是封闭的，
//! 未识别的非英语代码会回退到默认语言而不是报错。

use std::fmt;

/// 支持的目标语言
///
/// 每个变体对应一个 ISO 639-1 语言代码和外部翻译服务使用的英文显示名称。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// 瑞典语 (sv)
    Swedish,
    /// 挪威语 (no)
    Norwegian,
    /// 丹麦语 (da)
    Danish,
    /// 芬兰语 (fi)
    Finnish,
}

impl Language {
    /// 解析语言代码
    ///
    /// 返回 `None` 表示无需翻译（透传）：空代码或英语代码 `"en"`。
    /// 其他未识别的代码回退到默认语言 [`Language::default`]。
    pub fn resolve(code: &str) -> Option<Language> {
        let code = code.trim().to_lowercase();
        if code.is_empty() || code == "en" {
            return None;
        }
        Some(Self::from_code_or_default(&code))
    }

    /// 将已确认非透传的代码映射到语言，未识别时使用默认语言
    pub fn from_code_or_default(code: &str) -> Language {
        match code {
            "sv" => Language::Swedish,
            "no" => Language::Norwegian,
            "da" => Language::Danish,
            "fi" => Language::Finnish,
            _ => Language::default(),
        }
    }

    /// ISO 639-1 语言代码
    pub fn code(&self) -> &'static str {
        match self {
            Language::Swedish => "sv",
            Language::Norwegian => "no",
            Language::Danish => "da",
            Language::Finnish => "fi",
        }
    }

    /// 提示词中使用的英文显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Swedish => "Swedish",
            Language::Norwegian => "Norwegian",
            Language::Danish => "Danish",
            Language::Finnish => "Finnish",
        }
    }

    /// 所有支持的目标语言
    pub fn all() -> &'static [Language] {
        &[
            Language::Swedish,
            Language::Norwegian,
            Language::Danish,
            Language::Finnish,
        ]
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Swedish
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_supported_codes() {
        assert_eq!(Language::resolve("sv"), Some(Language::Swedish));
        assert_eq!(Language::resolve("no"), Some(Language::Norwegian));
        assert_eq!(Language::resolve("da"), Some(Language::Danish));
        assert_eq!(Language::resolve("fi"), Some(Language::Finnish));
    }

    #[test]
    fn test_resolve_passthrough_codes() {
        assert_eq!(Language::resolve("en"), None);
        assert_eq!(Language::resolve(""), None);
        assert_eq!(Language::resolve("  "), None);
        assert_eq!(Language::resolve("EN"), None);
    }

    #[test]
    fn test_unknown_code_falls_back_to_default() {
        assert_eq!(Language::resolve("xx"), Some(Language::Swedish));
        assert_eq!(Language::resolve("de"), Some(Language::Swedish));
    }

    #[test]
    fn test_code_and_display_name_round_trip() {
        for lang in Language::all() {
            assert_eq!(Language::resolve(lang.code()), Some(*lang));
            assert!(!lang.display_name().is_empty());
        }
    }
}
