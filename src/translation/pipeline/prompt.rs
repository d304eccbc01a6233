//! 提示词构造
//!
//! 单条和批量翻译使用固定的英文提示词模板。批量模板把待翻译文本
//! 组织成 1 起始的编号列表，响应解析依赖完全相同的编号格式。

use crate::translation::lang::Language;

/// 构造单条翻译提示词
pub fn single_prompt(text: &str, lang: Language) -> String {
    format!(
        "Translate the following English text to {}. Return ONLY the translation, no explanations or additional text:\n\n{}",
        lang.display_name(),
        text
    )
}

/// 构造批量翻译提示词
///
/// 文本按输入顺序编号，从 1 开始。
pub fn batch_prompt(texts: &[&str], lang: Language) -> String {
    let numbered = texts
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}. {}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Translate the following numbered English texts to {}. Return ONLY the translations in the same numbered format, no explanations:\n\n{}",
        lang.display_name(),
        numbered
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_prompt_template() {
        let prompt = single_prompt("Hello", Language::Swedish);
        assert_eq!(
            prompt,
            "Translate the following English text to Swedish. Return ONLY the translation, no explanations or additional text:\n\nHello"
        );
    }

    #[test]
    fn test_batch_prompt_numbering() {
        let prompt = batch_prompt(&["Hello", "World"], Language::Danish);
        assert_eq!(
            prompt,
            "Translate the following numbered English texts to Danish. Return ONLY the translations in the same numbered format, no explanations:\n\n1. Hello\n2. World"
        );
    }

    #[test]
    fn test_batch_prompt_single_item() {
        let prompt = batch_prompt(&["Only one"], Language::Finnish);
        assert!(prompt.contains("to Finnish"));
        assert!(prompt.ends_with("1. Only one"));
    }
}
