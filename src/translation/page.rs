//! 页面字符串包
//!
//! 提供站点通用的键值字符串包（导航、页脚、问卷），配合
//! `TranslationService::translate_keyed` 在渲染前整体预翻译。
//! 键保持稳定，模板按键取值，翻译失败时回退到英文原文。

use std::collections::HashMap;

use crate::translation::core::TranslationService;

/// 顶部导航字符串
pub const HEADER_STRINGS: &[(&str, &str)] = &[
    ("nav_about", "About"),
    ("nav_process", "Process"),
    ("nav_services", "Services"),
    ("nav_faq", "FAQ"),
    ("nav_contact", "Contact"),
    ("nav_cta", "Partner with Us"),
];

/// 页脚字符串
pub const FOOTER_STRINGS: &[(&str, &str)] = &[
    (
        "tagline",
        "Turning ideas into ventures, together. We partner with intrapreneurs to build successful micro-SaaS ventures.",
    ),
    ("process_title", "Process"),
    ("process_approach", "Our Approach"),
    ("process_services", "Services"),
    ("process_partnership", "Partnership"),
    ("company_title", "Company"),
    ("company_about", "About"),
    ("company_faq", "FAQ"),
    ("company_contact", "Contact"),
    ("company_cases", "Case Studies"),
    ("legal_title", "Legal"),
    ("legal_privacy", "Privacy Policy"),
    ("legal_terms", "Terms of Service"),
    ("copyright", "2025 We Venture Studio. All rights reserved."),
];

/// 问卷页字符串
pub const SURVEY_STRINGS: &[(&str, &str)] = &[
    ("page_title", "Share Your Idea"),
    (
        "page_subtitle",
        "We're excited to learn about your vision. Take a few moments to answer these questions.",
    ),
    ("progress", "Progress"),
    ("prev_button", "Previous"),
    ("next_button", "Next"),
    ("submit_button", "Submit"),
    ("success_title", "Thank You!"),
    (
        "success_message",
        "Your responses have been submitted successfully. We'll review your idea and get back to you soon.",
    ),
    ("back_home", "Back to Home"),
    ("yes", "Yes"),
    ("no", "No"),
    ("required", "* Required"),
    ("placeholder_text", "Type your answer..."),
    ("placeholder_email", "your@email.com"),
    ("placeholder_url", "https://example.com"),
    ("placeholder_textarea", "Type your answer here..."),
    ("no_questions", "No survey questions available yet."),
];

/// 把静态字符串包转换为可翻译的键值对
pub fn bundle_pairs(bundle: &[(&str, &str)]) -> Vec<(String, String)> {
    bundle
        .iter()
        .map(|(key, text)| (key.to_string(), text.to_string()))
        .collect()
}

/// 预翻译一个页面字符串包
///
/// 目标语言为英语或未知时原样返回，否则整包走一次批量翻译。
pub async fn translate_bundle(
    service: &TranslationService,
    bundle: &[(&str, &str)],
    lang_code: &str,
) -> HashMap<String, String> {
    let pairs = bundle_pairs(bundle);
    service.translate_keyed(&pairs, lang_code).await
}
