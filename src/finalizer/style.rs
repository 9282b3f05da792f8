//! 口语化点缀（纯装饰，只作用于 conversational 结果）
//!
//! InterjectionStyler 用文本自身的哈希选择点缀词与位置，同一输入永远得到同一输出。

use std::sync::OnceLock;

use regex::Regex;

use crate::config::StyleSection;

/// 用户原文中的口语线索（整词匹配）；刻意不收录 da / le / super / bro 这类常见英文词
const STYLE_CUES: &[&str] = &[
    "macha", "machaa", "machan", "maga", "thika", "sisya", "aliyas", "sakath", "sakkath",
    "tumba", "swalpa", "beda", "beku", "ayyo", "chindi", "bindaas", "jugaad", "ghanta", "pakao",
    "kaand", "faltu", "timepass", "jhol", "funda", "bakwaas", "senti", "jhakas", "jhakaas",
    "maadi", "kelsa", "hogona", "banni", "helu", "samachara", "yelli", "kya", "haal", "bhai",
    "yaar", "kaise", "kalti", "khopdi", "bheja", "dhassu", "eppadi", "irukkenga", "nanba",
    "vanakkam", "yenna", "saappaadu", "thalaiva", "unnavu", "thammudu", "namaskaram", "sangathi",
];

fn cue_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"(?i)\b(?:{})\b", STYLE_CUES.join("|"));
        Regex::new(&pattern).expect("valid style cue regex")
    })
}

/// 用户是否自己在用口语（命中则强制点缀）
pub fn detect_style_cues(text: &str) -> bool {
    cue_re().is_match(text)
}

pub trait TextStyleEnhancer: Send + Sync {
    /// force 为 true 时必定点缀，否则约一半的文本会被点缀
    fn apply(&self, text: &str, force: bool) -> String;
}

/// 不做任何修改
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStyler;

impl TextStyleEnhancer for NoopStyler {
    fn apply(&self, text: &str, _force: bool) -> String {
        text.to_string()
    }
}

/// 在句首或句尾插入一个点缀词
#[derive(Debug, Clone)]
pub struct InterjectionStyler {
    words: Vec<String>,
}

impl InterjectionStyler {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words: words.into_iter().filter(|w| !w.trim().is_empty()).collect(),
        }
    }

    pub fn from_config(cfg: &StyleSection) -> Self {
        Self::new(cfg.interjections.clone())
    }
}

fn text_hash(text: &str) -> u64 {
    text.bytes()
        .fold(0u64, |h, b| h.wrapping_mul(31).wrapping_add(u64::from(b)))
}

impl TextStyleEnhancer for InterjectionStyler {
    fn apply(&self, text: &str, force: bool) -> String {
        if self.words.is_empty() || text.trim().is_empty() {
            return text.to_string();
        }
        let h = text_hash(text);
        if !force && h % 2 == 1 {
            return text.to_string();
        }
        let h = h / 2;
        let word = &self.words[(h % self.words.len() as u64) as usize];
        let at_start = (h / self.words.len() as u64) % 2 == 0;

        if at_start {
            return format!("{word}, {text}");
        }
        let trimmed = text.trim_end();
        match trimmed.chars().last() {
            Some(p @ ('.' | '!' | '?')) => {
                format!("{}, {word}{p}", &trimmed[..trimmed.len() - p.len_utf8()])
            }
            _ => format!("{trimmed}, {word}."),
        }
    }
}
