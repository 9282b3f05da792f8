//! 关键词意图分类器（纯函数，无 I/O）
//!
//! 每个类别标志 = 规范化文本是否包含该类别触发词中的任一个（子串匹配，不做词边界判断）。

use std::sync::OnceLock;

use regex::Regex;

use super::{CodeLanguage, Complexity, Depth, IntentDescriptor, Query, TopicFlags};

const GREETING: &[&str] = &["hi", "hello", "hey", "greetings", "howdy"];
const FAREWELL: &[&str] = &["bye", "goodbye", "see you", "farewell", "later"];
const GRATITUDE: &[&str] = &["thanks", "thank you", "appreciate", "grateful"];
const PERSONAL_STATUS: &[&str] = &["how are you", "how you doing"];
const IDENTITY: &[&str] = &["your name", "who are you", "what are you"];
const ENTERTAINMENT: &[&str] = &["joke", "funny", "laugh"];
const TIME: &[&str] = &["time", "what time", "current time"];
const DATE: &[&str] = &["date", "today", "what day"];
const HELP: &[&str] = &["help", "what can you do"];
const WEATHER: &[&str] = &["weather", "temperature", "rain", "sunny"];
const CALCULATION: &[&str] = &["calculate", "math", "plus", "minus", "times", "divided"];

const KNOWLEDGE: &[&str] = &[
    "what is", "who is", "how does", "explain", "tell me about", "what are", "define",
    "describe", "history of", "invented", "discovered", "when did", "where is", "why does",
];

const CODE: &[&str] = &[
    "code", "function", "program", "script", "syntax", "algorithm", "snippet",
    "binary search", "bubble sort", "quick sort", "merge sort", "linked list", "fibonacci",
    "factorial", "reverse a string",
];

const CHART: &[&str] = &["chart", "graph", "visualization", "plot", "histogram"];
const WEBSITE_NOUNS: &[&str] = &["website", "web site", "page"];
const WEBSITE_VERBS: &[&str] = &["build", "create", "make", "design", "setup"];
const STOCK: &[&str] = &["stock", "share price", "ticker", "market cap"];
const FILE: &[&str] = &["file", "document", "pdf", "upload", "attachment", "spreadsheet"];
const ANALYSIS: &[&str] = &["analyze", "stats", "statistics", "mean", "average", "data"];

const RESEARCH_INDICATORS: &[&str] = &[
    "research", "tell me about", "what is", "who is", "explain", "history of", "science of",
    "how does", "why does", "information about", "learn about", "tell me more about",
    "details about", "wikipedia", "discovered", "invented", "founded", "created by",
    "origin of", "biology", "chemistry", "physics", "astronomy", "geography", "country",
    "capital", "population", "famous for",
];

const CONVERSATION_INDICATORS: &[&str] = &[
    "how are you", "how do you feel", "what do you think", "your opinion", "chat", "talk",
    "conversation", "just saying", "i feel", "i think", "my day", "my life", "personal",
    "joke", "funny", "story",
];

/// 深度指示词，按 surface → moderate → deep 的固定顺序检查，先命中者胜
const DEPTH_INDICATORS: &[(Depth, &[&str])] = &[
    (Depth::Surface, &["what is", "who is", "simple", "basic", "quick"]),
    (Depth::Moderate, &["how does", "why does", "explain", "tell me about"]),
    (
        Depth::Deep,
        &["analyze", "comprehensive", "detailed", "in-depth", "research", "history of", "science of"],
    ),
];

/// 语言检测顺序（javascript 必须先于 java）
const LANGUAGES: &[(CodeLanguage, &[&str])] = &[
    (CodeLanguage::Python, &["python", "py "]),
    (CodeLanguage::JavaScript, &["javascript", "js "]),
    (CodeLanguage::Java, &["java"]),
    (CodeLanguage::Cpp, &["c++", "cpp", "c plus plus"]),
    (CodeLanguage::Html, &["html"]),
    (CodeLanguage::Css, &["css"]),
    (CodeLanguage::Sql, &["sql"]),
    (CodeLanguage::Rust, &["rust"]),
];

const SCIENCE: &[&str] = &["science", "physics", "chemistry", "biology", "research"];
const HISTORY: &[&str] = &["history", "ancient", "century", "war", "civilization"];
const TECHNOLOGY: &[&str] = &["technology", "computer", "internet", "software", "ai"];
const GEOGRAPHY: &[&str] = &["country", "capital", "city", "continent", "population"];
const PERSONAL: &[&str] = &["i feel", "i think", "my opinion", "in my experience"];
const PHILOSOPHY: &[&str] = &["meaning", "philosophy", "why do we", "purpose", "existence"];

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

fn count_matches(text: &str, phrases: &[&str]) -> usize {
    phrases.iter().filter(|p| text.contains(*p)).count()
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number regex"))
}

/// 抽取文本中的所有数字（整数或小数，允许负号）
pub fn extract_numbers(text: &str) -> Vec<f64> {
    number_regex()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// 意图分类器
pub struct IntentClassifier;

impl IntentClassifier {
    /// 由规范化文本计算意图描述；同一输入永远得到同一结果
    pub fn classify(query: &Query) -> IntentDescriptor {
        let text = query.normalized.as_str();
        let has_digit = text.chars().any(|c| c.is_ascii_digit());

        IntentDescriptor {
            greeting: contains_any(text, GREETING),
            farewell: contains_any(text, FAREWELL),
            gratitude: contains_any(text, GRATITUDE),
            personal_status: contains_any(text, PERSONAL_STATUS),
            identity: contains_any(text, IDENTITY),
            entertainment: contains_any(text, ENTERTAINMENT),
            time: contains_any(text, TIME),
            date: contains_any(text, DATE),
            help: contains_any(text, HELP),
            weather: contains_any(text, WEATHER),
            calculation: contains_any(text, CALCULATION),
            knowledge: contains_any(text, KNOWLEDGE),
            research: Self::is_research(text),
            code: contains_any(text, CODE),
            chart: contains_any(text, CHART),
            website: contains_any(text, WEBSITE_NOUNS) && contains_any(text, WEBSITE_VERBS),
            stock: contains_any(text, STOCK),
            file_related: contains_any(text, FILE),
            data_analysis: extract_numbers(text).len() >= 3 && contains_any(text, ANALYSIS),
            simple_task: (1..=3).contains(&query.word_count) && !has_digit,
            depth: Self::depth(text),
            topics: Self::topics(text),
            code_language: Self::code_language(text),
            complexity: Self::complexity(text, query.word_count),
        }
    }

    /// 研究 vs 对话：对话指示词多于研究指示词时判为对话，否则有研究指示词即为研究
    pub fn is_research(text: &str) -> bool {
        let research = count_matches(text, RESEARCH_INDICATORS);
        let conversation = count_matches(text, CONVERSATION_INDICATORS);
        if conversation > research {
            return false;
        }
        research > 0
    }

    pub fn depth(text: &str) -> Depth {
        DEPTH_INDICATORS
            .iter()
            .find(|(_, indicators)| contains_any(text, indicators))
            .map(|(depth, _)| *depth)
            .unwrap_or_default()
    }

    fn topics(text: &str) -> TopicFlags {
        TopicFlags {
            science: contains_any(text, SCIENCE),
            history: contains_any(text, HISTORY),
            technology: contains_any(text, TECHNOLOGY),
            geography: contains_any(text, GEOGRAPHY),
            personal: contains_any(text, PERSONAL),
            philosophy: contains_any(text, PHILOSOPHY),
        }
    }

    fn code_language(text: &str) -> CodeLanguage {
        LANGUAGES
            .iter()
            .find(|(_, keywords)| contains_any(text, keywords))
            .map(|(lang, _)| *lang)
            .unwrap_or_default()
    }

    fn complexity(text: &str, word_count: usize) -> Complexity {
        let questions = text.matches('?').count();
        if word_count > 15 || questions >= 2 {
            Complexity::Complex
        } else if word_count > 8 || questions == 1 {
            Complexity::Moderate
        } else {
            Complexity::Simple
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> IntentDescriptor {
        IntentClassifier::classify(&Query::new(text))
    }

    #[test]
    fn test_classification_is_deterministic() {
        let a = classify("Tell me about the history of Rome");
        let b = classify("Tell me about the history of Rome");
        assert_eq!(a, b);
    }

    #[test]
    fn test_blank_input_sets_no_flag() {
        for text in ["", "   ", "\n\t"] {
            let d = classify(text);
            assert!(!d.any_flag(), "flags set for {text:?}: {:?}", d.active_flags().collect::<Vec<_>>());
            assert_eq!(d.depth, Depth::Surface);
        }
    }

    #[test]
    fn test_surface_wins_over_deep() {
        // 同时命中 surface（what is）与 deep（research）
        let d = classify("what is the research on sleep");
        assert_eq!(d.depth, Depth::Surface);
        assert_eq!(classify("explain photosynthesis").depth, Depth::Moderate);
        assert_eq!(classify("comprehensive overview of jazz").depth, Depth::Deep);
        assert_eq!(classify("jazz").depth, Depth::Surface);
    }

    #[test]
    fn test_research_vs_conversation() {
        assert!(IntentClassifier::is_research("tell me about the capital of peru"));
        // 对话指示词多于研究指示词
        assert!(!IntentClassifier::is_research("i think my day was funny, what is up"));
        assert!(!IntentClassifier::is_research("nice weather"));
    }

    #[test]
    fn test_simple_task_rules() {
        assert!(classify("quantum entanglement").simple_task);
        assert!(!classify("route 66 facts").simple_task);
        assert!(!classify("one two three four").simple_task);
    }

    #[test]
    fn test_code_flags_and_language() {
        let d = classify("binary search");
        assert!(d.code);
        assert!(!d.research);
        assert_eq!(d.code_language, CodeLanguage::Python);

        assert_eq!(classify("write a javascript function").code_language, CodeLanguage::JavaScript);
        assert_eq!(classify("java program for sorting").code_language, CodeLanguage::Java);
    }

    #[test]
    fn test_website_needs_noun_and_verb() {
        assert!(classify("build me a portfolio website").website);
        assert!(!classify("my favourite website").website);
    }

    #[test]
    fn test_data_analysis_needs_three_numbers() {
        assert!(classify("analyze 4, 8, 15 and 16").data_analysis);
        assert!(!classify("analyze 4 and 8").data_analysis);
        assert_eq!(extract_numbers("values -2, 3.5 and 10"), vec![-2.0, 3.5, 10.0]);
    }

    #[test]
    fn test_flags_cooccur() {
        let d = classify("hello, what is the weather today?");
        assert!(d.greeting && d.weather && d.date && d.knowledge);
        assert_eq!(d.complexity, Complexity::Moderate);
    }
}
