//! 内置代码片段目录（默认的 CodeSearchSource）
//!
//! 按关键词匹配条目，再取请求语言的版本；该语言没有版本时退回条目的第一个版本。
//! 条目顺序即匹配优先级：具体算法在前，泛化的 function / loop 模板在后。

use async_trait::async_trait;

use super::{CodeSearchSource, CodeSnippet};
use crate::intent::CodeLanguage;

struct Entry {
    title: &'static str,
    keywords: &'static [&'static str],
    explanation: &'static str,
    variants: &'static [(CodeLanguage, &'static str)],
}

const BINARY_SEARCH_PY: &str = r#"def binary_search(items, target):
    low, high = 0, len(items) - 1
    while low <= high:
        mid = (low + high) // 2
        if items[mid] == target:
            return mid
        if items[mid] < target:
            low = mid + 1
        else:
            high = mid - 1
    return -1


print(binary_search([1, 3, 5, 7, 9, 11], 7))  # 3"#;

const BINARY_SEARCH_JS: &str = r#"function binarySearch(items, target) {
  let low = 0;
  let high = items.length - 1;
  while (low <= high) {
    const mid = Math.floor((low + high) / 2);
    if (items[mid] === target) return mid;
    if (items[mid] < target) low = mid + 1;
    else high = mid - 1;
  }
  return -1;
}

console.log(binarySearch([1, 3, 5, 7, 9, 11], 7)); // 3"#;

const BINARY_SEARCH_RS: &str = r#"fn binary_search(items: &[i32], target: i32) -> Option<usize> {
    let (mut low, mut high) = (0usize, items.len());
    while low < high {
        let mid = low + (high - low) / 2;
        match items[mid].cmp(&target) {
            std::cmp::Ordering::Equal => return Some(mid),
            std::cmp::Ordering::Less => low = mid + 1,
            std::cmp::Ordering::Greater => high = mid,
        }
    }
    None
}

fn main() {
    println!("{:?}", binary_search(&[1, 3, 5, 7, 9, 11], 7)); // Some(3)
}"#;

const BUBBLE_SORT_PY: &str = r#"def bubble_sort(items):
    items = list(items)
    n = len(items)
    for i in range(n):
        swapped = False
        for j in range(0, n - i - 1):
            if items[j] > items[j + 1]:
                items[j], items[j + 1] = items[j + 1], items[j]
                swapped = True
        if not swapped:
            break
    return items


print(bubble_sort([64, 34, 25, 12, 22, 11, 90]))"#;

const BUBBLE_SORT_JS: &str = r#"function bubbleSort(input) {
  const items = [...input];
  for (let i = 0; i < items.length; i++) {
    let swapped = false;
    for (let j = 0; j < items.length - i - 1; j++) {
      if (items[j] > items[j + 1]) {
        [items[j], items[j + 1]] = [items[j + 1], items[j]];
        swapped = true;
      }
    }
    if (!swapped) break;
  }
  return items;
}

console.log(bubbleSort([64, 34, 25, 12, 22, 11, 90]));"#;

const FIBONACCI_PY: &str = r#"def fibonacci(n):
    a, b = 0, 1
    sequence = []
    for _ in range(n):
        sequence.append(a)
        a, b = b, a + b
    return sequence


print(fibonacci(10))  # [0, 1, 1, 2, 3, 5, 8, 13, 21, 34]"#;

const FIBONACCI_RS: &str = r#"fn fibonacci(n: usize) -> Vec<u64> {
    let mut seq = Vec::with_capacity(n);
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        seq.push(a);
        (a, b) = (b, a + b);
    }
    seq
}

fn main() {
    println!("{:?}", fibonacci(10));
}"#;

const FACTORIAL_PY: &str = r#"def factorial(n):
    if n < 0:
        raise ValueError("n must be non-negative")
    result = 1
    for i in range(2, n + 1):
        result *= i
    return result


print(factorial(5))  # 120"#;

const FACTORIAL_JAVA: &str = r#"public class Factorial {
    static long factorial(int n) {
        long result = 1;
        for (int i = 2; i <= n; i++) {
            result *= i;
        }
        return result;
    }

    public static void main(String[] args) {
        System.out.println(factorial(5)); // 120
    }
}"#;

const REVERSE_PY: &str = r#"def reverse_string(text):
    return text[::-1]


print(reverse_string("hello"))  # olleh"#;

const REVERSE_JS: &str = r#"const reverseString = (text) => [...text].reverse().join("");

console.log(reverseString("hello")); // olleh"#;

const FUNCTION_PY: &str = r#"def greet(name):
    """Return a friendly greeting."""
    return f"Hello, {name}!"


print(greet("World"))"#;

const FUNCTION_JS: &str = r#"function greet(name) {
  return `Hello, ${name}!`;
}

console.log(greet("World"));"#;

const FUNCTION_JAVA: &str = r#"public class Main {
    static String greet(String name) {
        return "Hello, " + name + "!";
    }

    public static void main(String[] args) {
        System.out.println(greet("World"));
    }
}"#;

const FUNCTION_CPP: &str = r#"#include <iostream>
#include <string>

std::string greet(const std::string& name) {
    return "Hello, " + name + "!";
}

int main() {
    std::cout << greet("World") << std::endl;
    return 0;
}"#;

const FUNCTION_RS: &str = r#"fn greet(name: &str) -> String {
    format!("Hello, {name}!")
}

fn main() {
    println!("{}", greet("World"));
}"#;

const LOOP_PY: &str = r#"fruits = ["apple", "banana", "cherry"]
for index, fruit in enumerate(fruits):
    print(index, fruit)"#;

const LOOP_JS: &str = r#"const fruits = ["apple", "banana", "cherry"];
fruits.forEach((fruit, index) => console.log(index, fruit));"#;

const QUERY_SQL: &str = r#"SELECT department, COUNT(*) AS employees, AVG(salary) AS avg_salary
FROM staff
WHERE active = TRUE
GROUP BY department
ORDER BY avg_salary DESC;"#;

const CATALOG: &[Entry] = &[
    Entry {
        title: "Binary Search",
        keywords: &["binary search"],
        explanation: "Binary search halves a sorted range on every step, so it finds an element in O(log n) comparisons.",
        variants: &[
            (CodeLanguage::Python, BINARY_SEARCH_PY),
            (CodeLanguage::JavaScript, BINARY_SEARCH_JS),
            (CodeLanguage::Rust, BINARY_SEARCH_RS),
        ],
    },
    Entry {
        title: "Bubble Sort",
        keywords: &["bubble sort", "sort"],
        explanation: "Bubble sort repeatedly swaps adjacent out-of-order elements and stops early once a pass makes no swaps.",
        variants: &[
            (CodeLanguage::Python, BUBBLE_SORT_PY),
            (CodeLanguage::JavaScript, BUBBLE_SORT_JS),
        ],
    },
    Entry {
        title: "Fibonacci Sequence",
        keywords: &["fibonacci"],
        explanation: "Each Fibonacci number is the sum of the two before it; the iterative version runs in linear time.",
        variants: &[
            (CodeLanguage::Python, FIBONACCI_PY),
            (CodeLanguage::Rust, FIBONACCI_RS),
        ],
    },
    Entry {
        title: "Factorial",
        keywords: &["factorial"],
        explanation: "The factorial of n multiplies every integer from 1 to n.",
        variants: &[
            (CodeLanguage::Python, FACTORIAL_PY),
            (CodeLanguage::Java, FACTORIAL_JAVA),
        ],
    },
    Entry {
        title: "Reverse a String",
        keywords: &["reverse a string", "reverse string", "reverse"],
        explanation: "Reversing walks the characters from the end to the start.",
        variants: &[
            (CodeLanguage::Python, REVERSE_PY),
            (CodeLanguage::JavaScript, REVERSE_JS),
        ],
    },
    Entry {
        title: "SQL Aggregate Query",
        keywords: &["sql", "query"],
        explanation: "GROUP BY buckets rows and aggregate functions summarize each bucket.",
        variants: &[(CodeLanguage::Sql, QUERY_SQL)],
    },
    Entry {
        title: "Function",
        keywords: &["function", "method", "hello world"],
        explanation: "A function takes parameters and returns a value, keeping logic reusable.",
        variants: &[
            (CodeLanguage::Python, FUNCTION_PY),
            (CodeLanguage::JavaScript, FUNCTION_JS),
            (CodeLanguage::Java, FUNCTION_JAVA),
            (CodeLanguage::Cpp, FUNCTION_CPP),
            (CodeLanguage::Rust, FUNCTION_RS),
        ],
    },
    Entry {
        title: "Loop",
        keywords: &["loop", "iterate"],
        explanation: "A loop visits each element of a collection in turn.",
        variants: &[
            (CodeLanguage::Python, LOOP_PY),
            (CodeLanguage::JavaScript, LOOP_JS),
        ],
    },
];

/// 内置片段目录
#[derive(Debug, Default, Clone, Copy)]
pub struct SnippetCatalog;

impl SnippetCatalog {
    pub fn new() -> Self {
        Self
    }

    /// 同步查找（CodeSearchSource 实现即委托于此）
    pub fn find(&self, query: &str, language: CodeLanguage) -> Option<CodeSnippet> {
        let text = query.to_lowercase();
        let entry = CATALOG
            .iter()
            .find(|e| e.keywords.iter().any(|k| text.contains(k)))?;
        let (lang, code) = entry
            .variants
            .iter()
            .find(|(l, _)| *l == language)
            .or_else(|| entry.variants.first())?;
        Some(CodeSnippet {
            title: entry.title.to_string(),
            language: *lang,
            code: (*code).to_string(),
            explanation: entry.explanation.to_string(),
        })
    }
}

#[async_trait]
impl CodeSearchSource for SnippetCatalog {
    async fn search(&self, query: &str, language: CodeLanguage) -> Option<CodeSnippet> {
        self.find(query, language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_search_in_requested_language() {
        let snippet = SnippetCatalog::new()
            .find("binary search in javascript", CodeLanguage::JavaScript)
            .unwrap();
        assert_eq!(snippet.title, "Binary Search");
        assert_eq!(snippet.language, CodeLanguage::JavaScript);
        assert!(snippet.code.contains("function binarySearch"));
    }

    #[test]
    fn test_falls_back_to_first_variant() {
        let snippet = SnippetCatalog::new()
            .find("bubble sort please", CodeLanguage::Cpp)
            .unwrap();
        assert_eq!(snippet.language, CodeLanguage::Python);
    }

    #[test]
    fn test_unknown_request_finds_nothing() {
        assert!(SnippetCatalog::new()
            .find("write code for a quantum compiler", CodeLanguage::Python)
            .is_none());
    }
}
