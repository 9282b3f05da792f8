//! 级联处理器
//!
//! 每个处理器只负责一类意图；层级之间措辞不同的处理器带一个 Tier 参数。

pub mod analysis;
pub mod calculation;
pub mod chart;
pub mod code;
pub mod conversation;
pub mod entertainment;
pub mod fallback;
pub mod file;
pub mod help;
pub mod research;
pub mod social;
pub mod stock;
pub mod utility;
pub mod website;

use std::sync::atomic::{AtomicUsize, Ordering};

pub use analysis::AnalysisHandler;
pub use calculation::CalculationHandler;
pub use chart::ChartHandler;
pub use code::CodeHandler;
pub use conversation::{PersonalHandler, PhilosophyHandler};
pub use entertainment::JokeHandler;
pub use fallback::FallbackHandler;
pub use file::FileHandler;
pub use help::HelpHandler;
pub use research::{QuickLookupHandler, ResearchHandler};
pub use social::{SocialHandler, SocialKind};
pub use stock::StockHandler;
pub use utility::{DateHandler, TimeHandler, WeatherHandler};
pub use website::WebsiteHandler;

/// 在多条措辞间轮换（替代随机选择，输出可复现）
#[derive(Debug, Default)]
pub(crate) struct Rotation(AtomicUsize);

impl Rotation {
    pub(crate) fn pick<'a>(&self, options: &[&'a str]) -> &'a str {
        if options.is_empty() {
            return "";
        }
        let i = self.0.fetch_add(1, Ordering::Relaxed);
        options[i % options.len()]
    }
}

/// 整数值不带小数，其余保留两位
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_cycles() {
        let r = Rotation::default();
        let opts = ["a", "b"];
        assert_eq!(r.pick(&opts), "a");
        assert_eq!(r.pick(&opts), "b");
        assert_eq!(r.pick(&opts), "a");
        assert_eq!(r.pick(&[]), "");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(8.0), "8");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.50");
    }
}
