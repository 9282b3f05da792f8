//! 实用查询：时间、日期、天气

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use tracing::warn;

use crate::cascade::{Handler, HandlerContext, HandlerResult};
use crate::core::CascadeError;
use crate::sources::WeatherSource;

/// 城市名候选中需要排除的尾词
const CITY_FILLERS: &[&str] = &["weather", "today", "now", "tomorrow", "please", "temperature"];

const CITY_PROMPT: &str =
    "I can check the weather if you tell me which city! Just ask 'weather in London' for example. 🌍";

pub struct TimeHandler;

#[async_trait]
impl Handler for TimeHandler {
    fn name(&self) -> &str {
        "time"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.time
    }

    async fn handle(&self, _ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let now = Local::now().format("%I:%M %p");
        Ok(Some(HandlerResult::conversational(
            format!("It's {now} right now! ⏰ Is there something time-sensitive you need help with?"),
            0.97,
        )))
    }
}

pub struct DateHandler;

#[async_trait]
impl Handler for DateHandler {
    fn name(&self) -> &str {
        "date"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.date
    }

    async fn handle(&self, _ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let today = Local::now().format("%A, %B %d, %Y");
        Ok(Some(HandlerResult::conversational(
            format!("Today is {today}! 📅 Anything special planned for today?"),
            0.97,
        )))
    }
}

/// 城市提取：`in` 之后的词；否则取末词（首字母大写且不是填充词）
pub fn extract_city(raw: &str) -> Option<String> {
    let words: Vec<&str> = raw.split_whitespace().collect();
    let clean = |w: &str| w.trim_matches(|c: char| matches!(c, '?' | '.' | '!' | ',')).to_string();

    if let Some(idx) = words.iter().position(|w| w.eq_ignore_ascii_case("in")) {
        if let Some(next) = words.get(idx + 1) {
            let city = clean(next);
            if !city.is_empty() {
                return Some(city);
            }
        }
    }

    let last = clean(words.last()?);
    let title_cased = last.chars().next().map(char::is_uppercase).unwrap_or(false)
        && last.chars().skip(1).all(|c| !c.is_uppercase());
    if title_cased && !CITY_FILLERS.contains(&last.to_lowercase().as_str()) {
        Some(last)
    } else {
        None
    }
}

pub struct WeatherHandler {
    source: Arc<dyn WeatherSource>,
}

impl WeatherHandler {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Handler for WeatherHandler {
    fn name(&self) -> &str {
        "weather"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.weather
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let Some(city) = extract_city(&ctx.query.raw) else {
            return Ok(Some(HandlerResult::conversational(CITY_PROMPT, 0.90)));
        };

        let report = match self.source.lookup(&city).await {
            Ok(report) => report,
            Err(e) => {
                warn!(city = %city, error = %e, "weather lookup failed");
                None
            }
        };

        Ok(Some(match report {
            Some(r) => HandlerResult::conversational(
                format!(
                    "{}: {}, {:.1}°C, humidity {:.0}%, wind {:.1} km/h 🌤️ Need anything else?",
                    r.place, r.condition, r.temp_c, r.humidity, r.wind_kph
                ),
                0.95,
            ),
            None => HandlerResult::conversational(CITY_PROMPT, 0.90),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentClassifier, Query};
    use crate::sources::mock::StaticWeatherSource;
    use crate::sources::WeatherReport;

    #[test]
    fn test_extract_city() {
        assert_eq!(extract_city("what's the weather in Paris?").as_deref(), Some("Paris"));
        assert_eq!(extract_city("weather London").as_deref(), Some("London"));
        assert_eq!(extract_city("weather Today"), None);
        assert_eq!(extract_city("what is the weather"), None);
        assert_eq!(extract_city(""), None);
    }

    #[tokio::test]
    async fn test_weather_report_and_prompt() {
        let source = StaticWeatherSource::new().with_report(
            "london",
            WeatherReport {
                place: "London, United Kingdom".into(),
                condition: "overcast".into(),
                temp_c: 12.5,
                humidity: 80.0,
                wind_kph: 9.4,
            },
        );
        let handler = WeatherHandler::new(Arc::new(source));

        for (text, expected_conf, needle) in [
            ("weather in London", 0.95, "London, United Kingdom: overcast, 12.5°C"),
            ("weather in Atlantis", 0.90, "which city"),
            ("how is the weather", 0.90, "which city"),
        ] {
            let query = Query::new(text);
            let intent = IntentClassifier::classify(&query);
            let ctx = HandlerContext {
                query: &query,
                intent: &intent,
                history: &[],
                attachment: None,
            };
            assert!(handler.guard(&ctx));
            let result = handler.handle(&ctx).await.unwrap().unwrap();
            assert!((result.confidence - expected_conf).abs() < 1e-6, "{text}");
            assert!(result.text.contains(needle), "{text}: {}", result.text);
        }
    }
}
