//! 二元算术：`<a> <op> <b>`

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use super::format_number;
use crate::cascade::{Handler, HandlerContext, HandlerResult};
use crate::core::CascadeError;

const CONFIDENCE: f32 = 0.91;
const OFFER_TEXT: &str = "I can help with calculations! Just give me the numbers and what operation you need. \
     I'll get you the answer quickly!";

fn expression_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(-?\d+(?:\.\d+)?)\s*(plus|minus|times|multiplied by|divided by|\+|-|\*|x|/)\s*(-?\d+(?:\.\d+)?)",
        )
        .expect("valid expression regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "plus" | "+" => Some(Self::Add),
            "minus" | "-" => Some(Self::Subtract),
            "times" | "multiplied by" | "*" | "x" => Some(Self::Multiply),
            "divided by" | "/" => Some(Self::Divide),
            _ => None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Expression {
    lhs: f64,
    op: Operator,
    rhs: f64,
}

impl Expression {
    fn parse(normalized: &str) -> Option<Self> {
        let caps = expression_re().captures(normalized)?;
        Some(Self {
            lhs: caps[1].parse().ok()?,
            op: Operator::parse(&caps[2])?,
            rhs: caps[3].parse().ok()?,
        })
    }

    /// 除数为零时返回 None
    fn evaluate(&self) -> Option<f64> {
        match self.op {
            Operator::Add => Some(self.lhs + self.rhs),
            Operator::Subtract => Some(self.lhs - self.rhs),
            Operator::Multiply => Some(self.lhs * self.rhs),
            Operator::Divide if self.rhs == 0.0 => None,
            Operator::Divide => Some(self.lhs / self.rhs),
        }
    }
}

fn answer(normalized: &str) -> String {
    let Some(expr) = Expression::parse(normalized) else {
        return OFFER_TEXT.to_string();
    };
    let (a, op, b) = (format_number(expr.lhs), expr.op.symbol(), format_number(expr.rhs));
    match expr.evaluate() {
        Some(r) => format!("{a} {op} {b} = {} 🧮 Need another calculation?", format_number(r)),
        None => format!("{a} {op} {b} can't be computed, since division by zero is undefined. Try a different divisor!"),
    }
}

pub struct CalculationHandler;

#[async_trait]
impl Handler for CalculationHandler {
    fn name(&self) -> &str {
        "calculation"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.calculation
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        Ok(Some(HandlerResult::conversational(
            answer(&ctx.query.normalized),
            CONFIDENCE,
        )))
    }
}
