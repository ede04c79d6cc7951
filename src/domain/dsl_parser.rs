//! Strategy DSL parser.
//!
//! Recursive descent parser for the strategy rule grammar. Converts text to
//! the AST with meaningful error messages including character offset and
//! expected/found tokens.
//!
//! ```text
//! strategy      := entry_section exit_section? | exit_section
//! entry_section := "ENTRY" ":" rule_list
//! exit_section  := "EXIT" ":" rule_list
//! rule_list     := rule (bool_op rule)*          left-associative, no precedence
//! rule          := comparison | cross_fn | "(" rule_list ")"
//! comparison    := expression operator expression
//! operator      := ">" | "<" | ">=" | "<=" | "==" | "!="
//!                | "crosses_above" | "crosses_below"
//! bool_op       := "AND" | "OR"
//! expression    := series | indicator | function_call | number | percentage
//!                | "(" expression ")"
//! indicator     := ("sma"|"rsi"|"ema") "(" series ("," number)? ")"
//! ```
//!
//! An indicator's first argument must be a bare series reference; applying
//! an indicator to another indicator's output is rejected at parse time, as
//! is a wrong argument count for any function. Only a crossover call is
//! boolean-valued on its own, so it is the one expression form that can
//! stand alone as a rule without a comparison.

use crate::domain::ast::{BoolOp, CompareOp, Expr, FunctionKind, IndicatorKind, SeriesName, Strategy};
use crate::domain::error::ParseError;

const SERIES_NAMES: [&str; 5] = ["open", "high", "low", "close", "volume"];
const INDICATOR_NAMES: [&str; 3] = ["sma", "ema", "rsi"];

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError {
                message: format!("expected '{}', found '{}'", expected, ch),
                position: self.pos,
            }),
            None => Err(ParseError {
                message: format!("expected '{}', found end of input", expected),
                position: self.pos,
            }),
        }
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        let remaining = self.remaining();
        remaining.starts_with(keyword)
            && (remaining.len() == keyword.len()
                || !remaining[keyword.len()..]
                    .chars()
                    .next()
                    .map(|c| c.is_alphanumeric() || c == '_')
                    .unwrap_or(false))
    }

    fn consume_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn peek_word(&self) -> String {
        let mut word = String::new();
        for ch in self.remaining().chars() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
            } else {
                break;
            }
        }
        if word.is_empty() {
            self.peek()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "end of input".to_string())
        } else {
            word
        }
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let mut has_dot = false;
        let mut digits = 0;

        if self.peek() == Some('-') {
            self.advance();
        }

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits += 1;
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        if digits == 0 {
            return Err(ParseError {
                message: "expected number".to_string(),
                position: start,
            });
        }

        let num_str = &self.input[start..self.pos];
        num_str.parse::<f64>().map_err(|_| ParseError {
            message: format!("invalid number: {}", num_str),
            position: start,
        })
    }

    fn parse_period(&mut self) -> Result<usize, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let value = self.parse_number()?;
        if value < 0.0 || value.fract() != 0.0 {
            return Err(ParseError {
                message: format!("indicator period must be a whole number, found '{}'", value),
                position: start,
            });
        }
        Ok(value as usize)
    }

    fn parse_series(&mut self) -> Result<SeriesName, ParseError> {
        self.skip_whitespace();
        let word = self.peek_word();
        match SeriesName::parse(&word) {
            Ok(series) => {
                self.pos += word.len();
                Ok(series)
            }
            Err(_) => Err(ParseError {
                message: format!(
                    "expected price series (open, high, low, close, volume), found '{}'",
                    word
                ),
                position: self.pos,
            }),
        }
    }

    fn parse_indicator(&mut self, kind: IndicatorKind) -> Result<Expr, ParseError> {
        self.expect_char('(')?;
        let series = self.parse_series()?;
        self.skip_whitespace();
        let period = if self.peek() == Some(',') {
            self.advance();
            self.parse_period()?
        } else {
            kind.default_period()
        };
        self.expect_char(')')?;
        Ok(Expr::Indicator {
            kind,
            series,
            period,
        })
    }

    fn parse_function_call(&mut self, kind: FunctionKind, name_pos: usize) -> Result<Expr, ParseError> {
        self.expect_char('(')?;
        let mut args = vec![self.parse_expression()?];
        loop {
            self.skip_whitespace();
            if self.peek() == Some(',') {
                self.advance();
                args.push(self.parse_expression()?);
            } else {
                break;
            }
        }
        self.expect_char(')')?;

        let expected = match kind {
            FunctionKind::Yesterday | FunctionKind::LastWeek => 1,
            FunctionKind::NDaysAgo
            | FunctionKind::Change
            | FunctionKind::PercentChange
            | FunctionKind::CrossesAbove
            | FunctionKind::CrossesBelow => 2,
        };
        if args.len() != expected {
            return Err(ParseError {
                message: format!(
                    "{} takes {} argument(s), found {}",
                    kind,
                    expected,
                    args.len()
                ),
                position: name_pos,
            });
        }

        Ok(Expr::FunctionCall { kind, args })
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.skip_whitespace();

        if self
            .peek()
            .is_some_and(|ch| ch.is_ascii_digit() || ch == '-' || ch == '.')
        {
            let num = self.parse_number()?;
            if self.peek() == Some('%') {
                self.advance();
                return Ok(Expr::Percent(num));
            }
            return Ok(Expr::Number(num));
        }

        if self.peek() == Some('(') {
            self.advance();
            let expr = self.parse_expression()?;
            self.expect_char(')')?;
            return Ok(expr);
        }

        let word = self.peek_word();

        if SERIES_NAMES.contains(&word.as_str()) {
            return self.parse_series().map(Expr::Series);
        }

        if INDICATOR_NAMES.contains(&word.as_str()) {
            let kind = match word.as_str() {
                "sma" => IndicatorKind::Sma,
                "ema" => IndicatorKind::Ema,
                "rsi" => IndicatorKind::Rsi,
                _ => unreachable!(),
            };
            self.pos += word.len();
            return self.parse_indicator(kind);
        }

        if let Ok(kind) = FunctionKind::parse(&word) {
            let name_pos = self.pos;
            self.pos += word.len();
            return self.parse_function_call(kind, name_pos);
        }

        Err(ParseError {
            message: format!("expected expression, found '{}'", word),
            position: self.pos,
        })
    }

    /// Try to consume a comparison operator. Returns `None` when the next
    /// token does not start one, leaving the position untouched.
    fn parse_compare_op(&mut self) -> Result<Option<CompareOp>, ParseError> {
        self.skip_whitespace();

        // Longest match first.
        for (symbol, op) in [
            (">=", CompareOp::Ge),
            ("<=", CompareOp::Le),
            ("==", CompareOp::Eq),
            ("!=", CompareOp::Ne),
            (">", CompareOp::Gt),
            ("<", CompareOp::Lt),
        ] {
            if self.remaining().starts_with(symbol) {
                self.pos += symbol.len();
                return Ok(Some(op));
            }
        }

        if self.consume_keyword("crosses_above") {
            return Ok(Some(CompareOp::CrossesAbove));
        }
        if self.consume_keyword("crosses_below") {
            return Ok(Some(CompareOp::CrossesBelow));
        }

        match self.peek() {
            Some(ch @ ('=' | '!')) => Err(ParseError {
                message: format!("expected operator, found '{}'", ch),
                position: self.pos,
            }),
            _ => Ok(None),
        }
    }

    fn comparison_operator_ahead(&self) -> bool {
        let rest = self.remaining().trim_start();
        if rest.starts_with('>')
            || rest.starts_with('<')
            || rest.starts_with("==")
            || rest.starts_with("!=")
        {
            return true;
        }
        ["crosses_above", "crosses_below"].iter().any(|kw| {
            rest.starts_with(kw)
                && !rest[kw.len()..]
                    .chars()
                    .next()
                    .map(|c| c.is_alphanumeric() || c == '_')
                    .unwrap_or(false)
        })
    }

    /// A comparison, or a bare crossover call. Any other expression is not
    /// boolean-valued and cannot stand alone as a rule.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_expression()?;
        match self.parse_compare_op()? {
            Some(op) => {
                let right = self.parse_expression()?;
                Ok(Expr::BinaryOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            None => match left {
                Expr::FunctionCall {
                    kind: FunctionKind::CrossesAbove | FunctionKind::CrossesBelow,
                    ..
                } => Ok(left),
                _ => Err(ParseError {
                    message: format!("expected operator, found '{}'", self.peek_word()),
                    position: self.pos,
                }),
            },
        }
    }

    fn parse_rule(&mut self) -> Result<Expr, ParseError> {
        self.skip_whitespace();

        // An opening paren may group a rule list or an expression inside a
        // comparison. Try the rule list reading; if a comparison operator
        // follows the closing paren the paren belonged to an expression, so
        // rewind and reparse.
        if self.peek() == Some('(') {
            let saved = self.pos;
            self.advance();
            if let Ok(group) = self.parse_rule_list() {
                if self.expect_char(')').is_ok() && !self.comparison_operator_ahead() {
                    return Ok(group);
                }
            }
            self.pos = saved;
        }

        self.parse_comparison()
    }

    fn parse_rule_list(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_rule()?;
        loop {
            self.skip_whitespace();
            let op = if self.consume_keyword("AND") {
                BoolOp::And
            } else if self.consume_keyword("OR") {
                BoolOp::Or
            } else {
                break;
            };
            let right = self.parse_rule()?;
            expr = Expr::BooleanOp {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_strategy(&mut self) -> Result<Strategy, ParseError> {
        let mut strategy = Strategy::default();

        self.skip_whitespace();
        if self.consume_keyword("ENTRY") {
            self.expect_char(':')?;
            strategy.entry = Some(self.parse_rule_list()?);
            self.skip_whitespace();
        }

        if self.consume_keyword("EXIT") {
            self.expect_char(':')?;
            strategy.exit = Some(self.parse_rule_list()?);
        }

        if strategy.entry.is_none() && strategy.exit.is_none() {
            return Err(ParseError {
                message: format!("expected 'ENTRY' or 'EXIT', found '{}'", self.peek_word()),
                position: self.pos,
            });
        }

        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(ParseError {
                message: format!("unexpected input after rules: '{}'", self.remaining()),
                position: self.pos,
            });
        }

        Ok(strategy)
    }
}

/// Parse strategy text into its AST.
pub fn parse(input: &str) -> Result<Strategy, ParseError> {
    let mut parser = Parser::new(input);
    parser.parse_strategy()
}
