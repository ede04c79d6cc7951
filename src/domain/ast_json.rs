//! AST JSON interchange for tooling and debugging.
//!
//! The JSON mirrors the tagged-union shape of the AST. The top level holds
//! `entry` and `exit` keys with arrays of rule nodes; an array with more
//! than one node is joined left-associatively with AND on load, and a
//! top-level AND chain is flattened back into the array on save, so the two
//! directions round-trip. Numeric literals are plain JSON numbers.
//!
//! Percent literals are the one deliberate divergence from a plain number
//! encoding: they serialize as a dedicated `{"type": "percent", "value": v}`
//! node so the `%` spelling survives a round trip instead of flattening to a
//! bare number. On load both forms are accepted, along with string literals
//! such as `"5%"`.

use crate::domain::ast::{BoolOp, CompareOp, Expr, FunctionKind, IndicatorKind, SeriesName, Strategy};
use crate::domain::error::StratlangError;
use serde_json::{Map, Value, json};

pub fn to_json(strategy: &Strategy) -> Value {
    let mut root = Map::new();
    if let Some(entry) = &strategy.entry {
        root.insert("entry".into(), Value::Array(flatten_and_chain(entry)));
    }
    if let Some(exit) = &strategy.exit {
        root.insert("exit".into(), Value::Array(flatten_and_chain(exit)));
    }
    Value::Object(root)
}

pub fn from_json(value: &Value) -> Result<Strategy, StratlangError> {
    let root = value.as_object().ok_or_else(|| StratlangError::Data {
        reason: "strategy JSON must be an object with entry/exit keys".into(),
    })?;

    let entry = root.get("entry").map(rules_from_value).transpose()?;
    let exit = root.get("exit").map(rules_from_value).transpose()?;

    if entry.is_none() && exit.is_none() {
        return Err(StratlangError::Data {
            reason: "strategy JSON needs at least one of entry/exit".into(),
        });
    }

    Ok(Strategy { entry, exit })
}

/// Split a left-associative AND chain into its constituent rules, in
/// source order.
fn flatten_and_chain(expr: &Expr) -> Vec<Value> {
    match expr {
        Expr::BooleanOp {
            op: BoolOp::And,
            left,
            right,
        } => {
            let mut nodes = flatten_and_chain(left);
            nodes.push(expr_to_value(right));
            nodes
        }
        other => vec![expr_to_value(other)],
    }
}

fn expr_to_value(expr: &Expr) -> Value {
    match expr {
        Expr::Series(name) => json!({ "type": "series", "name": name.to_string() }),
        Expr::Indicator {
            kind,
            series,
            period,
        } => json!({
            "type": "indicator",
            "name": kind.to_string(),
            "series": series.to_string(),
            "period": period,
        }),
        Expr::FunctionCall { kind, args } => json!({
            "type": "function_call",
            "name": kind.to_string(),
            "args": args.iter().map(expr_to_value).collect::<Vec<_>>(),
        }),
        Expr::BinaryOp { op, left, right } => json!({
            "type": "binary_op",
            "operator": op.to_string(),
            "left": expr_to_value(left),
            "right": expr_to_value(right),
        }),
        Expr::BooleanOp { op, left, right } => json!({
            "type": "boolean_op",
            "operator": op.to_string(),
            "left": expr_to_value(left),
            "right": expr_to_value(right),
        }),
        Expr::Number(v) => number_value(*v),
        Expr::Percent(v) => json!({ "type": "percent", "value": v }),
    }
}

fn number_value(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        json!(v as i64)
    } else {
        json!(v)
    }
}

/// Join an array of rule nodes with implicit AND; a single node stands
/// alone without a wrapper.
fn rules_from_value(value: &Value) -> Result<Expr, StratlangError> {
    let nodes = match value {
        Value::Array(nodes) => nodes.as_slice(),
        single => std::slice::from_ref(single),
    };

    let mut exprs = nodes.iter().map(expr_from_value);
    let first = exprs.next().ok_or_else(|| StratlangError::Data {
        reason: "rule array is empty".into(),
    })??;

    exprs.try_fold(first, |acc, next| {
        Ok(Expr::BooleanOp {
            op: BoolOp::And,
            left: Box::new(acc),
            right: Box::new(next?),
        })
    })
}

fn expr_from_value(value: &Value) -> Result<Expr, StratlangError> {
    match value {
        Value::Number(n) => {
            let v = n.as_f64().ok_or_else(|| StratlangError::InvalidLiteral {
                value: n.to_string(),
            })?;
            Ok(Expr::Number(v))
        }
        // Bare strings: a known column name, a numeric literal, or a
        // percentage. Anything else is an invalid literal.
        Value::String(s) => expr_from_bare_string(s),
        Value::Object(obj) => expr_from_object(obj),
        other => Err(StratlangError::InvalidLiteral {
            value: other.to_string(),
        }),
    }
}

fn expr_from_bare_string(s: &str) -> Result<Expr, StratlangError> {
    if let Ok(series) = SeriesName::parse(s) {
        return Ok(Expr::Series(series));
    }
    if let Some(stripped) = s.strip_suffix('%') {
        if let Ok(v) = stripped.trim().parse::<f64>() {
            return Ok(Expr::Percent(v));
        }
    }
    if let Ok(v) = s.parse::<f64>() {
        return Ok(Expr::Number(v));
    }
    Err(StratlangError::InvalidLiteral { value: s.into() })
}

fn expr_from_object(obj: &Map<String, Value>) -> Result<Expr, StratlangError> {
    let tag = str_field(obj, "type")?;
    match tag {
        "series" => {
            let name = SeriesName::parse(str_field(obj, "name")?)?;
            Ok(Expr::Series(name))
        }
        "indicator" => {
            let kind = IndicatorKind::parse(str_field(obj, "name")?)?;
            let series = SeriesName::parse(str_field(obj, "series")?)?;
            let period = match obj.get("period") {
                None | Some(Value::Null) => kind.default_period(),
                Some(v) => v.as_u64().ok_or_else(|| StratlangError::InvalidLiteral {
                    value: v.to_string(),
                })? as usize,
            };
            Ok(Expr::Indicator {
                kind,
                series,
                period,
            })
        }
        "function_call" => {
            let kind = FunctionKind::parse(str_field(obj, "name")?)?;
            let args = obj
                .get("args")
                .and_then(Value::as_array)
                .ok_or_else(|| StratlangError::Data {
                    reason: "function_call node needs an args array".into(),
                })?
                .iter()
                .map(expr_from_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::FunctionCall { kind, args })
        }
        "binary_op" => {
            let op = CompareOp::parse(str_field(obj, "operator")?)?;
            Ok(Expr::BinaryOp {
                op,
                left: Box::new(expr_from_value(node_field(obj, "left")?)?),
                right: Box::new(expr_from_value(node_field(obj, "right")?)?),
            })
        }
        "boolean_op" => {
            let op = match str_field(obj, "operator")? {
                "AND" => BoolOp::And,
                "OR" => BoolOp::Or,
                other => {
                    return Err(StratlangError::UnknownOperator { name: other.into() });
                }
            };
            Ok(Expr::BooleanOp {
                op,
                left: Box::new(expr_from_value(node_field(obj, "left")?)?),
                right: Box::new(expr_from_value(node_field(obj, "right")?)?),
            })
        }
        "percent" => {
            let v = obj
                .get("value")
                .and_then(Value::as_f64)
                .ok_or_else(|| StratlangError::Data {
                    reason: "percent node needs a numeric value".into(),
                })?;
            Ok(Expr::Percent(v))
        }
        other => Err(StratlangError::Data {
            reason: format!("unknown node type: {}", other),
        }),
    }
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, StratlangError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| StratlangError::Data {
            reason: format!("node is missing string field '{}'", key),
        })
}

fn node_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Value, StratlangError> {
    obj.get(key).ok_or_else(|| StratlangError::Data {
        reason: format!("node is missing field '{}'", key),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dsl_parser;

    fn round_trip(text: &str) -> Strategy {
        let strategy = dsl_parser::parse(text).unwrap();
        from_json(&to_json(&strategy)).unwrap()
    }

    #[test]
    fn series_and_indicator_round_trip() {
        let strategy = round_trip("ENTRY: close > sma(close, 20)");
        assert_eq!(
            strategy.entry,
            Some(Expr::BinaryOp {
                op: CompareOp::Gt,
                left: Box::new(Expr::Series(SeriesName::Close)),
                right: Box::new(Expr::Indicator {
                    kind: IndicatorKind::Sma,
                    series: SeriesName::Close,
                    period: 20,
                }),
            })
        );
    }

    #[test]
    fn and_chain_flattens_to_array_and_rejoins() {
        let strategy = dsl_parser::parse("ENTRY: close > 1 AND close > 2 AND close > 3").unwrap();
        let value = to_json(&strategy);
        assert_eq!(value["entry"].as_array().unwrap().len(), 3);
        assert_eq!(from_json(&value).unwrap(), strategy);
    }

    #[test]
    fn or_chain_stays_a_single_node() {
        let strategy = dsl_parser::parse("ENTRY: close > 1 OR close > 2").unwrap();
        let value = to_json(&strategy);
        assert_eq!(value["entry"].as_array().unwrap().len(), 1);
        assert_eq!(value["entry"][0]["type"], "boolean_op");
        assert_eq!(from_json(&value).unwrap(), strategy);
    }

    #[test]
    fn whole_literals_serialize_without_fraction() {
        let strategy = dsl_parser::parse("ENTRY: close > 100").unwrap();
        let value = to_json(&strategy);
        assert_eq!(value["entry"][0]["right"], json!(100));

        let strategy = dsl_parser::parse("ENTRY: close > 100.5").unwrap();
        let value = to_json(&strategy);
        assert_eq!(value["entry"][0]["right"], json!(100.5));
    }

    #[test]
    fn function_call_and_percent_round_trip() {
        let strategy = round_trip("EXIT: percent_change(close, 5) < -2%");
        match strategy.exit.unwrap() {
            Expr::BinaryOp { left, right, .. } => {
                assert!(matches!(
                    *left,
                    Expr::FunctionCall {
                        kind: FunctionKind::PercentChange,
                        ..
                    }
                ));
                assert_eq!(*right, Expr::Percent(-2.0));
            }
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn missing_period_uses_default() {
        let value = json!({
            "entry": [{
                "type": "binary_op",
                "operator": "<",
                "left": { "type": "indicator", "name": "rsi", "series": "close" },
                "right": 30,
            }]
        });
        let strategy = from_json(&value).unwrap();
        match strategy.entry.unwrap() {
            Expr::BinaryOp { left, .. } => {
                assert!(matches!(*left, Expr::Indicator { period: 14, .. }));
            }
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn bare_strings_resolve_to_series_or_literal() {
        let value = json!({
            "entry": [{
                "type": "binary_op",
                "operator": ">",
                "left": "close",
                "right": "100",
            }]
        });
        let strategy = from_json(&value).unwrap();
        assert_eq!(
            strategy.entry,
            Some(Expr::BinaryOp {
                op: CompareOp::Gt,
                left: Box::new(Expr::Series(SeriesName::Close)),
                right: Box::new(Expr::Number(100.0)),
            })
        );
    }

    #[test]
    fn bare_string_gibberish_is_invalid_literal() {
        let value = json!({
            "entry": [{
                "type": "binary_op",
                "operator": ">",
                "left": "closing_price",
                "right": 100,
            }]
        });
        let err = from_json(&value).unwrap_err();
        assert!(matches!(err, StratlangError::InvalidLiteral { .. }));
    }

    #[test]
    fn unknown_indicator_name() {
        let value = json!({
            "entry": [{ "type": "indicator", "name": "wma", "series": "close" }]
        });
        let err = from_json(&value).unwrap_err();
        assert!(matches!(err, StratlangError::UnknownIndicator { .. }));
    }

    #[test]
    fn unknown_operator_symbol() {
        let value = json!({
            "entry": [{
                "type": "binary_op",
                "operator": ">>",
                "left": "close",
                "right": 5,
            }]
        });
        let err = from_json(&value).unwrap_err();
        assert!(matches!(err, StratlangError::UnknownOperator { .. }));
    }

    #[test]
    fn unknown_column_in_series_node() {
        let value = json!({
            "entry": [{ "type": "series", "name": "adj_close" }]
        });
        let err = from_json(&value).unwrap_err();
        assert!(matches!(err, StratlangError::UnknownColumn { .. }));
    }

    #[test]
    fn empty_strategy_rejected() {
        let err = from_json(&json!({})).unwrap_err();
        assert!(matches!(err, StratlangError::Data { .. }));
    }

    #[test]
    fn entry_only_keeps_exit_absent() {
        let strategy = round_trip("ENTRY: close > 5");
        assert!(strategy.exit.is_none());
        let value = to_json(&strategy);
        assert!(value.get("exit").is_none());
    }
}
