use serde_json::Value;

use crate::error::DynaformError;
use crate::sql_ast::{is_plain_ident, CompareOp, Predicate};

/// Extremely small, safe parser for assertion filter strings.
/// Supports a single comparison `column <op> literal` where op is one of
/// `==`, `=`, `!=`, `>=`, `<=`, `>`, `<` and the literal is a quoted string,
/// an integer, a float, `true`/`false` or `null`.
pub fn parse_predicate(input: &str) -> Result<Predicate, DynaformError> {
    let s = input.trim();
    // operators are only looked for ahead of the quoted literal
    let head_end = s.find('\'').unwrap_or(s.len());
    let (idx, token, op) = find_operator(&s[..head_end]).ok_or_else(|| {
        DynaformError::MalformedQuery(format!("unable to parse predicate '{s}'"))
    })?;

    let left = s[..idx].trim();
    let right = s[idx + token.len()..].trim();
    if !is_plain_ident(left) {
        return Err(DynaformError::MalformedQuery(format!(
            "predicate '{s}' must start with a column name"
        )));
    }
    let value = parse_literal(right).ok_or_else(|| {
        DynaformError::MalformedQuery(format!(
            "predicate '{s}' has an invalid literal '{right}'"
        ))
    })?;
    Ok(Predicate::new(left, op, value))
}

/// Leftmost comparison operator in `head`, preferring two-char tokens.
fn find_operator(head: &str) -> Option<(usize, &'static str, CompareOp)> {
    let idx = head.find(['=', '!', '<', '>'])?;
    let rest = &head[idx..];
    [
        ("==", CompareOp::Eq),
        ("!=", CompareOp::Neq),
        (">=", CompareOp::Gte),
        ("<=", CompareOp::Lte),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
        ("=", CompareOp::Eq),
    ]
    .into_iter()
    .find(|(token, _)| rest.starts_with(*token))
    .map(|(token, op)| (idx, token, op))
}

fn parse_literal(s: &str) -> Option<Value> {
    if let Some(stripped) = s.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
        return Some(Value::String(stripped.to_string()));
    }
    match s.to_ascii_lowercase().as_str() {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "null" => return Some(Value::Null),
        _ => {}
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(Value::Number(v.into()));
    }
    if let Ok(v) = s.parse::<f64>() {
        return serde_json::Number::from_f64(v).map(Value::Number);
    }
    None
}
