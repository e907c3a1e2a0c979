//! PostgreSQL dialect implementation.

use super::Dialect;

#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn render_literal(&self, value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::Bool(b) => b.to_string().to_uppercase(),
            // Postgres has no bare list literal; render as ARRAY[...]
            serde_json::Value::Array(items) => {
                let rendered: Vec<String> = items.iter().map(|v| self.render_literal(v)).collect();
                format!("ARRAY[{}]", rendered.join(", "))
            }
            serde_json::Value::Object(_) => {
                format!("'{}'::jsonb", value.to_string().replace('\'', "''"))
            }
            serde_json::Value::Null => "NULL".to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::Target;
    use serde_json::json;

    #[test]
    fn qualifies_each_path_part() {
        let target = Target::new(None, Some("public".into()), "second_view");
        assert_eq!(
            PostgresDialect.qualify_table(&target),
            "\"public\".\"second_view\""
        );
    }

    #[test]
    fn renders_arrays_and_json() {
        assert_eq!(PostgresDialect.render_literal(&json!([1, 2])), "ARRAY[1, 2]");
        assert_eq!(
            PostgresDialect.render_literal(&json!({"a": 1})),
            "'{\"a\":1}'::jsonb"
        );
    }
}
