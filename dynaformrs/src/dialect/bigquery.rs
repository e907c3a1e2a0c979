//! BigQuery dialect implementation.

use crate::definitions::Target;

use super::Dialect;

#[derive(Debug, Default, Clone, Copy)]
pub struct BigQueryDialect;

impl Dialect for BigQueryDialect {
    fn quote_ident(&self, ident: &str) -> String {
        // BigQuery uses backticks for identifiers
        format!("`{}`", ident.replace('`', "\\`"))
    }

    fn qualify_table(&self, target: &Target) -> String {
        // BigQuery accepts the whole project.dataset.table path in one pair of backticks
        self.quote_ident(&target.parts().join("."))
    }

    fn render_literal(&self, value: &serde_json::Value) -> String {
        match value {
            // BigQuery escapes quotes with a backslash
            serde_json::Value::String(s) => format!("'{}'", s.replace('\'', "\\'")),
            serde_json::Value::Bool(b) => b.to_string().to_uppercase(),
            serde_json::Value::Null => "NULL".to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Array(items) => {
                let rendered: Vec<String> = items.iter().map(|v| self.render_literal(v)).collect();
                format!("[{}]", rendered.join(", "))
            }
            serde_json::Value::Object(_) => {
                format!("JSON '{}'", value.to_string().replace('\'', "\\'"))
            }
        }
    }
}
