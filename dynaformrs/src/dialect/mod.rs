//! SQL dialect abstractions for the warehouses definitions compile against.
//!
//! Each dialect lives in its own file.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::definitions::Target;
use crate::error::DynaformError;

/// Dialects render identifiers, qualified table paths and literals.
/// Query structure lives in `sql_ast`; the dialect only maps the leaves.
pub trait Dialect {
    fn quote_ident(&self, ident: &str) -> String;
    fn qualify_table(&self, target: &Target) -> String {
        target
            .parts()
            .into_iter()
            .map(|part| self.quote_ident(part))
            .collect::<Vec<_>>()
            .join(".")
    }
    fn render_literal(&self, value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::Null => "NULL".to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => format!("'{}'", s.replace('\'', "''")),
            serde_json::Value::Array(items) => {
                let rendered: Vec<String> = items.iter().map(|v| self.render_literal(v)).collect();
                rendered.join(", ")
            }
            serde_json::Value::Object(_) => {
                format!("'{}'", value.to_string().replace('\'', "''"))
            }
        }
    }
}

/// Dialect selector used by configuration and plan files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    #[default]
    Bigquery,
    Duckdb,
    #[serde(alias = "postgresql")]
    Postgres,
}

impl DialectKind {
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            DialectKind::Bigquery => &BigQueryDialect,
            DialectKind::Duckdb => &DuckDbDialect,
            DialectKind::Postgres => &PostgresDialect,
        }
    }
}

impl FromStr for DialectKind {
    type Err = DynaformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bigquery" => Ok(DialectKind::Bigquery),
            "duckdb" => Ok(DialectKind::Duckdb),
            "postgres" | "postgresql" => Ok(DialectKind::Postgres),
            other => Err(DynaformError::Config(format!("unknown dialect {other}"))),
        }
    }
}

mod bigquery;
pub use bigquery::BigQueryDialect;

mod duckdb;
pub use duckdb::DuckDbDialect;

mod postgres;
pub use postgres::PostgresDialect;
