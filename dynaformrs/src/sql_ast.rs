use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::definitions::Target;
use crate::dialect::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// `column <op> literal`, e.g. `test > 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Self {
            column: column.into(),
            op,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub target: Target,
}

impl From<Target> for TableRef {
    fn from(target: Target) -> Self {
        Self { target }
    }
}

/// `SELECT * FROM <from> [WHERE <filters>]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub from: TableRef,
    pub filters: Vec<Predicate>,
}

impl SelectQuery {
    pub fn star(from: impl Into<TableRef>) -> Self {
        Self {
            from: from.into(),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }
}

pub struct SqlRenderer<'d> {
    dialect: &'d dyn Dialect,
}

impl<'d> SqlRenderer<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self { dialect }
    }

    pub fn render_select(&self, query: &SelectQuery) -> String {
        let mut sql = format!(
            "SELECT * FROM {}",
            self.dialect.qualify_table(&query.from.target)
        );

        if !query.filters.is_empty() {
            let filters: Vec<String> = query
                .filters
                .iter()
                .map(|p| self.render_predicate(p))
                .collect();
            sql.push_str(&format!(" WHERE {}", filters.join(" AND ")));
        }

        sql
    }

    /// Compact form: `test>1`. Plain identifiers stay unquoted.
    pub fn render_predicate(&self, predicate: &Predicate) -> String {
        let column = if is_plain_ident(&predicate.column) {
            predicate.column.clone()
        } else {
            self.dialect.quote_ident(&predicate.column)
        };
        format!(
            "{column}{}{}",
            predicate.op.as_sql(),
            self.dialect.render_literal(&predicate.value)
        )
    }
}

pub(crate) fn is_plain_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{BigQueryDialect, DuckDbDialect};
    use serde_json::json;

    fn second_view() -> Target {
        Target::new(Some("proj".into()), Some("reporting".into()), "second_view")
    }

    #[test]
    fn renders_unfiltered_select() {
        let query = SelectQuery::star(second_view());
        let sql = SqlRenderer::new(&BigQueryDialect).render_select(&query);
        assert_eq!(sql, "SELECT * FROM `proj.reporting.second_view`");
    }

    #[test]
    fn renders_compact_filters_joined_with_and() {
        let query = SelectQuery::star(second_view())
            .filter(Predicate::new("test", CompareOp::Gt, json!(1)))
            .filter(Predicate::new("status", CompareOp::Eq, json!("it's")));
        let sql = SqlRenderer::new(&DuckDbDialect).render_select(&query);
        assert_eq!(
            sql,
            "SELECT * FROM \"proj\".\"reporting\".\"second_view\" WHERE test>1 AND status='it''s'"
        );
    }

    #[test]
    fn quotes_columns_that_are_not_plain_identifiers() {
        let renderer = SqlRenderer::new(&DuckDbDialect);
        let predicate = Predicate::new("order date", CompareOp::Lte, json!(3));
        assert_eq!(renderer.render_predicate(&predicate), "\"order date\"<=3");
    }
}
