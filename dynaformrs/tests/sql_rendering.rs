//! Integration tests for SQL rendering across dialects.

use dynaform::definitions::Target;
use dynaform::dialect::{BigQueryDialect, DialectKind, DuckDbDialect, PostgresDialect};
use dynaform::sql_ast::{CompareOp, Predicate, SelectQuery, SqlRenderer};
use serde_json::json;

fn second_view() -> Target {
    Target::new(Some("proj".into()), Some("reporting".into()), "second_view")
}

#[test]
fn assertion_sql_is_select_plus_where_suffix() {
    for dialect in [DialectKind::Bigquery, DialectKind::Duckdb, DialectKind::Postgres] {
        let renderer = SqlRenderer::new(dialect.dialect());
        let select = renderer.render_select(&SelectQuery::star(second_view()));
        let filtered = renderer.render_select(
            &SelectQuery::star(second_view()).filter(Predicate::new(
                "test",
                CompareOp::Gt,
                json!(1),
            )),
        );
        assert_eq!(filtered, format!("{select} WHERE test>1"));
    }
}

#[test]
fn dialects_quote_paths_differently() {
    let query = SelectQuery::star(second_view());
    assert_eq!(
        SqlRenderer::new(&BigQueryDialect).render_select(&query),
        "SELECT * FROM `proj.reporting.second_view`"
    );
    assert_eq!(
        SqlRenderer::new(&DuckDbDialect).render_select(&query),
        "SELECT * FROM \"proj\".\"reporting\".\"second_view\""
    );
    assert_eq!(
        SqlRenderer::new(&PostgresDialect).render_select(&query),
        "SELECT * FROM \"proj\".\"reporting\".\"second_view\""
    );
}

#[test]
fn string_literals_are_escaped_per_dialect() {
    let predicate = Predicate::new("status", CompareOp::Neq, json!("o'k"));
    assert_eq!(
        SqlRenderer::new(&BigQueryDialect).render_predicate(&predicate),
        "status!='o\\'k'"
    );
    assert_eq!(
        SqlRenderer::new(&DuckDbDialect).render_predicate(&predicate),
        "status!='o''k'"
    );
}

#[test]
fn dialect_kind_parses_names() {
    assert_eq!("BigQuery".parse::<DialectKind>().unwrap(), DialectKind::Bigquery);
    assert_eq!("postgresql".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
    assert!("oracle".parse::<DialectKind>().is_err());
}
