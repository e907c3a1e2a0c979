use serde::{Deserialize, Serialize};

use crate::sql_ast::SelectQuery;

/// Fully-qualified location of a registered or declared entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
}

impl Target {
    pub fn new(database: Option<String>, schema: Option<String>, name: impl Into<String>) -> Self {
        Self {
            database,
            schema,
            name: name.into(),
        }
    }

    /// Path parts in `database.schema.name` order, skipping unset parts.
    pub fn parts(&self) -> Vec<&str> {
        self.database
            .iter()
            .chain(self.schema.iter())
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    #[default]
    Table,
    View,
    Incremental,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Table => "table",
            DefinitionKind::View => "view",
            DefinitionKind::Incremental => "incremental",
        }
    }
}

/// Metadata passed to `publish`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    #[serde(rename = "type", default)]
    pub kind: DefinitionKind,
    pub description: Option<String>,
}

impl TableConfig {
    pub fn table(description: impl Into<String>) -> Self {
        Self {
            kind: DefinitionKind::Table,
            description: Some(description.into()),
        }
    }
}

/// A named table specification with a description and a SQL body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub name: String,
    pub target: Target,
    #[serde(rename = "type")]
    pub kind: DefinitionKind,
    pub description: Option<String>,
    #[serde(skip)]
    pub query: SelectQuery,
    /// Rendered SQL body.
    pub sql: String,
    pub dependencies: Vec<Target>,
}

/// A named SQL check over another entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assertion {
    pub label: String,
    #[serde(skip)]
    pub query: SelectQuery,
    pub sql: String,
    pub dependencies: Vec<Target>,
}

/// A named ordered list of raw SQL statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSet {
    pub label: String,
    pub statements: Vec<String>,
}

/// An external source made known to the resolution context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub target: Target,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_parts_skip_missing_levels() {
        let full = Target::new(Some("proj".into()), Some("ds".into()), "orders");
        assert_eq!(full.parts(), vec!["proj", "ds", "orders"]);

        let bare = Target::new(None, None, "orders");
        assert_eq!(bare.parts(), vec!["orders"]);
    }

    #[test]
    fn table_config_parses_type_key() {
        let cfg: TableConfig =
            serde_yaml::from_str("type: view\ndescription: hello\n").expect("config");
        assert_eq!(cfg.kind, DefinitionKind::View);
        assert_eq!(cfg.description.as_deref(), Some("hello"));
    }
}
