use std::collections::HashMap;

use crate::config::DynaformConfig;
use crate::context::ResolutionContext;
use crate::definitions::{Assertion, Declaration, Definition, OperationSet, TableConfig, Target};
use crate::dialect::DialectKind;
use crate::error::{DynaformError, Result};
use crate::graph::CompiledGraph;
use crate::sql_ast::{SelectQuery, SqlRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Declaration,
    Definition,
    Assertion,
    Operation,
}

impl EntryKind {
    fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Declaration => "declaration",
            EntryKind::Definition => "definition",
            EntryKind::Assertion => "assertion",
            EntryKind::Operation => "operation",
        }
    }
}

/// Append-only store of everything registered during one build pass.
///
/// Declarations, definitions, assertions and operations share a single
/// namespace; a second registration under a taken key is a
/// [`DynaformError::NamingCollision`].
#[derive(Debug, Default, Clone)]
pub struct DefinitionRegistry {
    database: Option<String>,
    schema: Option<String>,
    dialect: DialectKind,
    declarations: Vec<Declaration>,
    definitions: Vec<Definition>,
    assertions: Vec<Assertion>,
    operations: Vec<OperationSet>,
    keys: HashMap<String, (EntryKind, usize)>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DynaformConfig) -> Self {
        Self {
            database: config.defaults.database.clone(),
            schema: config.defaults.schema.clone(),
            dialect: config.defaults.dialect,
            ..Self::default()
        }
    }

    pub fn dialect(&self) -> DialectKind {
        self.dialect
    }

    fn target_for(&self, name: &str) -> Target {
        Target::new(self.database.clone(), self.schema.clone(), name)
    }

    fn reserve(&self, key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(DynaformError::Validation(
                "registration key must not be empty".to_string(),
            ));
        }
        match self.keys.get(key) {
            Some((kind, _)) => Err(DynaformError::NamingCollision {
                name: key.to_string(),
                existing: kind.as_str(),
            }),
            None => Ok(()),
        }
    }

    fn render(&self, query: &SelectQuery) -> Result<String> {
        if query.from.target.name.trim().is_empty() {
            return Err(DynaformError::MalformedQuery(
                "query has no source table".to_string(),
            ));
        }
        Ok(SqlRenderer::new(self.dialect.dialect()).render_select(query))
    }

    /// Register an external source under the default database and schema.
    pub fn declare(&mut self, name: &str) -> Result<&Target> {
        let target = self.target_for(name);
        self.declare_target(target)
    }

    pub fn declare_target(&mut self, target: Target) -> Result<&Target> {
        self.reserve(&target.name)?;
        let idx = self.declarations.len();
        tracing::debug!(name = %target.name, "declared source");
        self.keys.insert(target.name.clone(), (EntryKind::Declaration, idx));
        self.declarations.push(Declaration {
            name: target.name.clone(),
            target,
        });
        Ok(&self.declarations[idx].target)
    }

    /// Start a table definition. The name is checked now; the record is
    /// committed by [`DefinitionHandle::query`].
    pub fn publish(&mut self, name: &str, config: TableConfig) -> Result<DefinitionHandle<'_>> {
        self.reserve(name)?;
        Ok(DefinitionHandle {
            registry: self,
            name: name.to_string(),
            config,
        })
    }

    pub fn assert(&mut self, label: &str) -> Result<AssertionHandle<'_>> {
        self.reserve(label)?;
        Ok(AssertionHandle {
            registry: self,
            label: label.to_string(),
        })
    }

    pub fn operate<I, S>(&mut self, label: &str, statements: I) -> Result<&OperationSet>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserve(label)?;
        let statements: Vec<String> = statements.into_iter().map(Into::into).collect();
        if statements.is_empty() {
            return Err(DynaformError::MalformedQuery(format!(
                "operation {label} has no statements"
            )));
        }
        if let Some(pos) = statements.iter().position(|s| s.trim().is_empty()) {
            return Err(DynaformError::MalformedQuery(format!(
                "operation {label} statement {pos} is empty"
            )));
        }
        let idx = self.operations.len();
        tracing::debug!(label = %label, statements = statements.len(), "registered operation");
        self.keys.insert(label.to_string(), (EntryKind::Operation, idx));
        self.operations.push(OperationSet {
            label: label.to_string(),
            statements,
        });
        Ok(&self.operations[idx])
    }

    /// Target of a declared source or published definition.
    pub fn resolve_target(&self, name: &str) -> Option<&Target> {
        match self.keys.get(name)? {
            (EntryKind::Declaration, idx) => Some(&self.declarations[*idx].target),
            (EntryKind::Definition, idx) => Some(&self.definitions[*idx].target),
            _ => None,
        }
    }

    pub fn get_definition(&self, name: &str) -> Option<&Definition> {
        match self.keys.get(name)? {
            (EntryKind::Definition, idx) => self.definitions.get(*idx),
            _ => None,
        }
    }

    pub fn get_assertion(&self, label: &str) -> Option<&Assertion> {
        match self.keys.get(label)? {
            (EntryKind::Assertion, idx) => self.assertions.get(*idx),
            _ => None,
        }
    }

    pub fn get_operation(&self, label: &str) -> Option<&OperationSet> {
        match self.keys.get(label)? {
            (EntryKind::Operation, idx) => self.operations.get(*idx),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        matches!(self.keys.get(name), Some((EntryKind::Declaration, _)))
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    pub fn operations(&self) -> &[OperationSet] {
        &self.operations
    }

    /// Number of registered entries of every kind.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn compile(&self) -> CompiledGraph {
        CompiledGraph {
            dialect: self.dialect,
            declarations: self.declarations.clone(),
            tables: self.definitions.clone(),
            assertions: self.assertions.clone(),
            operations: self.operations.clone(),
        }
    }
}

pub struct DefinitionHandle<'r> {
    registry: &'r mut DefinitionRegistry,
    name: String,
    config: TableConfig,
}

impl<'r> DefinitionHandle<'r> {
    /// Build the SQL body with a fresh resolution context and commit the
    /// definition. The builder runs exactly once.
    pub fn query<F>(self, build: F) -> Result<&'r Definition>
    where
        F: FnOnce(&mut ResolutionContext<'_>) -> Result<SelectQuery>,
    {
        let registry = self.registry;
        let mut ctx = ResolutionContext::new(registry);
        let query = build(&mut ctx)?;
        let dependencies = ctx.into_dependencies();
        let sql = registry.render(&query)?;

        let idx = registry.definitions.len();
        tracing::debug!(
            name = %self.name,
            kind = self.config.kind.as_str(),
            sql = %sql,
            "published definition"
        );
        registry
            .keys
            .insert(self.name.clone(), (EntryKind::Definition, idx));
        let target = registry.target_for(&self.name);
        registry.definitions.push(Definition {
            name: self.name,
            target,
            kind: self.config.kind,
            description: self.config.description,
            query,
            sql,
            dependencies,
        });
        Ok(&registry.definitions[idx])
    }
}

pub struct AssertionHandle<'r> {
    registry: &'r mut DefinitionRegistry,
    label: String,
}

impl<'r> AssertionHandle<'r> {
    pub fn query<F>(self, build: F) -> Result<&'r Assertion>
    where
        F: FnOnce(&mut ResolutionContext<'_>) -> Result<SelectQuery>,
    {
        let registry = self.registry;
        let mut ctx = ResolutionContext::new(registry);
        let query = build(&mut ctx)?;
        let dependencies = ctx.into_dependencies();
        let sql = registry.render(&query)?;

        let idx = registry.assertions.len();
        tracing::debug!(label = %self.label, sql = %sql, "registered assertion");
        registry
            .keys
            .insert(self.label.clone(), (EntryKind::Assertion, idx));
        registry.assertions.push(Assertion {
            label: self.label,
            query,
            sql,
            dependencies,
        });
        Ok(&registry.assertions[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql_ast::{CompareOp, Predicate};
    use serde_json::json;

    fn registry_with_source() -> DefinitionRegistry {
        let mut registry = DefinitionRegistry::new();
        registry.declare("second_view").unwrap();
        registry
    }

    #[test]
    fn publish_commits_rendered_definition() {
        let mut registry = registry_with_source();
        let def = registry
            .publish("t1", TableConfig::table("t1 table"))
            .unwrap()
            .query(|ctx| Ok(SelectQuery::star(ctx.reference("second_view")?)))
            .unwrap();
        assert_eq!(def.sql, "SELECT * FROM `second_view`");
        assert_eq!(def.dependencies, vec![Target::new(None, None, "second_view")]);
        assert!(registry.get_definition("t1").is_some());
    }

    #[test]
    fn shared_namespace_reports_collisions() {
        let mut registry = registry_with_source();
        registry.operate("t1", ["SELECT 1"]).unwrap();

        let err = registry
            .publish("t1", TableConfig::default())
            .err()
            .expect("collision");
        match err {
            DynaformError::NamingCollision { name, existing } => {
                assert_eq!(name, "t1");
                assert_eq!(existing, "operation");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(registry.declare("second_view").is_err());
    }

    #[test]
    fn failed_builder_leaves_no_record() {
        let mut registry = registry_with_source();
        let result = registry
            .assert("check")
            .unwrap()
            .query(|ctx| Ok(SelectQuery::star(ctx.reference("nope")?)));
        assert!(matches!(result, Err(DynaformError::UnresolvedReference(_))));
        assert!(!registry.contains("check"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn published_definitions_become_referenceable() {
        let mut registry = registry_with_source();
        registry
            .publish("t1", TableConfig::default())
            .unwrap()
            .query(|ctx| Ok(SelectQuery::star(ctx.reference("second_view")?)))
            .unwrap();
        let assertion = registry
            .assert("t1 positive")
            .unwrap()
            .query(|ctx| {
                Ok(SelectQuery::star(ctx.reference("t1")?)
                    .filter(Predicate::new("test", CompareOp::Gt, json!(1))))
            })
            .unwrap();
        assert_eq!(assertion.sql, "SELECT * FROM `t1` WHERE test>1");
    }

    #[test]
    fn operations_reject_empty_statements() {
        let mut registry = DefinitionRegistry::new();
        assert!(matches!(
            registry.operate("op", Vec::<String>::new()),
            Err(DynaformError::MalformedQuery(_))
        ));
        assert!(matches!(
            registry.operate("op", ["SELECT 1", " "]),
            Err(DynaformError::MalformedQuery(_))
        ));
        assert!(registry.is_empty());
    }
}
