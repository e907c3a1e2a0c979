//! Resolution context handed to query builders.

use serde::{Deserialize, Serialize};

use crate::definitions::Target;
use crate::error::{DynaformError, Result};
use crate::registry::DefinitionRegistry;
use crate::sql_ast::TableRef;

/// What a builder asks the context to resolve.
///
/// Only the literal form is resolvable. A bare identifier stands for a
/// binding in the caller's scope that this crate cannot see, so it is
/// always reported as unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefTarget {
    Literal(String),
    Identifier(String),
}

impl RefTarget {
    pub fn name(&self) -> &str {
        match self {
            RefTarget::Literal(name) | RefTarget::Identifier(name) => name,
        }
    }
}

impl From<&str> for RefTarget {
    fn from(name: &str) -> Self {
        RefTarget::Literal(name.to_string())
    }
}

impl From<String> for RefTarget {
    fn from(name: String) -> Self {
        RefTarget::Literal(name)
    }
}

pub struct ResolutionContext<'r> {
    registry: &'r DefinitionRegistry,
    dependencies: Vec<Target>,
}

impl<'r> ResolutionContext<'r> {
    pub(crate) fn new(registry: &'r DefinitionRegistry) -> Self {
        Self {
            registry,
            dependencies: Vec::new(),
        }
    }

    /// Resolve a declared or already published entity to a table reference
    /// and record it as a dependency of the record being built.
    pub fn reference(&mut self, target: impl Into<RefTarget>) -> Result<TableRef> {
        let target = target.into();
        let name = match &target {
            RefTarget::Literal(name) => name,
            RefTarget::Identifier(name) => {
                return Err(DynaformError::UnresolvedReference(format!(
                    "bare identifier {name} is not bound; pass the entity name as a string literal"
                )));
            }
        };
        if name.trim().is_empty() {
            return Err(DynaformError::MalformedQuery(
                "reference target name is empty".to_string(),
            ));
        }
        let resolved = self.registry.resolve_target(name).ok_or_else(|| {
            DynaformError::UnresolvedReference(format!(
                "{name} is neither declared nor published"
            ))
        })?;
        tracing::trace!(reference = %name, "resolved reference");
        if !self.dependencies.contains(resolved) {
            self.dependencies.push(resolved.clone());
        }
        Ok(TableRef::from(resolved.clone()))
    }

    pub(crate) fn into_dependencies(self) -> Vec<Target> {
        self.dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_reference_resolves_declared_entity_once() {
        let mut registry = DefinitionRegistry::new();
        registry.declare("second_view").unwrap();

        let mut ctx = ResolutionContext::new(&registry);
        let first = ctx.reference("second_view").unwrap();
        let second = ctx.reference("second_view").unwrap();
        assert_eq!(first, second);
        assert_eq!(ctx.into_dependencies().len(), 1);
    }

    #[test]
    fn identifier_reference_is_rejected() {
        let mut registry = DefinitionRegistry::new();
        registry.declare("second_view").unwrap();

        let mut ctx = ResolutionContext::new(&registry);
        let err = ctx
            .reference(RefTarget::Identifier("second_view".into()))
            .unwrap_err();
        assert!(matches!(err, DynaformError::UnresolvedReference(_)));
    }

    #[test]
    fn unknown_literal_is_unresolved() {
        let registry = DefinitionRegistry::new();
        let mut ctx = ResolutionContext::new(&registry);
        assert!(matches!(
            ctx.reference("missing"),
            Err(DynaformError::UnresolvedReference(_))
        ));
        assert!(matches!(
            ctx.reference("  "),
            Err(DynaformError::MalformedQuery(_))
        ));
    }
}
