//! Registers one table, and optionally an assertion and an operation, per
//! name in a plan.

use serde::{Deserialize, Serialize};

use crate::config::RegistrarConfig;
use crate::context::RefTarget;
use crate::definitions::{DefinitionKind, TableConfig};
use crate::error::Result;
use crate::predicate_parser::parse_predicate;
use crate::registry::DefinitionRegistry;
use crate::sql_ast::SelectQuery;

/// The three shapes a registration plan can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrarVariant {
    /// Reference passed as a bare identifier. Always fails to resolve.
    Identifier,
    /// Literal reference, one assertion and one operation per name.
    AssertAndOperate,
    /// Literal reference, one assertion per name.
    Assert,
}

impl RegistrarVariant {
    pub fn registers_assertions(&self) -> bool {
        matches!(
            self,
            RegistrarVariant::AssertAndOperate | RegistrarVariant::Assert
        )
    }

    pub fn registers_operations(&self) -> bool {
        matches!(self, RegistrarVariant::AssertAndOperate)
    }
}

/// Names to register plus the knobs that shape each registration.
/// Unset optional fields fall back to [`RegistrarConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationPlan {
    pub names: Vec<String>,
    pub variant: RegistrarVariant,
    #[serde(rename = "type", default)]
    pub kind: DefinitionKind,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub assertion_prefix: Option<String>,
    #[serde(default)]
    pub assertion_filter: Option<String>,
    /// External sources declared before any name is registered.
    #[serde(default)]
    pub declarations: Vec<String>,
}

impl RegistrationPlan {
    pub fn new<I, S>(names: I, variant: RegistrarVariant) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            variant,
            kind: DefinitionKind::Table,
            reference: None,
            assertion_prefix: None,
            assertion_filter: None,
            declarations: Vec::new(),
        }
    }

    pub fn with_declarations<I, S>(mut self, declarations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declarations = declarations.into_iter().map(Into::into).collect();
        self
    }
}

/// Keys registered by one run, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationSummary {
    pub definitions: Vec<String>,
    pub assertions: Vec<String>,
    pub operations: Vec<String>,
}

impl RegistrationSummary {
    fn extend(&mut self, other: RegistrationSummary) {
        self.definitions.extend(other.definitions);
        self.assertions.extend(other.assertions);
        self.operations.extend(other.operations);
    }
}

pub struct Registrar {
    plan: RegistrationPlan,
    config: RegistrarConfig,
}

impl Registrar {
    pub fn new(plan: RegistrationPlan) -> Self {
        Self::with_config(plan, RegistrarConfig::default())
    }

    pub fn with_config(plan: RegistrationPlan, config: RegistrarConfig) -> Self {
        Self { plan, config }
    }

    pub fn plan(&self) -> &RegistrationPlan {
        &self.plan
    }

    pub fn description_for(name: &str) -> String {
        format!("{name} table is a dynamically generated table")
    }

    fn reference_target(&self) -> RefTarget {
        let name = self
            .plan
            .reference
            .clone()
            .unwrap_or_else(|| self.config.reference_target.clone());
        match self.plan.variant {
            RegistrarVariant::Identifier => RefTarget::Identifier(name),
            _ => RefTarget::Literal(name),
        }
    }

    /// Register every name of the plan, in order. Stops at the first error.
    pub fn register(&self, registry: &mut DefinitionRegistry) -> Result<RegistrationSummary> {
        let variant = self.plan.variant;
        tracing::info!(
            names = self.plan.names.len(),
            variant = ?variant,
            "registering plan"
        );

        let target = self.reference_target();
        let assertion_filter = if variant.registers_assertions() {
            let raw = self
                .plan
                .assertion_filter
                .as_deref()
                .unwrap_or(self.config.assertion_filter.as_str());
            Some(parse_predicate(raw)?)
        } else {
            None
        };
        let assertion_prefix = self
            .plan
            .assertion_prefix
            .as_deref()
            .unwrap_or(self.config.assertion_prefix.as_str());

        for source in &self.plan.declarations {
            if !registry.is_declared(source) {
                registry.declare(source)?;
            }
        }

        let mut summary = RegistrationSummary::default();
        for name in &self.plan.names {
            let config = TableConfig {
                kind: self.plan.kind,
                description: Some(Self::description_for(name)),
            };
            let select_sql = registry
                .publish(name, config)?
                .query(|ctx| Ok(SelectQuery::star(ctx.reference(target.clone())?)))?
                .sql
                .clone();
            summary.definitions.push(name.clone());

            if let Some(filter) = &assertion_filter {
                let label = format!("{assertion_prefix} {name}");
                registry.assert(&label)?.query(|ctx| {
                    Ok(SelectQuery::star(ctx.reference(target.clone())?).filter(filter.clone()))
                })?;
                summary.assertions.push(label);
            }

            if variant.registers_operations() {
                let label = format!("{} {name}", self.config.operation_prefix);
                registry.operate(&label, [select_sql])?;
                summary.operations.push(label);
            }
        }

        Ok(summary)
    }
}

/// Run several plans against one registry, in order.
pub fn register_all<'p, I>(
    plans: I,
    config: &RegistrarConfig,
    registry: &mut DefinitionRegistry,
) -> Result<RegistrationSummary>
where
    I: IntoIterator<Item = &'p RegistrationPlan>,
{
    let mut summary = RegistrationSummary::default();
    for plan in plans {
        let registrar = Registrar::with_config(plan.clone(), config.clone());
        summary.extend(registrar.register(registry)?);
    }
    Ok(summary)
}
