pub mod config;
pub mod context;
pub mod definitions;
pub mod dialect;
pub mod error;
pub mod graph;
pub mod loader;
pub mod predicate_parser;
pub mod registrar;
pub mod registry;
pub mod sql_ast;

use std::path::Path;

use crate::error::Result;
use crate::graph::CompiledGraph;

/// Load registration plans from disk and run them against a fresh registry.
pub fn compile_dir<P: AsRef<Path>>(dir: P, config: &DynaformConfig) -> Result<CompiledGraph> {
    let plans = loader::load_plans_from_dir(dir)?;
    let mut registry = DefinitionRegistry::from_config(config);
    registrar::register_all(&plans, &config.registrar, &mut registry)?;
    Ok(registry.compile())
}

pub use config::DynaformConfig;
pub use context::{RefTarget, ResolutionContext};
pub use definitions::{Assertion, Declaration, Definition, DefinitionKind, OperationSet, Target};
pub use error::DynaformError;
pub use registrar::{RegistrarVariant, Registrar, RegistrationPlan, RegistrationSummary};
pub use registry::DefinitionRegistry;
pub use sql_ast::SqlRenderer;
