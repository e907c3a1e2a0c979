use serde::Serialize;

use crate::definitions::{Assertion, Declaration, Definition, OperationSet};
use crate::dialect::DialectKind;
use crate::error::Result;

/// Snapshot of one build pass, in registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledGraph {
    pub dialect: DialectKind,
    pub declarations: Vec<Declaration>,
    pub tables: Vec<Definition>,
    pub assertions: Vec<Assertion>,
    pub operations: Vec<OperationSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub declarations: usize,
    pub tables: usize,
    pub assertions: usize,
    pub operations: usize,
}

impl CompiledGraph {
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            declarations: self.declarations.len(),
            tables: self.tables.len(),
            assertions: self.assertions.len(),
            operations: self.operations.len(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
