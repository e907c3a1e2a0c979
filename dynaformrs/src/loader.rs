use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;

use crate::error::{DynaformError, Result};
use crate::registrar::RegistrationPlan;

/// Load every `*.yml` / `*.yaml` plan in `dir`, sorted by file path.
pub fn load_plans_from_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<RegistrationPlan>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(DynaformError::Validation(format!(
            "definitions directory not found: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for pattern in ["yml", "yaml"] {
        for entry in glob(&format!("{}/*.{pattern}", dir.display()))
            .map_err(|e| DynaformError::Other(e.into()))?
            .flatten()
        {
            paths.push(entry);
        }
    }
    paths.sort();

    let mut plans = Vec::with_capacity(paths.len());
    for path in &paths {
        plans.push(load_plan_file(path)?);
    }
    tracing::info!(dir = %dir.display(), plans = plans.len(), "loaded registration plans");
    Ok(plans)
}

pub fn load_plan_file(path: &Path) -> Result<RegistrationPlan> {
    let contents = fs::read_to_string(path)?;
    let plan: RegistrationPlan = serde_yaml::from_str(&contents)?;
    tracing::debug!(path = %path.display(), names = plan.names.len(), "loaded plan file");
    Ok(plan)
}
