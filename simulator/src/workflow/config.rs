use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use telemcore::render::RenderSurface;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub interval_ms: u64,
    pub report_path: PathBuf,
    pub surface: RenderSurface,
    pub generator: GeneratorConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            report_path: PathBuf::from("tools/data/offline_frames.log"),
            surface: RenderSurface::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .surface
            .validate()
            .with_context(|| format!("validating surface in {}", path_ref.display()))?;
        config
            .generator
            .validate()
            .with_context(|| format!("validating generator in {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(interval_ms: u64, seed: u64, show_summary: bool) -> Self {
        let defaults = Self::default();
        Self {
            interval_ms: interval_ms.max(1),
            surface: defaults.surface.with_summary(show_summary),
            generator: GeneratorConfig {
                seed,
                ..defaults.generator
            },
            ..defaults
        }
    }
}
