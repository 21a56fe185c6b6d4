use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::region::{GenomeRegion, read_region_file};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    pub annotation: PathBuf,
    pub reference: PathBuf,
    #[serde(default)]
    pub regions: Vec<String>,
    pub region_list: Option<PathBuf>,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, path) in [("annotation", &self.annotation), ("reference", &self.reference)] {
            if path.as_os_str().is_empty() {
                bail!("missing {name} path");
            }
        }

        for region in &self.regions {
            region
                .parse::<GenomeRegion>()
                .with_context(|| format!("invalid region: '{region}'"))?;
        }

        Ok(())
    }

    /// All regions of interest: inline regions followed by those of the
    /// region list file. `None` when neither is given.
    pub fn resolve_regions(&self) -> Result<Option<Vec<GenomeRegion>>> {
        if self.regions.is_empty() && self.region_list.is_none() {
            return Ok(None);
        }

        let mut regions = Vec::new();
        for region in &self.regions {
            regions.push(
                region
                    .parse::<GenomeRegion>()
                    .with_context(|| format!("invalid region: '{region}'"))?,
            );
        }
        if let Some(path) = &self.region_list {
            regions.extend(
                read_region_file(path)
                    .with_context(|| format!("failed to read region list: {}", path.display()))?,
            );
        }
        Ok(Some(regions))
    }
}
