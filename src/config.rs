use std::path::Path;
use log::*;
use serde::{Serialize, Deserialize};
use railmlio::{ExportOptions, IdMode, SchemaVersion, Strictness};

/// User settings for the export, stored with confy.
#[derive(Serialize,Deserialize)]
#[derive(Debug,Clone,Default,PartialEq)]
#[serde(default)]
pub struct Config {
    pub schema_version :SchemaVersion,
    pub strictness :Strictness,
    pub synthetic_ids :IdMode,
}

impl Config {
    pub fn load() -> Self {
        confy::load(env!("CARGO_PKG_NAME")).
            unwrap_or_else(|e| {
                error!("Could not load config file: {}", e);
                Default::default()
            })
    }

    /// Load from an explicit file. A missing file is created with defaults.
    pub fn load_path(path :&Path) -> Result<Self, confy::ConfyError> {
        let config = confy::load_path(path)?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            version: self.schema_version,
            strictness: self.strictness,
            ids: self.synthetic_ids,
        }
    }
}
