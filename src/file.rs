use std::convert::TryFrom;
use std::path::Path;
use log::*;
use topology::{Topology, TopologyDescription, TopologyError};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("cannot read {0}: {1}")]
    Io(String, std::io::Error),
    #[error("unknown topology format {0:?} (expected .json or .ron)")]
    UnknownFormat(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid RON: {0}")]
    Ron(#[from] ron::Error),
    #[error("inconsistent topology: {0}")]
    Topology(#[from] TopologyError),
}

#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum Format { Json, Ron }

impl Format {
    pub fn from_path(path :&Path) -> Result<Format, LoadError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        match ext.as_str() {
            "json" => Ok(Format::Json),
            "ron" => Ok(Format::Ron),
            _ => Err(LoadError::UnknownFormat(ext)),
        }
    }
}

pub fn parse_topology(text :&str, format :Format) -> Result<Topology, LoadError> {
    let desc :TopologyDescription = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Ron => ron::de::from_str(text)?,
    };
    Ok(Topology::try_from(desc)?)
}

pub fn load_topology(path :&Path) -> Result<Topology, LoadError> {
    let format = Format::from_path(path)?;
    info!("Loading topology from {:?}", path);
    let text = std::fs::read_to_string(path)
        .map_err(|e| LoadError::Io(path.display().to_string(), e))?;
    parse_topology(&text, format)
}
