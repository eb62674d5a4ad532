//! Host configuration: simulation tuning plus scorecard wording.
//!
//! ```toml
//! [simulation]
//! spawn_probability = 0.08
//!
//! [scorecard]
//! excellent = "Perfect!"
//! ```

use std::path::Path;

use fireworks_core::SimulationConfig;
use serde::{Deserialize, Serialize};

use crate::error::{HostError, HostResult};
use crate::scorecard::ScorecardText;

/// Everything a host reads at startup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Simulation tuning.
    pub simulation: SimulationConfig,
    /// Scorecard wording.
    pub scorecard: ScorecardText,
}

impl HostConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or the simulation
    /// section fails validation.
    pub fn from_toml_str(source: &str) -> HostResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.simulation.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> HostResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
