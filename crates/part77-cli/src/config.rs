//! CLI configuration from environment.

use crate::coords::feet_to_meters;
use crate::input::InputError;
use part77_core::SurfaceRules;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Unit the build limit is printed in. Input elevations are always feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Feet,
    Meters,
}

impl Units {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "feet" | "ft" => Some(Self::Feet),
            "meters" | "metres" | "m" => Some(Self::Meters),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Units::Feet => "feet",
            Units::Meters => "meters",
        }
    }

    pub fn convert_feet(self, feet: f64) -> f64 {
        match self {
            Units::Feet => feet,
            Units::Meters => feet_to_meters(feet),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// JSON file overriding the default surface rules
    pub rules_file: Option<PathBuf>,
    pub units: Units,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let units = match lookup("PART77_UNITS") {
            Some(raw) => Units::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring unknown PART77_UNITS value {:?}; using feet", raw);
                Units::Feet
            }),
            None => Units::Feet,
        };
        Self {
            rules_file: lookup("PART77_RULES_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            units,
        }
    }

    /// Rules from the configured file, or the defaults when none is set.
    pub fn load_rules(&self) -> Result<SurfaceRules, InputError> {
        match &self.rules_file {
            Some(path) => load_rules_file(path),
            None => Ok(SurfaceRules::default()),
        }
    }
}

/// Read a (possibly partial) JSON rules file. Missing fields keep their
/// default values.
pub fn load_rules_file(path: &Path) -> Result<SurfaceRules, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = parse_rules(&text).map_err(|source| InputError::MalformedRulesFile {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Loaded surface rules from {}", path.display());
    Ok(rules)
}

fn parse_rules(text: &str) -> Result<SurfaceRules, serde_json::Error> {
    serde_json::from_str(text)
}
