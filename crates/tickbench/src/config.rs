use crate::BenchError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TRACE_DEPTH: usize = 99;

/// Test bench setup loaded from TOML.
///
/// ```toml
/// [[clock]]
/// pin = "clk"
/// period = 1000
///
/// [[clock]]
/// pin = "clk_offset"
/// period = 1000
/// offset = 500
///
/// [trace]
/// path = "adder.vcd"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    #[serde(default, rename = "clock")]
    pub clocks: Vec<ClockConfig>,
    #[serde(default)]
    pub trace: Option<TraceConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClockConfig {
    pub pin: String,
    pub period: u64,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceConfig {
    pub path: PathBuf,
    #[serde(default = "default_depth")]
    pub depth: usize,
}

fn default_depth() -> usize {
    DEFAULT_TRACE_DEPTH
}

impl BenchConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, BenchError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BenchError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BenchError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
