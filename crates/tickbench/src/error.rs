use std::path::PathBuf;
use thiserror::Error;

/// Reasons a [`Clock`](crate::Clock) definition is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("period {period} is odd; a full cycle needs two equal half-periods")]
    OddPeriod { period: u64 },
    #[error("period {period} is below the minimum of {min} quanta")]
    PeriodTooSmall { period: u64, min: u64 },
    #[error("offset {offset} must be less than the period {period}")]
    OffsetOutOfRange { offset: u64, period: u64 },
    #[error("offset {offset} puts the first edge of period {period} one quantum away")]
    OffsetBeforeEdge { offset: u64, period: u64 },
}

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("invalid clock on pin `{pin}`: {source}")]
    Clock {
        pin: String,
        #[source]
        source: ClockError,
    },
    #[error("unknown pin `{0}`")]
    UnknownPin(String),
    #[error("pin `{0}` is already defined")]
    DuplicatePin(String),
    #[error("pin `{pin}` has unsupported width {width} (expected 1..=64)")]
    InvalidWidth { pin: String, width: usize },
    #[error("pin `{0}` is already driven by another clock")]
    PinAlreadyClocked(String),
    #[error("no clock attached to the test bench")]
    NoClocks,
    #[error("failed to read config `{path}`: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
