//! Multi-domain clock scheduling for cycle-based hardware model test benches.
//!
//! A [`TestBench`] owns a [`Model`] and any number of [`Clock`]s. Each
//! [`TestBench::advance`] moves simulated time to the nearest edge across all
//! clocks, toggles their pins, evaluates the model and optionally records a
//! VCD trace. [`Notifier`]s express conditions to wait for.

mod clock;
mod config;
mod error;
mod model;
mod notifier;
mod peripheral;
mod pins;
mod testbench;
mod trace;
mod vcd;
mod wait;

pub(crate) use fxhash::FxHashMap as HashMap;

pub use clock::{Clock, MIN_HALF_PERIOD};
pub use config::{BenchConfig, ClockConfig, DEFAULT_TRACE_DEPTH, TraceConfig};
pub use error::{BenchError, ClockError};
pub use model::Model;
pub use notifier::{Notifier, Probe, all, any, high, low, value};
pub use peripheral::Peripheral;
pub use pins::{PinBank, PinId, PinInfo};
pub use testbench::{ClockId, TestBench, TestBenchBuilder};
pub use trace::TraceSink;
pub use vcd::{VcdTrace, VcdWriter};
pub use wait::Until;
