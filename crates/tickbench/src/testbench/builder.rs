use std::path::PathBuf;

use super::TestBench;
use crate::{BenchConfig, BenchError, Model, TraceSink, VcdTrace, config::DEFAULT_TRACE_DEPTH};

/// A fluent builder for configuring a [`TestBench`].
pub struct TestBenchBuilder<M: Model> {
    model: M,
    clocks: Vec<(String, u64, u64)>,
    trace: Option<(PathBuf, usize)>,
    sink: Option<Box<dyn TraceSink>>,
}

impl<M: Model> TestBenchBuilder<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            clocks: Vec::new(),
            trace: None,
            sink: None,
        }
    }

    /// Attach a clock to the pin called `pin`.
    pub fn clock(mut self, pin: &str, period: u64, offset: u64) -> Self {
        self.clocks.push((pin.to_string(), period, offset));
        self
    }

    /// Record a waveform to `path` once built.
    pub fn trace<P: Into<PathBuf>>(mut self, path: P, depth: usize) -> Self {
        self.trace = Some((path.into(), depth));
        self
    }

    /// Enable VCD dumping to the specified file with the default depth.
    pub fn vcd<P: Into<PathBuf>>(self, path: P) -> Self {
        self.trace(path, DEFAULT_TRACE_DEPTH)
    }

    /// Replace the default VCD sink.
    pub fn sink<S: TraceSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Apply clocks and trace settings from a loaded config. An explicit
    /// trace set earlier on the builder wins over the config's.
    pub fn config(mut self, config: &BenchConfig) -> Self {
        for clock in &config.clocks {
            self.clocks
                .push((clock.pin.clone(), clock.period, clock.offset));
        }
        if self.trace.is_none() {
            self.trace = config
                .trace
                .as_ref()
                .map(|trace| (trace.path.clone(), trace.depth));
        }
        self
    }

    pub fn build(self) -> Result<TestBench<M>, BenchError> {
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(VcdTrace::new()));
        let mut tb = TestBench::from_parts(self.model, sink);
        for (pin, period, offset) in &self.clocks {
            tb.add_clock(pin, *period, *offset)?;
        }
        if let Some((path, depth)) = &self.trace {
            tb.open_trace(path, *depth);
        }
        Ok(tb)
    }
}
