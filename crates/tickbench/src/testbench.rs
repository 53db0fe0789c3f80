use crate::{
    BenchError, Clock, Model, Notifier, Peripheral, PinId, Probe, TraceSink, VcdTrace,
    trace::TraceSlot,
};
use std::path::Path;

mod builder;

pub use builder::TestBenchBuilder;

/// Handle to a clock attached to a [`TestBench`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockId(pub(crate) usize);

impl ClockId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Drives a hardware model through time from its attached clocks.
///
/// Every [`advance`](TestBench::advance) moves simulated time to the nearest
/// edge of any attached clock, so clocks with unrelated periods and phases
/// can share one model without losing edges.
pub struct TestBench<M: Model> {
    model: M,
    clocks: Vec<Clock>,
    peripherals: Vec<Box<dyn Peripheral>>,
    time: u64,
    steps: u64,
    trace: TraceSlot,
}

impl<M: Model> std::fmt::Debug for TestBench<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestBench")
            .field("time", &self.time)
            .field("steps", &self.steps)
            .field("clocks", &self.clocks)
            .field("tracing", &self.trace.is_open())
            .finish()
    }
}

impl<M: Model> TestBench<M> {
    pub fn new(model: M) -> Self {
        Self::with_sink(model, VcdTrace::new())
    }

    /// Creates a test bench that records waveforms through `sink`.
    pub fn with_sink<S: TraceSink + 'static>(model: M, sink: S) -> Self {
        Self::from_parts(model, Box::new(sink))
    }

    pub fn builder(model: M) -> TestBenchBuilder<M> {
        TestBenchBuilder::new(model)
    }

    pub(crate) fn from_parts(model: M, sink: Box<dyn TraceSink>) -> Self {
        Self {
            model,
            clocks: Vec::new(),
            peripherals: Vec::new(),
            time: 0,
            steps: 0,
            trace: TraceSlot::new(sink),
        }
    }

    /// Registers `clock` and drives its pin to the level of its phase.
    pub fn attach(&mut self, clock: Clock) -> Result<ClockId, BenchError> {
        let pins = self.model.pins_mut();
        if !pins.contains(clock.pin()) {
            return Err(BenchError::UnknownPin(format!(
                "#{}",
                clock.pin().index()
            )));
        }
        if self.clocks.iter().any(|c| c.pin() == clock.pin()) {
            return Err(BenchError::PinAlreadyClocked(
                pins.name(clock.pin()).to_string(),
            ));
        }
        clock.drive(pins);
        log::debug!(
            "attached clock on `{}` (period {}, offset {})",
            pins.name(clock.pin()),
            clock.period(),
            clock.now()
        );
        let id = ClockId(self.clocks.len());
        self.clocks.push(clock);
        Ok(id)
    }

    /// Creates and attaches a clock on the pin called `pin`.
    pub fn add_clock(
        &mut self,
        pin: &str,
        period: u64,
        offset: u64,
    ) -> Result<ClockId, BenchError> {
        let id = self.model.pins().lookup(pin)?;
        let clock = Clock::new(id, period, offset).map_err(|source| BenchError::Clock {
            pin: pin.to_string(),
            source,
        })?;
        self.attach(clock)
    }

    /// Registers a non-clock peripheral that shares the time base.
    pub fn attach_peripheral(&mut self, peripheral: Box<dyn Peripheral>) {
        self.peripherals.push(peripheral);
    }

    /// Performs one time step and returns the delta that was applied.
    ///
    /// The model is evaluated and traced once before and once after the
    /// clocks move, so the trace holds the settled state on both sides of
    /// the edge at distinct timestamps.
    pub fn advance(&mut self) -> Result<u64, BenchError> {
        if self.clocks.is_empty() {
            return Err(BenchError::NoClocks);
        }

        self.model.evaluate();
        // One quantum past the current time, so pre and post edge both show.
        self.trace.dump(self.time + 1, self.model.pins());

        let min_time = self
            .clocks
            .iter()
            .map(|c| c.time_to_event())
            .chain(self.peripherals.iter().map(|p| p.time_to_event()))
            .min()
            .unwrap_or(0);
        // Time must advance at least one quantum.
        assert!(min_time > 0, "time to next event is zero at t={}", self.time);
        log::trace!("t={} advancing by {min_time}", self.time);

        let pins = self.model.pins_mut();
        for clock in &mut self.clocks {
            clock.advance(min_time, pins);
        }
        for peripheral in &mut self.peripherals {
            peripheral.advance(min_time, pins);
        }

        self.time += min_time;
        self.steps += 1;
        self.model.evaluate();
        self.trace.dump(self.time, self.model.pins());

        Ok(min_time)
    }

    /// Starts recording a waveform to `path`.
    ///
    /// Only the first call has an effect. If the sink cannot be opened the
    /// run continues with tracing disabled.
    pub fn open_trace<P: AsRef<Path>>(&mut self, path: P, depth: usize) {
        self.trace.open(path.as_ref(), depth, self.model.pins());
    }

    pub fn is_tracing(&self) -> bool {
        self.trace.is_open()
    }

    pub fn flush(&mut self) {
        self.trace.flush();
    }

    /// Global simulated time.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Number of completed [`advance`](TestBench::advance) calls.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// # Panics
    ///
    /// Panics if `id` was not returned by this test bench.
    pub fn clock(&self, id: ClockId) -> &Clock {
        self.get_clock(id).unwrap_or_else(|| {
            panic!(
                "clock #{} is not attached to this test bench ({} clocks)",
                id.0,
                self.clocks.len()
            )
        })
    }

    pub fn get_clock(&self, id: ClockId) -> Option<&Clock> {
        self.clocks.get(id.0)
    }

    pub fn clocks(&self) -> &[Clock] {
        &self.clocks
    }

    /// Finds the clock driving `pin`.
    pub fn find_clock(&self, pin: PinId) -> Option<ClockId> {
        self.clocks.iter().position(|c| c.pin() == pin).map(ClockId)
    }

    /// Fires once `clock` reaches its `n`-th rising edge counted from its
    /// current cycle start. The goal is fixed now.
    pub fn rising_edges(&self, clock: ClockId, n: u64) -> Notifier {
        Notifier::ClockGoal {
            clock,
            goal: self.clock(clock).rising_edge_goal(n),
        }
    }

    /// Like [`rising_edges`](TestBench::rising_edges) for falling edges.
    pub fn falling_edges(&self, clock: ClockId, n: u64) -> Notifier {
        Notifier::ClockGoal {
            clock,
            goal: self.clock(clock).falling_edge_goal(n),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn pin_id(&self, name: &str) -> Result<PinId, BenchError> {
        self.model.pins().lookup(name)
    }

    pub fn pin(&self, pin: PinId) -> u64 {
        self.model.pins().get(pin)
    }

    pub fn set_pin(&mut self, pin: PinId, value: u64) {
        self.model.pins_mut().set(pin, value);
    }
}

impl<M: Model> Probe for TestBench<M> {
    fn pin_value(&self, pin: PinId) -> u64 {
        self.pin(pin)
    }

    fn clock(&self, id: ClockId) -> &Clock {
        TestBench::clock(self, id)
    }
}

impl<M: Model> Drop for TestBench<M> {
    fn drop(&mut self) {
        self.trace.flush();
    }
}
