use crate::PinBank;
use std::io;
use std::path::Path;

/// Destination for waveform samples.
pub trait TraceSink {
    /// Prepares the sink to record up to `depth` hierarchy levels of `pins`.
    fn open(&mut self, path: &Path, depth: usize, pins: &PinBank) -> io::Result<()>;
    /// Records the pin state at `timestamp`. Timestamps strictly increase.
    fn dump(&mut self, timestamp: u64, pins: &PinBank) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraceState {
    Closed,
    Open,
    Disabled,
}

/// Owns the test bench's sink and tracks whether it may be written.
///
/// Any sink failure turns tracing off for the rest of the run; the
/// simulation itself keeps going.
pub(crate) struct TraceSlot {
    sink: Box<dyn TraceSink>,
    state: TraceState,
}

impl TraceSlot {
    pub(crate) fn new(sink: Box<dyn TraceSink>) -> Self {
        Self {
            sink,
            state: TraceState::Closed,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.state == TraceState::Open
    }

    pub(crate) fn open(&mut self, path: &Path, depth: usize, pins: &PinBank) {
        if self.state != TraceState::Closed {
            return;
        }
        match self.sink.open(path, depth, pins) {
            Ok(()) => {
                log::debug!("tracing to `{}` (depth {depth})", path.display());
                self.state = TraceState::Open;
            }
            Err(err) => {
                log::warn!(
                    "failed to open trace `{}`, tracing disabled: {err}",
                    path.display()
                );
                self.state = TraceState::Disabled;
            }
        }
    }

    pub(crate) fn dump(&mut self, timestamp: u64, pins: &PinBank) {
        if !self.is_open() {
            return;
        }
        if let Err(err) = self.sink.dump(timestamp, pins) {
            log::warn!("trace dump at {timestamp} failed, tracing disabled: {err}");
            self.state = TraceState::Disabled;
        }
    }

    pub(crate) fn flush(&mut self) {
        if !self.is_open() {
            return;
        }
        if let Err(err) = self.sink.flush() {
            log::warn!("trace flush failed, tracing disabled: {err}");
            self.state = TraceState::Disabled;
        }
    }
}
