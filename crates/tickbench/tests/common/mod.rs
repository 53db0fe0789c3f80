#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::path::Path;
use std::rc::Rc;

use tickbench::{Model, PinBank, PinId, TraceSink};

/// Counts rising edges of `clk` and raises `done` on the third one.
pub struct Counter {
    pins: PinBank,
    pub clk: PinId,
    pub clk_b: PinId,
    pub done: PinId,
    pub ready: PinId,
    pub edges: PinId,
    last_clk: u64,
    pub evaluations: usize,
}

impl Counter {
    pub fn new() -> Self {
        let mut pins = PinBank::new();
        let clk = pins.add("clk", 1).unwrap();
        let clk_b = pins.add("clk_b", 1).unwrap();
        let done = pins.add("counter.done", 1).unwrap();
        let ready = pins.add("counter.ready", 1).unwrap();
        let edges = pins.add("counter.edges", 16).unwrap();
        Self {
            pins,
            clk,
            clk_b,
            done,
            ready,
            edges,
            last_clk: 0,
            evaluations: 0,
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for Counter {
    fn pins(&self) -> &PinBank {
        &self.pins
    }

    fn pins_mut(&mut self) -> &mut PinBank {
        &mut self.pins
    }

    fn evaluate(&mut self) {
        self.evaluations += 1;
        let clk = self.pins.get(self.clk);
        if clk == 1 && self.last_clk == 0 {
            let edges = self.pins.get(self.edges) + 1;
            self.pins.set(self.edges, edges);
            if edges >= 3 {
                self.pins.set(self.done, 1);
            }
        }
        self.last_clk = clk;
    }
}

#[derive(Debug, Default)]
pub struct SinkLog {
    pub opens: usize,
    pub dumps: Vec<u64>,
    pub flushes: usize,
}

/// Records every call; optionally refuses to open.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub log: Rc<RefCell<SinkLog>>,
    pub fail_open: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }
}

impl TraceSink for RecordingSink {
    fn open(&mut self, _path: &Path, _depth: usize, _pins: &PinBank) -> io::Result<()> {
        self.log.borrow_mut().opens += 1;
        if self.fail_open {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "refused"));
        }
        Ok(())
    }

    fn dump(&mut self, timestamp: u64, _pins: &PinBank) -> io::Result<()> {
        self.log.borrow_mut().dumps.push(timestamp);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.log.borrow_mut().flushes += 1;
        Ok(())
    }
}
