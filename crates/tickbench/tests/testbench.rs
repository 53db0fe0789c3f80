mod common;

use common::{Counter, RecordingSink};
use tickbench::{BenchConfig, BenchError, Peripheral, PinBank, PinId, TestBench, any, high, low};

/// Two clocks half a period apart step every 500 quanta.
#[test]
fn test_offset_clocks_alternate() {
    let mut tb = TestBench::new(Counter::new());
    let a = tb.add_clock("clk", 1000, 0).unwrap();
    let b = tb.add_clock("clk_b", 1000, 500).unwrap();

    for step in 1..=4 {
        assert_eq!(tb.advance().unwrap(), 500);
        assert_eq!(tb.time(), step * 500);
        let on_edge = tb
            .clocks()
            .iter()
            .any(|c| c.rising_edge() || c.falling_edge());
        assert!(on_edge, "no clock on an edge after step {step}");
        // The offset clock is always opposite in level.
        assert_ne!(tb.clock(a).is_high(), tb.clock(b).is_high());
    }

    assert_eq!(tb.time(), 2000);
    assert!(tb.clock(a).rising_edge());
    assert_eq!(tb.clock(a).ticks(), 2);
    assert_eq!(tb.clock(b).ticks(), 2);
    assert_eq!(tb.clock(b).now() - tb.clock(a).now(), 500);
}

#[test]
fn test_rising_edges_land_on_period_multiples() {
    let mut tb = TestBench::new(Counter::new());
    let clk = tb.add_clock("clk", 10, 0).unwrap();
    let pin = tb.pin_id("clk").unwrap();
    assert!(tb.clock(clk).rising_edge());
    assert_eq!(tb.pin(pin), 1);

    let mut rising = vec![];
    for _ in 0..8 {
        tb.advance().unwrap();
        let clock = tb.clock(clk);
        assert_eq!(tb.pin(pin), u64::from(clock.is_high()));
        if clock.rising_edge() {
            rising.push((tb.time(), clock.ticks()));
        }
    }
    assert_eq!(rising, vec![(10, 1), (20, 2), (30, 3), (40, 4)]);
}

#[test]
fn test_rising_edges_goal_is_fixed_at_build_time() {
    let mut tb = TestBench::new(Counter::new());
    let clk = tb.add_clock("clk", 10, 0).unwrap();

    let third = tb.rising_edges(clk, 3);
    let mut fired_at = None;
    for _ in 0..10 {
        tb.advance().unwrap();
        if third.check(&tb) {
            fired_at = Some(tb.time());
            break;
        }
    }
    assert_eq!(fired_at, Some(30));
    assert_eq!(tb.steps(), 6);

    // Built mid-cycle: anchored to the cycle start at 30.
    tb.advance().unwrap();
    assert_eq!(tb.time(), 35);
    let next = tb.rising_edges(clk, 1);
    assert_eq!(tb.wait(next).unwrap(), 1);
    assert_eq!(tb.time(), 40);

    let fall = tb.falling_edges(clk, 0);
    assert_eq!(tb.wait(fall).unwrap(), 1);
    assert!(tb.clock(clk).falling_edge());
}

#[test]
fn test_any_stops_at_exact_step() {
    let mut tb = TestBench::new(Counter::new());
    tb.add_clock("clk", 10, 0).unwrap();
    let done = tb.model().done;
    let ready = tb.model().ready;
    tb.set_pin(ready, 1);

    let steps = tb.wait(any([high(done), low(ready)])).unwrap();
    // Edges seen at 0, 10 and 20; `done` rises on the third.
    assert_eq!(steps, 4);
    assert_eq!(tb.time(), 20);
    assert_eq!(tb.pin(done), 1);
    assert_eq!(tb.pin(tb.model().edges), 3);
}

#[test]
fn test_satisfied_notifier_takes_no_steps() {
    let mut tb = TestBench::new(Counter::new());
    tb.add_clock("clk", 10, 0).unwrap();
    let done = tb.model().done;
    let ready = tb.model().ready;

    assert_eq!(tb.wait(any([high(done), low(ready)])).unwrap(), 0);
    assert_eq!(tb.time(), 0);
    assert_eq!(tb.model().evaluations, 0);
}

#[test]
fn test_model_evaluated_twice_per_step() {
    let mut tb = TestBench::new(Counter::new());
    tb.add_clock("clk", 10, 0).unwrap();
    tb.run_for(5).unwrap();
    assert_eq!(tb.model().evaluations, 10);
    assert_eq!(tb.steps(), 5);
}

#[test]
fn test_advance_ticks_ends_on_rising_edge() {
    let mut tb = TestBench::new(Counter::new());
    let clk = tb.add_clock("clk", 1000, 0).unwrap();
    tb.add_clock("clk_b", 1000, 250).unwrap();

    let steps = tb.advance_ticks(clk, 2).unwrap();
    assert_eq!(steps, 8);
    assert_eq!(tb.time(), 2000);
    assert!(tb.clock(clk).rising_edge());
    assert_eq!(tb.clock(clk).ticks(), 2);

    assert_eq!(tb.advance_ticks(clk, 0).unwrap(), 0);
}

#[test]
fn test_far_rising_edge_goal_never_fires() {
    let mut tb = TestBench::new(Counter::new());
    let clk = tb.add_clock("clk", 10, 0).unwrap();
    let never = tb.rising_edges(clk, u64::MAX / 4);
    tb.run_for(4).unwrap();
    assert!(!never.check(&tb));
    assert!(tb.get_clock(clk).is_some());
}

#[test]
#[should_panic(expected = "clock #1 is not attached to this test bench (1 clocks)")]
fn test_foreign_clock_id_panics() {
    let mut other = TestBench::new(Counter::new());
    other.add_clock("clk", 10, 0).unwrap();
    let foreign = other.add_clock("clk_b", 10, 0).unwrap();

    let mut tb = TestBench::new(Counter::new());
    tb.add_clock("clk", 10, 0).unwrap();
    assert!(tb.get_clock(foreign).is_none());
    let _ = tb.clock(foreign);
}

#[test]
fn test_advance_without_clocks() {
    let mut tb = TestBench::new(Counter::new());
    assert!(matches!(tb.advance(), Err(BenchError::NoClocks)));
}

#[test]
fn test_clock_configuration_errors() {
    let mut tb = TestBench::new(Counter::new());

    let err = tb.add_clock("clk", 2, 0).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid clock on pin `clk`: period 2 is below the minimum of 4 quanta");

    let err = tb.add_clock("missing", 10, 0).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown pin `missing`");

    let err = tb.add_clock("clk", 10, 9).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid clock on pin `clk`: offset 9 puts the first edge of period 10 one quantum away");

    tb.add_clock("clk", 10, 0).unwrap();
    let err = tb.add_clock("clk", 20, 0).unwrap_err();
    assert!(matches!(err, BenchError::PinAlreadyClocked(pin) if pin == "clk"));
    assert_eq!(tb.clocks().len(), 1);
}

#[test]
fn test_reopening_trace_is_noop() {
    let sink = RecordingSink::default();
    let log = sink.log.clone();
    let mut tb = TestBench::with_sink(Counter::new(), sink);
    tb.add_clock("clk", 10, 0).unwrap();

    tb.open_trace("first.vcd", 99);
    tb.open_trace("second.vcd", 99);
    assert!(tb.is_tracing());
    assert_eq!(log.borrow().opens, 1);

    tb.run_for(2).unwrap();
    assert_eq!(log.borrow().dumps, vec![1, 5, 6, 10]);
}

#[test]
fn test_failed_open_disables_tracing() {
    let sink = RecordingSink::failing();
    let log = sink.log.clone();
    let mut tb = TestBench::with_sink(Counter::new(), sink);
    tb.add_clock("clk", 10, 0).unwrap();

    tb.open_trace("bench.vcd", 99);
    assert!(!tb.is_tracing());
    tb.open_trace("bench.vcd", 99);
    assert_eq!(log.borrow().opens, 1);

    tb.run_for(3).unwrap();
    tb.flush();
    assert_eq!(tb.time(), 15);
    assert!(log.borrow().dumps.is_empty());
    assert_eq!(log.borrow().flushes, 0);
}

#[test]
fn test_drop_flushes_open_trace() {
    let sink = RecordingSink::default();
    let log = sink.log.clone();
    {
        let mut tb = TestBench::with_sink(Counter::new(), sink);
        tb.add_clock("clk", 10, 0).unwrap();
        tb.flush();
        assert_eq!(log.borrow().opens, 0);
        tb.open_trace("bench.vcd", 99);
        tb.advance().unwrap();
    }
    assert_eq!(log.borrow().flushes, 1);
}

#[test]
fn test_builder_applies_config() {
    let config = BenchConfig::from_toml_str(
        r#"
        [[clock]]
        pin = "clk"
        period = 1000

        [[clock]]
        pin = "clk_b"
        period = 1000
        offset = 500

        [trace]
        path = "bench.vcd"
        depth = 1
        "#,
    )
    .unwrap();
    let sink = RecordingSink::default();
    let log = sink.log.clone();

    let mut tb = TestBench::builder(Counter::new())
        .sink(sink)
        .config(&config)
        .build()
        .unwrap();
    assert_eq!(tb.clocks().len(), 2);
    assert!(tb.is_tracing());
    assert_eq!(log.borrow().opens, 1);
    assert_eq!(tb.advance().unwrap(), 500);
}

#[test]
fn test_builder_reports_bad_clock() {
    let result = TestBench::builder(Counter::new())
        .clock("clk", 10, 0)
        .clock("clk_b", 7, 0)
        .build();
    assert!(matches!(
        result,
        Err(BenchError::Clock { pin, .. }) if pin == "clk_b"
    ));
}

/// Flips its pin every `interval` quanta.
struct Strobe {
    pin: PinId,
    interval: u64,
    remaining: u64,
}

impl Peripheral for Strobe {
    fn time_to_event(&self) -> u64 {
        self.remaining
    }

    fn advance(&mut self, delta: u64, pins: &mut PinBank) -> bool {
        self.remaining -= delta;
        if self.remaining == 0 {
            self.remaining = self.interval;
            let level = pins.get(self.pin) ^ 1;
            pins.set(self.pin, level);
        }
        pins.get(self.pin) != 0
    }
}

#[test]
fn test_custom_peripheral_shares_time_base() {
    let mut tb = TestBench::new(Counter::new());
    tb.add_clock("clk", 10, 0).unwrap();
    let ready = tb.model().ready;
    tb.attach_peripheral(Box::new(Strobe {
        pin: ready,
        interval: 3,
        remaining: 3,
    }));

    let mut times = vec![];
    for _ in 0..5 {
        tb.advance().unwrap();
        times.push(tb.time());
    }
    assert_eq!(times, vec![3, 5, 6, 9, 10]);
    assert_eq!(tb.pin(ready), 1);
}
