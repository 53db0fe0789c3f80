use crate::{ClockError, Peripheral, PinBank, PinId};

/// Smallest half-period accepted for a clock, in simulation quanta.
///
/// The trace brackets every step with a dump at `t + 1` and one at
/// `t + delta`, so a delta of one quantum would emit the same timestamp twice.
pub const MIN_HALF_PERIOD: u64 = 2;

/// A periodic clock driving a single pin.
///
/// The clock keeps its own view of time, seeded with its phase offset. One
/// full period spans two half-periods: the pin is high from a rising edge at
/// `last_cycle` up to `last_cycle + half_period`, then low until the next
/// rising edge at `last_cycle + period`.
#[derive(Debug)]
pub struct Clock {
    pin: PinId,
    increment: u64,
    now: u64,
    last_cycle: u64,
    ticks: u64,
}

impl Clock {
    pub fn new(pin: PinId, period: u64, offset: u64) -> Result<Self, ClockError> {
        if !period.is_multiple_of(2) {
            return Err(ClockError::OddPeriod { period });
        }
        if period / 2 < MIN_HALF_PERIOD {
            return Err(ClockError::PeriodTooSmall {
                period,
                min: 2 * MIN_HALF_PERIOD,
            });
        }
        if offset >= period {
            return Err(ClockError::OffsetOutOfRange { offset, period });
        }
        // A first step of one quantum would trace pre and post edge at the same time.
        if offset % (period / 2) == period / 2 - 1 {
            return Err(ClockError::OffsetBeforeEdge { offset, period });
        }
        Ok(Self {
            pin,
            increment: period / 2,
            now: offset,
            last_cycle: 0,
            ticks: 0,
        })
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn period(&self) -> u64 {
        2 * self.increment
    }

    pub fn half_period(&self) -> u64 {
        self.increment
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Time of the most recent rising edge.
    pub fn last_cycle(&self) -> u64 {
        self.last_cycle
    }

    /// Number of rising edges crossed since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_high(&self) -> bool {
        self.now - self.last_cycle < self.increment
    }

    pub fn rising_edge(&self) -> bool {
        self.now == self.last_cycle
    }

    pub fn falling_edge(&self) -> bool {
        self.now == self.last_cycle + self.increment
    }

    /// Clock time of the `n`-th rising edge after the current cycle start.
    ///
    /// The goal is fixed when this is called; checking it later compares
    /// against the same instant no matter how far the clock has moved.
    /// Goals beyond the time range saturate to `u64::MAX` and never fire.
    pub fn rising_edge_goal(&self, n: u64) -> u64 {
        self.last_cycle.saturating_add(self.cycles(n))
    }

    /// Clock time of the `n`-th falling edge after the current cycle's one.
    pub fn falling_edge_goal(&self, n: u64) -> u64 {
        self.last_cycle
            .saturating_add(self.increment)
            .saturating_add(self.cycles(n))
    }

    fn cycles(&self, n: u64) -> u64 {
        n.saturating_mul(2 * self.increment)
    }

    /// Writes the level implied by the current phase to the bound pin.
    pub(crate) fn drive(&self, pins: &mut PinBank) {
        pins.set(self.pin, u64::from(self.is_high()));
    }
}

impl Peripheral for Clock {
    fn time_to_event(&self) -> u64 {
        assert!(self.last_cycle <= self.now);

        if self.now < self.last_cycle + self.increment {
            // Next event is the falling edge.
            (self.last_cycle + self.increment) - self.now
        } else {
            (self.last_cycle + 2 * self.increment) - self.now
        }
    }

    fn advance(&mut self, delta: u64, pins: &mut PinBank) -> bool {
        assert!(
            delta <= self.increment,
            "advancing by {delta} would skip an edge of a clock with half-period {}",
            self.increment
        );

        self.now += delta;

        if self.now >= self.last_cycle + 2 * self.increment {
            // Rising edge.
            self.last_cycle += 2 * self.increment;
            self.ticks += 1;
            pins.set(self.pin, 1);
            true
        } else if self.now >= self.last_cycle + self.increment {
            pins.set(self.pin, 0);
            false
        } else {
            pins.set(self.pin, 1);
            true
        }
    }
}
