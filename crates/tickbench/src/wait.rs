use crate::{BenchError, ClockId, Model, Notifier, TestBench};

/// Termination condition for [`TestBench::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Until {
    /// Step until the notifier holds.
    Notifier(Notifier),
    /// Step until `clock` has ticked `n` more times. The run ends on the
    /// rising edge of the last tick.
    Ticks { clock: ClockId, n: u64 },
}

impl From<Notifier> for Until {
    fn from(notifier: Notifier) -> Self {
        Until::Notifier(notifier)
    }
}

impl<M: Model> TestBench<M> {
    /// Advances until `until` is satisfied and returns the number of steps
    /// taken. The condition is checked before every step, so a condition
    /// that already holds returns `Ok(0)`.
    ///
    /// There is no timeout: a condition that never becomes true runs forever.
    pub fn run<U: Into<Until>>(&mut self, until: U) -> Result<u64, BenchError> {
        let (notifier, paced) = match until.into() {
            Until::Notifier(notifier) => (notifier, None),
            Until::Ticks { clock, n } => {
                let goal = self.clock(clock).ticks().saturating_add(n);
                (Notifier::Ticks { clock, goal }, (n > 0).then_some(clock))
            }
        };

        let mut steps = 0;
        while !notifier.check(&*self) {
            self.advance()?;
            steps += 1;
        }

        if let Some(clock) = paced {
            assert!(
                self.clock(clock).rising_edge(),
                "paced run ended off the rising edge of clock {}",
                clock.index()
            );
        }
        Ok(steps)
    }

    /// Blocks until `notifier` holds.
    pub fn wait(&mut self, notifier: Notifier) -> Result<u64, BenchError> {
        self.run(notifier)
    }

    /// Steps until `clock` has completed `n` more cycles.
    pub fn advance_ticks(&mut self, clock: ClockId, n: u64) -> Result<u64, BenchError> {
        self.run(Until::Ticks { clock, n })
    }

    /// Performs exactly `steps` time steps.
    pub fn run_for(&mut self, steps: u64) -> Result<(), BenchError> {
        for _ in 0..steps {
            self.advance()?;
        }
        Ok(())
    }
}
