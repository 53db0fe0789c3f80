use crate::{Clock, ClockId, PinId};

/// Read-only view of simulation state that notifiers are checked against.
pub trait Probe {
    fn pin_value(&self, pin: PinId) -> u64;
    fn clock(&self, id: ClockId) -> &Clock;
}

/// A condition over simulation state, checked once per time step.
///
/// Notifiers only hold handles and comparison parameters; every
/// [`check`](Notifier::check) reads the current state afresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notifier {
    /// The pin equals `value`.
    Value { pin: PinId, value: u64 },
    /// The pin is non-zero.
    High(PinId),
    /// The pin is zero.
    Low(PinId),
    /// The clock's own time has reached `goal`.
    ClockGoal { clock: ClockId, goal: u64 },
    /// The clock's tick counter has reached `goal`.
    Ticks { clock: ClockId, goal: u64 },
    /// True once any member is true. Members are checked left to right and
    /// checking stops at the first true one.
    Any(Vec<Notifier>),
    /// True once every member is true, short-circuiting on the first false.
    All(Vec<Notifier>),
}

impl Notifier {
    pub fn check<P: Probe + ?Sized>(&self, probe: &P) -> bool {
        match self {
            Notifier::Value { pin, value } => probe.pin_value(*pin) == *value,
            Notifier::High(pin) => probe.pin_value(*pin) > 0,
            Notifier::Low(pin) => probe.pin_value(*pin) == 0,
            Notifier::ClockGoal { clock, goal } => probe.clock(*clock).now() >= *goal,
            Notifier::Ticks { clock, goal } => probe.clock(*clock).ticks() >= *goal,
            Notifier::Any(members) => members.iter().any(|n| n.check(probe)),
            Notifier::All(members) => members.iter().all(|n| n.check(probe)),
        }
    }

    /// Disjunction, flattening into an existing [`Notifier::Any`].
    pub fn or(self, other: Notifier) -> Notifier {
        match self {
            Notifier::Any(mut members) => {
                members.push(other);
                Notifier::Any(members)
            }
            first => Notifier::Any(vec![first, other]),
        }
    }

    /// Conjunction, flattening into an existing [`Notifier::All`].
    pub fn and(self, other: Notifier) -> Notifier {
        match self {
            Notifier::All(mut members) => {
                members.push(other);
                Notifier::All(members)
            }
            first => Notifier::All(vec![first, other]),
        }
    }
}

/// An empty list never fires.
pub fn any(notifiers: impl IntoIterator<Item = Notifier>) -> Notifier {
    Notifier::Any(notifiers.into_iter().collect())
}

/// An empty list fires immediately.
pub fn all(notifiers: impl IntoIterator<Item = Notifier>) -> Notifier {
    Notifier::All(notifiers.into_iter().collect())
}

pub fn value(pin: PinId, value: u64) -> Notifier {
    Notifier::Value { pin, value }
}

pub fn high(pin: PinId) -> Notifier {
    Notifier::High(pin)
}

pub fn low(pin: PinId) -> Notifier {
    Notifier::Low(pin)
}
