use crate::PinBank;

/// A time-driven source attached to a test bench.
///
/// The scheduler advances simulated time by the minimum of all
/// [`time_to_event`](Peripheral::time_to_event) values and then moves every
/// peripheral forward by exactly that delta.
pub trait Peripheral {
    /// Simulated time until the next transition. Must be non-zero.
    fn time_to_event(&self) -> u64;
    /// Moves the peripheral forward by `delta`, updating the pins it drives.
    /// Returns the logic level of its primary output after the move.
    fn advance(&mut self, delta: u64, pins: &mut PinBank) -> bool;
}
