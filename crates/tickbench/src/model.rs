use crate::PinBank;

/// A stepped hardware model driven by a [`TestBench`](crate::TestBench).
///
/// The test bench never looks inside the model: it writes clock pins, calls
/// [`Model::evaluate`] twice per time step (before and after the delta) and
/// hands the pin bank to the trace sink.
pub trait Model {
    fn pins(&self) -> &PinBank;
    fn pins_mut(&mut self) -> &mut PinBank;
    /// Recomputes derived state from the current pin inputs.
    fn evaluate(&mut self);
}
