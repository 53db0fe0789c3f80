use tickbench::{BenchError, Model, PinBank, PinId};

/// Behavioral stand-in for the registered 8-bit adder under test.
///
/// `sum` latches `a + b` on every rising edge of `clk`; `sum_late` copies
/// `sum` on every rising edge of `clk_offset`.
pub struct Adder {
    pins: PinBank,
    pub clk: PinId,
    pub clk_offset: PinId,
    pub a: PinId,
    pub b: PinId,
    pub sum: PinId,
    pub sum_late: PinId,
    last_clk: u64,
    last_clk_offset: u64,
}

impl Adder {
    pub fn new() -> Result<Self, BenchError> {
        let mut pins = PinBank::new();
        let clk = pins.add("clk", 1)?;
        let clk_offset = pins.add("clk_offset", 1)?;
        let a = pins.add("adder.a", 8)?;
        let b = pins.add("adder.b", 8)?;
        let sum = pins.add("adder.sum", 9)?;
        let sum_late = pins.add("adder.sum_late", 9)?;
        Ok(Self {
            pins,
            clk,
            clk_offset,
            a,
            b,
            sum,
            sum_late,
            last_clk: 0,
            last_clk_offset: 0,
        })
    }
}

impl Model for Adder {
    fn pins(&self) -> &PinBank {
        &self.pins
    }

    fn pins_mut(&mut self) -> &mut PinBank {
        &mut self.pins
    }

    fn evaluate(&mut self) {
        let clk = self.pins.get(self.clk);
        let clk_offset = self.pins.get(self.clk_offset);

        if clk_offset == 1 && self.last_clk_offset == 0 {
            let sum = self.pins.get(self.sum);
            self.pins.set(self.sum_late, sum);
        }
        if clk == 1 && self.last_clk == 0 {
            let sum = self.pins.get(self.a) + self.pins.get(self.b);
            self.pins.set(self.sum, sum);
        }

        self.last_clk = clk;
        self.last_clk_offset = clk_offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latches_on_rising_edge_only() {
        let mut adder = Adder::new().unwrap();
        let (clk, a, b, sum) = (adder.clk, adder.a, adder.b, adder.sum);
        adder.pins_mut().set(a, 200);
        adder.pins_mut().set(b, 100);
        adder.evaluate();
        assert_eq!(adder.pins().get(sum), 0);

        adder.pins_mut().set(clk, 1);
        adder.evaluate();
        assert_eq!(adder.pins().get(sum), 300);

        adder.pins_mut().set(a, 1);
        adder.evaluate();
        assert_eq!(adder.pins().get(sum), 300);
    }
}
