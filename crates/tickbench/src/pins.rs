use crate::{BenchError, HashMap};

/// Handle to a pin inside a [`PinBank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId(pub(crate) usize);

impl PinId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Static metadata of a pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinInfo {
    /// Dotted hierarchical name, e.g. `adder.clk`.
    pub name: String,
    pub width: usize,
}

/// Raw pin storage of a hardware model.
///
/// Every pin is an integer cell of at most 64 bits. Clocks write their bound
/// pin directly and notifiers read values without any further decoding.
#[derive(Debug, Clone, Default)]
pub struct PinBank {
    infos: Vec<PinInfo>,
    values: Vec<u64>,
    by_name: HashMap<String, PinId>,
}

fn mask(width: usize) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

impl PinBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new pin initialized to zero.
    pub fn add(&mut self, name: &str, width: usize) -> Result<PinId, BenchError> {
        if width == 0 || width > 64 {
            return Err(BenchError::InvalidWidth {
                pin: name.to_string(),
                width,
            });
        }
        if self.by_name.contains_key(name) {
            return Err(BenchError::DuplicatePin(name.to_string()));
        }
        let id = PinId(self.values.len());
        self.infos.push(PinInfo {
            name: name.to_string(),
            width,
        });
        self.values.push(0);
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this bank.
    pub fn get(&self, id: PinId) -> u64 {
        self.try_get(id).unwrap_or_else(|| self.foreign(id))
    }

    pub fn try_get(&self, id: PinId) -> Option<u64> {
        self.values.get(id.0).copied()
    }

    /// Writes `value`, truncated to the pin width.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this bank.
    pub fn set(&mut self, id: PinId, value: u64) {
        if !self.contains(id) {
            self.foreign(id);
        }
        self.values[id.0] = value & mask(self.infos[id.0].width);
    }

    fn foreign(&self, id: PinId) -> ! {
        panic!(
            "pin #{} does not belong to this bank ({} pins)",
            id.0,
            self.values.len()
        )
    }

    pub fn find(&self, name: &str) -> Option<PinId> {
        self.by_name.get(name).copied()
    }

    pub fn lookup(&self, name: &str) -> Result<PinId, BenchError> {
        self.find(name)
            .ok_or_else(|| BenchError::UnknownPin(name.to_string()))
    }

    pub fn contains(&self, id: PinId) -> bool {
        id.0 < self.values.len()
    }

    pub fn info(&self, id: PinId) -> &PinInfo {
        &self.infos[id.0]
    }

    pub fn name(&self, id: PinId) -> &str {
        &self.infos[id.0].name
    }

    pub fn width(&self, id: PinId) -> usize {
        self.infos[id.0].width
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates pins in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (PinId, &PinInfo, u64)> {
        self.infos
            .iter()
            .zip(self.values.iter())
            .enumerate()
            .map(|(idx, (info, value))| (PinId(idx), info, *value))
    }
}
