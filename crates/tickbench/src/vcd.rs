use crate::{PinBank, PinId, TraceSink};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

struct VcdVar {
    pin: PinId,
    id: String,
    width: usize,
}

/// Writes pin samples in Value Change Dump format.
///
/// Pin names are split on `.` into nested `$scope` blocks under a `TOP`
/// scope. Only pins with fewer than `depth` scope levels are recorded.
pub struct VcdWriter<W: Write> {
    writer: W,
    vars: Vec<VcdVar>,
    last_values: Vec<Option<u64>>,
    timestamp: Option<u64>,
}

impl<W: Write> VcdWriter<W> {
    pub fn new(mut writer: W, pins: &PinBank, depth: usize) -> io::Result<Self> {
        writeln!(writer, "$date")?;
        writeln!(
            writer,
            "  {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(writer, "$end")?;
        writeln!(writer, "$version")?;
        writeln!(writer, "  tickbench")?;
        writeln!(writer, "$end")?;
        writeln!(writer, "$timescale 1ps $end")?;

        let mut traced: Vec<(Vec<&str>, PinId, usize)> = pins
            .iter()
            .map(|(pin, info, _)| (info.name.split('.').collect::<Vec<_>>(), pin, info.width))
            .filter(|(segments, _, _)| segments.len() <= depth)
            .collect();
        traced.sort_by(|a, b| a.0.cmp(&b.0));

        writeln!(writer, "$scope module TOP $end")?;
        let mut open_scopes: Vec<&str> = Vec::new();
        let mut vars = Vec::with_capacity(traced.len());
        for (segments, pin, width) in traced {
            let (leaf, scopes) = segments
                .split_last()
                .expect("split always yields at least one segment");
            let common = open_scopes
                .iter()
                .zip(scopes.iter())
                .take_while(|(a, b)| a == b)
                .count();
            while open_scopes.len() > common {
                open_scopes.pop();
                writeln!(writer, "$upscope $end")?;
            }
            for scope in &scopes[common..] {
                writeln!(writer, "$scope module {scope} $end")?;
                open_scopes.push(*scope);
            }

            let id = Self::generate_vcd_id(vars.len());
            writeln!(writer, "$var wire {width} {id} {leaf} $end")?;
            vars.push(VcdVar { pin, id, width });
        }
        for _ in open_scopes {
            writeln!(writer, "$upscope $end")?;
        }
        writeln!(writer, "$upscope $end")?;
        writeln!(writer, "$enddefinitions $end")?;

        let last_values = vec![None; vars.len()];
        Ok(Self {
            writer,
            vars,
            last_values,
            timestamp: None,
        })
    }

    fn generate_vcd_id(num: usize) -> String {
        let mut id = String::new();
        let mut n = num;
        loop {
            let char = ((n % 94) + 33) as u8 as char;
            id.push(char);
            if n < 94 {
                break;
            }
            n = (n / 94) - 1;
        }
        id.chars().rev().collect()
    }

    /// Emits the values that changed since the previous dump.
    pub fn dump(&mut self, timestamp: u64, pins: &PinBank) -> io::Result<()> {
        if let Some(prev) = self.timestamp
            && timestamp <= prev
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("trace timestamp {timestamp} does not follow {prev}"),
            ));
        }
        writeln!(self.writer, "#{timestamp}")?;
        self.timestamp = Some(timestamp);

        for (var, last) in self.vars.iter().zip(self.last_values.iter_mut()) {
            let current = pins.get(var.pin);
            if *last != Some(current) {
                if var.width == 1 {
                    writeln!(self.writer, "{}{}", current, var.id)?;
                } else {
                    writeln!(self.writer, "b{:b} {}", current, var.id)?;
                }
                *last = Some(current);
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// File-backed VCD [`TraceSink`], the default sink of a test bench.
#[derive(Default)]
pub struct VcdTrace {
    writer: Option<VcdWriter<BufWriter<File>>>,
}

impl VcdTrace {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TraceSink for VcdTrace {
    fn open(&mut self, path: &Path, depth: usize, pins: &PinBank) -> io::Result<()> {
        let file = File::create(path)?;
        self.writer = Some(VcdWriter::new(BufWriter::new(file), pins, depth)?);
        Ok(())
    }

    fn dump(&mut self, timestamp: u64, pins: &PinBank) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.dump(timestamp, pins),
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}
