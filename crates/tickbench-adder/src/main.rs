use clap::Parser as ClapParser;
use miette::{IntoDiagnostic, Result, bail, miette};
use std::path::PathBuf;
use tickbench::{
    BenchConfig, ClockConfig, ClockId, DEFAULT_TRACE_DEPTH, TestBench, TraceConfig,
};

mod adder;

use adder::Adder;

#[derive(ClapParser)]
#[command(
    name = "tickbench-adder",
    about = "Sweep a registered adder model across two clock domains"
)]
struct Cli {
    /// Bench configuration (clocks and trace) in TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Waveform output path, overriding the configuration
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Hierarchy levels recorded in the waveform
    #[arg(long, default_value_t = DEFAULT_TRACE_DEPTH)]
    depth: usize,

    /// Exclusive upper bound of both operands
    #[arg(long, default_value_t = 256, value_parser = clap::value_parser!(u64).range(1..=256))]
    range: u64,

    /// Run without recording a waveform
    #[arg(long)]
    no_trace: bool,
}

fn default_config() -> BenchConfig {
    BenchConfig {
        clocks: vec![
            ClockConfig {
                pin: "clk".into(),
                period: 1000,
                offset: 0,
            },
            ClockConfig {
                pin: "clk_offset".into(),
                period: 1000,
                offset: 500,
            },
        ],
        trace: Some(TraceConfig {
            path: "adder.vcd".into(),
            depth: DEFAULT_TRACE_DEPTH,
        }),
    }
}

fn build_bench(config: &BenchConfig) -> Result<(TestBench<Adder>, ClockId)> {
    let tb = TestBench::builder(Adder::new().into_diagnostic()?)
        .config(config)
        .build()
        .into_diagnostic()?;
    let clk = tb
        .find_clock(tb.model().clk)
        .ok_or_else(|| miette!("pin `clk` has no clock attached"))?;
    Ok((tb, clk))
}

/// Drives every operand pair for one `clk` cycle and checks the latched sum.
fn sweep(tb: &mut TestBench<Adder>, clk: ClockId, range: u64) -> Result<u64> {
    let (a, b, sum) = {
        let adder = tb.model();
        (adder.a, adder.b, adder.sum)
    };

    let mut checked = 0;
    for x in 0..range {
        for y in 0..range {
            tb.set_pin(a, x);
            tb.set_pin(b, y);
            tb.advance_ticks(clk, 1).into_diagnostic()?;
            let got = tb.pin(sum);
            if got != x + y {
                bail!("{x} + {y} latched {got} at t={}", tb.time());
            }
            checked += 1;
        }
    }

    tb.advance_ticks(clk, 1).into_diagnostic()?;
    Ok(checked)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BenchConfig::load(path).into_diagnostic()?,
        None => default_config(),
    };
    if let Some(path) = cli.trace {
        config.trace = Some(TraceConfig {
            path,
            depth: cli.depth,
        });
    }
    if cli.no_trace {
        config.trace = None;
    }

    let (mut tb, clk) = build_bench(&config)?;
    if config.trace.is_some() && !tb.is_tracing() {
        log::warn!("continuing without a waveform");
    }

    let checked = sweep(&mut tb, clk, cli.range)?;
    log::info!("{checked} additions checked in {} steps", tb.steps());
    println!(
        "{checked} additions checked, simulated time {} ({} steps)",
        tb.time(),
        tb.steps()
    );
    Ok(())
}
