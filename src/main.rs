//! Testbench CLI.
//!
//! Loads a flat binary program, drives the reference model through the
//! stepping loop, and reports the performance counter deltas for the run.
//!
//! The success predicate for a CLI run is "fetch ran past the end of the
//! program": once every loaded instruction has retired the core fetch
//! address leaves the program bound. Runs that spin forever are cut off
//! by the maximum-cycle watchdog.

use clap::Parser;
use std::path::Path;
use std::{fs, process};

use riscv_testbench::config::Config;
use riscv_testbench::counters::{PerfCounterBank, TimeSource, OFF_CYCLE};
use riscv_testbench::mem::{MemoryStub, StaticArena};
use riscv_testbench::model::ReferenceModel;
use riscv_testbench::sim::{loader, ModelStepper, StepperOptions, VcdSink};
use riscv_testbench::stats::RunReport;

/// Command-line arguments for the testbench harness.
#[derive(Parser, Debug)]
#[command(author, version, about = "Cycle-accurate testbench harness")]
struct Args {
    #[arg(short, long, default_value = "configs/default.toml")]
    config: String,

    /// Flat binary program image to execute.
    #[arg(short, long)]
    file: String,

    /// Force waveform capture regardless of configuration.
    #[arg(long)]
    trace: bool,

    /// Emit the run report as JSON instead of the table.
    #[arg(long)]
    json: bool,

    /// Override the configured maximum-cycle watchdog.
    #[arg(long)]
    max_cycles: Option<u64>,
}

fn main() {
    let args = Args::parse();
    let config_content = fs::read_to_string(&args.config).expect("Failed to read config");
    let config: Config = toml::from_str(&config_content).expect("Failed to parse config");

    for diag in config.validate() {
        eprintln!("[Config] WARNING: {}", diag);
    }

    let mut arena = StaticArena::new(config.general.arena_bytes);
    let program = loader::load_program(&args.file, &mut arena).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {}", e);
        process::exit(1);
    });

    let trace = args.trace || config.general.trace || cfg!(feature = "always-trace");
    let max_cycles = args.max_cycles.unwrap_or(config.sim.max_cycles);

    if !args.json {
        println!("Harness Configuration");
        println!("---------------------");
        println!("  Program:          {} ({} words)", args.file, program.len());
        println!("  Max Cycles:       {}", max_cycles);
        println!("  Timestep:         {} per half cycle", config.sim.timestep);
        println!("  Counter Base:     {:#x}", config.counters.base_val());
        println!("  Counter Width:    {:?}", config.counters.width);
        println!("  Trace:            {}", trace);
        println!("---------------------");
    }

    let counter_base = config.counters.base_val();
    let model = ReferenceModel::new(counter_base);
    let mut mem = MemoryStub::new();
    let end_pc = (program.len() as u32) * 4;
    mem.load_program(program);

    let opts = StepperOptions {
        max_cycles,
        timestep: config.sim.timestep,
        reset_cycles: config.sim.reset_cycles,
    };
    let mut stepper = ModelStepper::new(model, mem, opts);

    if trace {
        let path = Path::new(&config.general.trace_path);
        if let Err(e) = stepper.open_wave(Box::new(VcdSink::new()), path) {
            eprintln!("[!] Could not open trace {}: {}", path.display(), e);
        }
    }

    let mut bank = PerfCounterBank::new(config.counters.width.reader(), counter_base);
    let time = TimeSource::new(
        config.counters.width.reader(),
        counter_base + OFF_CYCLE,
        config.timer.effective_ticks_per_sec(),
    );

    stepper.reset();
    bank.start(stepper.model());
    let start_ticks = time.get_time(stepper.model());

    let outcome = stepper.run(|frame| frame.pc >= end_pc);

    bank.stop(stepper.model());
    let ticks = time.get_time(stepper.model()).wrapping_sub(start_ticks);

    let report = RunReport::new(
        outcome,
        bank.report(),
        config.timer.effective_ticks_per_sec(),
    );

    if args.json {
        println!("{}", report.to_json());
    } else {
        report.print();
        println!("ticks                    {}", ticks);
        println!(
            "time_in_secs             {} s",
            time.time_in_secs(ticks)
        );

        match stepper.halt(true).and_then(|_| stepper.capture_registers()) {
            Ok(regs) => {
                println!("\nFinal register file:");
                for (i, val) in regs.iter().enumerate() {
                    if *val != 0 {
                        println!("  x{:<2} = {:#010x} ({})", i, val, val);
                    }
                }
            }
            Err(e) => eprintln!("[!] Register capture failed: {}", e),
        }
    }

    process::exit(if report.outcome.is_pass() { 0 } else { 1 });
}
