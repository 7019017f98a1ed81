//! Configuration loading and parsing.
//!
//! All settings live in a TOML file; every field has a default, so an
//! empty file (or an absent section) yields a usable configuration. Size
//! and width assumptions are checked by [`Config::validate`], which
//! reports diagnostics rather than aborting: the harness continues in
//! best-effort mode with clamped values.

use serde::Deserialize;

use crate::common::HarnessError;
use crate::counters::{Counter64Reader, SplitReader, WideReader};

const DEFAULT_MAX_CYCLES: u64 = 10_000;
const DEFAULT_TIMESTEP: u64 = 5;
const DEFAULT_RESET_CYCLES: u32 = 5;
const DEFAULT_TICKS_PER_SEC: u64 = 50_000_000;
const DEFAULT_COUNTER_BASE: u32 = 0x0;
const DEFAULT_ARENA_BYTES: usize = 16 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sim: SimConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub counters: CountersConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub trace: bool,

    #[serde(default = "default_trace_path")]
    pub trace_path: String,

    #[serde(default = "default_arena_bytes")]
    pub arena_bytes: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            trace_path: default_trace_path(),
            arena_bytes: DEFAULT_ARENA_BYTES,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_max_cycles")]
    pub max_cycles: u64,

    #[serde(default = "default_timestep")]
    pub timestep: u64,

    #[serde(default = "default_reset_cycles")]
    pub reset_cycles: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
            timestep: DEFAULT_TIMESTEP,
            reset_cycles: DEFAULT_RESET_CYCLES,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_ticks_per_sec")]
    pub ticks_per_sec: u64,

    /// Divider trading timer resolution against the longest measurable
    /// interval.
    #[serde(default = "default_divider")]
    pub divider: u64,
}

impl TimerConfig {
    /// Effective ticks per second after the resolution divider.
    pub fn effective_ticks_per_sec(&self) -> u64 {
        let div = if self.divider == 0 { 1 } else { self.divider };
        self.ticks_per_sec / div
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            ticks_per_sec: DEFAULT_TICKS_PER_SEC,
            divider: 1,
        }
    }
}

/// Counter-width strategy selected at configuration time.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CounterWidth {
    /// Two 32-bit words per counter; tear-free hi/lo/hi sampling.
    #[default]
    Split32,
    /// Counter state frozen while sampling; single paired read.
    Native64,
}

impl CounterWidth {
    /// Builds the matching read strategy.
    pub fn reader(self) -> Box<dyn Counter64Reader> {
        match self {
            CounterWidth::Split32 => Box::new(SplitReader),
            CounterWidth::Native64 => Box::new(WideReader),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CountersConfig {
    #[serde(default = "default_counter_base")]
    pub base: String,

    #[serde(default)]
    pub width: CounterWidth,
}

impl CountersConfig {
    /// Parsed base address of the counter register file.
    pub fn base_val(&self) -> u32 {
        parse_hex(&self.base, DEFAULT_COUNTER_BASE)
    }
}

impl Default for CountersConfig {
    fn default() -> Self {
        Self {
            base: default_counter_base(),
            width: CounterWidth::default(),
        }
    }
}

impl Config {
    /// Checks size and width assumptions.
    ///
    /// Returns diagnostics for anything that looks wrong; callers report
    /// them and continue with best-effort values.
    pub fn validate(&self) -> Vec<HarnessError> {
        let mut diags = Vec::new();
        let mut diag = |msg: &str| diags.push(HarnessError::Config(msg.to_string()));
        if std::mem::size_of::<usize>() < 4 {
            diag("host pointer width below 32 bits; addresses may truncate");
        }
        if self.timer.divider == 0 {
            diag("timer.divider is 0; treating as 1");
        }
        if self.timer.ticks_per_sec == 0 {
            diag("timer.ticks_per_sec is 0; seconds will read as 0");
        }
        if self.sim.max_cycles == 0 {
            diag("sim.max_cycles is 0; every run will time out immediately");
        }
        if self.counters.base_val() % 4 != 0 {
            diag("counters.base is not word aligned; reads will truncate");
        }
        diags
    }
}

fn parse_hex(s: &str, default: u32) -> u32 {
    let s = s.trim_start_matches("0x");
    u32::from_str_radix(s, 16).unwrap_or(default)
}

fn default_trace_path() -> String {
    "harness.vcd".to_string()
}

fn default_arena_bytes() -> usize {
    DEFAULT_ARENA_BYTES
}

fn default_max_cycles() -> u64 {
    DEFAULT_MAX_CYCLES
}

fn default_timestep() -> u64 {
    DEFAULT_TIMESTEP
}

fn default_reset_cycles() -> u32 {
    DEFAULT_RESET_CYCLES
}

fn default_ticks_per_sec() -> u64 {
    DEFAULT_TICKS_PER_SEC
}

fn default_divider() -> u64 {
    1
}

fn default_counter_base() -> String {
    format!("{:#x}", DEFAULT_COUNTER_BASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.sim.max_cycles, DEFAULT_MAX_CYCLES);
        assert_eq!(config.counters.width, CounterWidth::Split32);
        assert_eq!(config.counters.base_val(), 0);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn width_strategy_parses() {
        let config: Config = toml::from_str("[counters]\nwidth = \"native64\"\n").unwrap();
        assert_eq!(config.counters.width, CounterWidth::Native64);
    }

    #[test]
    fn zero_divider_is_diagnosed_not_fatal() {
        let config: Config = toml::from_str("[timer]\ndivider = 0\n").unwrap();
        assert!(!config.validate().is_empty());
        assert_eq!(
            config.timer.effective_ticks_per_sec(),
            DEFAULT_TICKS_PER_SEC
        );
    }
}
