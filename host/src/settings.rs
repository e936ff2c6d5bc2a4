use anyhow::{anyhow, Context, Result};
use arcade_core::GameConfig;
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_SEED: u32 = 0xDEAD_BEEF;
/// Five minutes at the default rate.
pub const DEFAULT_TICKS: u32 = 18_000;
pub const DEFAULT_TICK_HZ: u32 = 60;

#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub seed: u32,
    pub ticks: u32,
    pub tick_hz: u32,
    pub config: GameConfig,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            ticks: DEFAULT_TICKS,
            tick_hz: DEFAULT_TICK_HZ,
            config: GameConfig::default(),
        }
    }
}

impl SessionSettings {
    /// Defaults overridden by `ARCADE_SEED`, `ARCADE_TICKS` and `ARCADE_TICK_HZ`.
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            seed: read_env_seed("ARCADE_SEED", DEFAULT_SEED),
            ticks: read_env_u32("ARCADE_TICKS", DEFAULT_TICKS),
            tick_hz: read_env_u32("ARCADE_TICK_HZ", DEFAULT_TICK_HZ),
            config: GameConfig::default(),
        }
    }

    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz.max(1) as f32
    }
}

pub fn load_config(path: &Path) -> Result<GameConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading config {}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing config {}", path.display()))?;
    config
        .validate()
        .map_err(|err| anyhow!("invalid config {}: {err}", path.display()))?;
    Ok(config)
}

pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
    } else {
        s.parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {s}"))
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let mut seeds = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        seeds.push(parse_seed(token)?);
    }
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

pub(crate) fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn read_env_seed(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| parse_seed(&value).ok())
        .unwrap_or(default)
}
