use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sweep: SweepConfig,

    #[serde(default)]
    pub metatest: MetatestConfig,

    #[serde(default)]
    pub random: RandomConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Buffer capacity under test
    pub size: usize,
    /// Upper bound (exclusive) on puts per case. 0 = three times `size`.
    pub max_inserts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetatestConfig {
    /// Corrupt the reference model now and then to prove mismatches are caught.
    pub enabled: bool,
    /// Corrupt roughly one case in this many.
    pub one_in: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomConfig {
    /// Independent buffers to exercise in `--random` mode
    pub rounds: usize,
    /// Mixed put/insert calls per round
    pub ops_per_round: usize,
    /// Percentage of insert calls given a deliberately invalid depth
    pub bad_depth_pct: u8,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for SweepConfig {
    fn default() -> Self {
        Self { size: 10, max_inserts: 0 }
    }
}

impl Default for MetatestConfig {
    fn default() -> Self {
        Self { enabled: false, one_in: 51 }
    }
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self { rounds: 200, ops_per_round: 100, bad_depth_pct: 5 }
    }
}

impl SweepConfig {
    pub fn effective_max_inserts(&self) -> usize {
        if self.max_inserts == 0 { 3 * self.size } else { self.max_inserts }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    pub fn load() -> Self {
        let path = match Config::config_path() {
            Some(p) => p,
            None    => return Config::default(),
        };
        match load_from(&path) {
            Ok(c)  => c,
            Err(e) => {
                log::debug!("using default config: {:#}", e);
                // Write defaults on first run (best-effort)
                if !path.exists() {
                    if let Err(e) = write_defaults(&path) {
                        log::debug!("could not write default config: {:#}", e);
                    }
                }
                Config::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ringcheck").join("ringcheck.toml"))
    }
}

pub fn load_from(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let cfg: Config = toml::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

pub fn write_defaults(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# ringcheck configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}
