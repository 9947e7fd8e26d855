use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use spendsync_finance::{CategoryRule, CategoryRules};
use spendsync_ingest::ScanOptions;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_spendsync_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunSection,
    #[serde(default)]
    pub rules: RulesSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    pub currency: String,
    /// IANA zone used to pick the default (previous) month
    pub timezone: String,
    /// Max lines searched after a GPay date line for its amount
    pub lookahead: usize,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            lookahead: ScanOptions::default().lookahead,
        }
    }
}

/// Overrides for the built-in tables; an absent key keeps the built-in one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryRule>>,
}

impl Config {
    pub fn category_rules(&self) -> CategoryRules {
        let mut rules = CategoryRules::default();
        if let Some(categories) = &self.rules.categories {
            rules = rules.with_rules(categories.clone());
        }
        if let Some(ignore) = &self.rules.ignore {
            rules = rules.with_ignore(ignore.clone());
        }
        rules
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            lookahead: self.run.lookahead,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_spendsync_home()?.join("config.toml"))
}

/// Load `explicit` if given (it must exist), else the default file if present
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            load_config_from(p)
        }
        None => {
            let p = config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            load_config_from(&p)
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
