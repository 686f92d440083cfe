// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use petrogrid_app::{ProductTab, RegionTab};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "petrogrid";

pub const DEFAULT_ROW_COUNT: usize = 100_000;
const MAX_ROW_COUNT: i64 = 10_000_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    pub rows: Option<i64>,
    pub seed: Option<i64>,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            rows: Some(DEFAULT_ROW_COUNT as i64),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Ui {
    pub start_region: Option<String>,
    pub start_product: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("PETROGRID_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set PETROGRID_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [data] and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(rows) = self.data.rows {
            if rows <= 0 {
                bail!(
                    "data.rows in {} must be positive, got {}",
                    path.display(),
                    rows
                );
            }
            if rows > MAX_ROW_COUNT {
                bail!(
                    "data.rows in {} must be at most {}, got {}",
                    path.display(),
                    MAX_ROW_COUNT,
                    rows
                );
            }
        }

        if let Some(seed) = self.data.seed
            && seed < 0
        {
            bail!(
                "data.seed in {} must be non-negative, got {}",
                path.display(),
                seed
            );
        }

        if let Some(region) = &self.ui.start_region
            && RegionTab::parse_key(region).is_none()
        {
            bail!(
                "ui.start_region in {} must be \"all\" or \"region-1\"..\"region-7\", got {region:?}",
                path.display()
            );
        }

        if let Some(product) = &self.ui.start_product
            && ProductTab::parse_key(product).is_none()
        {
            bail!(
                "ui.start_product in {} must be \"all\" or a product key such as \"pertalite\", got {product:?}",
                path.display()
            );
        }

        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.data
            .rows
            .map_or(DEFAULT_ROW_COUNT, |rows| rows.max(1) as usize)
    }

    pub fn seed(&self) -> Option<u64> {
        self.data.seed.map(|seed| seed as u64)
    }

    pub fn start_region(&self) -> RegionTab {
        self.ui
            .start_region
            .as_deref()
            .and_then(RegionTab::parse_key)
            .unwrap_or(RegionTab::All)
    }

    pub fn start_product(&self) -> ProductTab {
        self.ui
            .start_product
            .as_deref()
            .and_then(ProductTab::parse_key)
            .unwrap_or(ProductTab::All)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# petrogrid config ({})\n\
             version = 1\n\
             \n\
             [data]\n\
             # synthetic dataset size generated at startup\n\
             rows = {DEFAULT_ROW_COUNT}\n\
             # uncomment to pin the generator for reproducible data\n\
             # seed = 42\n\
             \n\
             [ui]\n\
             # \"all\" or \"region-1\"..\"region-7\"\n\
             start_region = \"all\"\n\
             # \"all\" or a product key: pertalite, pertamax, biosolar,\n\
             # dexlite, pertamax-turbo, solar\n\
             start_product = \"all\"\n",
            path.display()
        )
    }
}
