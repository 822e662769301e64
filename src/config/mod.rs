use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dues::{DueSchedule, Month};
use crate::errors::{DuesError, Result};

const TMP_SUFFIX: &str = "tmp";

fn default_currency() -> String {
    "USD".into()
}

/// Dues schedule for an association, as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuesConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    pub initial_tracking_month: Month,
    pub monthly_amount: Decimal,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<Month, Decimal>,
}

impl DuesConfig {
    pub fn new(initial_tracking_month: Month, monthly_amount: Decimal) -> Self {
        Self {
            currency: default_currency(),
            initial_tracking_month,
            monthly_amount,
            overrides: BTreeMap::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let code = self.currency.as_str();
        if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_uppercase()) {
            return Err(DuesError::Config(format!(
                "currency `{code}` is not an ISO 4217 code"
            )));
        }
        if self.monthly_amount < Decimal::ZERO {
            return Err(DuesError::Config(format!(
                "monthly amount must not be negative, got {}",
                self.monthly_amount
            )));
        }
        if let Some((month, amount)) = self
            .overrides
            .iter()
            .find(|(_, amount)| **amount < Decimal::ZERO)
        {
            return Err(DuesError::Config(format!(
                "override for {month} must not be negative, got {amount}"
            )));
        }
        Ok(())
    }

    /// Due oracle backed by this configuration.
    pub fn schedule(&self) -> DueSchedule {
        DueSchedule::new(self.initial_tracking_month, self.monthly_amount)
            .with_overrides(self.overrides.iter().map(|(month, amount)| (*month, *amount)))
    }
}

/// Loads and saves a [`DuesConfig`] JSON file.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<DuesConfig> {
        if !self.path.exists() {
            return Err(DuesError::Config(format!(
                "configuration `{}` not found",
                self.path.display()
            )));
        }
        let data = fs::read_to_string(&self.path)?;
        let config: DuesConfig = serde_json::from_str(&data)?;
        config.validate()?;
        info!(path = %self.path.display(), "dues configuration loaded");
        Ok(config)
    }

    pub fn save(&self, config: &DuesConfig) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
