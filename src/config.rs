// Store configuration: page size, selection cap, per-field defaults and bounds

use chrono::{NaiveDate, NaiveTime};
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::AgendaKind;

const CONFIG_DIR: &str = "recordstore";
const CONFIG_FILE: &str = "config.yaml";

/// Settings shared by every store in a session
///
/// All per-field defaults and bounds live here so that catalog and agenda
/// variants don't each carry their own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Records shown per page
    pub page_size: usize,
    /// Maximum number of records in the comparison selection
    pub compare_limit: usize,
    pub product: ProductDefaults,
    pub agenda: AgendaDefaults,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: 6,
            compare_limit: 4,
            product: ProductDefaults::default(),
            agenda: AgendaDefaults::default(),
        }
    }
}

/// Defaults applied when a product draft leaves a field out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDefaults {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub finish: String,
    pub shade: String,
    pub description: String,
    pub price: f64,
    pub rating: f64,
    pub stock: i64,
    pub cruelty_free: bool,
    pub vegan: bool,
    pub rating_min: f64,
    pub rating_max: f64,
    /// Upper end of the price filter range
    pub price_ceiling: f64,
}

impl Default for ProductDefaults {
    fn default() -> Self {
        Self {
            name: "New product".to_string(),
            brand: "Other".to_string(),
            category: "Face".to_string(),
            finish: "Matte".to_string(),
            shade: "Pink".to_string(),
            description: "Short product description.".to_string(),
            price: 59.0,
            rating: 4.5,
            stock: 10,
            cruelty_free: true,
            vegan: false,
            rating_min: 1.0,
            rating_max: 5.0,
            price_ceiling: 200.0,
        }
    }
}

impl ProductDefaults {
    /// Price: non-finite falls back to the default, negative clamps to 0
    pub fn price(&self, value: Option<f64>) -> f64 {
        match value {
            Some(v) if v.is_finite() => v.max(0.0),
            _ => self.price,
        }
    }

    /// Rating: non-finite falls back to the default, then clamps into bounds
    pub fn rating(&self, value: Option<f64>) -> f64 {
        let v = match value {
            Some(v) if v.is_finite() => v,
            _ => self.rating,
        };
        self.bound_rating(v)
    }

    /// Clamp into `[rating_min, rating_max]` without panicking on bad bounds
    pub fn bound_rating(&self, value: f64) -> f64 {
        value.max(self.rating_min).min(self.rating_max)
    }

    pub fn stock(&self, value: Option<i64>) -> i64 {
        value.unwrap_or(self.stock).max(0)
    }
}

/// Defaults and bounds for agenda items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgendaDefaults {
    pub topic: String,
    pub owner: String,
    pub objective: String,
    pub kind: AgendaKind,
    pub start: NaiveTime,
    pub minutes: u32,
    pub min_minutes: u32,
    pub max_minutes: u32,
    /// Date used for imported items that carry none; today when unset
    pub date: Option<NaiveDate>,
}

impl Default for AgendaDefaults {
    fn default() -> Self {
        Self {
            topic: "New topic".to_string(),
            owner: String::new(),
            objective: String::new(),
            kind: AgendaKind::Discussion,
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            minutes: 15,
            min_minutes: 5,
            max_minutes: 240,
            date: None,
        }
    }
}

impl AgendaDefaults {
    pub fn minutes(&self, value: Option<i64>) -> u32 {
        let v = value.unwrap_or(self.minutes as i64);
        v.max(self.min_minutes as i64).min(self.max_minutes as i64).max(0) as u32
    }

    pub fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

impl StoreConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config {:?}", path))?;
        let config: StoreConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config {:?}", path))?;
        info!(path = ?path, page_size = config.page_size, "Loaded store config");
        Ok(config)
    }

    /// Reject bounds that cannot be clamped into
    pub fn validate(&self) -> Result<()> {
        let p = &self.product;
        for (name, value) in [
            ("price", p.price),
            ("rating", p.rating),
            ("rating_min", p.rating_min),
            ("rating_max", p.rating_max),
            ("price_ceiling", p.price_ceiling),
        ] {
            if !value.is_finite() {
                return Err(eyre!("product.{} must be a finite number, got {}", name, value));
            }
        }
        if p.rating_min > p.rating_max {
            return Err(eyre!(
                "product.rating_min ({}) is greater than product.rating_max ({})",
                p.rating_min,
                p.rating_max
            ));
        }

        let a = &self.agenda;
        if a.min_minutes > a.max_minutes {
            return Err(eyre!(
                "agenda.min_minutes ({}) is greater than agenda.max_minutes ({})",
                a.min_minutes,
                a.max_minutes
            ));
        }
        Ok(())
    }

    /// Load from the given path, or the user config directory, or built-in defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/recordstore/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }
}
