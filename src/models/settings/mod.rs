// Settings module
// Render configuration loaded from a TOML file

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::timezone::Timezone;
use super::view_type::ViewType;
use crate::error::{LayoutError, Result};

const SETTINGS_FILE: &str = "layout.toml";

/// Grid configuration for a render pass.
///
/// ```toml
/// first_day_of_week = 1
/// visitor_timezone = "Europe/Berlin"
/// default_view = "week"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// 0 = Sunday .. 6 = Saturday
    pub first_day_of_week: u8,
    /// Zone to re-project every event into; `None` keeps each event's own zone
    pub visitor_timezone: Option<String>,
    pub default_view: ViewType,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            first_day_of_week: 0, // Sunday
            visitor_timezone: None,
            default_view: ViewType::Week,
        }
    }
}

impl LayoutSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: LayoutSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load settings, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Per-user settings location, e.g. `~/.config/calendar-layout/layout.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "calendar-layout")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn validate(&self) -> Result<()> {
        if self.first_day_of_week > 6 {
            return Err(LayoutError::InvalidWeekStart(self.first_day_of_week));
        }
        self.visitor_timezone()?;
        Ok(())
    }

    /// Resolve the configured visitor timezone.
    pub fn visitor_timezone(&self) -> Result<Option<Timezone>> {
        self.visitor_timezone
            .as_deref()
            .map(Timezone::parse)
            .transpose()
    }
}
