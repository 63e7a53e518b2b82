//! User-adjustable thresholds, persisted as TOML between sessions.
//!
//! A [`Settings`] value is an immutable snapshot: every pipeline run takes
//! one by reference, so changing settings only affects the next run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScanlabelError;
use crate::merge::MergeParams;

const SETTINGS_DIR: &str = "scanlabel";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub binarize: BinarizeSettings,
    pub morphology: MorphologySettings,
    pub detection: DetectionSettings,
    pub filter: FilterSettings,
    pub diacritic: DiacriticSettings,
    pub crop: CropSettings,
}

/// Adaptive threshold parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizeSettings {
    /// Neighbourhood size; odd and at least 3.
    pub block_size: u32,
    /// Constant subtracted from the local mean.
    pub constant: f64,
}

impl Default for BinarizeSettings {
    fn default() -> Self {
        Self {
            block_size: 15,
            constant: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphologySettings {
    pub open_width: u32,
    pub close_width: u32,
}

impl Default for MorphologySettings {
    fn default() -> Self {
        Self {
            open_width: 1,
            close_width: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    pub dilation_width: u32,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self { dilation_width: 3 }
    }
}

/// Primary-candidate bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub area_lower: u64,
    pub area_upper: u64,
    pub aspect_bound: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            area_lower: 500,
            area_upper: 50_000,
            aspect_bound: 8.0,
        }
    }
}

/// Diacritic-candidate bounds and the four directional merge tolerances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiacriticSettings {
    pub overlap_area_lower: u64,
    pub overlap_aspect_bound: f64,
    pub tolerance_left: f64,
    pub tolerance_right: f64,
    pub tolerance_upper: f64,
    pub tolerance_lower: f64,
}

impl Default for DiacriticSettings {
    fn default() -> Self {
        Self {
            overlap_area_lower: 100,
            overlap_aspect_bound: 4.0,
            tolerance_left: 5.0,
            tolerance_right: 5.0,
            tolerance_upper: 15.0,
            tolerance_lower: 15.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropSettings {
    /// Uniform padding added around every merged box.
    pub padding: f64,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self { padding: 2.0 }
    }
}

impl Settings {
    /// Location of the persisted settings file, under the platform config
    /// directory. Falls back to the working directory when none exists.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Loads settings from `path`, or returns defaults if the file does not
    /// exist. Missing keys take their default value.
    pub fn load(path: &Path) -> Result<Self, ScanlabelError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(ScanlabelError::Io)?;
        let settings = Self::from_toml_str(&content).map_err(|source| {
            ScanlabelError::SettingsParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Writes settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ScanlabelError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(ScanlabelError::Io)?;
            }
        }
        let content = self.to_toml_string().map_err(|source| ScanlabelError::SettingsWrite {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(ScanlabelError::Io)
    }

    /// Overwrites `path` with the documented defaults and returns them.
    pub fn reset(path: &Path) -> Result<Self, ScanlabelError> {
        let defaults = Self::default();
        defaults.save(path)?;
        tracing::info!(path = %path.display(), "settings reset to defaults");
        Ok(defaults)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Checks every field against its documented domain.
    pub fn validate(&self) -> Result<(), ScanlabelError> {
        let fail = |message: String| Err(ScanlabelError::InvalidSettings { message });

        let block = self.binarize.block_size;
        if block < 3 || block % 2 == 0 {
            return fail(format!(
                "binarize.block_size must be odd and >= 3 (got {block})"
            ));
        }
        if !self.binarize.constant.is_finite() {
            return fail("binarize.constant must be finite".to_string());
        }

        let filter = &self.filter;
        if filter.area_lower >= filter.area_upper {
            return fail(format!(
                "filter.area_lower ({}) must be below filter.area_upper ({})",
                filter.area_lower, filter.area_upper
            ));
        }
        if !(filter.aspect_bound.is_finite() && filter.aspect_bound > 0.0) {
            return fail("filter.aspect_bound must be a positive number".to_string());
        }

        let diacritic = &self.diacritic;
        if diacritic.overlap_area_lower >= filter.area_lower {
            return fail(format!(
                "diacritic.overlap_area_lower ({}) must be below filter.area_lower ({})",
                diacritic.overlap_area_lower, filter.area_lower
            ));
        }
        if !(diacritic.overlap_aspect_bound.is_finite() && diacritic.overlap_aspect_bound > 0.0) {
            return fail("diacritic.overlap_aspect_bound must be a positive number".to_string());
        }
        let tolerances = [
            ("tolerance_left", diacritic.tolerance_left),
            ("tolerance_right", diacritic.tolerance_right),
            ("tolerance_upper", diacritic.tolerance_upper),
            ("tolerance_lower", diacritic.tolerance_lower),
        ];
        for (name, value) in tolerances {
            if !(value.is_finite() && value >= 0.0) {
                return fail(format!("diacritic.{name} must be >= 0 (got {value})"));
            }
        }

        if !(self.crop.padding.is_finite() && self.crop.padding >= 0.0) {
            return fail(format!(
                "crop.padding must be >= 0 (got {})",
                self.crop.padding
            ));
        }

        Ok(())
    }

    /// Snapshot of the parameters the filter/merge pass reads.
    pub fn merge_params(&self) -> MergeParams {
        MergeParams {
            area_lower: self.filter.area_lower,
            area_upper: self.filter.area_upper,
            aspect_bound: self.filter.aspect_bound,
            overlap_area_lower: self.diacritic.overlap_area_lower,
            overlap_aspect_bound: self.diacritic.overlap_aspect_bound,
            tolerance_left: self.diacritic.tolerance_left,
            tolerance_right: self.diacritic.tolerance_right,
            tolerance_upper: self.diacritic.tolerance_upper,
            tolerance_lower: self.diacritic.tolerance_lower,
            padding: self.crop.padding,
        }
    }
}
