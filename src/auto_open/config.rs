//! Auto-open settings: profile presets, the persisted TOML file and env overrides.
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    acquisition::AcquisitionStrategy,
    cooldown::{CooldownKeyStrategy, CooldownPruning, KeyPolicy},
    errors::SettingsError,
    selection::SelectionPolicy,
};

const CONFIG_PATH: &str = "config/auto_open.toml";

pub const ENABLED_ENV: &str = "AUTO_OPEN_ENABLED";
pub const RANGE_ENV: &str = "AUTO_OPEN_RANGE";
pub const PROFILE_ENV: &str = "AUTO_OPEN_PROFILE";

/// Preset bundles of loop behaviour and range bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoOpenProfile {
    /// Twice a second, cached scan, nearest container only.
    #[default]
    CachedNearest,
    /// Once a second, cached scan, nearest container only, wider range.
    CachedNearestSlow,
    /// Once a second, fresh scan, every eligible container, pruned cooldowns.
    FreshAll,
}

impl AutoOpenProfile {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CachedNearest => "cached_nearest",
            Self::CachedNearestSlow => "cached_nearest_slow",
            Self::FreshAll => "fresh_all",
        }
    }

    pub fn behaviour(self) -> LoopBehaviour {
        match self {
            Self::CachedNearest => LoopBehaviour {
                check_interval_ticks: 30,
                acquisition: AcquisitionStrategy::Cached,
                selection: SelectionPolicy::Nearest,
                pruning: CooldownPruning::Never,
                keys: KeyPolicy::default(),
            },
            Self::CachedNearestSlow => LoopBehaviour {
                check_interval_ticks: 60,
                ..Self::CachedNearest.behaviour()
            },
            Self::FreshAll => LoopBehaviour {
                check_interval_ticks: 60,
                acquisition: AcquisitionStrategy::Fresh,
                selection: SelectionPolicy::AllEligible,
                pruning: CooldownPruning::Absent,
                keys: KeyPolicy::default(),
            },
        }
    }

    pub fn range_bounds(self) -> RangeBounds {
        match self {
            Self::CachedNearest => RangeBounds::new(300.0, 100.0, 1000.0, 50.0),
            Self::CachedNearestSlow => RangeBounds::new(500.0, 100.0, 2000.0, 50.0),
            Self::FreshAll => RangeBounds::new(1000.0, 200.0, 3000.0, 100.0),
        }
    }
}

impl fmt::Display for AutoOpenProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AutoOpenProfile {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cached_nearest" => Ok(Self::CachedNearest),
            "cached_nearest_slow" => Ok(Self::CachedNearestSlow),
            "fresh_all" => Ok(Self::FreshAll),
            other => Err(format!("unknown auto-open profile '{}'", other)),
        }
    }
}

/// Declared slider bounds for the open range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBounds {
    pub default: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl RangeBounds {
    pub const fn new(default: f32, min: f32, max: f32, step: f32) -> Self {
        Self {
            default,
            min,
            max,
            step,
        }
    }

    /// Snaps `value` to the step grid and clamps it into `[min, max]`.
    pub fn clamp(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.default;
        }
        let snapped = if self.step > 0.0 {
            self.min + ((value - self.min) / self.step).round() * self.step
        } else {
            value
        };
        snapped.clamp(self.min, self.max)
    }
}

/// Loop parameters that are fixed for a run unless overridden in the file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopBehaviour {
    pub check_interval_ticks: u32,
    pub acquisition: AcquisitionStrategy,
    pub selection: SelectionPolicy,
    pub pruning: CooldownPruning,
    pub keys: KeyPolicy,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct RawAutoOpenConfig {
    #[serde(default)]
    profile: AutoOpenProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    open_range: Option<f32>,
    #[serde(default, skip_serializing_if = "RawOverrides::is_empty")]
    overrides: RawOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
struct RawOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    check_interval_ticks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acquisition: Option<AcquisitionStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selection: Option<SelectionPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pruning: Option<CooldownPruning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cooldown_key: Option<CooldownKeyStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature_cell: Option<f32>,
}

impl RawOverrides {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl RawAutoOpenConfig {
    fn read(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<RawAutoOpenConfig>(&raw) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to defaults.",
                        path.display(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(PROFILE_ENV) {
            match value.parse::<AutoOpenProfile>() {
                Ok(profile) => self.profile = profile,
                Err(err) => warn!("Ignoring {}: {}", PROFILE_ENV, err),
            }
        }

        if let Some(value) = lookup(ENABLED_ENV) {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.enabled = Some(true),
                "0" | "false" | "no" | "off" => self.enabled = Some(false),
                other => warn!("Ignoring {}={}: expected a boolean", ENABLED_ENV, other),
            }
        }

        if let Some(value) = lookup(RANGE_ENV) {
            match value.trim().parse::<f32>() {
                Ok(range) => self.open_range = Some(range),
                Err(err) => warn!("Ignoring {}={}: {}", RANGE_ENV, value, err),
            }
        }
    }
}

/// Runtime settings for the auto-open loop, persisted to `config/auto_open.toml`.
#[derive(Resource, Debug, Clone)]
pub struct AutoOpenSettings {
    pub enabled: bool,
    pub profile: AutoOpenProfile,
    pub behaviour: LoopBehaviour,
    open_range: f32,
    bounds: RangeBounds,
    /// What the file holds plus runtime edits. Env overrides never land here.
    persisted: RawAutoOpenConfig,
    path: PathBuf,
}

impl AutoOpenSettings {
    pub fn load_or_default() -> Self {
        Self::load_from(CONFIG_PATH, |name| env::var(name).ok())
    }

    pub fn load_from(
        path: impl Into<PathBuf>,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let path = path.into();
        let file = RawAutoOpenConfig::read(&path);
        let mut effective = file.clone();
        effective.apply_env(env_lookup);
        Self {
            persisted: file,
            ..Self::from_raw(effective, path)
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_toml_str(data: &str) -> Result<Self, toml::de::Error> {
        let raw = toml::from_str::<RawAutoOpenConfig>(data)?;
        Ok(Self::from_raw(raw, PathBuf::from(CONFIG_PATH)))
    }

    fn from_raw(raw: RawAutoOpenConfig, path: PathBuf) -> Self {
        let bounds = raw.profile.range_bounds();
        let mut behaviour = raw.profile.behaviour();
        let overrides = &raw.overrides;

        if let Some(ticks) = overrides.check_interval_ticks {
            behaviour.check_interval_ticks = ticks.max(1);
        }
        if let Some(acquisition) = overrides.acquisition {
            behaviour.acquisition = acquisition;
        }
        if let Some(selection) = overrides.selection {
            behaviour.selection = selection;
        }
        if let Some(pruning) = overrides.pruning {
            behaviour.pruning = pruning;
        }
        if let Some(strategy) = overrides.cooldown_key {
            behaviour.keys.strategy = strategy;
        }
        if let Some(cell) = overrides.signature_cell.filter(|cell| *cell > 0.0) {
            behaviour.keys.cell_size = cell;
        }

        Self {
            enabled: raw.enabled.unwrap_or(true),
            profile: raw.profile,
            behaviour,
            open_range: bounds.clamp(raw.open_range.unwrap_or(bounds.default)),
            bounds,
            persisted: raw,
            path,
        }
    }

    pub fn open_range(&self) -> f32 {
        self.open_range
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Points persistence at another file.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the range, clamped to the profile bounds. Returns the applied value.
    pub fn set_open_range(&mut self, value: f32) -> f32 {
        self.open_range = self.bounds.clamp(value);
        self.persisted.open_range = Some(self.open_range);
        self.open_range
    }

    /// Moves the range by whole slider steps.
    pub fn step_open_range(&mut self, steps: i32) -> f32 {
        self.set_open_range(self.open_range + self.bounds.step * steps as f32)
    }

    pub fn toggle_enabled(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.persisted.enabled = Some(self.enabled);
        self.enabled
    }

    /// File values plus the fields changed through the setters.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(&self.persisted)?)
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let data = self.to_toml()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl Default for AutoOpenSettings {
    fn default() -> Self {
        Self::from_raw(RawAutoOpenConfig::default(), PathBuf::from(CONFIG_PATH))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::SystemTime};

    use super::*;

    #[test]
    fn defaults_follow_the_cached_nearest_profile() {
        let settings = AutoOpenSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.profile, AutoOpenProfile::CachedNearest);
        assert_eq!(settings.open_range(), 300.0);
        assert_eq!(settings.behaviour.check_interval_ticks, 30);
        assert_eq!(settings.behaviour.pruning, CooldownPruning::Never);
    }

    #[test]
    fn range_is_snapped_and_clamped_to_profile_bounds() {
        let bounds = AutoOpenProfile::CachedNearest.range_bounds();
        assert_eq!(bounds.clamp(20.0), 100.0);
        assert_eq!(bounds.clamp(5_000.0), 1000.0);
        assert_eq!(bounds.clamp(324.0), 300.0);
        assert_eq!(bounds.clamp(326.0), 350.0);
        assert_eq!(bounds.clamp(f32::NAN), 300.0);
    }

    #[test]
    fn file_overrides_apply_on_top_of_the_profile() {
        let settings = AutoOpenSettings::from_toml_str(
            r#"
            profile = "fresh_all"
            enabled = false
            open_range = 1440.0

            [overrides]
            selection = "nearest"
            cooldown_key = "signature"
            signature_cell = 25.0
            "#,
        )
        .expect("valid toml");

        assert!(!settings.enabled);
        assert_eq!(settings.open_range(), 1400.0);
        assert_eq!(settings.behaviour.acquisition, AcquisitionStrategy::Fresh);
        assert_eq!(settings.behaviour.selection, SelectionPolicy::Nearest);
        assert_eq!(settings.behaviour.pruning, CooldownPruning::Absent);
        assert_eq!(settings.behaviour.keys.strategy, CooldownKeyStrategy::Signature);
        assert_eq!(settings.behaviour.keys.cell_size, 25.0);
    }

    #[test]
    fn env_overrides_win_over_the_file() {
        let path = env::temp_dir().join("auto_open_missing_config.toml");
        let vars: HashMap<&str, &str> = [
            (PROFILE_ENV, "cached_nearest_slow"),
            (ENABLED_ENV, "off"),
            (RANGE_ENV, "777"),
        ]
        .into_iter()
        .collect();

        let settings =
            AutoOpenSettings::load_from(&path, |name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(settings.profile, AutoOpenProfile::CachedNearestSlow);
        assert!(!settings.enabled);
        assert_eq!(settings.open_range(), 800.0);
        assert_eq!(settings.behaviour.check_interval_ticks, 60);
    }

    #[test]
    fn stepping_respects_bounds() {
        let mut settings = AutoOpenSettings::default();
        assert_eq!(settings.step_open_range(2), 400.0);
        assert_eq!(settings.step_open_range(-100), 100.0);
        assert!(!settings.toggle_enabled());
    }

    #[test]
    fn saved_settings_round_trip_through_disk() {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = env::temp_dir()
            .join(format!("auto_open_settings_{}", unique_suffix))
            .join("auto_open.toml");

        let mut settings = AutoOpenSettings::default().with_path(&path);
        settings.set_open_range(650.0);
        settings.toggle_enabled();
        settings.save().expect("settings should persist");

        let reloaded = AutoOpenSettings::load_from(&path, |_| None);
        assert!(!reloaded.enabled);
        assert_eq!(reloaded.open_range(), 650.0);

        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn env_overrides_are_not_written_back_on_save() {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let directory = env::temp_dir().join(format!("auto_open_env_save_{}", unique_suffix));
        let path = directory.join("auto_open.toml");
        fs::create_dir_all(&directory).expect("temp dir");
        fs::write(
            &path,
            "profile = \"cached_nearest\"\nenabled = true\nopen_range = 400.0\n",
        )
        .expect("seed config");

        let vars: HashMap<&str, &str> = [
            (PROFILE_ENV, "fresh_all"),
            (ENABLED_ENV, "off"),
            (RANGE_ENV, "2000"),
        ]
        .into_iter()
        .collect();
        let mut settings =
            AutoOpenSettings::load_from(&path, |name| vars.get(name).map(|v| v.to_string()));
        assert!(!settings.enabled);
        assert_eq!(settings.profile, AutoOpenProfile::FreshAll);

        assert_eq!(settings.step_open_range(1), 2100.0);
        settings.save().expect("settings should persist");

        let saved = fs::read_to_string(&path).expect("saved file");
        assert!(!saved.contains("fresh_all"));
        assert!(!saved.contains("enabled = false"));

        let reloaded = AutoOpenSettings::load_from(&path, |_| None);
        assert!(reloaded.enabled);
        assert_eq!(reloaded.profile, AutoOpenProfile::CachedNearest);
        // The stepped range was a runtime edit; it is kept and clamped to the file's profile.
        assert_eq!(reloaded.open_range(), 1000.0);

        let _ = fs::remove_dir_all(&directory);
    }
}
