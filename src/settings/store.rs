use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::settings::{
    ActivityLevel, DEFAULT_AGE, DEFAULT_CYCLE_LENGTH_MIN, DEFAULT_NUM_OPTIONS,
    DEFAULT_SLEEP_LATENCY_MIN, Settings, SettingsOverrides,
};

const SETTINGS_VERSION: u32 = 1;

/// Source of normalized settings. Implementations are responsible for
/// replacing anything missing or unusable with the defaults.
pub trait SettingsProvider {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsProvider for JsonSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "settings file not found, using defaults");
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("unable to read settings file {}", self.path.display()))?;
        parse_settings_text(&content)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let text = render_settings_text(settings)?;
        fs::write(&self.path, text)
            .with_context(|| format!("unable to write settings file {}", self.path.display()))?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// Loads settings, layers the overrides on top and optionally writes the
/// merged result back through the same provider.
pub fn load_with_overrides<P: SettingsProvider + ?Sized>(
    provider: &P,
    overrides: &SettingsOverrides,
    persist: bool,
) -> Result<Settings> {
    let stored = provider.load()?;
    let merged = stored.with_overrides(overrides);
    if persist {
        if overrides.is_empty() {
            debug!("no overrides given, saving current settings unchanged");
        }
        provider.save(&merged)?;
    }
    Ok(merged)
}

pub fn parse_settings_text(content: &str) -> Result<Settings> {
    let raw = serde_json::from_str::<SettingsFile>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })?;

    if raw.version != SETTINGS_VERSION {
        bail!(
            "unsupported settings version {}; expected version {SETTINGS_VERSION}",
            raw.version
        );
    }

    Ok(Settings {
        cycle_length_min: integer_or_default(
            "cycle_length",
            &raw.cycle_length,
            DEFAULT_CYCLE_LENGTH_MIN,
            |minutes: i64| minutes > 0,
        ),
        sleep_latency_min: integer_or_default(
            "sleep_latency",
            &raw.sleep_latency,
            DEFAULT_SLEEP_LATENCY_MIN,
            |minutes: i64| minutes >= 0,
        ),
        num_options: integer_or_default(
            "num_options",
            &raw.num_options,
            DEFAULT_NUM_OPTIONS,
            |_: u32| true,
        ),
        age: integer_or_default("age", &raw.age, DEFAULT_AGE, |_: u32| true),
        activity_level: activity_or_default(&raw.activity_level),
    })
}

pub fn render_settings_text(settings: &Settings) -> Result<String> {
    let payload = json!({
        "version": SETTINGS_VERSION,
        "cycle_length": settings.cycle_length_min,
        "sleep_latency": settings.sleep_latency_min,
        "num_options": settings.num_options,
        "age": settings.age,
        "activity_level": settings.activity_level.as_token(),
    });
    let text = serde_json::to_string_pretty(&payload)?;
    Ok(format!("{text}\n"))
}

fn integer_or_default<T>(field: &str, value: &Value, default: T, accept: impl Fn(T) -> bool) -> T
where
    T: TryFrom<i64> + Copy,
{
    if value.is_null() {
        return default;
    }
    match integral_value(value).and_then(|number| T::try_from(number).ok()) {
        Some(number) if accept(number) => number,
        _ => {
            warn!(field, %value, "ignoring unusable setting, falling back to default");
            default
        }
    }
}

fn integral_value(value: &Value) -> Option<i64> {
    if let Some(number) = value.as_i64() {
        return Some(number);
    }
    let float = value.as_f64()?;
    (float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64)
        .then_some(float as i64)
}

fn activity_or_default(value: &Value) -> ActivityLevel {
    if value.is_null() {
        return ActivityLevel::default();
    }
    match value.as_str().and_then(ActivityLevel::from_token) {
        Some(level) => level,
        None => {
            warn!(%value, "unknown activity_level, falling back to moderate");
            ActivityLevel::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default, alias = "cycleLength")]
    cycle_length: Value,
    #[serde(default, alias = "sleepLatency")]
    sleep_latency: Value,
    #[serde(default, alias = "numOptions")]
    num_options: Value,
    #[serde(default)]
    age: Value,
    #[serde(default, alias = "activityLevel")]
    activity_level: Value,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

#[cfg(test)]
pub(crate) struct InMemorySettings {
    pub stored: std::cell::RefCell<Settings>,
    pub saves: std::cell::Cell<usize>,
}

#[cfg(test)]
impl InMemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            stored: std::cell::RefCell::new(settings),
            saves: std::cell::Cell::new(0),
        }
    }
}

#[cfg(test)]
impl SettingsProvider for InMemorySettings {
    fn load(&self) -> Result<Settings> {
        Ok(*self.stored.borrow())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.stored.borrow_mut() = *settings;
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn parses_complete_settings_file() {
        let json = r#"
{
  "version": 1,
  "cycle_length": 100,
  "sleep_latency": 20,
  "num_options": 6,
  "age": 70,
  "activity_level": "high"
}
"#;
        let settings = parse_settings_text(json).expect("valid settings");
        assert_eq!(settings.cycle_length_min, 100);
        assert_eq!(settings.sleep_latency_min, 20);
        assert_eq!(settings.num_options, 6);
        assert_eq!(settings.age, 70);
        assert_eq!(settings.activity_level, ActivityLevel::High);
    }

    #[test]
    fn empty_object_uses_defaults() {
        let settings = parse_settings_text("{}").expect("valid settings");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn unusable_values_fall_back_to_defaults() {
        let json = r#"
{
  "cycle_length": "ninety",
  "sleep_latency": -5,
  "num_options": 2.5,
  "age": null,
  "activity_level": "extreme"
}
"#;
        let settings = parse_settings_text(json).expect("valid settings");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn zero_cycle_length_is_replaced() {
        let settings = parse_settings_text(r#"{"cycle_length": 0}"#).expect("valid settings");
        assert_eq!(settings.cycle_length_min, 90);
    }

    #[test]
    fn integral_floats_are_accepted() {
        let settings =
            parse_settings_text(r#"{"cycle_length": 95.0, "num_options": 4}"#).expect("valid");
        assert_eq!(settings.cycle_length_min, 95);
        assert_eq!(settings.num_options, 4);
    }

    #[test]
    fn accepts_camel_case_keys() {
        let json = r#"{"cycleLength": 80, "sleepLatency": 10, "numOptions": 5}"#;
        let settings = parse_settings_text(json).expect("valid settings");
        assert_eq!(settings.cycle_length_min, 80);
        assert_eq!(settings.sleep_latency_min, 10);
        assert_eq!(settings.num_options, 5);
    }

    #[test]
    fn malformed_json_reports_position() {
        let err = parse_settings_text("{ not-json ").expect_err("malformed json should fail");
        assert!(err.to_string().contains("invalid JSON at line 1"));
    }

    #[test]
    fn rejects_unknown_version() {
        let err = parse_settings_text(r#"{"version": 2}"#).expect_err("version 2 should fail");
        assert!(err.to_string().contains("unsupported settings version 2"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().expect("tempdir");
        let store = JsonSettingsStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().expect("defaults"), Settings::default());
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = tempdir().expect("tempdir");
        let store = JsonSettingsStore::new(dir.path().join("rimrod.json"));
        let settings = Settings {
            cycle_length_min: 85,
            sleep_latency_min: 5,
            num_options: 8,
            age: 66,
            activity_level: ActivityLevel::Low,
        };
        store.save(&settings).expect("save");

        let text = fs::read_to_string(store.path()).expect("read back");
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"activity_level\": \"low\""));
        assert_eq!(store.load().expect("load"), settings);
    }

    #[test]
    fn overrides_are_persisted_only_when_requested() {
        let provider = InMemorySettings::new(Settings::default());
        let overrides = SettingsOverrides {
            num_options: Some(4),
            ..SettingsOverrides::default()
        };

        let merged = load_with_overrides(&provider, &overrides, false).expect("merge");
        assert_eq!(merged.num_options, 4);
        assert_eq!(provider.saves.get(), 0);
        assert_eq!(provider.stored.borrow().num_options, 10);

        load_with_overrides(&provider, &overrides, true).expect("merge and save");
        assert_eq!(provider.saves.get(), 1);
        assert_eq!(provider.stored.borrow().num_options, 4);
    }
}
